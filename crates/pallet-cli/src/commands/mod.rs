//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod output;
pub mod parse;

use std::path::{Path, PathBuf};

use tracing::debug;

use pallet_core::PalletConfig;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pallet")
        .join("config.json")
}

/// Load the explicit config file, else the default one if present, else
/// built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PalletConfig> {
    if let Some(path) = config_path {
        return Ok(PalletConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(PalletConfig::from_file(&default_path)?)
    } else {
        Ok(PalletConfig::default())
    }
}

fn non_blank(name: &str) -> Option<String> {
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Operator for capture records: explicit flag, then config, then the
/// login name. Blank sources are skipped.
pub fn resolve_operator(explicit: Option<&str>, config: &PalletConfig) -> String {
    explicit
        .and_then(non_blank)
        .or_else(|| config.record.operator.as_deref().and_then(non_blank))
        .or_else(|| std::env::var("USER").ok().as_deref().and_then(non_blank))
        .or_else(|| std::env::var("USERNAME").ok().as_deref().and_then(non_blank))
        .unwrap_or_else(|| "operator".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_operator(operator: Option<&str>) -> PalletConfig {
        let mut config = PalletConfig::default();
        config.record.operator = operator.map(str::to_string);
        config
    }

    #[test]
    fn test_explicit_operator_wins() {
        let config = config_with_operator(Some("forklift-2"));
        assert_eq!(resolve_operator(Some(" jo "), &config), "jo");
    }

    #[test]
    fn test_blank_operator_falls_back_to_config() {
        let config = config_with_operator(Some("forklift-2"));
        assert_eq!(resolve_operator(Some("   "), &config), "forklift-2");
        assert_eq!(resolve_operator(None, &config), "forklift-2");
    }

    #[test]
    fn test_blank_config_operator_is_skipped() {
        let config = config_with_operator(Some(" "));
        let resolved = resolve_operator(Some(""), &config);
        assert!(!resolved.trim().is_empty());
        assert_ne!(resolved, " ");
    }
}
