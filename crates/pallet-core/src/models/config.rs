//! Configuration structures for label extraction.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::label::LabelField;

/// Main configuration for the pallet pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PalletConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Capture record configuration.
    pub record: RecordConfig,
}

/// What to do with an SSCC candidate that keeps fewer than 16 digits once
/// non-digits are stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SsccFallback {
    /// Keep the raw captured text at its matched confidence.
    KeepRaw,
    /// Clear the value and downgrade confidence to `low`.
    Clear,
}

impl Default for SsccFallback {
    fn default() -> Self {
        Self::KeepRaw
    }
}

/// Heading vocabulary for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field the patterns fill.
    pub field: LabelField,

    /// Loose headings, tried as `KEYWORD[:\s]+(rest of line)`.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Regular expressions with one capture group, tried in order.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl FieldSpec {
    pub fn new(field: LabelField, keywords: &[&str], patterns: &[&str]) -> Self {
        Self {
            field,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Heading vocabulary, in field order.
    pub fields: Vec<FieldSpec>,

    /// Handling of short SSCC candidates in the structured pass.
    pub sscc_fallback: SsccFallback,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            fields: default_field_specs(),
            sscc_fallback: SsccFallback::default(),
        }
    }
}

impl ExtractionConfig {
    /// Vocabulary configured for a field, if any.
    pub fn spec(&self, field: LabelField) -> Option<&FieldSpec> {
        self.fields.iter().find(|s| s.field == field)
    }
}

/// Built-in heading vocabulary for Brix & Co / Recorp pallet labels.
pub fn default_field_specs() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new(
            LabelField::ItemNumber,
            &["ITEM NUMBER"],
            &[r"ITEM\s*NUMBER[\s:]+([A-Z0-9\-]+)"],
        ),
        FieldSpec::new(
            LabelField::ItemDescription,
            &["ITEM DESCRIPTION"],
            &[r"ITEM\s*DESCRIPTION[\s:]+(.+?)(?:\n|BATCH|QUANTITY|DATE|$)"],
        ),
        FieldSpec::new(
            LabelField::BatchNo,
            &["BATCH NO"],
            &[r"BATCH\s*NO\.?[\s:]+(\d+)"],
        ),
        FieldSpec::new(
            LabelField::Quantity,
            &["QUANTITY"],
            &[r"QUANTITY[\s:]+(\d+(?:\.\d+)?)"],
        ),
        FieldSpec::new(
            LabelField::Date,
            &["DATE"],
            &[r"\bDATE[\s:]+(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})"],
        ),
        FieldSpec::new(LabelField::Time, &["TIME"], &[r"TIME[\s:]+(\d{1,2}:\d{2})"]),
        FieldSpec::new(
            LabelField::CustomerItemNumber,
            &["CUSTOMER ITEM NUMBER"],
            &[r"CUSTOMER\s*ITEM\s*NUMBER[\s:]+(.+?)(?:\n|$)"],
        ),
        FieldSpec::new(
            LabelField::EanNumber,
            &["EAN NUMBER"],
            &[r"EAN\s*NUMBER[\s:]+(.+?)(?:\n|$)"],
        ),
        FieldSpec::new(
            LabelField::Sscc,
            &["6SCC", "SSCC"],
            &[
                r"6SCC\s*\(?\s*00\s*\)?\s*([0-9]{16,22})",
                r"\(00\)\s*([0-9]{16,22})",
                r"SSCC[\s:]*([0-9]{18})",
            ],
        ),
        // Recovered from unstructured text only.
        FieldSpec::new(LabelField::HandwrittenNumber, &[], &[]),
    ]
}

/// Capture record configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordConfig {
    /// Operator recorded on captures when none is given explicitly.
    pub operator: Option<String>,
}

impl PalletConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_specs_cover_every_field() {
        let config = ExtractionConfig::default();
        for field in LabelField::ALL {
            assert!(config.spec(field).is_some(), "missing spec for {field}");
        }
        assert_eq!(config.spec(LabelField::Sscc).unwrap().patterns.len(), 3);
        assert!(config.spec(LabelField::HandwrittenNumber).unwrap().patterns.is_empty());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: PalletConfig =
            serde_json::from_str(r#"{"record": {"operator": "forklift-2"}}"#).unwrap();
        assert_eq!(config.record.operator.as_deref(), Some("forklift-2"));
        assert_eq!(config.extraction.fields.len(), 10);
        assert_eq!(config.extraction.sscc_fallback, SsccFallback::KeepRaw);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PalletConfig::default();
        config.extraction.sscc_fallback = SsccFallback::Clear;
        config.save(&path).unwrap();

        let loaded = PalletConfig::from_file(&path).unwrap();
        assert_eq!(loaded.extraction.sscc_fallback, SsccFallback::Clear);
        assert_eq!(loaded.extraction.fields, config.extraction.fields);
    }
}
