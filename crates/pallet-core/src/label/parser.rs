//! Layered label parser: structured patterns, then heading lines, then
//! unstructured content heuristics.

use lazy_static::lazy_static;
use tracing::{debug, info};

use crate::models::config::{ExtractionConfig, SsccFallback};
use crate::models::label::ExtractionResult;

use super::rules::{
    heading::extract_heading_lines, normalize_text, structured::extract_structured,
    unstructured::extract_unstructured, FieldRules, StructuredPass,
};

/// Trait for label parsing.
pub trait LabelParser {
    /// Parse recognized label text. Never fails: unresolved fields come back
    /// empty with `low` confidence.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Parser running the three extraction passes over an immutable rule table.
///
/// Holds no mutable state, so one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct LayeredLabelParser {
    rules: FieldRules,
    sscc_fallback: SsccFallback,
}

impl LayeredLabelParser {
    /// Create a parser with the built-in label vocabulary.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from configuration. Malformed patterns are skipped.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            rules: FieldRules::compile(config),
            sscc_fallback: config.sscc_fallback,
        }
    }

    /// Set handling of short SSCC candidates.
    pub fn with_sscc_fallback(mut self, fallback: SsccFallback) -> Self {
        self.sscc_fallback = fallback;
        self
    }
}

impl Default for LayeredLabelParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelParser for LayeredLabelParser {
    fn parse(&self, text: &str) -> ExtractionResult {
        info!("Parsing label from {} characters of text", text.len());

        let normalized = normalize_text(text);
        let StructuredPass {
            mut parsed,
            mut confidence,
            warnings,
        } = extract_structured(&normalized, &self.rules, self.sscc_fallback);
        let structured = parsed.filled();

        // Warnings stay as the structured pass left them.
        let heading = extract_heading_lines(text, &mut parsed, &mut confidence);
        let unstructured = extract_unstructured(text, &mut parsed, &mut confidence);

        debug!(
            "Filled {} fields (structured {}, heading {}, unstructured {}), {} warnings",
            parsed.filled(),
            structured,
            heading,
            unstructured,
            warnings.len()
        );

        ExtractionResult {
            parsed,
            confidence,
            warnings,
        }
    }
}

lazy_static! {
    static ref DEFAULT_PARSER: LayeredLabelParser = LayeredLabelParser::new();
}

/// Parse label text with the built-in vocabulary.
pub fn parse_label(text: &str) -> ExtractionResult {
    DEFAULT_PARSER.parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::FieldSpec;
    use crate::models::label::{Confidence, LabelField};

    #[test]
    fn test_parse_labelled_ticket() {
        let text = r#"
            BRIX & CO
            ITEM NUMBER: BRI023A250SM200BMHP
            ITEM DESCRIPTION: ALBA RASPBERRY 5.9% 250ML
            BATCH NO: 284019
            QUANTITY: 1200
            DATE: 14/03/2025
            TIME: 06:42
            CUSTOMER ITEM NUMBER: 100-2040
            EAN NUMBER: 5060123456789
            6SCC(00)000000000000222051
        "#;

        let result = LayeredLabelParser::new().parse(text);

        assert_eq!(result.parsed.item_number, "BRI023A250SM200BMHP");
        assert_eq!(result.parsed.item_description, "ALBA RASPBERRY 5.9 250ML");
        assert_eq!(result.parsed.batch_no, "284019");
        assert_eq!(result.parsed.quantity, "1200");
        assert_eq!(result.parsed.date, "14/03/2025");
        assert_eq!(result.parsed.time, "06:42");
        assert_eq!(result.parsed.customer_item_number, "100-2040");
        assert_eq!(result.parsed.ean_number, "5060123456789");
        assert_eq!(result.parsed.sscc, "000000000000222051");
        assert_eq!(result.confidence_of(LabelField::Sscc), Confidence::High);
        assert_eq!(result.warnings, vec!["'handwritten_number' not found".to_string()]);
    }

    #[test]
    fn test_heading_pass_fills_after_structured_miss() {
        // The structured pattern stops at the space and the short code is
        // rejected; the line pass strips the space and accepts it.
        let result = parse_label("Item Number: bri023a 250sm200bmhp");
        assert_eq!(result.parsed.item_number, "bri023a250sm200bmhp");
        assert_eq!(result.confidence_of(LabelField::ItemNumber), Confidence::High);
        assert!(result.warnings.contains(&"'item_number' not found".to_string()));
    }

    #[test]
    fn test_sscc_fallback_setting() {
        let text = "SSCC: LOT 77";
        let keep = LayeredLabelParser::new().parse(text);
        assert_eq!(keep.parsed.sscc, "LOT 77");

        let clear = LayeredLabelParser::new()
            .with_sscc_fallback(SsccFallback::Clear)
            .parse(text);
        assert_eq!(clear.parsed.sscc, "");
        assert_eq!(clear.confidence_of(LabelField::Sscc), Confidence::Low);
    }

    #[test]
    fn test_sscc_fallback_keeps_configured_rules() {
        let config = ExtractionConfig {
            fields: vec![FieldSpec::new(LabelField::BatchNo, &[], &[r"LOT (\d+)"])],
            ..Default::default()
        };
        let parser =
            LayeredLabelParser::from_config(&config).with_sscc_fallback(SsccFallback::Clear);

        let result = parser.parse("LOT 77");
        assert_eq!(result.parsed.batch_no, "77");
        assert_eq!(LayeredLabelParser::new().parse("LOT 77").parsed.batch_no, "");
    }

    #[test]
    fn test_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LayeredLabelParser>();
    }
}
