//! Structured pass: configured heading patterns over normalized text.

use regex::{Regex, RegexBuilder};
use tracing::{debug, trace, warn};

use crate::error::{LabelError, Result};
use crate::models::config::{ExtractionConfig, SsccFallback};
use crate::models::label::{all_low, Confidence, ConfidenceMap, LabelField, LabelRecord};

use super::validators::{
    clean_value, is_not_applicable, sscc_digits, valid_date, valid_item_number, valid_quantity,
    valid_time, MIN_SSCC_DIGITS,
};
use super::{ExtractionMatch, FieldExtractor};

/// Longest digit run accepted as an SSCC.
pub const MAX_SSCC_DIGITS: usize = 22;

/// Compiled patterns and keyword matchers for one field.
#[derive(Debug, Clone)]
pub struct CompiledField {
    pub field: LabelField,
    patterns: Vec<Regex>,
    keywords: Vec<Regex>,
}

impl CompiledField {
    fn empty(field: LabelField) -> Self {
        Self {
            field,
            patterns: Vec::new(),
            keywords: Vec::new(),
        }
    }

    /// Number of usable patterns and keywords.
    pub fn rule_count(&self) -> usize {
        self.patterns.len() + self.keywords.len()
    }
}

fn first_group(re: &Regex, text: &str, confidence: Confidence) -> Option<ExtractionMatch<String>> {
    let caps = re.captures(text)?;
    let group = caps.get(1)?;
    if group.as_str().is_empty() {
        return None;
    }

    let value = clean_value(group.as_str());
    if value.is_empty() || is_not_applicable(&value) {
        return None;
    }

    let full = caps.get(0)?;
    Some(
        ExtractionMatch::new(value, confidence, full.as_str())
            .with_position(full.start(), full.end()),
    )
}

impl FieldExtractor for CompiledField {
    type Output = ExtractionMatch<String>;

    /// First pattern hit wins at `high`; otherwise the first keyword hit at
    /// `medium`. Each matcher only looks at its first match in the text.
    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.patterns
            .iter()
            .find_map(|re| first_group(re, text, Confidence::High))
            .or_else(|| {
                self.keywords
                    .iter()
                    .find_map(|re| first_group(re, text, Confidence::Medium))
            })
    }
}

/// Immutable rule table compiled once from an [`ExtractionConfig`].
#[derive(Debug, Clone)]
pub struct FieldRules {
    fields: Vec<CompiledField>,
}

fn compile_pattern(field: LabelField, pattern: &str) -> Result<Regex> {
    let re = RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| LabelError::Pattern {
            field,
            pattern: pattern.to_string(),
            source,
        })?;

    if re.captures_len() < 2 {
        return Err(LabelError::Config(format!(
            "pattern for {field} has no capture group: {pattern:?}"
        )));
    }

    Ok(re)
}

fn keyword_pattern(keyword: &str) -> String {
    format!(r"{}[\s:]+([^\n\r]+)", regex::escape(keyword))
}

impl FieldRules {
    /// Compile every configured pattern, returning the usable table and the
    /// errors for patterns that had to be skipped.
    pub fn compile_with_errors(config: &ExtractionConfig) -> (Self, Vec<LabelError>) {
        let mut errors = Vec::new();
        let mut fields = Vec::with_capacity(LabelField::ALL.len());

        for field in LabelField::ALL {
            let mut compiled = CompiledField::empty(field);

            for spec in config.fields.iter().filter(|s| s.field == field) {
                for pattern in &spec.patterns {
                    match compile_pattern(field, pattern) {
                        Ok(re) => compiled.patterns.push(re),
                        Err(e) => errors.push(e),
                    }
                }
                for keyword in &spec.keywords {
                    match compile_pattern(field, &keyword_pattern(keyword)) {
                        Ok(re) => compiled.keywords.push(re),
                        Err(e) => errors.push(e),
                    }
                }
            }

            fields.push(compiled);
        }

        (Self { fields }, errors)
    }

    /// Compile the table, skipping malformed patterns with a warning.
    pub fn compile(config: &ExtractionConfig) -> Self {
        let (rules, errors) = Self::compile_with_errors(config);
        for e in &errors {
            warn!("Skipping field pattern: {}", e);
        }
        rules
    }

    /// Compile the table, failing on the first malformed pattern.
    pub fn try_compile(config: &ExtractionConfig) -> Result<Self> {
        let (rules, errors) = Self::compile_with_errors(config);
        match errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(rules),
        }
    }

    /// Compiled rules for a field.
    pub fn field(&self, field: LabelField) -> Option<&CompiledField> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// Iterate compiled fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledField> {
        self.fields.iter()
    }
}

impl Default for FieldRules {
    fn default() -> Self {
        Self::compile(&ExtractionConfig::default())
    }
}

/// Output of the structured pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredPass {
    pub parsed: LabelRecord,
    pub confidence: ConfidenceMap,
    /// One entry per field left empty by this pass.
    pub warnings: Vec<String>,
}

/// Apply the SSCC digit rule to a structured-pass candidate.
fn settle_sscc(value: String, fallback: SsccFallback) -> Option<String> {
    let digits = sscc_digits(&value);
    if (MIN_SSCC_DIGITS..=MAX_SSCC_DIGITS).contains(&digits.len()) {
        return Some(digits);
    }

    match fallback {
        SsccFallback::KeepRaw => {
            debug!("SSCC candidate {:?} has {} digits, keeping raw text", value, digits.len());
            Some(value)
        }
        SsccFallback::Clear => None,
    }
}

/// Post-extraction validator for fields that have one.
fn passes_validator(field: LabelField, value: &str) -> bool {
    match field {
        LabelField::ItemNumber => valid_item_number(value),
        LabelField::Date => valid_date(value),
        LabelField::Time => valid_time(value),
        LabelField::Quantity => valid_quantity(value),
        _ => true,
    }
}

/// Run the structured pass over normalized text.
pub fn extract_structured(
    normalized: &str,
    rules: &FieldRules,
    sscc_fallback: SsccFallback,
) -> StructuredPass {
    let mut parsed = LabelRecord::default();
    let mut confidence = all_low();
    let mut warnings = Vec::new();

    for compiled in rules.iter() {
        let field = compiled.field;

        let candidate = compiled.extract(normalized).and_then(|m| {
            trace!("{} matched {:?} at {:?}", field, m.source, m.position);
            let value = if field == LabelField::Sscc {
                settle_sscc(m.value, sscc_fallback)?
            } else {
                m.value
            };

            if passes_validator(field, &value) {
                Some((value, m.confidence))
            } else {
                debug!("Rejected {} value {:?}", field, value);
                None
            }
        });

        match candidate {
            Some((value, level)) => {
                parsed.set(field, value);
                confidence.insert(field, level);
            }
            None => warnings.push(format!("'{}' not found", field)),
        }
    }

    StructuredPass {
        parsed,
        confidence,
        warnings,
    }
}
