//! Rule-based field extractors for pallet labels.
//!
//! Three passes run in order, each only filling fields the earlier ones
//! left empty:
//! 1. [`structured`] - configured heading patterns over normalized text
//! 2. [`heading`] - `Heading: Value` lines over raw text
//! 3. [`unstructured`] - content heuristics over raw lines

pub mod heading;
pub mod normalize;
pub mod patterns;
pub mod structured;
pub mod unstructured;
pub mod validators;

pub use normalize::{normalize_text, text_lines};
pub use structured::{CompiledField, FieldRules, StructuredPass};
pub use validators::{
    clean_value, sscc_digits, valid_date, valid_item_number, valid_quantity, valid_time,
    UNIT_TOKENS,
};

use crate::models::label::Confidence;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A candidate value together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Confidence of the rule that produced it.
    pub confidence: Confidence,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, confidence: Confidence, source: impl Into<String>) -> Self {
        Self {
            value,
            confidence,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
