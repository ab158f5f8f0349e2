//! Label data models: canonical fields, confidence levels and the
//! extraction result handed back to callers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// A canonical field printed on a pallet label.
///
/// Variants are declared in canonical order; `Ord` follows it, so maps keyed
/// by `LabelField` iterate and serialize in label order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelField {
    /// Product item code (e.g. `BRI023A250SM200BMHP`).
    ItemNumber,
    /// Free-text product description.
    ItemDescription,
    /// Production batch number.
    BatchNo,
    /// Units on the pallet.
    Quantity,
    /// Production date.
    Date,
    /// Production time.
    Time,
    /// The customer's own item code.
    CustomerItemNumber,
    /// European Article Number.
    EanNumber,
    /// Serial Shipping Container Code (digits only).
    Sscc,
    /// Number written by hand on the label.
    HandwrittenNumber,
}

impl LabelField {
    /// All fields in canonical order.
    pub const ALL: [LabelField; 10] = [
        LabelField::ItemNumber,
        LabelField::ItemDescription,
        LabelField::BatchNo,
        LabelField::Quantity,
        LabelField::Date,
        LabelField::Time,
        LabelField::CustomerItemNumber,
        LabelField::EanNumber,
        LabelField::Sscc,
        LabelField::HandwrittenNumber,
    ];

    /// The field's snake_case name as used in output mappings.
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelField::ItemNumber => "item_number",
            LabelField::ItemDescription => "item_description",
            LabelField::BatchNo => "batch_no",
            LabelField::Quantity => "quantity",
            LabelField::Date => "date",
            LabelField::Time => "time",
            LabelField::CustomerItemNumber => "customer_item_number",
            LabelField::EanNumber => "ean_number",
            LabelField::Sscc => "sscc",
            LabelField::HandwrittenNumber => "handwritten_number",
        }
    }

    /// Look up a field by its snake_case name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|f| f.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for LabelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelField {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| LabelError::Config(format!("unknown label field: {s:?}")))
    }
}

/// Qualitative reliability of an extracted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Not found, or found but rejected by a validator.
    Low,
    /// Keyword proximity or content heuristic.
    Medium,
    /// Structured pattern or explicit `Heading: Value` line.
    High,
}

impl Default for Confidence {
    fn default() -> Self {
        Self::Low
    }
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracted label values, one string per canonical field.
///
/// Unresolved fields hold an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelRecord {
    pub item_number: String,
    pub item_description: String,
    pub batch_no: String,
    pub quantity: String,
    pub date: String,
    pub time: String,
    pub customer_item_number: String,
    pub ean_number: String,
    pub sscc: String,
    pub handwritten_number: String,
}

impl LabelRecord {
    /// Get the value of a field.
    pub fn get(&self, field: LabelField) -> &str {
        match field {
            LabelField::ItemNumber => &self.item_number,
            LabelField::ItemDescription => &self.item_description,
            LabelField::BatchNo => &self.batch_no,
            LabelField::Quantity => &self.quantity,
            LabelField::Date => &self.date,
            LabelField::Time => &self.time,
            LabelField::CustomerItemNumber => &self.customer_item_number,
            LabelField::EanNumber => &self.ean_number,
            LabelField::Sscc => &self.sscc,
            LabelField::HandwrittenNumber => &self.handwritten_number,
        }
    }

    fn slot(&mut self, field: LabelField) -> &mut String {
        match field {
            LabelField::ItemNumber => &mut self.item_number,
            LabelField::ItemDescription => &mut self.item_description,
            LabelField::BatchNo => &mut self.batch_no,
            LabelField::Quantity => &mut self.quantity,
            LabelField::Date => &mut self.date,
            LabelField::Time => &mut self.time,
            LabelField::CustomerItemNumber => &mut self.customer_item_number,
            LabelField::EanNumber => &mut self.ean_number,
            LabelField::Sscc => &mut self.sscc,
            LabelField::HandwrittenNumber => &mut self.handwritten_number,
        }
    }

    /// Overwrite the value of a field.
    pub fn set(&mut self, field: LabelField, value: impl Into<String>) {
        *self.slot(field) = value.into();
    }

    /// Whether a field holds a non-empty value.
    pub fn is_set(&self, field: LabelField) -> bool {
        !self.get(field).is_empty()
    }

    /// Iterate `(field, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (LabelField, &str)> + '_ {
        LabelField::ALL.into_iter().map(move |f| (f, self.get(f)))
    }

    /// Number of fields with a value.
    pub fn filled(&self) -> usize {
        LabelField::ALL.iter().filter(|f| self.is_set(**f)).count()
    }
}

/// Per-field confidence, always holding every canonical field.
pub type ConfidenceMap = BTreeMap<LabelField, Confidence>;

/// Build a confidence map with every field at `low`.
pub fn all_low() -> ConfidenceMap {
    LabelField::ALL.into_iter().map(|f| (f, Confidence::Low)).collect()
}

/// Result of parsing one recognized label text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Final value of every canonical field.
    pub parsed: LabelRecord,
    /// Confidence of every canonical field.
    pub confidence: ConfidenceMap,
    /// One `'<field>' not found` entry per field unresolved after the
    /// structured pass.
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    /// Confidence of a single field.
    pub fn confidence_of(&self, field: LabelField) -> Confidence {
        self.confidence.get(&field).copied().unwrap_or_default()
    }

    /// Fields whose confidence is below `high`, in canonical order.
    pub fn uncertain_fields(&self) -> Vec<(LabelField, Confidence)> {
        self.confidence
            .iter()
            .filter(|(_, c)| **c != Confidence::High)
            .map(|(f, c)| (*f, *c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in LabelField::ALL {
            assert_eq!(LabelField::from_name(field.as_str()), Some(field));
        }
        assert_eq!(LabelField::from_name("SSCC"), Some(LabelField::Sscc));
        assert_eq!(LabelField::from_name("pallet_id"), None);

        assert_eq!("ean_number".parse::<LabelField>().unwrap(), LabelField::EanNumber);
        assert!("pallet_id".parse::<LabelField>().is_err());
    }

    #[test]
    fn test_record_get_set() {
        let mut record = LabelRecord::default();
        assert!(!record.is_set(LabelField::BatchNo));

        record.set(LabelField::BatchNo, "284019");
        assert_eq!(record.batch_no, "284019");
        assert_eq!(record.get(LabelField::BatchNo), "284019");
        assert_eq!(record.filled(), 1);
    }

    #[test]
    fn test_confidence_serializes_lowercase() {
        let json = serde_json::to_string(&Confidence::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        assert!(Confidence::Low < Confidence::Medium);
        assert!(Confidence::Medium < Confidence::High);
    }

    #[test]
    fn test_confidence_map_serializes_in_label_order() {
        let map = all_low();
        let json = serde_json::to_string(&map).unwrap();
        assert!(json.starts_with("{\"item_number\":\"low\",\"item_description\":\"low\""));
        assert!(json.ends_with("\"handwritten_number\":\"low\"}"));
    }
}
