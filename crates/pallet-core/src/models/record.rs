//! Capture records handed to the supervisor review queue.

use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};

use crate::models::label::{Confidence, ExtractionResult, LabelField, LabelRecord};

/// Status of a freshly captured record.
pub const PENDING_STATUS: &str = "PENDING";

/// Column order of the review sheet.
pub const RECORD_COLUMNS: [&str; 16] = [
    "timestamp",
    "status",
    "item_number",
    "item_description",
    "batch_no",
    "quantity",
    "date",
    "time",
    "customer_item_number",
    "ean_number",
    "sscc",
    "handwritten_number",
    "operator",
    "notes",
    "image_path",
    "raw_ocr_text",
];

/// One captured pallet label awaiting review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PalletRecord {
    /// When the label was captured.
    pub timestamp: DateTime<Local>,

    /// Review status.
    pub status: String,

    /// Who captured the label.
    pub operator: String,

    /// Where the photograph was stored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    /// Text returned by the recognition service.
    pub raw_ocr_text: String,

    /// Extracted label fields.
    #[serde(flatten)]
    pub fields: LabelRecord,

    /// Confidence notes for fields below `high`.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub notes: String,
}

/// Notes string for the fields below `high`, as returned by
/// [`ExtractionResult::uncertain_fields`], e.g.
/// `" | Confidence: item_description:low, sscc:medium"`.
///
/// Empty when there are none.
pub fn confidence_notes(uncertain: &[(LabelField, Confidence)]) -> String {
    if uncertain.is_empty() {
        return String::new();
    }

    let notes: Vec<String> = uncertain
        .iter()
        .map(|(field, level)| format!("{}:{}", field, level))
        .collect();
    format!(" | Confidence: {}", notes.join(", "))
}

impl PalletRecord {
    /// Build a pending record from a parse result.
    pub fn from_extraction(
        result: &ExtractionResult,
        raw_ocr_text: impl Into<String>,
        operator: impl Into<String>,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            timestamp,
            status: PENDING_STATUS.to_string(),
            operator: operator.into(),
            image_path: None,
            raw_ocr_text: raw_ocr_text.into(),
            fields: result.parsed.clone(),
            notes: confidence_notes(&result.uncertain_fields()),
        }
    }

    /// Attach the stored photograph.
    pub fn with_image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = Some(path.into());
        self
    }

    /// Values in [`RECORD_COLUMNS`] order.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(RECORD_COLUMNS.len());
        row.push(self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, false));
        row.push(self.status.clone());
        row.extend(self.fields.iter().map(|(_, v)| v.to_string()));
        row.push(self.operator.clone());
        row.push(self.notes.clone());
        row.push(self.image_path.clone().unwrap_or_default());
        row.push(self.raw_ocr_text.clone());
        row
    }
}
