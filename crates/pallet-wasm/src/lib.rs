//! WASM bindings for pallet label field extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js,
//! typically fed by a browser-side recognition step.

use chrono::Local;
use wasm_bindgen::prelude::*;

use pallet_core::label::rules::{
    normalize_text, sscc_digits, valid_date, valid_item_number, valid_time,
};
use pallet_core::{ExtractionResult, LabelParser, LayeredLabelParser, PalletRecord, SsccFallback};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract label fields from recognized text.
///
/// Returns `{ parsed, confidence, warnings }`.
#[wasm_bindgen]
pub fn parse_label(text: &str) -> Result<JsValue, JsValue> {
    to_js(&pallet_core::label::parse_label(text))
}

/// Extract label fields and wrap them in a pending capture record.
#[wasm_bindgen]
pub fn build_record(text: &str, operator: &str) -> Result<JsValue, JsValue> {
    let result = pallet_core::label::parse_label(text);
    to_js(&PalletRecord::from_extraction(&result, text, operator, Local::now()))
}

/// Whether a value is acceptable as an item number.
#[wasm_bindgen]
pub fn validate_item_number(value: &str) -> bool {
    valid_item_number(value)
}

/// Label extractor class for browser use.
#[wasm_bindgen]
pub struct LabelExtractor {
    parser: LayeredLabelParser,
}

#[wasm_bindgen]
impl LabelExtractor {
    /// Create a new label extractor with the built-in vocabulary.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: LayeredLabelParser::new(),
        }
    }

    /// Clear short SSCC candidates instead of keeping the raw text.
    #[wasm_bindgen]
    pub fn set_clear_short_sscc(&mut self, clear: bool) {
        let fallback = if clear {
            SsccFallback::Clear
        } else {
            SsccFallback::KeepRaw
        };
        self.parser = self.parser.clone().with_sscc_fallback(fallback);
    }

    /// Extract label fields from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.run(text))
    }

    /// Extract and build a capture record.
    #[wasm_bindgen]
    pub fn extract_record(&self, text: &str, operator: &str) -> Result<JsValue, JsValue> {
        let result = self.run(text);
        to_js(&PalletRecord::from_extraction(&result, text, operator, Local::now()))
    }
}

impl LabelExtractor {
    fn run(&self, text: &str) -> ExtractionResult {
        self.parser.parse(text)
    }
}

impl Default for LabelExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Text lines collected from browser-side recognition.
#[wasm_bindgen]
pub struct RecognizedText {
    lines: Vec<String>,
}

#[wasm_bindgen]
impl RecognizedText {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one recognized line.
    #[wasm_bindgen]
    pub fn add_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    /// Full text, one recognized line per row.
    #[wasm_bindgen]
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Extract label fields from the collected lines.
    #[wasm_bindgen]
    pub fn extract_label(&self) -> Result<JsValue, JsValue> {
        parse_label(&self.text())
    }
}

impl Default for RecognizedText {
    fn default() -> Self {
        Self::new()
    }
}

/// Helpers for checking single values on a capture form.
#[wasm_bindgen]
pub struct LabelUtils;

#[wasm_bindgen]
impl LabelUtils {
    /// Normalize recognized text the way the structured pass sees it.
    #[wasm_bindgen]
    pub fn normalize(text: &str) -> String {
        normalize_text(text)
    }

    /// Digits of an SSCC candidate.
    #[wasm_bindgen]
    pub fn sscc_digits(value: &str) -> String {
        sscc_digits(value)
    }

    #[wasm_bindgen]
    pub fn is_date(value: &str) -> bool {
        valid_date(value)
    }

    #[wasm_bindgen]
    pub fn is_time(value: &str) -> bool {
        valid_time(value)
    }
}
