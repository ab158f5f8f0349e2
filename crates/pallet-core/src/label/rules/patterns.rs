//! Fixed regex patterns used by the normalizer, validators and the
//! line-oriented passes.
//!
//! Configurable heading patterns live in `ExtractionConfig`; these are the
//! shapes the label layout itself guarantees.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Normalization
    pub static ref HORIZONTAL_SPACE: Regex = Regex::new(r"[ \t]+").unwrap();

    pub static ref DISALLOWED_CHARS: Regex = Regex::new(r"[^\w\s:/\-\.,()]").unwrap();

    pub static ref NON_WORD: Regex = Regex::new(r"[^\w]").unwrap();

    pub static ref NON_WORD_OR_DASH: Regex = Regex::new(r"[^\w\-]").unwrap();

    pub static ref QUOTES: Regex = Regex::new(r#"["']"#).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    // Shape checks
    pub static ref UPPER_LETTER: Regex = Regex::new(r"[A-Z]").unwrap();

    pub static ref ANY_DIGIT: Regex = Regex::new(r"\d").unwrap();

    pub static ref TIME_SHAPE: Regex = Regex::new(r"\d{1,2}:\d{2}").unwrap();

    /// Day/month/year with `/` or `-` separators.
    pub static ref DATE_SHAPE: Regex = Regex::new(r"\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4}").unwrap();

    /// Day/month/year with `/` separators only.
    pub static ref SLASH_DATE_SHAPE: Regex = Regex::new(r"\d{1,2}/\d{1,2}/\d{2,4}").unwrap();

    pub static ref PLAIN_NUMBER: Regex = Regex::new(r"^\d+(\.\d+)?$").unwrap();

    pub static ref DIGITS_ONLY: Regex = Regex::new(r"^\d+$").unwrap();

    // Captures
    pub static ref NUMBER: Regex = Regex::new(r"(\d+(?:\.\d+)?)").unwrap();

    pub static ref DATE: Regex = Regex::new(r"(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})").unwrap();

    pub static ref SLASH_DATE: Regex = Regex::new(r"(\d{1,2}/\d{1,2}/\d{2,4})").unwrap();

    pub static ref TIME: Regex = Regex::new(r"(\d{1,2}:\d{2})").unwrap();

    pub static ref TIME_WITH_SECONDS: Regex = Regex::new(r"(\d{1,2}:\d{2}(?::\d{2})?)").unwrap();

    // SSCC: "(00)" application identifier, or the common "6SCC(00)" misread
    pub static ref SSCC_QUALIFIED: Regex = Regex::new(r"\(00\)\s*([0-9]{16,22})").unwrap();

    pub static ref SSCC_MISREAD: Regex =
        Regex::new(r"6SCC\s*\(?\s*00\s*\)?\s*([0-9]{16,22})").unwrap();

    pub static ref SSCC_MISREAD_ANY_CASE: Regex =
        Regex::new(r"(?i)6SCC\s*\(?\s*00\s*\)?\s*([0-9]{16,22})").unwrap();

    // Unstructured content
    /// Item code such as `BRI023A250SM200BMHP`.
    pub static ref ITEM_CODE: Regex = Regex::new(r"(?i)^[A-Z]{2,3}\d+[A-Z0-9\-]{8,}$").unwrap();

    pub static ref PRODUCT_TERMS: Regex =
        Regex::new(r"(?i)\d+%|\d+\s*ML|RASPBERRY|LAGER|ALE|BEER|JUICE").unwrap();

    pub static ref UPPERCASE_WORDS: Regex = Regex::new(r"[A-Z]+\s+[A-Z]").unwrap();

    pub static ref BATCH_SHAPE: Regex = Regex::new(r"^\d{6}$").unwrap();

    pub static ref QUANTITY_SHAPE: Regex = Regex::new(r"^\d{3,5}$").unwrap();

    pub static ref HANDWRITTEN_SHAPE: Regex = Regex::new(r"^\d{1,2}$").unwrap();
}
