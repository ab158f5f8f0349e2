//! Error types for the pallet-core library.
//!
//! Parsing label text never fails; these errors cover configuration
//! loading and strict pattern compilation.

use thiserror::Error;

use crate::models::label::LabelField;

/// Main error type for the pallet library.
#[derive(Error, Debug)]
pub enum LabelError {
    /// A configured field pattern is not a valid regular expression.
    #[error("invalid pattern for {field}: {pattern:?}: {source}")]
    Pattern {
        field: LabelField,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the pallet library.
pub type Result<T> = std::result::Result<T, LabelError>;
