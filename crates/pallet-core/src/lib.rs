//! Core library for pallet label capture.
//!
//! This crate provides:
//! - Normalization of noisy recognized label text
//! - Layered field extraction (structured patterns, `Heading: Value` lines,
//!   unstructured content heuristics) with per-field confidence
//! - Field validators for item numbers, dates, times, quantities and SSCCs
//! - Capture records with confidence notes for supervisor review

pub mod error;
pub mod models;
pub mod label;

pub use error::{LabelError, Result};
pub use models::config::{ExtractionConfig, FieldSpec, PalletConfig, RecordConfig, SsccFallback};
pub use models::label::{Confidence, ExtractionResult, LabelField, LabelRecord};
pub use models::record::{confidence_notes, PalletRecord, RECORD_COLUMNS};
pub use label::{FieldRules, LabelParser, LayeredLabelParser};
