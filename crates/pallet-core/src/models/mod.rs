//! Data models for label extraction.

pub mod config;
pub mod label;
pub mod record;
