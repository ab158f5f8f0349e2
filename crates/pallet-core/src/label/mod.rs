//! Label field extraction module.

mod parser;
pub mod rules;

pub use parser::{parse_label, LabelParser, LayeredLabelParser};
pub use rules::FieldRules;
