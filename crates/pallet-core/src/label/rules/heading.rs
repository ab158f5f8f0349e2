//! `Heading: Value` line pass over raw text.
//!
//! Each line is split at its first colon. The upper-cased heading is matched
//! against an ordered rule list; the first rule whose heading matches and
//! whose field is still empty decides the line, even if its value is then
//! rejected. Accepted values are `high` because the heading is literally
//! present.

use tracing::trace;

use crate::models::label::{Confidence, ConfidenceMap, LabelField, LabelRecord};

use super::normalize::text_lines;
use super::patterns::{
    DATE, NON_WORD, NON_WORD_OR_DASH, NUMBER, SLASH_DATE_SHAPE, SSCC_MISREAD, SSCC_QUALIFIED,
    TIME_SHAPE, TIME_WITH_SECONDS,
};
use super::validators::{
    is_not_applicable, truncate, valid_date, valid_item_number, valid_quantity, valid_time,
};

/// One heading rule.
pub struct HeadingRule {
    pub field: LabelField,
    /// Whether an upper-cased heading names this field.
    pub matches_heading: fn(&str) -> bool,
    /// Turn the trimmed value into the stored value, or reject it.
    pub extract: fn(&str) -> Option<String>,
}

fn item_number(value: &str) -> Option<String> {
    let code = NON_WORD_OR_DASH.replace_all(value, "");
    let code = code.trim();
    (!code.is_empty() && valid_item_number(code)).then(|| truncate(code, 40))
}

fn batch_no(value: &str) -> Option<String> {
    let batch = truncate(&NON_WORD.replace_all(value, ""), 20);
    (!batch.is_empty()).then_some(batch)
}

fn quantity(value: &str) -> Option<String> {
    let caps = NUMBER.captures(value)?;
    let number = &caps[1];
    valid_quantity(number).then(|| number.to_string())
}

fn date(value: &str) -> Option<String> {
    if TIME_SHAPE.is_match(value) {
        return None;
    }
    let caps = DATE.captures(value)?;
    let date = &caps[1];
    valid_date(date).then(|| date.to_string())
}

fn time(value: &str) -> Option<String> {
    if SLASH_DATE_SHAPE.is_match(value) {
        return None;
    }
    let caps = TIME_WITH_SECONDS.captures(value)?;
    let time = &caps[1];
    valid_time(time).then(|| time.to_string())
}

/// Heading rules in precedence order.
pub static HEADING_RULES: [HeadingRule; 8] = [
    HeadingRule {
        field: LabelField::ItemNumber,
        matches_heading: |h| h.contains("ITEM NUMBER") && !h.contains("CUSTOMER"),
        extract: item_number,
    },
    HeadingRule {
        field: LabelField::ItemDescription,
        matches_heading: |h| h.contains("ITEM DESCRIPTION"),
        extract: |v| Some(truncate(v, 100)),
    },
    HeadingRule {
        field: LabelField::BatchNo,
        matches_heading: |h| h.contains("BATCH NO"),
        extract: batch_no,
    },
    HeadingRule {
        field: LabelField::Quantity,
        matches_heading: |h| h.contains("QUANTITY"),
        extract: quantity,
    },
    HeadingRule {
        field: LabelField::Date,
        matches_heading: |h| h == "DATE",
        extract: date,
    },
    HeadingRule {
        field: LabelField::Time,
        matches_heading: |h| h == "TIME",
        extract: time,
    },
    HeadingRule {
        field: LabelField::CustomerItemNumber,
        matches_heading: |h| h.contains("CUSTOMER ITEM NUMBER"),
        extract: |v| Some(truncate(v, 40)),
    },
    HeadingRule {
        field: LabelField::EanNumber,
        matches_heading: |h| h.contains("EAN NUMBER"),
        extract: |v| Some(truncate(v, 30)),
    },
];

/// Decide one line. Returns the field and value assigned, if any.
pub fn apply_line(line: &str, parsed: &LabelRecord) -> Option<(LabelField, String)> {
    let (heading, value) = line.split_once(':')?;
    let heading = heading.trim().to_uppercase();
    let value = value.trim();
    if value.is_empty() || is_not_applicable(value) {
        return None;
    }

    let rule = HEADING_RULES
        .iter()
        .find(|r| !parsed.is_set(r.field) && (r.matches_heading)(&heading))?;

    (rule.extract)(value).map(|v| (rule.field, v))
}

/// Search the whole raw text for a qualified or misread SSCC.
pub fn find_sscc(text: &str) -> Option<String> {
    SSCC_QUALIFIED
        .captures(text)
        .or_else(|| SSCC_MISREAD.captures(text))
        .map(|caps| caps[1].to_string())
}

/// Run the heading-line pass. Returns the number of fields filled.
pub fn extract_heading_lines(
    text: &str,
    parsed: &mut LabelRecord,
    confidence: &mut ConfidenceMap,
) -> usize {
    let mut filled = 0;

    for line in text_lines(text) {
        if let Some((field, value)) = apply_line(line, parsed) {
            trace!("Heading line filled {} = {:?}", field, value);
            parsed.set(field, value);
            confidence.insert(field, Confidence::High);
            filled += 1;
        }
    }

    if !parsed.is_set(LabelField::Sscc) {
        if let Some(sscc) = find_sscc(text) {
            parsed.set(LabelField::Sscc, sscc);
            confidence.insert(LabelField::Sscc, Confidence::High);
            filled += 1;
        }
    }

    filled
}
