//! Unstructured pass: content heuristics for labels whose headings were
//! lost by OCR.
//!
//! Rules are tried in order for every line. A rule *claims* a line when its
//! field is still empty and its gate accepts the line; the claiming rule
//! then gets the only chance to extract from that line, successful or not.

use tracing::trace;

use crate::models::label::{Confidence, ConfidenceMap, LabelField, LabelRecord};

use super::normalize::text_lines;
use super::patterns::{
    BATCH_SHAPE, DIGITS_ONLY, HANDWRITTEN_SHAPE, ITEM_CODE, PRODUCT_TERMS, QUANTITY_SHAPE, QUOTES,
    SLASH_DATE, SLASH_DATE_SHAPE, SSCC_MISREAD_ANY_CASE, SSCC_QUALIFIED, TIME, TIME_SHAPE,
    UPPERCASE_WORDS, WHITESPACE,
};
use super::validators::truncate;

/// Brand line that is never a product description.
const IGNORED_BRAND: &str = "RECORP";

/// One content heuristic.
pub struct LineRule {
    /// Short name for logs and tests.
    pub name: &'static str,
    pub field: LabelField,
    /// Gate applied once the field is known to be empty.
    pub claims: fn(&str) -> bool,
    pub extract: fn(&str) -> Option<(String, Confidence)>,
}

fn item_code(line: &str) -> String {
    WHITESPACE.replace_all(line, "").into_owned()
}

fn is_item_code(line: &str) -> bool {
    let code = item_code(line);
    ITEM_CODE.is_match(&code) && code.chars().count() >= 15
}

fn is_brand_line(line: &str) -> bool {
    let upper = line.to_uppercase();
    upper.contains("BRIX") || (upper.contains("RIX") && upper.contains("CO"))
}

fn generic_description(line: &str) -> Option<(String, Confidence)> {
    if PRODUCT_TERMS.is_match(line) {
        return Some((truncate(line, 100), Confidence::Medium));
    }

    let looks_descriptive = UPPERCASE_WORDS.is_match(line)
        && !DIGITS_ONLY.is_match(line)
        && !line.to_uppercase().contains(IGNORED_BRAND);
    looks_descriptive.then(|| (truncate(line, 100), Confidence::Low))
}

fn date(line: &str) -> Option<(String, Confidence)> {
    if TIME_SHAPE.is_match(line) {
        return None;
    }
    SLASH_DATE
        .captures(line)
        .map(|caps| (caps[1].to_string(), Confidence::Medium))
}

fn time(line: &str) -> Option<(String, Confidence)> {
    if SLASH_DATE_SHAPE.is_match(line) {
        return None;
    }
    TIME.captures(line)
        .map(|caps| (caps[1].to_string(), Confidence::Medium))
}

fn sscc(line: &str) -> Option<(String, Confidence)> {
    SSCC_MISREAD_ANY_CASE
        .captures(line)
        .or_else(|| SSCC_QUALIFIED.captures(line))
        .map(|caps| (caps[1].to_string(), Confidence::Medium))
}

fn whole_line(line: &str) -> Option<(String, Confidence)> {
    Some((line.to_string(), Confidence::Medium))
}

/// Content rules in precedence order.
pub static LINE_RULES: [LineRule; 9] = [
    LineRule {
        name: "item_code",
        field: LabelField::ItemNumber,
        claims: is_item_code,
        extract: |l| Some((truncate(&item_code(l), 40), Confidence::Medium)),
    },
    LineRule {
        name: "brand_description",
        field: LabelField::ItemDescription,
        claims: is_brand_line,
        extract: |l| Some((truncate(l, 100), Confidence::Medium)),
    },
    LineRule {
        name: "generic_description",
        field: LabelField::ItemDescription,
        claims: |l| l.chars().count() > 10,
        extract: generic_description,
    },
    LineRule {
        name: "batch",
        field: LabelField::BatchNo,
        claims: |l| BATCH_SHAPE.is_match(l),
        extract: whole_line,
    },
    LineRule {
        name: "quantity",
        field: LabelField::Quantity,
        claims: |l| QUANTITY_SHAPE.is_match(l),
        extract: whole_line,
    },
    LineRule {
        name: "date",
        field: LabelField::Date,
        claims: |_| true,
        extract: date,
    },
    LineRule {
        name: "time",
        field: LabelField::Time,
        claims: |_| true,
        extract: time,
    },
    LineRule {
        name: "sscc",
        field: LabelField::Sscc,
        claims: |_| true,
        extract: sscc,
    },
    LineRule {
        name: "handwritten",
        field: LabelField::HandwrittenNumber,
        claims: |l| HANDWRITTEN_SHAPE.is_match(l),
        extract: whole_line,
    },
];

/// Strip quote marks OCR tends to pick up from label borders.
pub fn clean_line(line: &str) -> String {
    QUOTES.replace_all(line, "").trim().to_string()
}

/// The rule that claims `line` given the fields already filled.
pub fn claiming_rule(line: &str, parsed: &LabelRecord) -> Option<&'static LineRule> {
    LINE_RULES
        .iter()
        .find(|r| !parsed.is_set(r.field) && (r.claims)(line))
}

/// Run the unstructured pass. Returns the number of fields filled.
pub fn extract_unstructured(
    text: &str,
    parsed: &mut LabelRecord,
    confidence: &mut ConfidenceMap,
) -> usize {
    let mut filled = 0;

    for line in text_lines(text) {
        let line = clean_line(line);
        if line.is_empty() {
            continue;
        }

        let Some(rule) = claiming_rule(&line, parsed) else {
            continue;
        };

        if let Some((value, level)) = (rule.extract)(&line) {
            trace!("Rule {} filled {} = {:?}", rule.name, rule.field, value);
            parsed.set(rule.field, value);
            confidence.insert(rule.field, level);
            filled += 1;
        }
    }

    filled
}
