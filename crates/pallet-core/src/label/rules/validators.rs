//! Field-specific validators and value cleanup.
//!
//! A value that fails its validator is cleared, never partially kept.

use super::patterns::{
    ANY_DIGIT, DATE_SHAPE, NON_WORD, PLAIN_NUMBER, SLASH_DATE_SHAPE, TIME_SHAPE, UPPER_LETTER,
};

/// Unit-of-measure abbreviations that OCR often places where an item
/// number or quantity should be.
pub const UNIT_TOKENS: [&str; 9] = ["EA", "ES", "CS", "CT", "PC", "KG", "LB", "BAG", "BOX"];

/// Minimum length of an item number once non-word characters are removed.
pub const MIN_ITEM_NUMBER_LEN: usize = 10;

/// Maximum length of any value captured by a heading pattern.
pub const MAX_VALUE_LEN: usize = 100;

/// Minimum digits for a stripped SSCC to be kept as digits.
pub const MIN_SSCC_DIGITS: usize = 16;

/// Whether a captured value is the `N/A` placeholder printed on empty cells.
pub fn is_not_applicable(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("N/A")
}

fn is_heading_word(value: &str) -> bool {
    value == "DATE" || value == "TIME"
}

/// Item number: at least 10 word characters, with a letter and a digit,
/// and not a unit abbreviation.
pub fn valid_item_number(value: &str) -> bool {
    if value.is_empty() || is_not_applicable(value) {
        return false;
    }

    let code = NON_WORD.replace_all(value, "").trim().to_uppercase();
    if UNIT_TOKENS.contains(&code.as_str()) {
        return false;
    }
    if code.chars().count() < MIN_ITEM_NUMBER_LEN {
        return false;
    }

    UPPER_LETTER.is_match(&code) && ANY_DIGIT.is_match(&code)
}

/// Date: contains a day/month/year shape and no time shape.
pub fn valid_date(value: &str) -> bool {
    let value = value.trim().to_uppercase();
    if is_heading_word(&value) || TIME_SHAPE.is_match(&value) {
        return false;
    }
    DATE_SHAPE.is_match(&value)
}

/// Time: contains an hour:minute shape and no slash date.
pub fn valid_time(value: &str) -> bool {
    let value = value.trim().to_uppercase();
    if is_heading_word(&value) || SLASH_DATE_SHAPE.is_match(&value) {
        return false;
    }
    TIME_SHAPE.is_match(&value)
}

/// Quantity: an integer or decimal number, nothing else.
pub fn valid_quantity(value: &str) -> bool {
    let value = value.trim().to_uppercase();
    if value.is_empty() || is_heading_word(&value) || is_not_applicable(&value) {
        return false;
    }
    if UNIT_TOKENS.contains(&value.as_str()) {
        return false;
    }
    PLAIN_NUMBER.is_match(&value)
}

/// Collapse internal whitespace, trim ` -:;,.` from both ends and cap the
/// length at [`MAX_VALUE_LEN`] characters.
pub fn clean_value(value: &str) -> String {
    let joined = value.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = joined.trim_matches(|c| matches!(c, ' ' | '-' | ':' | ';' | ',' | '.'));
    truncate(trimmed, MAX_VALUE_LEN)
}

/// Keep at most `max` characters.
pub fn truncate(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

/// ASCII digits of a captured SSCC value.
pub fn sscc_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_number_accepts_codes() {
        assert!(valid_item_number("BRI023A250SM200BMHP"));
        assert!(valid_item_number("ab-12345678"));
    }

    #[test]
    fn test_item_number_rejects_units_and_short_values() {
        for unit in UNIT_TOKENS {
            assert!(!valid_item_number(unit));
            assert!(!valid_item_number(&unit.to_lowercase()));
        }
        assert!(!valid_item_number("N/A"));
        assert!(!valid_item_number("ABC123"));
        assert!(!valid_item_number("ABCDEFGHIJKL"));
        assert!(!valid_item_number("123456789012"));
        assert!(!valid_item_number(""));
    }

    #[test]
    fn test_date_excludes_time() {
        assert!(valid_date("14/03/2025"));
        assert!(valid_date("1-3-25"));
        assert!(!valid_date("14:30"));
        assert!(!valid_date("14/03/2025 14:30"));
        assert!(!valid_date("date"));
        assert!(!valid_date("2025"));
    }

    #[test]
    fn test_time_excludes_date() {
        assert!(valid_time("14:30"));
        assert!(valid_time("7:05:59"));
        assert!(!valid_time("14/03/2025 14:30"));
        assert!(!valid_time("TIME"));
        assert!(!valid_time("1430"));
    }

    #[test]
    fn test_quantity_is_numeric() {
        assert!(valid_quantity("1200"));
        assert!(valid_quantity("12.5"));
        assert!(!valid_quantity("EA"));
        assert!(!valid_quantity("es"));
        assert!(!valid_quantity("N/A"));
        assert!(!valid_quantity("DATE"));
        assert!(!valid_quantity("12 EA"));
        assert!(!valid_quantity("1."));
        assert!(!valid_quantity(""));
    }

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value("  - ALBA   RASPBERRY ;. "), "ALBA RASPBERRY");
        assert_eq!(clean_value(&"X".repeat(150)).len(), MAX_VALUE_LEN);
        assert_eq!(clean_value(" :- "), "");
    }

    #[test]
    fn test_sscc_digits() {
        assert_eq!(sscc_digits("0000 0000 0000 2220 51"), "000000000000222051");
        assert_eq!(sscc_digits("SSCC: 1234"), "1234");
        assert_eq!(sscc_digits("ABC"), "");
    }
}
