//! Text normalization for the structured pass.

use super::patterns::{DISALLOWED_CHARS, HORIZONTAL_SPACE};

/// Normalize recognized label text for heading pattern matching.
///
/// Uppercases, collapses runs of spaces/tabs, replaces characters outside
/// `\w`, whitespace and `: / - . , ( )` with a space, and trims. Line breaks
/// survive so line-anchored patterns still work.
pub fn normalize_text(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let upper = text.to_uppercase();
    let collapsed = HORIZONTAL_SPACE.replace_all(&upper, " ");
    let cleaned = DISALLOWED_CHARS.replace_all(&collapsed, " ");
    cleaned.trim().to_string()
}

/// Split raw text into trimmed, non-empty lines.
pub fn text_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(str::trim).filter(|l| !l.is_empty())
}
