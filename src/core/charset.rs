//! Character set accepted inside a QR-bill payload.
//!
//! Basic Latin (printable), Latin-1 Supplement, Latin Extended-A, the four
//! Romanian comma-below letters and the euro sign. Control characters are
//! never allowed, which also keeps the line separator out of field values.

/// Whether `c` may appear in any payload element.
pub fn is_permitted_char(c: char) -> bool {
    matches!(c,
        '\u{0020}'..='\u{007E}'
        | '\u{00A0}'..='\u{00FF}'
        | '\u{0100}'..='\u{017F}'
        | '\u{0218}'..='\u{021B}'
        | '\u{20AC}')
}

/// Character position and value of the first character outside the permitted set.
pub fn first_forbidden_char(value: &str) -> Option<(usize, char)> {
    value.chars().enumerate().find(|(_, c)| !is_permitted_char(*c))
}

/// Describe a forbidden character for error messages without echoing it raw.
pub(crate) fn describe_forbidden(position: usize, c: char) -> String {
    format!(
        "character U+{:04X} at position {} is not permitted",
        c as u32,
        position + 1
    )
}
