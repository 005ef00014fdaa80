//! The positional text payload encoded into the QR symbol.
//!
//! Layout (Swiss Payment Standards, version 0200, 31 elements separated by LF):
//!
//! | index | element |
//! |-------|---------|
//! | 0-2   | `SPC`, `0200`, `1` |
//! | 3     | IBAN |
//! | 4-10  | creditor address (AdrTp, Name, line 1, line 2, PstCd, TwnNm, Ctry) |
//! | 11-17 | ultimate creditor address, blank when absent |
//! | 18-19 | amount, currency |
//! | 20-26 | ultimate debtor address, blank when absent |
//! | 27-29 | reference type, reference, unstructured message |
//! | 30    | `EPD` |

use std::fmt;

use super::error::{QrBillError, join};
use super::validation::validate_payload;

pub const QR_TYPE: &str = "SPC";
pub const VERSION: &str = "0200";
pub const CODING_TYPE: &str = "1";
pub const TRAILER: &str = "EPD";
pub const SEPARATOR: char = '\n';

/// Number of elements in every payload, whatever is populated.
pub const PAYLOAD_LINES: usize = 31;

/// Byte capacity of a version 25 QR symbol at error correction level M.
pub const MAX_PAYLOAD_BYTES: usize = 997;

/// Element positions.
pub mod line {
    pub const QR_TYPE: usize = 0;
    pub const VERSION: usize = 1;
    pub const CODING_TYPE: usize = 2;
    pub const IBAN: usize = 3;
    pub const CREDITOR: usize = 4;
    pub const ULTIMATE_CREDITOR: usize = 11;
    pub const AMOUNT: usize = 18;
    pub const CURRENCY: usize = 19;
    pub const DEBTOR: usize = 20;
    pub const REFERENCE_TYPE: usize = 27;
    pub const REFERENCE: usize = 28;
    pub const UNSTRUCTURED_MESSAGE: usize = 29;
    pub const TRAILER: usize = 30;
}

/// An assembled payload. Instances built by this crate have passed
/// [`validate_payload`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Payload {
    lines: Vec<String>,
}

impl Payload {
    /// Wrap lines without validation; callers run [`validate_payload`].
    pub(crate) fn from_lines_unchecked(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Split payload text into elements and run the structural checks.
    /// Accepts LF or CRLF separators.
    pub fn parse(text: &str) -> Result<Self, QrBillError> {
        let lines = text
            .split(SEPARATOR)
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        let payload = Self { lines };
        let errors = validate_payload(&payload);
        if !errors.is_empty() {
            return Err(QrBillError::MalformedPayload(join(&errors)));
        }
        Ok(payload)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Element at `index`, empty if out of range.
    pub fn line(&self, index: usize) -> &str {
        self.lines.get(index).map(String::as_str).unwrap_or("")
    }

    /// The seven elements of the address block starting at `start`.
    pub(crate) fn address_block(&self, start: usize) -> Vec<&str> {
        (start..start + super::address::ADDRESS_LINES)
            .map(|i| self.line(i))
            .collect()
    }

    /// Text handed to the QR encoder.
    pub fn as_text(&self) -> String {
        self.lines.join("\n")
    }

    /// UTF-8 size of [`Payload::as_text`].
    pub fn byte_len(&self) -> usize {
        self.lines.iter().map(String::len).sum::<usize>() + self.lines.len().saturating_sub(1)
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_lines() -> Vec<String> {
        let mut lines = vec![String::new(); PAYLOAD_LINES];
        lines[line::QR_TYPE] = QR_TYPE.into();
        lines[line::VERSION] = VERSION.into();
        lines[line::CODING_TYPE] = CODING_TYPE.into();
        lines[line::IBAN] = "CH4709000000160414020".into();
        lines[line::CREDITOR] = "S".into();
        lines[line::CREDITOR + 1] = "Velokurier Bern".into();
        lines[line::CREDITOR + 4] = "3013".into();
        lines[line::CREDITOR + 5] = "Bern".into();
        lines[line::CREDITOR + 6] = "CH".into();
        lines[line::CURRENCY] = "CHF".into();
        lines[line::REFERENCE_TYPE] = "NON".into();
        lines[line::TRAILER] = TRAILER.into();
        lines
    }

    #[test]
    fn layout_positions_are_consistent() {
        assert_eq!(line::ULTIMATE_CREDITOR, line::CREDITOR + 7);
        assert_eq!(line::AMOUNT, line::ULTIMATE_CREDITOR + 7);
        assert_eq!(line::REFERENCE_TYPE, line::DEBTOR + 7);
        assert_eq!(line::TRAILER + 1, PAYLOAD_LINES);
    }

    #[test]
    fn text_and_byte_len_agree() {
        let payload = Payload::from_lines_unchecked(minimal_lines());
        let text = payload.as_text();
        assert_eq!(text.len(), payload.byte_len());
        assert_eq!(text.lines().count(), PAYLOAD_LINES);
        assert!(text.starts_with("SPC\n0200\n1\nCH4709000000160414020\nS\n"));
        assert!(text.ends_with("\nNON\n\n\nEPD"));
    }

    #[test]
    fn parse_accepts_crlf() {
        let text = minimal_lines().join("\r\n");
        let payload = Payload::parse(&text).unwrap();
        assert_eq!(payload.line(line::TRAILER), "EPD");
        assert_eq!(payload.lines(), minimal_lines().as_slice());
    }

    #[test]
    fn parse_rejects_wrong_line_count() {
        let mut lines = minimal_lines();
        lines.pop();
        let err = Payload::parse(&lines.join("\n")).unwrap_err();
        assert!(matches!(err, QrBillError::MalformedPayload(_)));
    }

    #[test]
    fn address_block_slices_seven_lines() {
        let payload = Payload::from_lines_unchecked(minimal_lines());
        assert_eq!(
            payload.address_block(line::CREDITOR),
            ["S", "Velokurier Bern", "", "", "3013", "Bern", "CH"]
        );
        assert_eq!(payload.address_block(line::DEBTOR), [""; 7]);
    }
}
