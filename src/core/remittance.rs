use serde::Serialize;

use super::charset::{describe_forbidden, first_forbidden_char};
use super::error::QrBillError;

/// Maximum length of the unstructured message (Ustrd).
pub const MAX_UNSTRUCTURED: usize = 140;

/// Free-text payment purpose shown to the payer and passed to the creditor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Remittance(String);

impl Remittance {
    /// Validate an unstructured message. Disallowed characters reject the
    /// message; nothing is stripped or replaced.
    pub fn new(text: impl Into<String>) -> Result<Self, QrBillError> {
        let text = text.into();
        let len = text.chars().count();
        if len > MAX_UNSTRUCTURED {
            return Err(QrBillError::remittance(format!(
                "message is {len} characters, at most {MAX_UNSTRUCTURED} allowed"
            )));
        }
        if let Some((pos, c)) = first_forbidden_char(&text) {
            return Err(QrBillError::remittance(describe_forbidden(pos, c)));
        }
        Ok(Self(text))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
