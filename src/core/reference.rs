//! Payment references: QRR (structured numeric), SCOR (ISO 11649) and NON.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::checksum::{mod10_recursive, mod97, rearrange};
use super::error::QrBillError;
use super::iban::{Iban, group};

/// Total digits of a QRR reference, check digit included.
pub const QRR_LENGTH: usize = 27;
pub const SCOR_MIN_LENGTH: usize = 5;
pub const SCOR_MAX_LENGTH: usize = 25;

/// Tp: reference type element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceType {
    /// QRR: 27-digit reference with recursive mod-10 check digit.
    Qrr,
    /// SCOR: ISO 11649 creditor reference.
    Scor,
    /// NON: no reference; tracking goes into the unstructured message.
    Non,
}

impl ReferenceType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Qrr => "QRR",
            Self::Scor => "SCOR",
            Self::Non => "NON",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "QRR" => Some(Self::Qrr),
            "SCOR" => Some(Self::Scor),
            "NON" => Some(Self::Non),
            _ => None,
        }
    }
}

impl fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A validated payment reference in compact form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Reference {
    kind: ReferenceType,
    value: String,
}

impl Reference {
    /// No reference.
    pub fn none() -> Self {
        Self {
            kind: ReferenceType::Non,
            value: String::new(),
        }
    }

    /// Validate a complete 27-digit QRR reference. Spaces are ignored.
    pub fn qr(raw: &str) -> Result<Self, QrBillError> {
        let value = compact(raw);
        if value.len() != QRR_LENGTH || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(qrr_error(format!("must be exactly {QRR_LENGTH} digits")));
        }
        let (body, check) = value.split_at(QRR_LENGTH - 1);
        let expected = mod10_recursive(body).unwrap_or_default();
        if check.as_bytes()[0] - b'0' != expected {
            return Err(qrr_error(format!("check digit {check} does not match {expected}")));
        }
        if value.bytes().all(|b| b == b'0') {
            return Err(qrr_error("must not be all zeros"));
        }
        Ok(Self {
            kind: ReferenceType::Qrr,
            value,
        })
    }

    /// Turn up to 26 digits into a QRR reference: left-pad with zeros and
    /// append the check digit.
    pub fn qr_from_digits(raw: &str) -> Result<Self, QrBillError> {
        let digits = compact(raw);
        if digits.is_empty()
            || digits.len() > QRR_LENGTH - 1
            || !digits.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(qrr_error(format!("body must be 1 to {} digits", QRR_LENGTH - 1)));
        }
        let body = format!("{digits:0>width$}", width = QRR_LENGTH - 1);
        let check = mod10_recursive(&body).unwrap_or_default();
        Self::qr(&format!("{body}{check}"))
    }

    /// Validate an ISO 11649 creditor reference (`RF` + 2 check digits + body).
    /// Spaces are ignored and letters are upper-cased.
    pub fn creditor(raw: &str) -> Result<Self, QrBillError> {
        let value = compact(raw).to_ascii_uppercase();
        if !(SCOR_MIN_LENGTH..=SCOR_MAX_LENGTH).contains(&value.len()) {
            return Err(scor_error(format!(
                "must be {SCOR_MIN_LENGTH} to {SCOR_MAX_LENGTH} characters"
            )));
        }
        if !value.starts_with("RF") || !value.as_bytes()[2..4].iter().all(u8::is_ascii_digit) {
            return Err(scor_error("must start with RF and two check digits"));
        }
        if !value.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(scor_error("body must be alphanumeric"));
        }
        if mod97(&rearrange(&value)) != Some(1) {
            return Err(scor_error("check digits do not match"));
        }
        Ok(Self {
            kind: ReferenceType::Scor,
            value,
        })
    }

    /// Compute the check digits for a creditor reference body (1-21 alphanumerics).
    pub fn creditor_from_body(raw: &str) -> Result<Self, QrBillError> {
        let body = compact(raw).to_ascii_uppercase();
        if body.is_empty()
            || body.len() > SCOR_MAX_LENGTH - 4
            || !body.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return Err(scor_error(format!(
                "body must be 1 to {} alphanumeric characters",
                SCOR_MAX_LENGTH - 4
            )));
        }
        let remainder = mod97(&format!("{body}RF00")).unwrap_or_default();
        Self::creditor(&format!("RF{:02}{body}", 98 - remainder))
    }

    /// Decode the Tp and Ref payload elements.
    pub fn from_lines(kind: &str, value: &str) -> Result<Self, QrBillError> {
        let Some(kind) = ReferenceType::from_code(kind) else {
            return Err(QrBillError::MalformedPayload(format!(
                "unknown reference type '{kind}'"
            )));
        };
        match kind {
            ReferenceType::Qrr => Self::qr(value),
            ReferenceType::Scor => Self::creditor(value),
            ReferenceType::Non if value.is_empty() => Ok(Self::none()),
            ReferenceType::Non => Err(QrBillError::InvalidReference {
                kind: Some(ReferenceType::Non),
                reason: "reference must be empty for type NON".into(),
            }),
        }
    }

    /// Enforce the account/reference pairing: QR-IBANs take QRR references
    /// only, regular IBANs never do.
    pub fn check_account(&self, iban: &Iban) -> Result<(), QrBillError> {
        match (self.kind, iban.is_qr_iban()) {
            (ReferenceType::Qrr, false) => Err(qrr_error(format!(
                "QRR reference requires a QR-IBAN, {} is a regular IBAN",
                iban.formatted()
            ))),
            (ReferenceType::Scor | ReferenceType::Non, true) => Err(QrBillError::InvalidReference {
                kind: Some(self.kind),
                reason: format!(
                    "QR-IBAN {} only accepts QRR references",
                    iban.formatted()
                ),
            }),
            _ => Ok(()),
        }
    }

    pub fn kind(&self) -> ReferenceType {
        self.kind
    }

    /// Compact electronic form as emitted in the payload.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Print form: QRR as 2 + 5×5 digits, SCOR in blocks of four.
    pub fn formatted(&self) -> String {
        match self.kind {
            ReferenceType::Qrr => {
                let (head, tail) = self.value.split_at(2);
                format!("{head} {}", group(tail, 5))
            }
            ReferenceType::Scor => group(&self.value, 4),
            ReferenceType::Non => String::new(),
        }
    }
}

fn compact(raw: &str) -> String {
    raw.chars().filter(|c| *c != ' ').collect()
}

fn qrr_error(reason: impl Into<String>) -> QrBillError {
    QrBillError::InvalidReference {
        kind: Some(ReferenceType::Qrr),
        reason: reason.into(),
    }
}

fn scor_error(reason: impl Into<String>) -> QrBillError {
    QrBillError::InvalidReference {
        kind: Some(ReferenceType::Scor),
        reason: reason.into(),
    }
}
