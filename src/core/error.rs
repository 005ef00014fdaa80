use std::fmt;

use thiserror::Error;

use super::reference::ReferenceType;

/// Errors that can occur while composing or emitting a QR-bill payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum QrBillError {
    /// The creditor account failed normalization or one of its checks.
    #[error("invalid IBAN '{value}': {check}")]
    InvalidIban {
        /// The IBAN as supplied (normalized where possible).
        value: String,
        /// Which check rejected it.
        check: IbanCheck,
    },

    /// One or more address fields are missing, too long or inconsistent
    /// with the address type. All problems of one address are reported together.
    #[error("invalid {} address: {}", role_label(.role), join(.errors))]
    InvalidAddress {
        /// Which party the address belongs to, if known.
        role: Option<AddressRole>,
        /// Every field problem found in the address.
        errors: Vec<ValidationError>,
    },

    /// Amount is negative, too large or too precise.
    #[error("invalid amount {value}: {reason}")]
    InvalidAmount { value: String, reason: String },

    /// Currency other than CHF or EUR.
    #[error("unsupported currency '{0}' (QR-bill accepts CHF or EUR)")]
    UnsupportedCurrency(String),

    /// Payment reference or remittance text rejected.
    /// `kind` is `None` for the free-text remittance channel.
    #[error("invalid {}: {reason}", reference_label(.kind))]
    InvalidReference {
        kind: Option<ReferenceType>,
        reason: String,
    },

    /// The assembled payload broke a structural invariant. This is a defect in
    /// the engine, not a user input problem.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The payload does not fit into the QR symbol the format allows.
    #[error("payload of {len} bytes exceeds encoding capacity of {capacity} bytes")]
    EncodingCapacityExceeded { len: usize, capacity: usize },

    /// The renderer failed to produce an image.
    #[error("render error: {0}")]
    Render(String),
}

impl QrBillError {
    /// The pipeline stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidIban { .. } => Stage::Iban,
            Self::InvalidAddress { role, .. } => match role {
                Some(AddressRole::Creditor) => Stage::CreditorAddress,
                Some(AddressRole::UltimateCreditor) => Stage::UltimateCreditorAddress,
                Some(AddressRole::Debtor) => Stage::DebtorAddress,
                None => Stage::Address,
            },
            Self::InvalidAmount { .. } | Self::UnsupportedCurrency(_) => Stage::Amount,
            Self::InvalidReference { kind: Some(_), .. } => Stage::Reference,
            Self::InvalidReference { kind: None, .. } => Stage::Remittance,
            Self::MalformedPayload(_) => Stage::Payload,
            Self::EncodingCapacityExceeded { .. } | Self::Render(_) => Stage::Encoding,
        }
    }

    /// True for engine defects, false for rejected user input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::MalformedPayload(_) | Self::EncodingCapacityExceeded { .. } | Self::Render(_)
        )
    }

    pub(crate) fn remittance(reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            kind: None,
            reason: reason.into(),
        }
    }
}

/// Which IBAN check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IbanCheck {
    /// Non-alphanumeric characters, or a malformed country/check-digit prefix.
    Charset,
    /// Country code has no IBAN registration, or QR-bill does not accept it.
    Country,
    /// Length differs from the country's registered IBAN length.
    Length,
    /// ISO 7064 mod 97-10 remainder is not 1.
    Checksum,
}

impl fmt::Display for IbanCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Charset => "invalid characters",
            Self::Country => "country not accepted",
            Self::Length => "wrong length for country",
            Self::Checksum => "checksum mismatch",
        })
    }
}

/// Party an address block belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressRole {
    Creditor,
    UltimateCreditor,
    Debtor,
}

impl fmt::Display for AddressRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Creditor => "creditor",
            Self::UltimateCreditor => "ultimate_creditor",
            Self::Debtor => "debtor",
        })
    }
}

/// Pipeline stage tag attached to every [`QrBillError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Iban,
    Address,
    CreditorAddress,
    UltimateCreditorAddress,
    DebtorAddress,
    Amount,
    Reference,
    Remittance,
    Payload,
    Encoding,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Iban => "iban",
            Self::Address => "address",
            Self::CreditorAddress => "creditor_address",
            Self::UltimateCreditorAddress => "ultimate_creditor_address",
            Self::DebtorAddress => "debtor_address",
            Self::Amount => "amount",
            Self::Reference => "reference",
            Self::Remittance => "remittance",
            Self::Payload => "payload",
            Self::Encoding => "encoding",
        })
    }
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "creditor.postal_code").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// QR-bill element name if applicable (e.g. "PstCd").
    pub element: Option<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(element) = &self.element {
            write!(f, "[{}] {}: {}", element, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without an element name.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            element: None,
        }
    }

    /// Create a validation error tagged with the QR-bill element it concerns.
    pub fn with_element(
        field: impl Into<String>,
        message: impl Into<String>,
        element: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            element: Some(element.into()),
        }
    }
}

pub(crate) fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn role_label(role: &Option<AddressRole>) -> String {
    role.map(|r| r.to_string()).unwrap_or_else(|| "postal".into())
}

fn reference_label(kind: &Option<ReferenceType>) -> String {
    match kind {
        Some(kind) => format!("{} reference", kind.code()),
        None => "remittance information".into(),
    }
}
