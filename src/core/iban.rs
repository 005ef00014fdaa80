use std::fmt;

use serde::{Deserialize, Serialize};

use super::checksum::{mod97, rearrange};
use super::countries::{QR_BILL_COUNTRIES, iban_length};
use super::error::{IbanCheck, QrBillError};

/// Institution ids reserved for QR-IBANs (positions 5-9 of a Swiss/Liechtenstein IBAN).
const QR_IID_RANGE: std::ops::RangeInclusive<u32> = 30000..=31999;

/// A checksum-valid IBAN in compact electronic form (no spaces, upper case).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Iban(String);

impl Iban {
    /// Normalize and validate any registered IBAN.
    ///
    /// Whitespace is removed and letters are upper-cased before the checks run:
    /// charset, country registration, country length, then mod 97-10.
    pub fn parse(raw: &str) -> Result<Self, QrBillError> {
        let compact: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        let fail = |check| QrBillError::InvalidIban {
            value: compact.clone(),
            check,
        };

        let bytes = compact.as_bytes();
        if bytes.len() < 5
            || !bytes.iter().all(u8::is_ascii_alphanumeric)
            || !bytes[..2].iter().all(u8::is_ascii_alphabetic)
            || !bytes[2..4].iter().all(u8::is_ascii_digit)
        {
            return Err(fail(IbanCheck::Charset));
        }

        let Some(expected) = iban_length(&compact[..2]) else {
            return Err(fail(IbanCheck::Country));
        };
        if compact.len() != expected {
            return Err(fail(IbanCheck::Length));
        }

        if mod97(&rearrange(&compact)) != Some(1) {
            return Err(fail(IbanCheck::Checksum));
        }

        Ok(Self(compact))
    }

    /// Validate an IBAN that is to receive a QR-bill payment (CH or LI only).
    pub fn parse_for_qr_bill(raw: &str) -> Result<Self, QrBillError> {
        let iban = Self::parse(raw)?;
        if !QR_BILL_COUNTRIES.contains(&iban.country_code()) {
            return Err(QrBillError::InvalidIban {
                value: iban.0,
                check: IbanCheck::Country,
            });
        }
        Ok(iban)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn country_code(&self) -> &str {
        &self.0[..2]
    }

    /// Whether this is a QR-IBAN, which only accepts QRR references.
    pub fn is_qr_iban(&self) -> bool {
        if !QR_BILL_COUNTRIES.contains(&self.country_code()) {
            return false;
        }
        self.0
            .get(4..9)
            .and_then(|iid| iid.parse::<u32>().ok())
            .is_some_and(|iid| QR_IID_RANGE.contains(&iid))
    }

    /// Print form in blocks of four, e.g. `CH47 0900 0000 1604 1402 0`.
    pub fn formatted(&self) -> String {
        group(&self.0, 4)
    }
}

impl fmt::Display for Iban {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Iban {
    type Error = QrBillError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Iban> for String {
    fn from(iban: Iban) -> Self {
        iban.0
    }
}

pub(crate) fn group(value: &str, size: usize) -> String {
    value
        .as_bytes()
        .chunks(size)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
