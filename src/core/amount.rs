use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::error::QrBillError;

/// Largest payable amount a QR-bill can carry.
pub const MAX_AMOUNT: Decimal = dec!(999999999.99);

/// Ccy: the two currencies a QR-bill may be denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    Chf,
    Eur,
}

impl Currency {
    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Chf => "CHF",
            Self::Eur => "EUR",
        }
    }
}

impl FromStr for Currency {
    type Err = QrBillError;

    /// Parse an ISO 4217 code. Matching is exact: `chf` is rejected.
    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "CHF" => Ok(Self::Chf),
            "EUR" => Ok(Self::Eur),
            other => Err(QrBillError::UnsupportedCurrency(other.to_string())),
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = QrBillError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.code().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Payable amount and currency.
///
/// `value` is `None` when the payer decides the amount; a zero input is
/// normalized to that state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Amount {
    value: Option<Decimal>,
    currency: Currency,
}

impl Amount {
    /// Validate an amount. At most two fraction digits are accepted; the value
    /// is never rounded.
    pub fn new(value: Option<Decimal>, currency: Currency) -> Result<Self, QrBillError> {
        let Some(value) = value else {
            return Ok(Self::open(currency));
        };

        if value.is_sign_negative() && !value.is_zero() {
            return Err(QrBillError::InvalidAmount {
                value: value.to_string(),
                reason: "must not be negative".into(),
            });
        }
        if value > MAX_AMOUNT {
            return Err(QrBillError::InvalidAmount {
                value: value.to_string(),
                reason: format!("exceeds maximum of {MAX_AMOUNT}"),
            });
        }
        if value.normalize().scale() > 2 {
            return Err(QrBillError::InvalidAmount {
                value: value.to_string(),
                reason: "more than two decimal places".into(),
            });
        }

        if value.is_zero() {
            Ok(Self::open(currency))
        } else {
            Ok(Self {
                value: Some(value),
                currency,
            })
        }
    }

    /// Amount given as whole currency units, as registration forms collect it.
    pub fn from_whole_units(units: u64, currency: Currency) -> Result<Self, QrBillError> {
        Self::new(Some(Decimal::from(units)), currency)
    }

    /// Amount left to the payer.
    pub fn open(currency: Currency) -> Self {
        Self {
            value: None,
            currency,
        }
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Amt element: two fraction digits with `.` separator, or empty for an open amount.
    pub fn amount_line(&self) -> String {
        match self.value {
            Some(value) => format_amount(value),
            None => String::new(),
        }
    }

    /// Decode the Amt and Ccy payload elements.
    pub fn from_lines(amount: &str, currency: &str) -> Result<Self, QrBillError> {
        let currency = currency.parse()?;
        if amount.is_empty() {
            return Ok(Self::open(currency));
        }
        let well_formed = amount
            .split_once('.')
            .is_some_and(|(int, frac)| {
                !int.is_empty()
                    && int.bytes().all(|b| b.is_ascii_digit())
                    && frac.len() == 2
                    && frac.bytes().all(|b| b.is_ascii_digit())
            });
        let value = Decimal::from_str(amount).ok().filter(|_| well_formed).ok_or_else(|| {
            QrBillError::InvalidAmount {
                value: amount.to_string(),
                reason: "expected digits with exactly two decimal places".into(),
            }
        })?;
        Self::new(Some(value), currency)
    }
}

/// Fixed two-decimal representation independent of locale, e.g. `30.00`.
pub fn format_amount(value: Decimal) -> String {
    let mut value = value;
    value.rescale(2);
    value.to_string()
}
