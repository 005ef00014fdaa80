use serde::{Deserialize, Serialize};

use crate::core::{AddressBuilder, Currency, Iban, QrBillError, Reference, ReferenceType};

/// Creditor account and defaults for every payment code generated.
///
/// Deserializable so it can live in the host application's config file;
/// nothing is read from the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillConfig {
    /// Receiving account, CH or LI.
    pub iban: String,
    /// Account holder address printed on the bill.
    pub creditor: CreditorConfig,
    /// ISO 4217 code, `CHF` unless set.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// How registrations are referenced on the bill.
    #[serde(default)]
    pub reference: ReferenceStrategy,
}

/// Structured creditor address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditorConfig {
    pub name: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub building_number: String,
    pub postal_code: String,
    pub town: String,
    #[serde(default = "default_country")]
    pub country: String,
}

/// How a registration is made traceable on the bill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceStrategy {
    /// No reference; name, race number and email go into the unstructured message.
    #[default]
    Unstructured,
    /// ISO 11649 creditor reference derived from the race number.
    CreditorReference,
    /// QRR reference derived from the race number. Requires a QR-IBAN.
    QrReference,
}

impl BillConfig {
    pub fn new(iban: impl Into<String>, creditor: CreditorConfig) -> Self {
        Self {
            iban: iban.into(),
            creditor,
            currency: default_currency(),
            reference: ReferenceStrategy::default(),
        }
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn reference(mut self, strategy: ReferenceStrategy) -> Self {
        self.reference = strategy;
        self
    }

    /// Check the static part of every bill once, at startup.
    pub fn validate(&self) -> Result<(), QrBillError> {
        let iban = Iban::parse_for_qr_bill(&self.iban)?;
        self.creditor.address().build()?;
        self.currency.parse::<Currency>()?;
        let probe = match self.reference {
            ReferenceStrategy::Unstructured => Reference::none(),
            ReferenceStrategy::CreditorReference => Reference::creditor_from_body("1")?,
            ReferenceStrategy::QrReference => Reference::qr_from_digits("1")?,
        };
        if self.reference == ReferenceStrategy::Unstructured && iban.is_qr_iban() {
            return Err(QrBillError::InvalidReference {
                kind: Some(ReferenceType::Non),
                reason: "a QR-IBAN needs the qr_reference strategy".into(),
            });
        }
        probe.check_account(&iban)
    }
}

impl CreditorConfig {
    pub fn new(
        name: impl Into<String>,
        postal_code: impl Into<String>,
        town: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            street: String::new(),
            building_number: String::new(),
            postal_code: postal_code.into(),
            town: town.into(),
            country: default_country(),
        }
    }

    pub fn street(mut self, street: impl Into<String>, building_number: impl Into<String>) -> Self {
        self.street = street.into();
        self.building_number = building_number.into();
        self
    }

    /// Raw structured address for the payload pipeline.
    pub fn address(&self) -> AddressBuilder {
        AddressBuilder::structured(&self.name, &self.postal_code, &self.town, &self.country)
            .street(&self.street)
            .building_number(&self.building_number)
    }
}

fn default_currency() -> String {
    "CHF".to_string()
}

fn default_country() -> String {
    "CH".to_string()
}
