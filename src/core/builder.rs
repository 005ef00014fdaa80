use rust_decimal::Decimal;

use super::address::AddressBuilder;
use super::amount::{Amount, Currency};
use super::bill::QrBill;
use super::error::{AddressRole, QrBillError};
use super::iban::Iban;
use super::payload::Payload;
use super::reference::{Reference, ReferenceType};
use super::remittance::Remittance;

/// How the payment reference is supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReferenceInput {
    None,
    Qr(String),
    QrFromDigits(String),
    Creditor(String),
    CreditorFromBody(String),
}

/// Builder for QR-bill payloads from loosely validated input.
///
/// `build` runs a fixed pipeline: IBAN, creditor address, ultimate creditor
/// address, amount and currency, debtor address, reference, remittance text,
/// then the structural payload pass. The first failing stage aborts the build;
/// nothing invalid is replaced by a default.
///
/// ```
/// use zahlteil::core::*;
/// use rust_decimal_macros::dec;
///
/// let payload = QrBillBuilder::new(
///     "CH47 0900 0000 1604 1402 0",
///     AddressBuilder::structured("Velokurier Bern", "3013", "Bern", "CH")
///         .street("Dammweg")
///         .building_number("41"),
/// )
/// .amount(dec!(30))
/// .remittance("Jane Doe 42 jane@example.com")
/// .build()
/// .unwrap();
///
/// assert_eq!(payload.line(line::AMOUNT), "30.00");
/// assert_eq!(payload.lines().len(), PAYLOAD_LINES);
/// ```
#[derive(Debug, Clone)]
pub struct QrBillBuilder {
    iban: String,
    creditor: AddressBuilder,
    ultimate_creditor: Option<AddressBuilder>,
    amount: Option<Decimal>,
    currency: String,
    debtor: Option<AddressBuilder>,
    reference: ReferenceInput,
    remittance: Option<String>,
}

impl QrBillBuilder {
    pub fn new(iban: impl Into<String>, creditor: AddressBuilder) -> Self {
        Self {
            iban: iban.into(),
            creditor,
            ultimate_creditor: None,
            amount: None,
            currency: "CHF".to_string(),
            debtor: None,
            reference: ReferenceInput::None,
            remittance: None,
        }
    }

    pub fn ultimate_creditor(mut self, address: AddressBuilder) -> Self {
        self.ultimate_creditor = Some(address);
        self
    }

    pub fn debtor(mut self, address: AddressBuilder) -> Self {
        self.debtor = Some(address);
        self
    }

    /// Amount with up to two fraction digits. Zero leaves the amount open.
    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Amount in whole currency units.
    pub fn amount_whole_units(mut self, units: u64) -> Self {
        self.amount = Some(Decimal::from(units));
        self
    }

    /// ISO 4217 code; CHF unless set.
    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    /// Complete 27-digit QRR reference (needs a QR-IBAN).
    pub fn qr_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = ReferenceInput::Qr(reference.into());
        self
    }

    /// QRR reference generated from up to 26 digits (needs a QR-IBAN).
    pub fn qr_reference_from_digits(mut self, digits: impl Into<String>) -> Self {
        self.reference = ReferenceInput::QrFromDigits(digits.into());
        self
    }

    /// Complete ISO 11649 creditor reference.
    pub fn creditor_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = ReferenceInput::Creditor(reference.into());
        self
    }

    /// ISO 11649 creditor reference generated from its body.
    pub fn creditor_reference_from_body(mut self, body: impl Into<String>) -> Self {
        self.reference = ReferenceInput::CreditorFromBody(body.into());
        self
    }

    /// Unstructured message (Ustrd), at most 140 characters.
    pub fn remittance(mut self, text: impl Into<String>) -> Self {
        self.remittance = Some(text.into());
        self
    }

    /// Run the pipeline and assemble the payload.
    pub fn build(self) -> Result<Payload, QrBillError> {
        self.build_bill()?.to_payload()
    }

    /// Run the field pipeline without assembling the payload.
    pub fn build_bill(self) -> Result<QrBill, QrBillError> {
        self.compose().inspect_err(|err| {
            tracing::debug!(stage = %err.stage(), error = %err, "QR-bill input rejected");
        })
    }

    fn compose(self) -> Result<QrBill, QrBillError> {
        let iban = Iban::parse_for_qr_bill(&self.iban)?;
        let creditor = self.creditor.build_with_role(Some(AddressRole::Creditor))?;
        let ultimate_creditor = self
            .ultimate_creditor
            .map(|a| a.build_with_role(Some(AddressRole::UltimateCreditor)))
            .transpose()?;

        let currency: Currency = self.currency.parse()?;
        let amount = Amount::new(self.amount, currency)?;

        let debtor = self
            .debtor
            .map(|a| a.build_with_role(Some(AddressRole::Debtor)))
            .transpose()?;

        let reference = match self.reference {
            ReferenceInput::None => Reference::none(),
            ReferenceInput::Qr(value) => Reference::qr(&value)?,
            ReferenceInput::QrFromDigits(digits) => Reference::qr_from_digits(&digits)?,
            ReferenceInput::Creditor(value) => Reference::creditor(&value)?,
            ReferenceInput::CreditorFromBody(body) => Reference::creditor_from_body(&body)?,
        };
        reference.check_account(&iban)?;

        let remittance = match self.remittance {
            Some(text) => Remittance::new(text)?,
            None => Remittance::empty(),
        };
        if reference.kind() == ReferenceType::Non && remittance.is_empty() {
            return Err(QrBillError::InvalidReference {
                kind: Some(ReferenceType::Non),
                reason: "without a reference the unstructured message must carry the payment purpose"
                    .into(),
            });
        }

        Ok(QrBill {
            iban,
            creditor,
            ultimate_creditor,
            amount,
            debtor,
            reference,
            remittance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{IbanCheck, Stage};
    use crate::core::payload::{PAYLOAD_LINES, line};
    use rust_decimal_macros::dec;

    fn creditor() -> AddressBuilder {
        AddressBuilder::structured("Velokurier Bern", "3013", "Bern", "CH")
            .street("Dammweg")
            .building_number("41")
    }

    fn builder() -> QrBillBuilder {
        QrBillBuilder::new("CH47 0900 0000 1604 1402 0", creditor())
            .amount_whole_units(30)
            .remittance("Jane Doe 42 jane@example.com")
    }

    #[test]
    fn minimal_bill() {
        let payload = builder().build().unwrap();
        assert_eq!(payload.lines().len(), PAYLOAD_LINES);
        assert_eq!(payload.line(line::IBAN), "CH4709000000160414020");
        assert_eq!(payload.line(line::AMOUNT), "30.00");
        assert_eq!(payload.line(line::CURRENCY), "CHF");
        assert_eq!(payload.line(line::REFERENCE_TYPE), "NON");
        assert_eq!(payload.line(line::REFERENCE), "");
    }

    #[test]
    fn iban_runs_first() {
        let err = QrBillBuilder::new("CH47 0900 0000 1640 1402 0", creditor())
            .currency("USD")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            QrBillError::InvalidIban {
                check: IbanCheck::Checksum,
                ..
            }
        ));
    }

    #[test]
    fn address_errors_are_tagged_by_role() {
        let err = builder()
            .debtor(AddressBuilder::structured("Jane Doe", "", "Bern", "CH"))
            .build()
            .unwrap_err();
        assert_eq!(err.stage(), Stage::DebtorAddress);

        let err = builder()
            .ultimate_creditor(AddressBuilder::combined("Verein", "", "CH"))
            .build()
            .unwrap_err();
        assert_eq!(err.stage(), Stage::UltimateCreditorAddress);
    }

    #[test]
    fn currency_and_amount_stage() {
        let err = builder().currency("USD").build().unwrap_err();
        assert_eq!(err, QrBillError::UnsupportedCurrency("USD".into()));
        let err = builder().amount(dec!(1000000000.00)).build().unwrap_err();
        assert_eq!(err.stage(), Stage::Amount);
    }

    #[test]
    fn creditor_reference_from_body() {
        let payload = builder().creditor_reference_from_body("42").build().unwrap();
        assert_eq!(payload.line(line::REFERENCE_TYPE), "SCOR");
        assert_eq!(payload.line(line::REFERENCE), "RF3442");
    }

    #[test]
    fn qr_reference_needs_qr_iban() {
        let err = builder().qr_reference_from_digits("42").build().unwrap_err();
        assert_eq!(err.stage(), Stage::Reference);

        let payload = QrBillBuilder::new("CH44 3199 9123 0008 8901 2", creditor())
            .qr_reference("21 00000 00003 13947 14300 09017")
            .build()
            .unwrap();
        assert_eq!(payload.line(line::REFERENCE_TYPE), "QRR");
        assert_eq!(payload.line(line::REFERENCE), "210000000003139471430009017");
        assert_eq!(payload.line(line::AMOUNT), "");
    }

    #[test]
    fn non_reference_requires_message() {
        let err = QrBillBuilder::new("CH47 0900 0000 1604 1402 0", creditor())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            QrBillError::InvalidReference {
                kind: Some(ReferenceType::Non),
                ..
            }
        ));
    }

    #[test]
    fn overlong_remittance_fails_before_assembly() {
        let err = builder().remittance("x".repeat(141)).build().unwrap_err();
        assert_eq!(err.stage(), Stage::Remittance);
    }

    #[test]
    fn oversized_combination_is_malformed() {
        let party = |name: &str| {
            AddressBuilder::combined(name.repeat(70), "L".repeat(70), "CH").line1("M".repeat(70))
        };
        let err = QrBillBuilder::new("CH47 0900 0000 1604 1402 0", party("C"))
            .ultimate_creditor(party("U"))
            .debtor(party("D"))
            .amount(dec!(999999999.99))
            .creditor_reference("RF18539007547034")
            .remittance("ü".repeat(140))
            .build()
            .unwrap_err();
        assert!(err.is_internal());
        assert_eq!(err.stage(), Stage::Payload);
    }
}
