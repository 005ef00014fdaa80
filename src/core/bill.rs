use serde::Serialize;

use super::address::Address;
use super::amount::Amount;
use super::error::{AddressRole, QrBillError, ValidationError, join};
use super::iban::Iban;
use super::payload::*;
use super::reference::Reference;
use super::remittance::Remittance;
use super::validation::validate_payload;

/// A fully validated QR-bill: every field has passed its own checks and the
/// account/reference pairing holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QrBill {
    pub(crate) iban: Iban,
    pub(crate) creditor: Address,
    pub(crate) ultimate_creditor: Option<Address>,
    pub(crate) amount: Amount,
    pub(crate) debtor: Option<Address>,
    pub(crate) reference: Reference,
    pub(crate) remittance: Remittance,
}

impl QrBill {
    pub fn iban(&self) -> &Iban {
        &self.iban
    }

    pub fn creditor(&self) -> &Address {
        &self.creditor
    }

    pub fn ultimate_creditor(&self) -> Option<&Address> {
        self.ultimate_creditor.as_ref()
    }

    pub fn amount(&self) -> &Amount {
        &self.amount
    }

    pub fn debtor(&self) -> Option<&Address> {
        self.debtor.as_ref()
    }

    pub fn reference(&self) -> &Reference {
        &self.reference
    }

    pub fn remittance(&self) -> &Remittance {
        &self.remittance
    }

    /// Assemble the fixed 31-element payload and run the structural pass.
    ///
    /// A failure here means a field slipped past its own validation and is
    /// reported as [`QrBillError::MalformedPayload`].
    pub fn to_payload(&self) -> Result<Payload, QrBillError> {
        let mut lines = Vec::with_capacity(PAYLOAD_LINES);
        lines.extend([QR_TYPE, VERSION, CODING_TYPE].map(String::from));
        lines.push(self.iban.to_string());
        lines.extend(self.creditor.to_lines());
        lines.extend(address_lines(self.ultimate_creditor.as_ref()));
        lines.push(self.amount.amount_line());
        lines.push(self.amount.currency().code().to_string());
        lines.extend(address_lines(self.debtor.as_ref()));
        lines.push(self.reference.kind().code().to_string());
        lines.push(self.reference.value().to_string());
        lines.push(self.remittance.as_str().to_string());
        lines.push(TRAILER.to_string());

        let payload = Payload::from_lines_unchecked(lines);
        let errors = validate_payload(&payload);
        if !errors.is_empty() {
            let msg = join(&errors);
            tracing::error!(
                errors = errors.len(),
                bytes = payload.byte_len(),
                detail = %msg,
                "assembled QR-bill payload failed structural validation"
            );
            return Err(QrBillError::MalformedPayload(msg));
        }
        Ok(payload)
    }

    /// Decode payload text back into a validated bill.
    pub fn parse(text: &str) -> Result<Self, QrBillError> {
        Self::from_payload(&Payload::parse(text)?)
    }

    /// Decode a structurally valid payload, re-running every field check.
    pub fn from_payload(payload: &Payload) -> Result<Self, QrBillError> {
        let iban = Iban::parse_for_qr_bill(payload.line(line::IBAN))?;
        let creditor = Address::from_lines(
            &payload.address_block(line::CREDITOR),
            Some(AddressRole::Creditor),
        )?
        .ok_or_else(|| QrBillError::InvalidAddress {
            role: Some(AddressRole::Creditor),
            errors: vec![ValidationError::new("creditor", "creditor address must not be empty")],
        })?;
        let ultimate_creditor = Address::from_lines(
            &payload.address_block(line::ULTIMATE_CREDITOR),
            Some(AddressRole::UltimateCreditor),
        )?;
        let amount = Amount::from_lines(payload.line(line::AMOUNT), payload.line(line::CURRENCY))?;
        let debtor = Address::from_lines(
            &payload.address_block(line::DEBTOR),
            Some(AddressRole::Debtor),
        )?;
        let reference = Reference::from_lines(
            payload.line(line::REFERENCE_TYPE),
            payload.line(line::REFERENCE),
        )?;
        reference.check_account(&iban)?;
        let remittance = Remittance::new(payload.line(line::UNSTRUCTURED_MESSAGE))?;

        Ok(Self {
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

fn address_lines(address: Option<&Address>) -> [String; 7] {
    address.map_or_else(Address::empty_lines, Address::to_lines)
}
