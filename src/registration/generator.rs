use tracing::{debug, error, warn};

use super::config::{BillConfig, ReferenceStrategy};
use super::record::Registration;
use super::render::PayloadRenderer;
use crate::core::{Payload, QrBillBuilder, QrBillError};

/// Payload text plus the rendered image as a `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCode {
    pub payload: Payload,
    pub data_uri: String,
}

/// Produces a payment code per registration from a fixed creditor config.
///
/// Holds no mutable state; one generator can serve any number of threads
/// when the renderer is `Sync`.
#[derive(Debug, Clone)]
pub struct PaymentCodeGenerator<R> {
    config: BillConfig,
    renderer: R,
}

impl<R: PayloadRenderer> PaymentCodeGenerator<R> {
    pub fn new(config: BillConfig, renderer: R) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &BillConfig {
        &self.config
    }

    /// Build the payload for a registration without rendering it.
    pub fn payload(&self, registration: &Registration) -> Result<Payload, QrBillError> {
        let race = registration.race_number.to_string();
        let builder = QrBillBuilder::new(&self.config.iban, self.config.creditor.address())
            .currency(&self.config.currency)
            .amount_whole_units(u64::from(registration.intended_payment))
            .remittance(registration.remittance_text());
        let builder = match self.config.reference {
            ReferenceStrategy::Unstructured => builder,
            ReferenceStrategy::CreditorReference => builder.creditor_reference_from_body(race),
            ReferenceStrategy::QrReference => builder.qr_reference_from_digits(race),
        };
        builder.build()
    }

    /// Build, render and encode the payment code for a registration.
    pub fn generate(&self, registration: &Registration) -> Result<PaymentCode, QrBillError> {
        let result = self.payload(registration).and_then(|payload| {
            let image = self.renderer.render(&payload)?;
            Ok(PaymentCode {
                data_uri: image.to_data_uri(),
                payload,
            })
        });

        match &result {
            Ok(code) => debug!(
                race_number = registration.race_number,
                payment_method = registration.payment_method.as_deref().unwrap_or(""),
                bytes = code.payload.byte_len(),
                "payment code generated"
            ),
            Err(err) if err.is_internal() => error!(
                race_number = registration.race_number,
                stage = %err.stage(),
                error = %err,
                "payload engine defect"
            ),
            Err(err) => warn!(
                race_number = registration.race_number,
                stage = %err.stage(),
                error = %err,
                "registration rejected for payment code"
            ),
        }
        result
    }
}
