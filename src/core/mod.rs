//! Payload engine: IBAN, address, amount, reference and remittance
//! validation, and assembly of the fixed-position QR-bill payload.
//!
//! Everything here is pure and synchronous. Values are built fresh per call
//! and nothing is shared, so concurrent use needs no coordination.

mod address;
mod amount;
mod bill;
mod builder;
pub mod charset;
pub mod checksum;
pub mod countries;
mod error;
mod iban;
mod payload;
mod reference;
mod remittance;
mod validation;

pub use address::*;
pub use amount::*;
pub use bill::*;
pub use builder::*;
pub use error::*;
pub use iban::Iban;
pub use payload::*;
pub use reference::*;
pub use remittance::*;
pub use validation::*;
