//! # zahlteil
//!
//! Swiss QR-bill payment codes for event registrations.
//!
//! The crate turns loosely validated registration data (name, race number,
//! email, intended amount) into a byte-exact QR-bill payload: the 31-element
//! `SPC` text block a banking app scans. Every field is checked against the
//! Swiss Payment Standards before assembly, and the assembled payload gets a
//! final structural pass. All monetary values use [`rust_decimal::Decimal`].
//!
//! ## Quick Start
//!
//! ```rust
//! use zahlteil::core::*;
//!
//! let payload = QrBillBuilder::new(
//!     "CH47 0900 0000 1604 1402 0",
//!     AddressBuilder::structured("Velokurier Bern", "3013", "Bern", "CH")
//!         .street("Dammweg")
//!         .building_number("41"),
//! )
//! .amount_whole_units(30)
//! .remittance("Jane Doe 42 jane@example.com")
//! .build()
//! .unwrap();
//!
//! assert_eq!(payload.line(line::IBAN), "CH4709000000160414020");
//! assert_eq!(payload.line(line::AMOUNT), "30.00");
//! assert!(payload.as_text().starts_with("SPC\n0200\n1\n"));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Payload engine: validation, references, assembly, decoding |
//! | `registration` (default) | Registration records, generator, renderer seam, data URI |
//! | `png` | QR symbol rendering to PNG with the Swiss cross |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "registration")]
pub mod registration;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
