//! Registration adapter: turns a participant record into an embeddable
//! payment code.
//!
//! The surrounding application supplies a [`BillConfig`] (creditor account
//! and address) and a [`PayloadRenderer`]. [`PaymentCodeGenerator`] runs the
//! payload pipeline for each [`Registration`] and returns the payload plus a
//! `data:` URI ready for an HTML email.
//!
//! # Example
//!
//! ```
//! use zahlteil::registration::*;
//! use zahlteil::{Payload, QrBillError};
//!
//! struct TextRenderer;
//!
//! impl PayloadRenderer for TextRenderer {
//!     fn render(&self, payload: &Payload) -> Result<RenderedImage, QrBillError> {
//!         Ok(RenderedImage::new("text/plain", payload.as_text().into_bytes()))
//!     }
//! }
//!
//! let config: BillConfig = serde_json::from_str(r#"{
//!     "iban": "CH47 0900 0000 1604 1402 0",
//!     "creditor": {
//!         "name": "Velokurier Bern",
//!         "street": "Dammweg",
//!         "building_number": "41",
//!         "postal_code": "3013",
//!         "town": "Bern",
//!         "country": "CH"
//!     }
//! }"#).unwrap();
//!
//! let generator = PaymentCodeGenerator::new(config, TextRenderer);
//! let registration = Registration::new("Jane", "jane@example.com", 42, 30).nick_name("Jane Doe");
//! let code = generator.generate(&registration).unwrap();
//! assert!(code.data_uri.starts_with("data:text/plain;base64,"));
//! ```

mod config;
mod generator;
mod record;
mod render;

#[cfg(feature = "png")]
mod png;

pub use config::*;
pub use generator::*;
pub use record::*;
pub use render::*;

#[cfg(feature = "png")]
pub use png::QrPngRenderer;
