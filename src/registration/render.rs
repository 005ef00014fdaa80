use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::core::{Payload, QrBillError};

/// Turns payload text into an image. QR symbol encoding and rasterization
/// live behind this seam so the payload engine stays independent of them.
///
/// Implementations must fail with [`QrBillError::EncodingCapacityExceeded`]
/// when the payload does not fit the symbol, never truncate.
pub trait PayloadRenderer {
    fn render(&self, payload: &Payload) -> Result<RenderedImage, QrBillError>;
}

impl<R: PayloadRenderer + ?Sized> PayloadRenderer for &R {
    fn render(&self, payload: &Payload) -> Result<RenderedImage, QrBillError> {
        (**self).render(payload)
    }
}

impl<R: PayloadRenderer + ?Sized> PayloadRenderer for Box<R> {
    fn render(&self, payload: &Payload) -> Result<RenderedImage, QrBillError> {
        (**self).render(payload)
    }
}

/// Encoded image bytes with their media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl RenderedImage {
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }

    /// `data:<media type>;base64,<payload>` for inline embedding.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
    }
}
