use std::io::Cursor;

use image::{ImageBuffer, ImageFormat, Luma};
use qrcode::types::{Color, QrError};
use qrcode::{EcLevel, QrCode, Version};

use super::render::{PayloadRenderer, RenderedImage};
use crate::core::{MAX_PAYLOAD_BYTES, Payload, QrBillError};

/// Largest symbol version the QR-bill format allows.
const MAX_VERSION: i16 = 25;
/// Quiet zone around the symbol, in modules.
const QUIET_ZONE: u32 = 4;

const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Renders a payload as a PNG QR code with the Swiss cross in the centre.
///
/// Error correction level M, symbol version at most 25.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrPngRenderer {
    module_px: u32,
}

impl Default for QrPngRenderer {
    fn default() -> Self {
        Self { module_px: 4 }
    }
}

impl QrPngRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pixels per QR module, at least 1.
    pub fn module_size(mut self, px: u32) -> Self {
        self.module_px = px.max(1);
        self
    }

    fn encode(&self, payload: &Payload) -> Result<QrCode, QrBillError> {
        let text = payload.as_text();
        let exceeded = || QrBillError::EncodingCapacityExceeded {
            len: text.len(),
            capacity: MAX_PAYLOAD_BYTES,
        };
        if text.len() > MAX_PAYLOAD_BYTES {
            return Err(exceeded());
        }
        let code = QrCode::with_error_correction_level(text.as_bytes(), EcLevel::M).map_err(
            |err| match err {
                QrError::DataTooLong => exceeded(),
                other => QrBillError::Render(other.to_string()),
            },
        )?;
        match code.version() {
            Version::Normal(v) if v <= MAX_VERSION => Ok(code),
            _ => Err(exceeded()),
        }
    }
}

impl PayloadRenderer for QrPngRenderer {
    fn render(&self, payload: &Payload) -> Result<RenderedImage, QrBillError> {
        let code = self.encode(payload)?;
        let modules = u32::try_from(code.width())
            .map_err(|_| QrBillError::Render("symbol width out of range".into()))?;
        let colors = code.to_colors();
        let scale = self.module_px;
        let side = (modules + 2 * QUIET_ZONE) * scale;
        let cross = SwissCross::centered(side, modules * scale);

        let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_fn(side, side, |x, y| {
            if let Some(pixel) = cross.pixel(x, y) {
                return pixel;
            }
            let (mx, my) = (x / scale, y / scale);
            if mx < QUIET_ZONE
                || my < QUIET_ZONE
                || mx >= modules + QUIET_ZONE
                || my >= modules + QUIET_ZONE
            {
                return LIGHT;
            }
            let index = ((my - QUIET_ZONE) * modules + (mx - QUIET_ZONE)) as usize;
            match colors[index] {
                Color::Dark => DARK,
                Color::Light => LIGHT,
            }
        });

        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png)
            .map_err(|err| QrBillError::Render(err.to_string()))?;
        tracing::trace!(modules, side, "QR code rasterized");
        Ok(RenderedImage::new("image/png", buffer.into_inner()))
    }
}

/// Centre overlay: white margin, black square, white cross.
/// The black square is 7/46 of the symbol, as on a printed bill.
struct SwissCross {
    origin: u32,
    margin: u32,
    square: u32,
}

impl SwissCross {
    fn centered(canvas: u32, symbol: u32) -> Self {
        let square = (symbol * 7 / 46).max(7);
        let margin = (square / 14).max(1);
        let outer = square + 2 * margin;
        Self {
            origin: canvas.saturating_sub(outer) / 2,
            margin,
            square,
        }
    }

    fn pixel(&self, x: u32, y: u32) -> Option<Luma<u8>> {
        let outer = self.square + 2 * self.margin;
        let (x, y) = (x.checked_sub(self.origin)?, y.checked_sub(self.origin)?);
        if x >= outer || y >= outer {
            return None;
        }
        let (x, y) = (
            x.checked_sub(self.margin),
            y.checked_sub(self.margin),
        );
        let (Some(x), Some(y)) = (x, y) else {
            return Some(LIGHT);
        };
        if x >= self.square || y >= self.square {
            return Some(LIGHT);
        }
        // Flag proportions: arms 6/32 wide, cross spanning 20/32.
        let arm = self.square * 6 / 32;
        let span = self.square * 20 / 32;
        let centre = self.square / 2;
        let within = |v: u32, half: u32| v + half >= centre && v < centre + half;
        let in_cross = (within(x, arm / 2) && within(y, span / 2))
            || (within(y, arm / 2) && within(x, span / 2));
        Some(if in_cross { LIGHT } else { DARK })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cross_overlay_geometry() {
        let cross = SwissCross::centered(460, 460);
        assert_eq!(cross.square, 70);
        let centre = cross.origin + cross.margin + 35;
        assert_eq!(cross.pixel(centre, centre), Some(LIGHT));
        assert_eq!(cross.pixel(cross.origin + cross.margin, cross.origin + cross.margin), Some(DARK));
        assert_eq!(cross.pixel(cross.origin, cross.origin), Some(LIGHT));
        assert_eq!(cross.pixel(0, 0), None);
    }

    #[test]
    fn oversized_payload_exceeds_capacity() {
        let mut lines = vec![String::new(); 31];
        lines[0] = "SPC".into();
        lines[29] = "x".repeat(1200);
        let payload = Payload::from_lines_unchecked(lines);
        let err = QrPngRenderer::new().render(&payload).unwrap_err();
        assert_eq!(
            err,
            QrBillError::EncodingCapacityExceeded {
                len: payload.byte_len(),
                capacity: MAX_PAYLOAD_BYTES,
            }
        );
    }

    #[test]
    fn module_size_is_clamped() {
        assert_eq!(QrPngRenderer::new().module_size(0).module_px, 1);
    }
}
