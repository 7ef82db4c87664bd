//! Baseline JPEG output.
//!
//! JPEG has no alpha channel; callers hand over RGB rows (see
//! [`render_crop`](super::render_crop)).

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::EncodeError;

/// MIME type of [`encode_jpeg`] output.
pub const JPEG_MIME: &str = "image/jpeg";

/// Encode tightly packed RGB rows as JPEG.
///
/// `quality` is a percentage; values outside 1-100 are clamped.
pub fn encode_jpeg(rgb: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, EncodeError> {
    check_rgb_len(rgb.len(), width, height)?;

    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100))
        .write_image(rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;
    Ok(out)
}

fn check_rgb_len(len: usize, width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let expected = width as usize * height as usize * 3;
    if len == expected {
        Ok(())
    } else {
        Err(EncodeError::InvalidPixelData {
            expected,
            actual: len,
        })
    }
}
