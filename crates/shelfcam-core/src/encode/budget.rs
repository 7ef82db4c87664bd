//! Size-bounded output encoding.
//!
//! The cropped region is encoded at a high quality first, then re-encoded
//! at decreasing quality until it fits the byte budget or the minimum
//! quality is reached. With the default settings that is at most 9
//! attempts (90, 80, ... 10).

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::jpeg::{encode_jpeg, JPEG_MIME};
use super::EncodeError;
use crate::buffer::PixelBuffer;
use crate::cancel::CancelToken;
use crate::config::OutputConfig;
use crate::geometry::Rect;

/// An image codec with a quality knob.
pub trait QualityEncoder {
    /// MIME type of the produced bytes.
    fn mime_type(&self) -> &'static str;

    /// Encode RGB pixels at `quality` (1-100).
    fn encode(&self, rgb: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, EncodeError>;
}

/// Baseline JPEG via the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct JpegQuality;

impl QualityEncoder for JpegQuality {
    fn mime_type(&self) -> &'static str {
        JPEG_MIME
    }

    fn encode(&self, rgb: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>, EncodeError> {
        encode_jpeg(rgb, width, height, quality)
    }
}

/// Final encoded crop, handed to the output sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedOutput {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    /// Quality (percent) of the returned attempt
    pub quality: u8,
    /// Number of encode attempts made
    pub attempts: u32,
}

impl EncodedOutput {
    /// Check if the output fits a byte threshold.
    pub fn fits(&self, threshold: f64) -> bool {
        self.bytes.len() as f64 <= threshold
    }
}

/// Render only the pixels inside `rect` into a same-sized RGB image.
///
/// The rect is intersected with the buffer and rounded to whole pixels.
/// Alpha is dropped.
pub fn render_crop(buffer: &PixelBuffer, rect: &Rect) -> Result<image::RgbImage, EncodeError> {
    let region = rect
        .intersect(buffer.size())
        .ok_or(EncodeError::EmptyRegion)?;

    let x0 = region.x.round() as u32;
    let y0 = region.y.round() as u32;
    let x1 = (region.right().round() as u32).min(buffer.width());
    let y1 = (region.bottom().round() as u32).min(buffer.height());
    if x1 <= x0 || y1 <= y0 {
        return Err(EncodeError::EmptyRegion);
    }
    let (out_w, out_h) = (x1 - x0, y1 - y0);

    let src = buffer.as_bytes();
    let stride = buffer.width() as usize * 4;
    let mut rgb = Vec::with_capacity(out_w as usize * out_h as usize * 3);
    for y in y0..y1 {
        let row = y as usize * stride;
        let start = row + x0 as usize * 4;
        let end = row + x1 as usize * 4;
        for px in src[start..end].chunks_exact(4) {
            rgb.extend_from_slice(&px[..3]);
        }
    }

    image::RgbImage::from_raw(out_w, out_h, rgb).ok_or(EncodeError::InvalidDimensions {
        width: out_w,
        height: out_h,
    })
}

/// Encodes a crop under a byte budget, degrading quality as needed.
#[derive(Debug, Clone, Default)]
pub struct OutputEncoder<E = JpegQuality> {
    config: OutputConfig,
    encoder: E,
}

impl OutputEncoder<JpegQuality> {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            config,
            encoder: JpegQuality,
        }
    }
}

impl<E: QualityEncoder> OutputEncoder<E> {
    /// Use a different codec.
    pub fn with_encoder(config: OutputConfig, encoder: E) -> Self {
        Self { config, encoder }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Encode the crop. Best effort: if even the minimum quality exceeds
    /// the budget, that minimum-quality result is returned.
    pub fn encode(&self, buffer: &PixelBuffer, rect: &Rect) -> Result<EncodedOutput, EncodeError> {
        self.encode_with_cancel(buffer, rect, &CancelToken::new())
    }

    /// Encode the crop, giving up with [`EncodeError::Cancelled`] as soon
    /// as `cancel` fires. No partial result is returned after cancellation.
    pub fn encode_with_cancel(
        &self,
        buffer: &PixelBuffer,
        rect: &Rect,
        cancel: &CancelToken,
    ) -> Result<EncodedOutput, EncodeError> {
        if cancel.is_cancelled() {
            return Err(EncodeError::Cancelled);
        }
        let cropped = render_crop(buffer, rect)?;
        let (width, height) = cropped.dimensions();
        let rgb = cropped.into_raw();

        let threshold = self.config.byte_threshold();
        let start = self.config.start_quality.clamp(1, 100);
        let min = self.config.min_quality.clamp(1, start);
        let step = self.config.quality_step.max(1);

        let mut quality = start;
        let mut attempts = 0u32;
        loop {
            if cancel.is_cancelled() {
                debug!("encode: cancelled after {} attempts", attempts);
                return Err(EncodeError::Cancelled);
            }

            let bytes = self.encoder.encode(&rgb, width, height, quality)?;
            attempts += 1;
            debug!(
                "encode: attempt {} at quality {} -> {} bytes (threshold {:.0})",
                attempts,
                quality,
                bytes.len(),
                threshold
            );

            let fits = bytes.len() as f64 <= threshold;
            if fits || quality <= min {
                if !fits {
                    warn!(
                        "encode: {} bytes at minimum quality {} still exceeds {:.0}",
                        bytes.len(),
                        quality,
                        threshold
                    );
                }
                if cancel.is_cancelled() {
                    return Err(EncodeError::Cancelled);
                }
                return Ok(EncodedOutput {
                    bytes,
                    mime_type: self.encoder.mime_type().to_string(),
                    width,
                    height,
                    quality,
                    attempts,
                });
            }

            quality = quality.saturating_sub(step).max(min);
        }
    }
}
