//! Output encoding for confirmed crops.
//!
//! This module provides functionality for:
//! - Encoding RGB pixels to JPEG ([`encode_jpeg`])
//! - Rendering the crop region of a [`PixelBuffer`](crate::buffer::PixelBuffer)
//! - Re-encoding at decreasing quality until a byte budget is met ([`OutputEncoder`])
//!
//! All operations are synchronous and bounded; the budget loop makes at
//! most `(start - min) / step + 1` attempts.

mod budget;
mod jpeg;

use thiserror::Error;

pub use budget::{render_crop, EncodedOutput, JpegQuality, OutputEncoder, QualityEncoder};
pub use jpeg::{encode_jpeg, JPEG_MIME};

/// Errors that can occur while producing the output image.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The crop rect does not cover any pixel of the image
    #[error("Crop region is empty or outside the image")]
    EmptyRegion,

    /// The editor was closed while encoding
    #[error("Encoding cancelled")]
    Cancelled,

    /// The codec failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}
