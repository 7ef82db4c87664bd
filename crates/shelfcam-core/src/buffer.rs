//! Captured pixel buffers.

use thiserror::Error;

use crate::geometry::Size;

/// Errors raised when constructing a [`PixelBuffer`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BufferError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel data length doesn't match the dimensions
    #[error("Invalid pixel data: expected {expected} bytes ({channels} per pixel), got {actual}")]
    InvalidPixelData {
        expected: usize,
        actual: usize,
        channels: usize,
    },
}

/// An immutable RGBA8 image produced once per capture.
///
/// Pixels are stored row-major, 4 bytes per pixel. The buffer is never
/// mutated after construction; scoring and encoding only read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer from RGBA bytes.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, BufferError> {
        validate(width, height, rgba.len(), 4)?;
        Ok(Self {
            width,
            height,
            pixels: rgba,
        })
    }

    /// Create a buffer from RGB bytes, adding an opaque alpha channel.
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> Result<Self, BufferError> {
        validate(width, height, rgb.len(), 3)?;
        let mut pixels = Vec::with_capacity(rgb.len() / 3 * 4);
        for px in rgb.chunks_exact(3) {
            pixels.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a buffer from an `image::RgbaImage`.
    pub fn from_rgba_image(img: image::RgbaImage) -> Result<Self, BufferError> {
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// Convert to an `image::RgbaImage` for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Raw RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA sample at `(x, y)`. Callers must stay inside the buffer.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Unweighted luma `(R + G + B) / 3` at `(x, y)`.
    #[inline]
    pub fn luma(&self, x: u32, y: u32) -> f64 {
        let [r, g, b, _] = self.pixel(x, y);
        (r as f64 + g as f64 + b as f64) / 3.0
    }

    /// Check if the buffer holds no pixel data.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}

fn validate(width: u32, height: u32, len: usize, channels: usize) -> Result<(), BufferError> {
    if width == 0 || height == 0 {
        return Err(BufferError::InvalidDimensions { width, height });
    }
    let expected = (width as usize) * (height as usize) * channels;
    if len != expected {
        return Err(BufferError::InvalidPixelData {
            expected,
            actual: len,
            channels,
        });
    }
    Ok(())
}
