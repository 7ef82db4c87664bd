//! Still-image decoding for the file-picker path.
//!
//! Phone cameras store pixels in sensor orientation and record the intended
//! rotation in EXIF, so orientation is applied before the buffer reaches
//! the planner.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::buffer::{BufferError, PixelBuffer};

#[derive(Debug, Error)]
pub enum DecodeError {
    /// Not a JPEG or PNG file
    #[error("Unsupported image file")]
    Unsupported,

    /// Recognized format, but the data is broken or cut short
    #[error("Image file is damaged: {0}")]
    Malformed(String),

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Transform that makes a stored image upright: clockwise quarter turns
/// followed by an optional horizontal mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub quarter_turns: u8,
    pub mirrored: bool,
}

impl Orientation {
    pub const UPRIGHT: Orientation = Orientation {
        quarter_turns: 0,
        mirrored: false,
    };

    /// Interpret an EXIF `Orientation` tag value. Values outside 1-8 are
    /// treated as upright.
    pub fn from_exif(tag: u32) -> Self {
        let (quarter_turns, mirrored) = match tag {
            2 => (0, true),
            3 => (2, false),
            4 => (2, true),
            5 => (1, true),
            6 => (1, false),
            7 => (3, true),
            8 => (3, false),
            _ => (0, false),
        };
        Self {
            quarter_turns,
            mirrored,
        }
    }

    /// The EXIF tag value (1-8) describing this transform.
    pub fn exif_value(&self) -> u8 {
        match (self.quarter_turns % 4, self.mirrored) {
            (0, false) => 1,
            (0, true) => 2,
            (2, false) => 3,
            (2, true) => 4,
            (1, true) => 5,
            (1, false) => 6,
            (3, true) => 7,
            _ => 8,
        }
    }

    /// True when the upright image has width and height swapped.
    pub fn swaps_dimensions(&self) -> bool {
        self.quarter_turns % 2 == 1
    }

    fn apply(self, img: DynamicImage) -> DynamicImage {
        let turned = match self.quarter_turns % 4 {
            1 => img.rotate90(),
            2 => img.rotate180(),
            3 => img.rotate270(),
            _ => img,
        };
        if self.mirrored {
            turned.fliph()
        } else {
            turned
        }
    }
}

/// Decode JPEG or PNG bytes into an upright RGBA buffer.
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, DecodeError> {
    let format = image::guess_format(bytes).map_err(|_| DecodeError::Unsupported)?;
    if !matches!(format, image::ImageFormat::Jpeg | image::ImageFormat::Png) {
        return Err(DecodeError::Unsupported);
    }
    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let orientation = read_orientation(bytes);
    if orientation != Orientation::UPRIGHT {
        log::debug!("decode: applying EXIF orientation {}", orientation.exif_value());
    }
    Ok(PixelBuffer::from_rgba_image(orientation.apply(img).into_rgba8())?)
}

/// Orientation recorded in the file's EXIF data, upright when there is none.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    Reader::new()
        .read_from_container(&mut Cursor::new(bytes))
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)?
                .value
                .get_uint(0)
        })
        .map(Orientation::from_exif)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_jpeg;
    use image::ImageEncoder;

    fn png_bytes(img: &image::RgbaImage) -> Vec<u8> {
        let mut out = Vec::new();
        image::codecs::png::PngEncoder::new(&mut out)
            .write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                image::ExtendedColorType::Rgba8,
            )
            .unwrap();
        out
    }

    #[test]
    fn test_png_pixels_survive() {
        let mut img = image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]));
        img.put_pixel(2, 1, image::Rgba([200, 100, 50, 128]));
        let buf = decode_image(&png_bytes(&img)).unwrap();

        assert_eq!((buf.width(), buf.height()), (3, 2));
        assert_eq!(buf.pixel(0, 0), [10, 20, 30, 255]);
        assert_eq!(buf.pixel(2, 1), [200, 100, 50, 128]);
    }

    #[test]
    fn test_jpeg_comes_out_opaque() {
        let jpeg = encode_jpeg(&vec![90u8; 16 * 8 * 3], 16, 8, 90).unwrap();
        let buf = decode_image(&jpeg).unwrap();
        assert_eq!((buf.width(), buf.height()), (16, 8));
        assert_eq!(buf.pixel(0, 0)[3], 255);
    }

    #[test]
    fn test_unknown_bytes_are_unsupported() {
        assert!(matches!(decode_image(&[]), Err(DecodeError::Unsupported)));
        assert!(matches!(
            decode_image(b"plain text, not a picture"),
            Err(DecodeError::Unsupported)
        ));
    }

    #[test]
    fn test_cut_short_jpeg_is_malformed() {
        let jpeg = encode_jpeg(&vec![90u8; 16 * 8 * 3], 16, 8, 90).unwrap();
        assert!(matches!(
            decode_image(&jpeg[..20]),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_no_exif_means_upright() {
        let jpeg = encode_jpeg(&[0u8; 3], 1, 1, 90).unwrap();
        assert_eq!(read_orientation(&jpeg), Orientation::UPRIGHT);
        assert_eq!(read_orientation(&[1, 2, 3]), Orientation::UPRIGHT);
    }

    #[test]
    fn test_exif_values_round_trip() {
        for tag in 1..=8u32 {
            assert_eq!(Orientation::from_exif(tag).exif_value() as u32, tag);
        }
        assert_eq!(Orientation::from_exif(0), Orientation::UPRIGHT);
        assert_eq!(Orientation::from_exif(42), Orientation::UPRIGHT);
    }

    #[test]
    fn test_quarter_turn_swaps_dimensions() {
        let portrait = Orientation::from_exif(6);
        assert!(portrait.swaps_dimensions());
        let out = portrait.apply(DynamicImage::ImageRgba8(image::RgbaImage::new(4, 2)));
        assert_eq!((out.width(), out.height()), (2, 4));
    }

    #[test]
    fn test_mirror_swaps_left_and_right() {
        let mut raw = image::RgbaImage::new(2, 1);
        raw.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        raw.put_pixel(1, 0, image::Rgba([0, 255, 0, 255]));
        let out = Orientation::from_exif(2).apply(DynamicImage::ImageRgba8(raw)).into_rgba8();
        assert_eq!(out.get_pixel(0, 0).0, [0, 255, 0, 255]);
    }

    #[test]
    fn test_flip_vertical_is_half_turn_mirrored() {
        let mut raw = image::RgbaImage::new(1, 2);
        raw.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        raw.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
        let out = Orientation::from_exif(4).apply(DynamicImage::ImageRgba8(raw)).into_rgba8();
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(out.get_pixel(0, 1).0, [255, 0, 0, 255]);
    }
}
