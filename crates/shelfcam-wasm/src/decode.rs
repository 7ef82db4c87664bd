//! File-picker decoding bindings.
//!
//! ```typescript
//! import { decode_image } from '@shelfcam/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const buffer = decode_image(bytes);
//! console.log(`Decoded ${buffer.width}x${buffer.height}`);
//! ```

use crate::types::{to_js_error, JsPixelBuffer};
use shelfcam_core::capture;
use wasm_bindgen::prelude::*;

/// Decode an uploaded JPEG or PNG into an upright RGBA buffer.
///
/// EXIF orientation is applied, so portrait phone photos come out portrait.
///
/// # Errors
///
/// Returns an error if the bytes are not a supported image or are truncated.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsPixelBuffer, JsValue> {
    capture::decode_image(bytes)
        .map(JsPixelBuffer::from_buffer)
        .map_err(to_js_error)
}

/// EXIF orientation tag (1-8) of an image file, 1 when absent.
#[wasm_bindgen]
pub fn image_orientation(bytes: &[u8]) -> u8 {
    capture::read_orientation(bytes).exif_value()
}
