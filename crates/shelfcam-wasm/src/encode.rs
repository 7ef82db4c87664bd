//! Output encoding bindings.
//!
//! ```typescript
//! const rect = editor.rect();
//! const out = encode_crop(buffer, rect.x, rect.y, rect.width, rect.height, undefined);
//! const blob = new Blob([out.bytes], { type: out.mime_type });
//! ```

use crate::types::{config_from_js, to_js_error, JsPixelBuffer};
use shelfcam_core::config::OutputConfig;
use shelfcam_core::encode::{EncodeError, EncodedOutput, OutputEncoder};
use shelfcam_core::geometry::Rect;
use shelfcam_core::PixelBuffer;
use wasm_bindgen::prelude::*;

/// A confirmed crop, encoded under the size budget.
#[wasm_bindgen]
pub struct JsEncodedOutput {
    inner: EncodedOutput,
}

#[wasm_bindgen]
impl JsEncodedOutput {
    /// Encoded bytes as a `Uint8Array` (copied).
    #[wasm_bindgen(getter)]
    pub fn bytes(&self) -> Vec<u8> {
        self.inner.bytes.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Quality (percent) of the returned attempt
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.inner.quality
    }

    #[wasm_bindgen(getter)]
    pub fn attempts(&self) -> u32 {
        self.inner.attempts
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.bytes.len()
    }
}

/// Encode the region of `buffer` inside the rect.
///
/// Quality steps down from 90% until the result fits the budget; if even
/// the lowest quality is too large, that result is returned anyway.
///
/// # Errors
///
/// Returns an error if the rect does not cover any pixel of the image.
#[wasm_bindgen]
pub fn encode_crop(
    buffer: &JsPixelBuffer,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    config: JsValue,
) -> Result<JsEncodedOutput, JsValue> {
    let config = config_from_js(config)?;
    encode_region(buffer.buffer(), &Rect::new(x, y, width, height), config.output).map_err(to_js_error)
}

fn encode_region(buffer: &PixelBuffer, rect: &Rect, config: OutputConfig) -> Result<JsEncodedOutput, EncodeError> {
    OutputEncoder::new(config)
        .encode(buffer, rect)
        .map(|inner| JsEncodedOutput { inner })
}
