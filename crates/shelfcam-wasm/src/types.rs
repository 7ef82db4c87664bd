//! WASM-compatible wrapper types and conversions.
//!
//! Images cross the boundary as RGBA bytes (the layout of `ImageData`), so a
//! canvas frame can be handed over without repacking. Rects and results go
//! out as plain JS objects through `serde-wasm-bindgen`.

use serde::Serialize;
use shelfcam_core::buffer::PixelBuffer;
use shelfcam_core::config::CropConfig;
use wasm_bindgen::prelude::*;

/// An RGBA image held in WASM memory.
///
/// `pixels()` copies the data out to a `Uint8Array`; keep the buffer on the
/// WASM side and pass it to `plan_crop` / `encode_crop` instead where
/// possible.
#[wasm_bindgen]
pub struct JsPixelBuffer {
    inner: PixelBuffer,
}

#[wasm_bindgen]
impl JsPixelBuffer {
    /// Wrap RGBA pixel data, e.g. `ctx.getImageData(...).data`.
    ///
    /// # Errors
    /// Returns an error if the length is not `width * height * 4`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsPixelBuffer, JsValue> {
        PixelBuffer::new(width, height, pixels)
            .map(JsPixelBuffer::from_buffer)
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// Number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.as_bytes().len()
    }

    /// RGBA pixel data as a `Uint8Array` (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.as_bytes().to_vec()
    }
}

impl JsPixelBuffer {
    pub(crate) fn from_buffer(inner: PixelBuffer) -> Self {
        Self { inner }
    }

    pub(crate) fn buffer(&self) -> &PixelBuffer {
        &self.inner
    }
}

/// Read an optional config object. `undefined` and `null` give defaults;
/// missing fields default individually.
pub(crate) fn config_from_js(config: JsValue) -> Result<CropConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(CropConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid crop config: {}", e)))
}

/// Serialize a value to a plain JS object.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

pub(crate) fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}
