//! Shelfcam WASM - WebAssembly bindings for the capture and crop editor
//!
//! This crate exposes shelfcam-core to the catalog web app. The page owns
//! the camera stream, the canvas and the DOM; everything that decides
//! where the crop goes and what gets uploaded runs here.
//!
//! # Module Structure
//!
//! - `types` - `JsPixelBuffer` and JS value conversions
//! - `decode` - File-picker decoding with EXIF orientation
//! - `autocrop` - Crop proposal and region scoring
//! - `editor` - `JsCropEditor`, the pointer-driven crop editor
//! - `encode` - Size-bounded output encoding
//! - `capture` - Classifying camera acquisition failures
//! - `logging` - Console backend for core log output
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsPixelBuffer, plan_crop, set_log_level } from '@shelfcam/wasm';
//!
//! await init();
//! set_log_level('debug');
//!
//! const frame = ctx.getImageData(0, 0, video.videoWidth, video.videoHeight);
//! const buffer = new JsPixelBuffer(frame.width, frame.height, frame.data);
//! const { rect, score } = plan_crop(buffer, undefined);
//! ```

use wasm_bindgen::prelude::*;

mod autocrop;
mod capture;
mod decode;
mod editor;
mod encode;
mod logging;
mod types;

pub use autocrop::{plan_crop, score_region};
pub use capture::describe_capture_error;
pub use decode::{decode_image, image_orientation};
pub use editor::JsCropEditor;
pub use encode::{encode_crop, JsEncodedOutput};
pub use logging::set_log_level;
pub use types::JsPixelBuffer;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logging::init_with_level(logging::DEFAULT_LEVEL);
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
