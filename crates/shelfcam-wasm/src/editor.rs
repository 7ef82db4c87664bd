//! Crop editor bindings.
//!
//! The page forwards pointer events in the coordinates of the displayed
//! image element and drives paint ticks from `requestAnimationFrame`:
//!
//! ```typescript
//! const box = img.getBoundingClientRect();
//! const editor = new JsCropEditor(bitmap.width, bitmap.height,
//!     box.left, box.top, box.width, box.height, undefined);
//! editor.auto_crop(buffer);
//!
//! el.onpointerdown = (e) => editor.pointer_down(e.clientX, e.clientY);
//! el.onpointermove = (e) => editor.pointer_move(e.clientX, e.clientY);
//! el.onpointerup = (e) => editor.pointer_up(e.timeStamp);
//!
//! const tick = (t: number) => {
//!   if (editor.frame(t)) drawOverlay(editor.rect());
//!   requestAnimationFrame(tick);
//! };
//! ```

use crate::autocrop::planner_for;
use crate::types::{config_from_js, to_js, JsPixelBuffer};
use shelfcam_core::autocrop::AutoCropPlanner;
use shelfcam_core::config::CropConfig;
use shelfcam_core::editor::{CropEditor, EditorMode};
use shelfcam_core::geometry::{DisplayRect, Point, Rect, Size};
use wasm_bindgen::prelude::*;

/// Interactive crop editor for one image.
#[wasm_bindgen]
pub struct JsCropEditor {
    inner: CropEditor,
    planner: AutoCropPlanner,
}

#[wasm_bindgen]
impl JsCropEditor {
    /// Create an editor for an `image_width` x `image_height` image drawn at
    /// (`left`, `top`) with the given display size.
    ///
    /// # Errors
    /// Returns error if `config` is not a valid `CropConfig` object
    #[wasm_bindgen(constructor)]
    pub fn new(
        image_width: u32,
        image_height: u32,
        left: f64,
        top: f64,
        display_width: f64,
        display_height: f64,
        config: JsValue,
    ) -> Result<JsCropEditor, JsValue> {
        let config = config_from_js(config)?;
        Ok(Self::with_config(
            Size::new(image_width, image_height),
            DisplayRect::new(left, top, display_width, display_height),
            &config,
        ))
    }

    /// Update the display geometry after a layout change.
    pub fn set_viewport(&mut self, left: f64, top: f64, width: f64, height: f64) {
        self.inner.set_viewport(DisplayRect::new(left, top, width, height));
    }

    /// Returns the new mode: `"selecting"`, `"moving"` or `"resizing"`.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> String {
        mode_name(self.inner.pointer_down(Point::new(x, y))).to_string()
    }

    /// Queue a move sample for the next frame. Returns false when no
    /// gesture is active.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.pointer_move(Point::new(x, y)).is_some()
    }

    /// End the gesture, applying the last queued sample.
    pub fn pointer_up(&mut self, timestamp_ms: f64) {
        self.inner.pointer_up(timestamp_ms);
    }

    /// Paint tick. Returns true when the rect changed and should be redrawn.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        self.inner.frame(timestamp_ms)
    }

    /// Re-run the planner. Returns the `{ rect, score, fallback }` result,
    /// or `null` when the rect was left unchanged.
    pub fn auto_crop(&mut self, buffer: &JsPixelBuffer) -> Result<JsValue, JsValue> {
        match self.inner.auto_crop(&self.planner, buffer.buffer()) {
            Some(result) => to_js(&result),
            None => Ok(JsValue::NULL),
        }
    }

    /// Replace the rect (clamped to the image).
    pub fn reset(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.inner.reset(Rect::new(x, y, width, height));
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Drop the current gesture and any queued update.
    pub fn cancel(&mut self) {
        self.inner.cancel();
    }

    /// The committed rect as `{ x, y, width, height }` in image pixels, or
    /// `null`.
    pub fn rect(&self) -> Result<JsValue, JsValue> {
        match self.inner.rect() {
            Some(rect) => to_js(&rect),
            None => Ok(JsValue::NULL),
        }
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        mode_name(self.inner.mode()).to_string()
    }

    /// Bumped on every committed rect change.
    #[wasm_bindgen(getter)]
    pub fn revision(&self) -> f64 {
        self.inner.revision() as f64
    }

    #[wasm_bindgen(getter)]
    pub fn has_pending_update(&self) -> bool {
        self.inner.has_pending_update()
    }
}

impl JsCropEditor {
    pub(crate) fn with_config(image: Size, viewport: DisplayRect, config: &CropConfig) -> Self {
        Self {
            inner: CropEditor::new(image, viewport, config.editor.clone()),
            planner: planner_for(config),
        }
    }

    pub(crate) fn current_rect(&self) -> Option<Rect> {
        self.inner.rect()
    }
}

fn mode_name(mode: EditorMode) -> &'static str {
    match mode {
        EditorMode::Idle => "idle",
        EditorMode::Selecting { .. } => "selecting",
        EditorMode::Moving { .. } => "moving",
        EditorMode::Resizing { .. } => "resizing",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfcam_core::buffer::PixelBuffer;

    fn editor() -> JsCropEditor {
        // 800x600 image drawn at half size, offset by (10, 20)
        JsCropEditor::with_config(
            Size::new(800, 600),
            DisplayRect::new(10.0, 20.0, 400.0, 300.0),
            &CropConfig::default(),
        )
    }

    #[test]
    fn test_select_then_coalesced_moves() {
        let mut ed = editor();
        assert_eq!(ed.mode(), "idle");
        assert!(!ed.pointer_move(100.0, 100.0));

        assert_eq!(ed.pointer_down(60.0, 70.0), "selecting");
        assert!(ed.pointer_move(100.0, 100.0));
        assert!(ed.pointer_move(160.0, 170.0));
        assert!(ed.has_pending_update());

        assert!(ed.frame(100.0));
        // (60,70)-(160,170) display is (100,100)-(300,300) in the image
        assert_eq!(ed.current_rect(), Some(Rect::new(100.0, 100.0, 200.0, 200.0)));
        assert!(!ed.frame(105.0));

        ed.pointer_up(110.0);
        assert_eq!(ed.mode(), "idle");
    }

    #[test]
    fn test_move_existing_rect() {
        let mut ed = editor();
        ed.reset(100.0, 100.0, 200.0, 200.0);
        let before = ed.revision();

        // display (110, 120) is image (200, 200), inside the rect
        assert_eq!(ed.pointer_down(110.0, 120.0), "moving");
        ed.pointer_move(135.0, 145.0);
        ed.pointer_up(50.0);

        assert_eq!(ed.current_rect(), Some(Rect::new(150.0, 150.0, 200.0, 200.0)));
        assert!(ed.revision() > before);
    }

    #[test]
    fn test_cancel_drops_pending_update() {
        let mut ed = editor();
        ed.reset(100.0, 100.0, 200.0, 200.0);
        ed.pointer_down(110.0, 120.0);
        ed.pointer_move(200.0, 200.0);
        ed.cancel();

        assert!(!ed.has_pending_update());
        assert!(!ed.frame(1000.0));
        assert_eq!(ed.current_rect(), Some(Rect::new(100.0, 100.0, 200.0, 200.0)));
    }

    #[test]
    fn test_reset_clamps_and_clear() {
        let mut ed = editor();
        ed.reset(700.0, -20.0, 300.0, 10.0);
        assert_eq!(ed.current_rect(), Some(Rect::new(500.0, 0.0, 300.0, 50.0)));
        ed.clear();
        assert_eq!(ed.current_rect(), None);
    }

    #[test]
    fn test_auto_crop_uses_configured_planner() {
        let mut ed = editor();
        let buf = PixelBuffer::new(800, 600, vec![128u8; 800 * 600 * 4]).unwrap();
        let result = ed.inner.auto_crop(&ed.planner, &buf).unwrap();
        assert_eq!(ed.current_rect(), Some(result.rect));
    }
}
