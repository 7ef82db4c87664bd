//! Interactive crop editor.

use log::{debug, warn};

use super::state::{EditorMode, EditorState, PointerEvent};
use super::throttle::{FrameThrottle, Offer};
use crate::autocrop::{AutoCropPlanner, ScoreResult};
use crate::buffer::PixelBuffer;
use crate::config::EditorConfig;
use crate::geometry::{clamp, scale_factors, to_image_space, DisplayRect, Point, Rect, Size};

/// Owns the crop rect and turns pointer input into rect updates.
///
/// Pointer positions arrive in display space. Paint ticks and releases carry
/// a timestamp in milliseconds (e.g. the `requestAnimationFrame` argument).
/// Moves are coalesced by a
/// [`FrameThrottle`]: only the latest sample is applied, at most once per
/// frame budget, when [`CropEditor::frame`] runs.
///
/// No other component writes the rect.
#[derive(Debug, Clone)]
pub struct CropEditor {
    image: Size,
    viewport: DisplayRect,
    config: EditorConfig,
    state: EditorState,
    throttle: FrameThrottle<Point>,
    revision: u64,
}

impl CropEditor {
    /// Create an editor for an image shown in `viewport`.
    pub fn new(image: Size, viewport: DisplayRect, config: EditorConfig) -> Self {
        let throttle = FrameThrottle::new(config.frame_budget_ms);
        Self {
            image,
            viewport,
            config,
            state: EditorState::default(),
            throttle,
            revision: 0,
        }
    }

    /// Create an editor seeded with an initial rect.
    pub fn with_rect(image: Size, viewport: DisplayRect, config: EditorConfig, rect: Rect) -> Self {
        let mut editor = Self::new(image, viewport, config);
        editor.reset(rect);
        editor
    }

    /// The committed rect, if any.
    pub fn rect(&self) -> Option<Rect> {
        self.state.rect
    }

    pub fn mode(&self) -> EditorMode {
        self.state.mode
    }

    pub fn image_size(&self) -> Size {
        self.image
    }

    /// Incremented on every committed rect change; use it as a redraw cue.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Check if a move sample is waiting for the next frame.
    pub fn has_pending_update(&self) -> bool {
        self.throttle.has_pending()
    }

    /// Pointer samples dropped by coalescing or cancellation.
    pub fn dropped_samples(&self) -> u64 {
        self.throttle.dropped()
    }

    /// Update where the image is drawn (after a layout change).
    pub fn set_viewport(&mut self, viewport: DisplayRect) {
        self.viewport = viewport;
    }

    /// Pointer pressed at a display-space position.
    pub fn pointer_down(&mut self, display: Point) -> EditorMode {
        self.throttle.cancel();
        let p = self.to_image(display);
        self.commit(self.state.apply(PointerEvent::Down(p), self.image, self.hit_radius()));
        debug!("editor: pointer down at {:?} -> {:?}", p, self.state.mode);
        self.state.mode
    }

    /// Pointer moved. The sample is applied on a later [`frame`](Self::frame).
    ///
    /// Returns `None` when no gesture is active and the move is ignored.
    pub fn pointer_move(&mut self, display: Point) -> Option<Offer> {
        if self.state.is_idle() {
            return None;
        }
        let p = self.to_image(display);
        Some(self.throttle.offer(p))
    }

    /// Pointer released. The latest pending sample is applied first.
    pub fn pointer_up(&mut self, now_ms: f64) {
        if let Some(p) = self.throttle.flush(now_ms) {
            self.commit(self.state.apply(PointerEvent::Move(p), self.image, self.hit_radius()));
        }
        self.commit(self.state.apply(PointerEvent::Up, self.image, self.hit_radius()));
    }

    /// Paint tick. Applies the pending move sample if the frame budget has
    /// elapsed; returns true when the rect changed.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        match self.throttle.poll(now_ms) {
            Some(p) => {
                self.commit(self.state.apply(PointerEvent::Move(p), self.image, self.hit_radius()))
            }
            None => false,
        }
    }

    /// Re-run the planner on `buffer` and commit its rect.
    ///
    /// On planner failure the committed rect is left untouched and `None`
    /// is returned.
    pub fn auto_crop(&mut self, planner: &AutoCropPlanner, buffer: &PixelBuffer) -> Option<ScoreResult> {
        if buffer.size() != self.image {
            warn!(
                "editor: auto crop buffer {:?} does not match editor image {:?}",
                buffer.size(),
                self.image
            );
            return None;
        }
        match planner.try_plan(buffer) {
            Ok(result) => {
                self.throttle.cancel();
                self.commit(EditorState::idle(Some(result.rect)));
                Some(result)
            }
            Err(e) => {
                warn!("editor: auto crop failed, keeping current rect: {}", e);
                None
            }
        }
    }

    /// Replace the rect (clamped) and end any gesture.
    pub fn reset(&mut self, rect: Rect) {
        self.throttle.cancel();
        self.commit(EditorState::idle(Some(clamp(rect, self.image))));
    }

    /// Remove the rect and end any gesture.
    pub fn clear(&mut self) {
        self.throttle.cancel();
        self.commit(EditorState::idle(None));
    }

    /// Abandon the current gesture and any scheduled update.
    ///
    /// The committed rect is kept; nothing is applied by later frames until
    /// new pointer input arrives.
    pub fn cancel(&mut self) {
        self.throttle.cancel();
        self.state = EditorState::idle(self.state.rect);
    }

    fn commit(&mut self, next: EditorState) -> bool {
        let changed = next.rect != self.state.rect;
        self.state = next;
        if changed {
            self.revision += 1;
        }
        changed
    }

    fn to_image(&self, display: Point) -> Point {
        to_image_space(display, self.viewport, self.image)
    }

    fn hit_radius(&self) -> f64 {
        let (sx, sy) = scale_factors(self.viewport, self.image);
        self.config.handle_radius * sx.max(sy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{satisfies_invariant, Handle};

    fn editor() -> CropEditor {
        // 1000x800 image shown at half size
        CropEditor::with_rect(
            Size::new(1000, 800),
            DisplayRect::new(0.0, 0.0, 500.0, 400.0),
            EditorConfig::default(),
            Rect::new(200.0, 200.0, 400.0, 300.0),
        )
    }

    #[test]
    fn test_five_fast_moves_commit_once_with_last_sample() {
        let mut ed = editor();
        // Grab inside at image (300, 300): offset (100, 100)
        ed.pointer_down(Point::new(150.0, 150.0));
        let start = ed.revision();

        for i in 0..5 {
            ed.pointer_move(Point::new(160.0 + i as f64 * 10.0, 150.0));
        }
        assert_eq!(ed.revision(), start);

        assert!(ed.frame(10.0));
        assert!(!ed.frame(12.0));
        assert_eq!(ed.revision(), start + 1);
        // Last sample: display (200, 150) -> image (400, 300)
        assert_eq!(ed.rect(), Some(Rect::new(300.0, 200.0, 400.0, 300.0)));
        assert_eq!(ed.dropped_samples(), 4);
    }

    #[test]
    fn test_frame_respects_budget() {
        let mut ed = editor();
        ed.pointer_down(Point::new(150.0, 150.0));
        ed.pointer_move(Point::new(160.0, 150.0));
        assert!(ed.frame(16.0));

        ed.pointer_move(Point::new(170.0, 150.0));
        assert!(!ed.frame(25.0));
        assert!(ed.frame(32.0));
    }

    #[test]
    fn test_pointer_up_flushes_latest_sample() {
        let mut ed = editor();
        ed.pointer_down(Point::new(150.0, 150.0));
        ed.pointer_move(Point::new(175.0, 150.0));
        ed.pointer_up(2.0);

        assert_eq!(ed.mode(), EditorMode::Idle);
        assert_eq!(ed.rect(), Some(Rect::new(250.0, 200.0, 400.0, 300.0)));
        assert!(!ed.has_pending_update());
    }

    #[test]
    fn test_cancel_discards_pending_update() {
        let mut ed = editor();
        ed.pointer_down(Point::new(150.0, 150.0));
        ed.pointer_move(Point::new(200.0, 200.0));
        let before = ed.rect();

        ed.cancel();
        assert!(!ed.frame(100.0));
        assert_eq!(ed.rect(), before);
        assert_eq!(ed.mode(), EditorMode::Idle);
    }

    #[test]
    fn test_moves_while_idle_are_ignored() {
        let mut ed = editor();
        assert_eq!(ed.pointer_move(Point::new(10.0, 10.0)), None);
        assert!(!ed.has_pending_update());
        assert!(!ed.frame(100.0));
    }

    #[test]
    fn test_handle_radius_scales_with_display() {
        let mut ed = editor();
        // SE corner at image (600, 500) = display (300, 250). 12 display px
        // becomes 24 image px.
        let mode = ed.pointer_down(Point::new(310.0, 260.0));
        assert_eq!(mode, EditorMode::Resizing { handle: Handle::SE });
    }

    #[test]
    fn test_auto_crop_commits_planner_rect() {
        let w = 200u32;
        let h = 160u32;
        let buf = PixelBuffer::new(w, h, vec![128; (w * h * 4) as usize]).unwrap();
        let mut ed = CropEditor::new(
            buf.size(),
            DisplayRect::natural(buf.size()),
            EditorConfig::default(),
        );
        let planner = AutoCropPlanner::default();

        let first = ed.auto_crop(&planner, &buf).unwrap();
        let second = ed.auto_crop(&planner, &buf).unwrap();
        assert_eq!(first.rect, second.rect);
        assert_eq!(ed.rect(), Some(first.rect));
        assert_eq!(ed.revision(), 1);
    }

    #[test]
    fn test_auto_crop_failure_keeps_rect() {
        let buf = PixelBuffer::new(1, 1, vec![0, 0, 0, 255]).unwrap();
        let mut ed = CropEditor::with_rect(
            Size::new(1, 1),
            DisplayRect::natural(Size::new(1, 1)),
            EditorConfig::default(),
            Rect::new(0.0, 0.0, 1.0, 1.0),
        );
        let before = ed.rect();
        assert!(ed.auto_crop(&AutoCropPlanner::default(), &buf).is_none());
        assert_eq!(ed.rect(), before);
    }

    #[test]
    fn test_auto_crop_rejects_mismatched_buffer() {
        let buf = PixelBuffer::new(10, 10, vec![0; 400]).unwrap();
        let mut ed = editor();
        let before = ed.rect();
        assert!(ed.auto_crop(&AutoCropPlanner::default(), &buf).is_none());
        assert_eq!(ed.rect(), before);
    }

    #[test]
    fn test_reset_and_clear() {
        let mut ed = editor();
        ed.reset(Rect::new(-50.0, -50.0, 10.0, 10.0));
        assert_eq!(ed.rect(), Some(Rect::new(0.0, 0.0, 50.0, 50.0)));
        ed.clear();
        assert_eq!(ed.rect(), None);
    }

    #[test]
    fn test_drag_far_outside_stays_in_bounds() {
        let mut ed = editor();
        ed.pointer_down(Point::new(150.0, 150.0));
        ed.pointer_move(Point::new(-900.0, 2000.0));
        ed.frame(20.0);
        let rect = ed.rect().unwrap();
        assert!(satisfies_invariant(&rect, ed.image_size()));
    }
}
