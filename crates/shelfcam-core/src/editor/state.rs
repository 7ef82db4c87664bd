//! Pure editor state machine.
//!
//! Each pointer event maps `(state, event) -> state'` with no side effects,
//! so gestures are testable without any rendering surface. All points are
//! in image space; display mapping happens in the controller.

use serde::{Deserialize, Serialize};

use crate::geometry::{clamp, hit_test, normalized, resize_from_handle, Handle, Hit, Point, Rect, Size};

/// Active gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum EditorMode {
    /// No gesture in progress
    Idle,
    /// Drawing a new selection from `anchor`
    Selecting { anchor: Point },
    /// Dragging the rect; `offset` is pointer minus rect origin at grab time
    Moving { offset: Point },
    /// Dragging one corner
    Resizing { handle: Handle },
}

/// Pointer input in image space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up,
}

/// Editor mode plus the committed rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorState {
    pub mode: EditorMode,
    pub rect: Option<Rect>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::idle(None)
    }
}

impl EditorState {
    pub fn idle(rect: Option<Rect>) -> Self {
        Self {
            mode: EditorMode::Idle,
            rect,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.mode, EditorMode::Idle)
    }

    /// Apply one pointer event.
    ///
    /// `hit_radius` is the handle grab radius in image pixels. Every rect
    /// produced here is clamped into `bounds`.
    pub fn apply(self, event: PointerEvent, bounds: Size, hit_radius: f64) -> EditorState {
        match event {
            PointerEvent::Down(p) => self.pointer_down(p, bounds, hit_radius),
            PointerEvent::Move(p) => self.pointer_move(p, bounds),
            PointerEvent::Up => EditorState::idle(self.rect),
        }
    }

    fn pointer_down(self, p: Point, bounds: Size, hit_radius: f64) -> EditorState {
        let hit = match &self.rect {
            Some(rect) => hit_test(rect, p, hit_radius),
            None => Hit::Outside,
        };
        match (hit, self.rect) {
            (Hit::Handle(handle), Some(_)) => EditorState {
                mode: EditorMode::Resizing { handle },
                rect: self.rect,
            },
            (Hit::Inside, Some(rect)) => EditorState {
                mode: EditorMode::Moving {
                    offset: Point::new(p.x - rect.x, p.y - rect.y),
                },
                rect: self.rect,
            },
            _ => EditorState {
                mode: EditorMode::Selecting { anchor: p },
                rect: Some(clamp(Rect::new(p.x, p.y, 0.0, 0.0), bounds)),
            },
        }
    }

    fn pointer_move(self, p: Point, bounds: Size) -> EditorState {
        let rect = match (self.mode, self.rect) {
            (EditorMode::Selecting { anchor }, _) => clamp(normalized(anchor, p), bounds),
            (EditorMode::Moving { offset }, Some(rect)) => clamp(
                Rect::new(p.x - offset.x, p.y - offset.y, rect.width, rect.height),
                bounds,
            ),
            (EditorMode::Resizing { handle }, Some(rect)) => {
                resize_from_handle(rect, handle, p, bounds)
            }
            _ => return self,
        };
        EditorState {
            mode: self.mode,
            rect: Some(rect),
        }
    }
}
