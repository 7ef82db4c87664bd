//! Corner handles: hit testing and resize math.

use serde::{Deserialize, Serialize};

use super::{clamp, Point, Rect, Size};

/// One of the four corner grab-points of a crop rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handle {
    NW,
    NE,
    SW,
    SE,
}

impl Handle {
    pub const ALL: [Handle; 4] = [Handle::NW, Handle::NE, Handle::SW, Handle::SE];

    /// Position of this corner on a rect.
    pub fn corner(self, rect: &Rect) -> Point {
        match self {
            Handle::NW => Point::new(rect.x, rect.y),
            Handle::NE => Point::new(rect.right(), rect.y),
            Handle::SW => Point::new(rect.x, rect.bottom()),
            Handle::SE => Point::new(rect.right(), rect.bottom()),
        }
    }
}

/// Where a pointer landed relative to a crop rect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Handle(Handle),
    Inside,
    Outside,
}

/// Classify a pointer position against a rect.
///
/// Handles win over the interior: a point within `radius` (per axis) of a
/// corner is a handle hit even if it also lies inside the rect.
pub fn hit_test(rect: &Rect, pointer: Point, radius: f64) -> Hit {
    for handle in Handle::ALL {
        let c = handle.corner(rect);
        if (pointer.x - c.x).abs() <= radius && (pointer.y - c.y).abs() <= radius {
            return Hit::Handle(handle);
        }
    }
    if rect.contains(pointer) {
        Hit::Inside
    } else {
        Hit::Outside
    }
}

/// Resize a rect by dragging one corner to `pointer`.
///
/// The opposite corner stays fixed before clamping; the result is then
/// clamped into `bounds` with [`clamp`].
pub fn resize_from_handle(rect: Rect, handle: Handle, pointer: Point, bounds: Size) -> Rect {
    clamp(resize_unclamped(rect, handle, pointer), bounds)
}

pub(crate) fn resize_unclamped(rect: Rect, handle: Handle, p: Point) -> Rect {
    match handle {
        Handle::NW => Rect::new(
            p.x,
            p.y,
            rect.width + (rect.x - p.x),
            rect.height + (rect.y - p.y),
        ),
        Handle::NE => Rect::new(
            rect.x,
            p.y,
            p.x - rect.x,
            rect.height + (rect.y - p.y),
        ),
        Handle::SW => Rect::new(
            p.x,
            rect.y,
            rect.width + (rect.x - p.x),
            p.y - rect.y,
        ),
        Handle::SE => Rect::new(rect.x, rect.y, p.x - rect.x, p.y - rect.y),
    }
}
