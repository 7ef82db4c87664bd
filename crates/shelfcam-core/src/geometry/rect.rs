//! Primitive geometry types shared by the planner, editor and encoder.
//!
//! # Coordinate System
//!
//! - Image space: pixel units of the captured buffer, origin top-left
//! - Display space: CSS pixels of the element showing the image
//! - All coordinates are `f64`; pointer mapping produces fractional values

use serde::{Deserialize, Serialize};

/// Smallest committed crop edge, in image pixels.
pub const MIN_CROP_SIZE: f64 = 50.0;

/// A point in either image or display space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Natural size of an image in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Length of the shorter side.
    pub fn min_side(&self) -> u32 {
        self.width.min(self.height)
    }

    /// Check if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Where the image is drawn on screen, in display space.
///
/// `left`/`top` are the offset of the drawn image inside the element that
/// receives pointer events (non-zero when the image is letterboxed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// A display rect drawing the image at its natural size.
    pub fn natural(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width as f64, size.height as f64)
    }
}

/// Axis-aligned rectangle in image-pixel coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rect covering an entire image.
    pub fn full(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width as f64, size.height as f64)
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Zero-area or containing non-finite components.
    pub fn is_degenerate(&self) -> bool {
        !(self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }

    /// Check if a point lies inside the rect (edges inclusive).
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Check if the rect lies entirely inside an image of the given size.
    pub fn is_within(&self, bounds: Size) -> bool {
        !self.is_degenerate()
            && self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= bounds.width as f64
            && self.bottom() <= bounds.height as f64
    }

    /// Intersection with the image area, or `None` when nothing overlaps.
    pub fn intersect(&self, bounds: Size) -> Option<Rect> {
        if self.is_degenerate() {
            return None;
        }
        let left = self.x.max(0.0);
        let top = self.y.max(0.0);
        let right = self.right().min(bounds.width as f64);
        let bottom = self.bottom().min(bounds.height as f64);
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Area of overlap with another rect.
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }
}
