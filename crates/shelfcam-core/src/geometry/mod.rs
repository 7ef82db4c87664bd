//! Crop geometry: coordinate mapping, clamping and handle-based resize.
//!
//! Every function here is pure. Display-to-image scale factors are explicit
//! inputs (a [`DisplayRect`] and the natural [`Size`]) so that nothing
//! depends on a measured on-screen element.
//!
//! # Coordinate System
//!
//! - Origin is the top-left corner in both spaces
//! - `scale_x = natural_width / display_width`, likewise for y

mod handle;
mod rect;

pub use handle::{hit_test, resize_from_handle, Handle, Hit};
pub use rect::{DisplayRect, Point, Rect, Size, MIN_CROP_SIZE};

/// Map a pointer position from display space into image-pixel space.
///
/// The display rect origin is subtracted before scaling so letterboxed
/// images map correctly. A zero or non-finite display dimension falls back
/// to a scale of 1 on that axis.
pub fn to_image_space(pointer: Point, display: DisplayRect, natural: Size) -> Point {
    let (scale_x, scale_y) = scale_factors(display, natural);
    Point::new(
        (pointer.x - display.left) * scale_x,
        (pointer.y - display.top) * scale_y,
    )
}

/// Display-to-image scale factors for each axis.
pub fn scale_factors(display: DisplayRect, natural: Size) -> (f64, f64) {
    let axis = |natural: u32, shown: f64| {
        if shown.is_finite() && shown > 0.0 {
            natural as f64 / shown
        } else {
            1.0
        }
    };
    (
        axis(natural.width, display.width),
        axis(natural.height, display.height),
    )
}

/// Clamp a rect into the image bounds.
///
/// Size is clamped to `[MIN_CROP_SIZE, bounds]` first, then the origin to
/// `[0, bounds - size]`. When an image side is shorter than
/// `MIN_CROP_SIZE` the minimum becomes that side. Non-finite components
/// are treated as zero.
pub fn clamp(rect: Rect, bounds: Size) -> Rect {
    let bound_w = bounds.width as f64;
    let bound_h = bounds.height as f64;

    let width = finite(rect.width).clamp(MIN_CROP_SIZE.min(bound_w), bound_w);
    let height = finite(rect.height).clamp(MIN_CROP_SIZE.min(bound_h), bound_h);
    let x = finite(rect.x).clamp(0.0, bound_w - width);
    let y = finite(rect.y).clamp(0.0, bound_h - height);

    Rect::new(x, y, width, height)
}

/// Bounding box of two points, always with non-negative size.
pub fn normalized(a: Point, b: Point) -> Rect {
    let x = a.x.min(b.x);
    let y = a.y.min(b.y);
    Rect::new(x, y, (a.x - b.x).abs(), (a.y - b.y).abs())
}

/// Check the committed-rect invariant against an image size.
pub fn satisfies_invariant(rect: &Rect, bounds: Size) -> bool {
    let min_w = MIN_CROP_SIZE.min(bounds.width as f64);
    let min_h = MIN_CROP_SIZE.min(bounds.height as f64);
    rect.x >= 0.0
        && rect.y >= 0.0
        && rect.right() <= bounds.width as f64 + 1e-9
        && rect.bottom() <= bounds.height as f64 + 1e-9
        && rect.width >= min_w
        && rect.height >= min_h
}

#[inline]
fn finite(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_image_space_scales() {
        // 1000x800 image shown at 500x400
        let display = DisplayRect::new(0.0, 0.0, 500.0, 400.0);
        let p = to_image_space(Point::new(100.0, 50.0), display, Size::new(1000, 800));
        assert_eq!(p, Point::new(200.0, 100.0));
    }

    #[test]
    fn test_to_image_space_letterboxed() {
        // Image drawn with a 20px left offset and independent axis scales
        let display = DisplayRect::new(20.0, 10.0, 200.0, 100.0);
        let p = to_image_space(Point::new(120.0, 60.0), display, Size::new(400, 300));
        assert_eq!(p, Point::new(200.0, 150.0));
    }

    #[test]
    fn test_to_image_space_zero_display() {
        let display = DisplayRect::new(0.0, 0.0, 0.0, 0.0);
        let p = to_image_space(Point::new(7.0, 9.0), display, Size::new(100, 100));
        assert_eq!(p, Point::new(7.0, 9.0));
    }

    #[test]
    fn test_clamp_origin_into_bounds() {
        let r = clamp(Rect::new(-10.0, 90.0, 60.0, 60.0), Size::new(100, 100));
        assert_eq!(r, Rect::new(0.0, 40.0, 60.0, 60.0));
    }

    #[test]
    fn test_clamp_enforces_min_size() {
        let r = clamp(Rect::new(10.0, 10.0, 5.0, 0.0), Size::new(200, 200));
        assert_eq!(r.width, MIN_CROP_SIZE);
        assert_eq!(r.height, MIN_CROP_SIZE);
    }

    #[test]
    fn test_clamp_oversized() {
        let r = clamp(Rect::new(5.0, 5.0, 500.0, 500.0), Size::new(300, 200));
        assert_eq!(r, Rect::new(0.0, 0.0, 300.0, 200.0));
    }

    #[test]
    fn test_clamp_tiny_image() {
        let r = clamp(Rect::new(0.0, 0.0, 10.0, 10.0), Size::new(30, 20));
        assert_eq!(r, Rect::new(0.0, 0.0, 30.0, 20.0));
        assert!(satisfies_invariant(&r, Size::new(30, 20)));
    }

    #[test]
    fn test_clamp_non_finite() {
        let r = clamp(
            Rect::new(f64::NAN, f64::INFINITY, f64::NAN, 80.0),
            Size::new(100, 100),
        );
        assert!(satisfies_invariant(&r, Size::new(100, 100)));
    }

    #[test]
    fn test_normalized() {
        let r = normalized(Point::new(50.0, 80.0), Point::new(10.0, 20.0));
        assert_eq!(r, Rect::new(10.0, 20.0, 40.0, 60.0));
    }
}
