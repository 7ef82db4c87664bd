//! Region scoring: how "object-like" a rectangle of the image is.
//!
//! The score blends three sub-scores:
//!
//! - **contrast**: mean sampled luma inside a mid-tone band
//! - **edges**: share of sampled pixels with a strong local gradient
//! - **aspect**: width/height close to a book cover
//!
//! Sampling is strided so roughly `samples_per_side` samples span the
//! shorter rect side, which keeps the cost independent of resolution.

use crate::buffer::PixelBuffer;
use crate::config::ScoringConfig;
use crate::geometry::Rect;

/// Integer pixel window inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Window {
    /// Convert a rect lying inside the buffer to whole pixels.
    ///
    /// Returns `None` for degenerate or out-of-bounds rects.
    pub fn from_rect(rect: &Rect, buffer: &PixelBuffer) -> Option<Self> {
        if buffer.is_empty() || !rect.is_within(buffer.size()) {
            return None;
        }
        let x = rect.x.floor() as u32;
        let y = rect.y.floor() as u32;
        let width = rect.width.floor() as u32;
        let height = rect.height.floor() as u32;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            x,
            y,
            width: width.min(buffer.width() - x),
            height: height.min(buffer.height() - y),
        })
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(
            self.x as f64,
            self.y as f64,
            self.width as f64,
            self.height as f64,
        )
    }
}

/// Raw statistics gathered over one window.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct RegionStats {
    pub samples: u32,
    pub edges: u32,
    pub mean_luma: f64,
}

/// Score a rect of the buffer with the default constants.
///
/// Returns a value in `[0, 1]`; degenerate or out-of-bounds rects score 0.
pub fn score(buffer: &PixelBuffer, rect: &Rect) -> f64 {
    score_with(buffer, rect, &ScoringConfig::default())
}

/// Score a rect of the buffer with explicit constants.
pub fn score_with(buffer: &PixelBuffer, rect: &Rect, config: &ScoringConfig) -> f64 {
    match Window::from_rect(rect, buffer) {
        Some(window) => score_window(buffer, window, config),
        None => 0.0,
    }
}

pub(crate) fn score_window(buffer: &PixelBuffer, window: Window, config: &ScoringConfig) -> f64 {
    let stats = collect_stats(buffer, window, config);
    if stats.samples == 0 {
        return 0.0;
    }

    let (lo, hi) = config.contrast_range;
    let contrast = if stats.mean_luma > lo && stats.mean_luma < hi {
        1.0
    } else {
        config.contrast_fallback
    };

    let edge_ratio = stats.edges as f64 / stats.samples as f64;
    let edges = (edge_ratio * config.edge_gain).min(1.0);

    let ratio = window.width as f64 / window.height as f64;
    let (lo, hi) = config.aspect_range;
    let aspect = if ratio > lo && ratio < hi {
        1.0
    } else {
        config.aspect_fallback
    };

    let total = config.contrast_weight * contrast
        + config.edge_weight * edges
        + config.aspect_weight * aspect;
    total.clamp(0.0, 1.0)
}

/// Sampling stride for a window.
pub(crate) fn stride_for(window: Window, config: &ScoringConfig) -> u32 {
    let per_side = config.samples_per_side.max(1);
    (window.width.min(window.height) / per_side).max(config.min_stride.max(1))
}

/// Gather luma and edge statistics over a window.
///
/// Samples on the window's first row or column contribute to the mean but
/// are skipped for edge counting, since their left/top neighbour lies
/// outside the window.
pub(crate) fn collect_stats(
    buffer: &PixelBuffer,
    window: Window,
    config: &ScoringConfig,
) -> RegionStats {
    let stride = stride_for(window, config) as usize;
    let x_end = window.x + window.width;
    let y_end = window.y + window.height;

    let mut samples = 0u32;
    let mut edges = 0u32;
    let mut luma_sum = 0.0f64;

    for y in (window.y..y_end).step_by(stride) {
        for x in (window.x..x_end).step_by(stride) {
            let l = buffer.luma(x, y);
            luma_sum += l;
            samples += 1;

            if x > window.x && y > window.y {
                let gradient = (l - buffer.luma(x - 1, y)).abs() + (l - buffer.luma(x, y - 1)).abs();
                if gradient > config.edge_threshold {
                    edges += 1;
                }
            }
        }
    }

    RegionStats {
        samples,
        edges,
        mean_luma: if samples > 0 {
            luma_sum / samples as f64
        } else {
            0.0
        },
    }
}
