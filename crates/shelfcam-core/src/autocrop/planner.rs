//! Bounded sliding-window search for the best crop.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::scorer::{score_window, Window};
use crate::buffer::PixelBuffer;
use crate::config::{PlannerConfig, ScoringConfig};
use crate::geometry::{clamp, Rect, Size};

/// Errors from [`AutoCropPlanner::try_plan`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    /// The image is too small to place any scoring window
    #[error("Image too small for auto crop: {width}x{height}")]
    ImageTooSmall { width: u32, height: u32 },
}

/// A scored crop candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub rect: Rect,
    pub score: f64,
    /// True when no window reached the acceptance threshold
    pub fallback: bool,
}

/// Proposes an initial crop rect for a captured image.
///
/// The search evaluates a fixed set of window scales at a coarse step, so
/// the number of evaluations is a small constant regardless of resolution.
/// Placements are visited scale by scale, row by row, and the first
/// strictly-best placement wins, which makes the result deterministic.
#[derive(Debug, Clone, Default)]
pub struct AutoCropPlanner {
    scoring: ScoringConfig,
    planner: PlannerConfig,
}

impl AutoCropPlanner {
    pub fn new(scoring: ScoringConfig, planner: PlannerConfig) -> Self {
        Self { scoring, planner }
    }

    /// Best crop for the buffer. Never fails: images too small to search
    /// get the full-image rect.
    pub fn plan(&self, buffer: &PixelBuffer) -> Rect {
        match self.try_plan(buffer) {
            Ok(result) => result.rect,
            Err(_) => clamp(Rect::full(buffer.size()), buffer.size()),
        }
    }

    /// Best crop with its score.
    pub fn try_plan(&self, buffer: &PixelBuffer) -> Result<ScoreResult, PlanError> {
        let size = buffer.size();
        if buffer.is_empty() || size.width < 2 || size.height < 2 {
            return Err(PlanError::ImageTooSmall {
                width: size.width,
                height: size.height,
            });
        }

        let mut best: Option<(Window, f64)> = None;
        let mut evaluated = 0usize;

        for &scale in &self.planner.scales {
            let Some((win_w, win_h)) = window_size(size, scale) else {
                continue;
            };
            let step_x = step(size.width, self.planner.step_fraction);
            let step_y = step(size.height, self.planner.step_fraction);

            for y in (0..=size.height - win_h).step_by(step_y) {
                for x in (0..=size.width - win_w).step_by(step_x) {
                    let window = Window {
                        x,
                        y,
                        width: win_w,
                        height: win_h,
                    };
                    let s = score_window(buffer, window, &self.scoring);
                    evaluated += 1;
                    if best.map_or(true, |(_, b)| s > b) {
                        best = Some((window, s));
                    }
                }
            }
        }

        if let Some((window, s)) = best {
            if s >= self.planner.min_score {
                debug!(
                    "auto crop: best {:?} score {:.3} after {} windows",
                    window, s, evaluated
                );
                return Ok(ScoreResult {
                    rect: clamp(window.to_rect(), size),
                    score: s,
                    fallback: false,
                });
            }
        }

        let window = fallback_window(size, self.planner.fallback_fraction);
        let s = score_window(buffer, window, &self.scoring);
        debug!(
            "auto crop: no window above {:.2} after {} windows, using centered square",
            self.planner.min_score, evaluated
        );
        Ok(ScoreResult {
            rect: clamp(window.to_rect(), size),
            score: s,
            fallback: true,
        })
    }
}

/// Plan with the default constants.
pub fn plan(buffer: &PixelBuffer) -> Rect {
    AutoCropPlanner::default().plan(buffer)
}

fn window_size(size: Size, scale: f64) -> Option<(u32, u32)> {
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let scale = scale.min(1.0);
    let w = (size.width as f64 * scale).floor() as u32;
    let h = (size.height as f64 * scale).floor() as u32;
    if w == 0 || h == 0 {
        None
    } else {
        Some((w, h))
    }
}

fn step(dimension: u32, fraction: f64) -> usize {
    let s = (dimension as f64 * fraction).floor();
    if s.is_finite() && s >= 1.0 {
        s as usize
    } else {
        1
    }
}

/// Centered square sized at a fraction of the shorter side.
fn fallback_window(size: Size, fraction: f64) -> Window {
    let side = ((size.min_side() as f64 * fraction).floor() as u32).clamp(1, size.min_side());
    Window {
        x: (size.width - side) / 2,
        y: (size.height - side) / 2,
        width: side,
        height: side,
    }
}
