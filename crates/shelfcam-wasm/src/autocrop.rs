//! Auto-crop bindings.

use crate::types::{config_from_js, to_js, JsPixelBuffer};
use shelfcam_core::autocrop::{score_with, AutoCropPlanner, ScoreResult};
use shelfcam_core::buffer::PixelBuffer;
use shelfcam_core::config::{CropConfig, ScoringConfig};
use shelfcam_core::geometry::Rect;
use wasm_bindgen::prelude::*;

/// Propose a crop for a captured image.
///
/// Returns `{ rect: { x, y, width, height }, score, fallback }`. Images too
/// small to search get the full-image rect with `fallback: true`.
///
/// # Arguments
/// * `buffer` - The captured image
/// * `config` - Optional `CropConfig` object; missing fields use defaults
#[wasm_bindgen]
pub fn plan_crop(buffer: &JsPixelBuffer, config: JsValue) -> Result<JsValue, JsValue> {
    let config = config_from_js(config)?;
    to_js(&plan_result(buffer.buffer(), &config))
}

/// Book-likeness score in `[0, 1]` of one region. Degenerate or
/// out-of-bounds regions score 0.
#[wasm_bindgen]
pub fn score_region(buffer: &JsPixelBuffer, x: f64, y: f64, width: f64, height: f64) -> f64 {
    score_with(buffer.buffer(), &Rect::new(x, y, width, height), &ScoringConfig::default())
}

pub(crate) fn planner_for(config: &CropConfig) -> AutoCropPlanner {
    AutoCropPlanner::new(config.scoring.clone(), config.planner.clone())
}

pub(crate) fn plan_result(buffer: &PixelBuffer, config: &CropConfig) -> ScoreResult {
    let planner = planner_for(config);
    planner.try_plan(buffer).unwrap_or_else(|e| {
        log::info!("plan_crop: {}, using the full image", e);
        ScoreResult {
            rect: planner.plan(buffer),
            score: 0.0,
            fallback: true,
        }
    })
}
