//! Tunable constants for scoring, planning, editing and output.
//!
//! The defaults reproduce the shipped behaviour. The scoring threshold and
//! weights are empirical; they are kept configurable rather than derived.
//! All structs deserialize with missing fields filled from `Default`, so a
//! partial JSON object from the web app is a valid config.

use serde::{Deserialize, Serialize};

/// Parameters of the region scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Approximate number of samples spanning the shorter rect side
    pub samples_per_side: u32,
    /// Smallest allowed sampling stride
    pub min_stride: u32,
    /// Gradient magnitude above which a sample counts as an edge
    pub edge_threshold: f64,
    /// Multiplier on the edge ratio before capping at 1
    pub edge_gain: f64,
    /// Open interval of mean luma that counts as good contrast
    pub contrast_range: (f64, f64),
    /// Contrast sub-score when the mean falls outside `contrast_range`
    pub contrast_fallback: f64,
    /// Open interval of width/height considered book-like
    pub aspect_range: (f64, f64),
    /// Aspect sub-score when the ratio falls outside `aspect_range`
    pub aspect_fallback: f64,
    pub contrast_weight: f64,
    pub edge_weight: f64,
    pub aspect_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            samples_per_side: 30,
            min_stride: 2,
            edge_threshold: 25.0,
            edge_gain: 8.0,
            contrast_range: (60.0, 180.0),
            contrast_fallback: 0.4,
            aspect_range: (0.6, 1.8),
            aspect_fallback: 0.6,
            contrast_weight: 0.4,
            edge_weight: 0.4,
            aspect_weight: 0.2,
        }
    }
}

/// Parameters of the sliding-window search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Window sizes as fractions of the image width and height
    pub scales: Vec<f64>,
    /// Window step as a fraction of the image dimension
    pub step_fraction: f64,
    /// Best scores below this fall back to the centered square
    pub min_score: f64,
    /// Fallback square side as a fraction of the shorter image side
    pub fallback_fraction: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            scales: vec![0.7, 0.8, 0.9],
            step_fraction: 0.15,
            min_score: 0.3,
            fallback_fraction: 0.8,
        }
    }
}

/// Parameters of the interactive editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Minimum interval between committed pointer-move updates
    pub frame_budget_ms: f64,
    /// Handle grab radius in display pixels
    pub handle_radius: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            frame_budget_ms: 16.0,
            handle_radius: 12.0,
        }
    }
}

/// Parameters of the size-bounded output encoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Budget for the text-safe (base64) representation, in bytes
    pub target_bytes: usize,
    /// Ratio of binary to text-safe size (base64 expands by 4/3)
    pub text_safe_ratio: f64,
    /// First quality tried (percent)
    pub start_quality: u8,
    /// Lowest quality tried (percent)
    pub min_quality: u8,
    /// Quality decrement between attempts (percent)
    pub quality_step: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            target_bytes: 500 * 1024,
            text_safe_ratio: 0.75,
            start_quality: 90,
            min_quality: 10,
            quality_step: 10,
        }
    }
}

impl OutputConfig {
    /// Binary-size threshold checked against each encoded attempt.
    pub fn byte_threshold(&self) -> f64 {
        if self.text_safe_ratio > 0.0 {
            self.target_bytes as f64 / self.text_safe_ratio
        } else {
            self.target_bytes as f64
        }
    }
}

/// Complete configuration of the capture and crop core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    pub scoring: ScoringConfig,
    pub planner: PlannerConfig,
    pub editor: EditorConfig,
    pub output: OutputConfig,
}

impl CropConfig {
    pub fn new() -> Self {
        Self::default()
    }
}
