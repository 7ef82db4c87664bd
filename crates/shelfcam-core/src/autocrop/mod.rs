//! Automatic crop proposal.
//!
//! This module provides functionality for:
//! - Scoring how book-like a rectangular region is ([`score`])
//! - Searching a coarse set of windows for the best region ([`AutoCropPlanner`])
//!
//! # Architecture
//!
//! Both parts are synchronous, side-effect free reads of a [`PixelBuffer`].
//! The search is bounded to a small constant number of windows so it fits
//! inside one interactive frame even for full-resolution camera stills.
//!
//! [`PixelBuffer`]: crate::buffer::PixelBuffer

mod planner;
mod scorer;

pub use planner::{plan, AutoCropPlanner, PlanError, ScoreResult};
pub use scorer::{score, score_with};
