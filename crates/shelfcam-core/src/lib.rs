//! Shelfcam Core - book cover capture and cropping
//!
//! This crate provides the capture and crop core of the Shelfcam catalog
//! app: getting a still image of a book cover, proposing a crop, letting
//! the user adjust it, and encoding the result under a size budget.
//!
//! Nothing here touches the DOM. The browser-facing pieces (camera stream,
//! canvas, pointer events) live in `shelfcam-wasm` and talk to this crate
//! through [`capture::CaptureSource`], [`workflow::OutputSink`] and plain
//! display-space coordinates.

pub mod autocrop;
pub mod buffer;
pub mod cancel;
pub mod capture;
pub mod config;
pub mod editor;
pub mod encode;
pub mod geometry;
pub mod workflow;

pub use autocrop::{plan, AutoCropPlanner, ScoreResult};
pub use buffer::PixelBuffer;
pub use cancel::CancelToken;
pub use config::CropConfig;
pub use editor::CropEditor;
pub use encode::{EncodedOutput, OutputEncoder};
pub use geometry::{DisplayRect, Point, Rect, Size};
pub use workflow::{CropWorkflow, OutputSink, StorageRef};
