//! Interactive crop editing.
//!
//! - [`state`]: the pure `(state, event) -> state'` machine
//! - [`FrameThrottle`]: one committed update per frame budget, latest sample wins
//! - [`CropEditor`]: owns the rect, maps display input and schedules updates
//!
//! # Modes
//!
//! ```text
//! Idle --down on handle--> Resizing(handle)
//! Idle --down inside-----> Moving(offset)
//! Idle --down outside----> Selecting(anchor)
//! any  --up--------------> Idle (rect kept)
//! ```

mod controller;
pub mod state;
mod throttle;

pub use controller::CropEditor;
pub use state::{EditorMode, EditorState, PointerEvent};
pub use throttle::{FrameThrottle, Offer};
