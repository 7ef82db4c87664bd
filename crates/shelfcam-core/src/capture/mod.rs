//! Getting a still image into a [`PixelBuffer`](crate::buffer::PixelBuffer).
//!
//! Two paths lead to a buffer:
//! - a live [`CaptureSource`] driven by a [`CaptureSession`] (acquire,
//!   take a photo, release)
//! - an uploaded file passed to [`decode_image`], offered whenever the
//!   camera cannot be acquired

mod decode;
mod session;
mod source;

pub use decode::{decode_image, read_orientation, DecodeError, Orientation};
pub use session::{CaptureSession, SessionPhase};
pub use source::{AcquireError, CaptureError, CaptureSource, Facing};

#[cfg(test)]
pub(crate) use session::tests::{gray as gray_buffer, FakeCamera};
