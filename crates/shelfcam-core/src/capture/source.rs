//! Live capture source abstraction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::decode::DecodeError;
use crate::buffer::{BufferError, PixelBuffer};

/// Which camera to prefer when several are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    /// Front camera
    User,
    /// Rear camera, the natural choice for photographing a book cover
    #[default]
    Environment,
}

/// Why a live source could not be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquireError {
    #[error("No camera found")]
    NotFound,
    #[error("Camera permission denied")]
    PermissionDenied,
    #[error("Camera is in use by another application")]
    Busy,
    #[error("Camera does not support the requested settings")]
    Unsupported,
}

impl AcquireError {
    /// What the user can do about it. The file picker is always offered.
    pub fn remediation_hint(&self) -> &'static str {
        match self {
            AcquireError::NotFound => {
                "Connect a camera or upload a photo of the book cover instead."
            }
            AcquireError::PermissionDenied => {
                "Allow camera access in the browser's site settings, or upload a photo instead."
            }
            AcquireError::Busy => {
                "Close other apps or tabs using the camera and try again, or upload a photo instead."
            }
            AcquireError::Unsupported => {
                "This camera or browser cannot provide a suitable stream. Upload a photo instead."
            }
        }
    }

    /// Map a browser `DOMException` name from `getUserMedia`.
    ///
    /// Unknown names map to `Unsupported`.
    pub fn from_dom_exception_name(name: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" | "SecurityError" => {
                AcquireError::PermissionDenied
            }
            "NotFoundError" | "DevicesNotFoundError" => AcquireError::NotFound,
            "NotReadableError" | "TrackStartError" | "AbortError" => AcquireError::Busy,
            _ => AcquireError::Unsupported,
        }
    }

    /// Stable identifier for the UI layer.
    pub fn kind(&self) -> &'static str {
        match self {
            AcquireError::NotFound => "not_found",
            AcquireError::PermissionDenied => "permission_denied",
            AcquireError::Busy => "busy",
            AcquireError::Unsupported => "unsupported",
        }
    }
}

/// Errors from the capture session.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error(transparent)]
    Acquire(#[from] AcquireError),

    /// `take_photo` without a live stream
    #[error("No live stream to capture from")]
    NoStream,

    /// The source could not deliver a frame
    #[error("Frame unavailable: {0}")]
    FrameUnavailable(String),

    #[error("Could not read image file: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Buffer(#[from] BufferError),

    /// The user cancelled while the source was being acquired
    #[error("Capture cancelled")]
    Cancelled,

    /// The session was closed
    #[error("Capture session is closed")]
    Closed,
}

/// A live camera (or any repeatedly sampled frame source).
///
/// Acquisition is the only operation that waits on the outside world
/// (hardware availability, user permission). Futures are not `Send`
/// because the browser implementation holds JS handles.
#[async_trait::async_trait(?Send)]
pub trait CaptureSource {
    /// Handle to an acquired stream.
    type Stream;

    /// Acquire a stream, preferring the given camera.
    async fn acquire(&mut self, facing: Facing) -> Result<Self::Stream, AcquireError>;

    /// Sample the current frame of a live stream.
    fn grab_frame(&mut self, stream: &Self::Stream) -> Result<PixelBuffer, CaptureError>;

    /// Stop the stream and free the device.
    fn release(&mut self, stream: Self::Stream);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_exception_mapping() {
        assert_eq!(
            AcquireError::from_dom_exception_name("NotAllowedError"),
            AcquireError::PermissionDenied
        );
        assert_eq!(
            AcquireError::from_dom_exception_name("NotFoundError"),
            AcquireError::NotFound
        );
        assert_eq!(
            AcquireError::from_dom_exception_name("NotReadableError"),
            AcquireError::Busy
        );
        assert_eq!(
            AcquireError::from_dom_exception_name("OverconstrainedError"),
            AcquireError::Unsupported
        );
        assert_eq!(
            AcquireError::from_dom_exception_name("SomethingNew"),
            AcquireError::Unsupported
        );
    }

    #[test]
    fn test_every_error_offers_upload() {
        for e in [
            AcquireError::NotFound,
            AcquireError::PermissionDenied,
            AcquireError::Busy,
            AcquireError::Unsupported,
        ] {
            assert!(e.remediation_hint().contains("pload"), "{:?}", e);
        }
    }

    #[test]
    fn test_error_display() {
        assert_eq!(AcquireError::Busy.to_string(), "Camera is in use by another application");
        let err: CaptureError = AcquireError::NotFound.into();
        assert_eq!(err.to_string(), "No camera found");
    }

    #[test]
    fn test_default_facing_is_rear() {
        assert_eq!(Facing::default(), Facing::Environment);
    }
}
