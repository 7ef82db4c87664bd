//! End-to-end capture, crop and hand-off.
//!
//! A [`CropWorkflow`] ties the pieces together in the order the user sees
//! them: acquire the camera (or fall back to a file), take a photo, adjust
//! the proposed crop, confirm. Confirmation encodes the crop and passes it
//! to an [`OutputSink`]; what the sink does with it is not our concern.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::autocrop::{AutoCropPlanner, ScoreResult};
use crate::buffer::PixelBuffer;
use crate::cancel::CancelToken;
use crate::capture::{CaptureError, CaptureSession, CaptureSource, Facing};
use crate::config::CropConfig;
use crate::editor::CropEditor;
use crate::encode::{EncodeError, EncodedOutput, OutputEncoder};
use crate::geometry::DisplayRect;

/// Opaque handle returned by a sink for a stored image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageRef(pub String);

impl StorageRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// Network or quota trouble; the user may try again
    #[error("Upload failed, please try again: {0}")]
    Transient(String),
    /// The sink refused the image
    #[error("Upload rejected: {0}")]
    Rejected(String),
}

impl SinkError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SinkError::Transient(_))
    }
}

/// Destination for confirmed crops.
#[async_trait::async_trait(?Send)]
pub trait OutputSink {
    async fn store(&mut self, output: EncodedOutput) -> Result<StorageRef, SinkError>;
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("No image has been captured")]
    NoImage,

    #[error("No crop area selected")]
    NoSelection,

    #[error("Cancelled")]
    Cancelled,
}

/// Capture session, crop editor and output encoder for one book cover.
///
/// A workflow is single use: once [`cancel`](Self::cancel) runs, every
/// later operation fails with [`WorkflowError::Cancelled`].
pub struct CropWorkflow<S: CaptureSource> {
    config: CropConfig,
    session: CaptureSession<S>,
    planner: AutoCropPlanner,
    encoder: OutputEncoder,
    editor: Option<CropEditor>,
    cancel: CancelToken,
}

impl<S: CaptureSource> CropWorkflow<S> {
    pub fn new(source: S, config: CropConfig) -> Self {
        let planner = AutoCropPlanner::new(config.scoring.clone(), config.planner.clone());
        let encoder = OutputEncoder::new(config.output.clone());
        Self {
            config,
            session: CaptureSession::new(source),
            planner,
            encoder,
            editor: None,
            cancel: CancelToken::new(),
        }
    }

    pub fn session(&self) -> &CaptureSession<S> {
        &self.session
    }

    pub fn editor(&self) -> Option<&CropEditor> {
        self.editor.as_ref()
    }

    /// Editor for forwarding pointer input and paint ticks.
    pub fn editor_mut(&mut self) -> Option<&mut CropEditor> {
        self.editor.as_mut()
    }

    /// A clone of the token observed by capture and encoding.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Acquire the camera. On failure the session offers the file picker.
    pub async fn start_camera(&mut self, facing: Facing) -> Result<(), WorkflowError> {
        self.ensure_active()?;
        self.session
            .start(facing, &self.cancel)
            .await
            .map_err(capture_error)
    }

    /// Take a photo and open the editor on it, seeded with the planner's rect.
    pub fn take_photo(&mut self, viewport: DisplayRect) -> Result<&CropEditor, WorkflowError> {
        self.ensure_active()?;
        self.session.take_photo().map_err(capture_error)?;
        self.open_editor(viewport)
    }

    /// Load an uploaded file and open the editor on it.
    pub fn load_file(&mut self, bytes: &[u8], viewport: DisplayRect) -> Result<&CropEditor, WorkflowError> {
        self.ensure_active()?;
        self.session.load_file(bytes).map_err(capture_error)?;
        self.open_editor(viewport)
    }

    /// Re-run the planner and replace the rect.
    pub fn auto_crop(&mut self) -> Option<ScoreResult> {
        let buffer = self.session.buffer()?;
        self.editor.as_mut()?.auto_crop(&self.planner, buffer)
    }

    /// Drop the photo and the editor; the camera can be started again.
    pub fn retake(&mut self) {
        if let Some(editor) = self.editor.as_mut() {
            editor.cancel();
        }
        self.editor = None;
        self.session.retake();
    }

    /// Encode the committed crop and hand it to `sink`.
    ///
    /// Sink failures are returned as they are; retrying is up to the caller.
    pub async fn confirm<K>(&mut self, sink: &mut K) -> Result<StorageRef, WorkflowError>
    where
        K: OutputSink + ?Sized,
    {
        self.ensure_active()?;
        let buffer = self.session.buffer().ok_or(WorkflowError::NoImage)?;
        let rect = self
            .editor
            .as_ref()
            .and_then(CropEditor::rect)
            .ok_or(WorkflowError::NoSelection)?;

        let output = self
            .encoder
            .encode_with_cancel(buffer, &rect, &self.cancel)
            .map_err(|e| match e {
                EncodeError::Cancelled => WorkflowError::Cancelled,
                other => WorkflowError::Encode(other),
            })?;
        info!(
            "workflow: encoded {}x{} crop, {} bytes at quality {} after {} attempts",
            output.width,
            output.height,
            output.bytes.len(),
            output.quality,
            output.attempts
        );

        self.ensure_active()?;
        match sink.store(output).await {
            Ok(stored) => {
                info!("workflow: stored as {}", stored.as_str());
                Ok(stored)
            }
            Err(e) => {
                warn!("workflow: sink failed (retryable: {}): {}", e.is_retryable(), e);
                Err(e.into())
            }
        }
    }

    /// Abandon the workflow. The camera is released, the pending editor
    /// update is dropped and no encode will reach a sink.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if let Some(editor) = self.editor.as_mut() {
            editor.cancel();
        }
        self.session.close();
    }

    fn open_editor(&mut self, viewport: DisplayRect) -> Result<&CropEditor, WorkflowError> {
        let buffer: &PixelBuffer = self.session.buffer().ok_or(WorkflowError::NoImage)?;
        let rect = self.planner.plan(buffer);
        let editor = CropEditor::with_rect(buffer.size(), viewport, self.config.editor.clone(), rect);
        Ok(&*self.editor.insert(editor))
    }

    fn ensure_active(&self) -> Result<(), WorkflowError> {
        if self.cancel.is_cancelled() {
            return Err(WorkflowError::Cancelled);
        }
        Ok(())
    }
}

fn capture_error(err: CaptureError) -> WorkflowError {
    match err {
        CaptureError::Cancelled => WorkflowError::Cancelled,
        other => WorkflowError::Capture(other),
    }
}
