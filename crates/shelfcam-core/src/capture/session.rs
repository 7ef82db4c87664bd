//! Capture session lifecycle.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::decode::decode_image;
use super::source::{AcquireError, CaptureError, CaptureSource, Facing};
use crate::buffer::PixelBuffer;
use crate::cancel::CancelToken;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    /// A stream is held and frames can be taken
    Live,
    /// A buffer is held; the stream has been released
    Captured,
    /// Acquisition failed; only file upload is offered
    FilePicker,
    Closed,
}

/// Drives a [`CaptureSource`] from acquisition to a single captured frame.
///
/// At most one stream is held at a time. It is released after a photo is
/// taken, on close, and when the session is dropped.
pub struct CaptureSession<S: CaptureSource> {
    source: S,
    stream: Option<S::Stream>,
    buffer: Option<PixelBuffer>,
    phase: SessionPhase,
    last_error: Option<AcquireError>,
}

impl<S: CaptureSource> CaptureSession<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            stream: None,
            buffer: None,
            phase: SessionPhase::Idle,
            last_error: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The captured or loaded image.
    pub fn buffer(&self) -> Option<&PixelBuffer> {
        self.buffer.as_ref()
    }

    /// The most recent acquisition failure, shown next to the file picker.
    pub fn last_error(&self) -> Option<AcquireError> {
        self.last_error
    }

    pub fn is_live(&self) -> bool {
        self.stream.is_some()
    }

    /// Acquire a live stream.
    ///
    /// Any acquisition failure moves the session to
    /// [`SessionPhase::FilePicker`]. If `cancel` fires while acquisition is
    /// pending, the stream is released as soon as it arrives and the
    /// session closes.
    pub async fn start(&mut self, facing: Facing, cancel: &CancelToken) -> Result<(), CaptureError> {
        if self.phase == SessionPhase::Closed {
            return Err(CaptureError::Closed);
        }
        self.release_stream();
        self.buffer = None;
        self.last_error = None;

        let acquired = self.source.acquire(facing).await;

        if cancel.is_cancelled() {
            if let Ok(stream) = acquired {
                self.source.release(stream);
            }
            info!("capture: cancelled during acquisition");
            self.phase = SessionPhase::Closed;
            return Err(CaptureError::Cancelled);
        }

        match acquired {
            Ok(stream) => {
                self.stream = Some(stream);
                self.phase = SessionPhase::Live;
                info!("capture: live ({:?} camera)", facing);
                Ok(())
            }
            Err(err) => {
                warn!("capture: {}; {}", err, err.remediation_hint());
                self.last_error = Some(err);
                self.phase = SessionPhase::FilePicker;
                Err(err.into())
            }
        }
    }

    /// Grab the current frame and release the stream.
    pub fn take_photo(&mut self) -> Result<&PixelBuffer, CaptureError> {
        if self.phase == SessionPhase::Closed {
            return Err(CaptureError::Closed);
        }
        let stream = self.stream.take().ok_or(CaptureError::NoStream)?;
        let frame = self.source.grab_frame(&stream);
        self.source.release(stream);

        match frame {
            Ok(buffer) => {
                info!("capture: took {}x{} photo", buffer.width(), buffer.height());
                self.phase = SessionPhase::Captured;
                Ok(&*self.buffer.insert(buffer))
            }
            Err(err) => {
                self.phase = SessionPhase::Idle;
                Err(err)
            }
        }
    }

    /// Use an uploaded file instead of the camera.
    pub fn load_file(&mut self, bytes: &[u8]) -> Result<&PixelBuffer, CaptureError> {
        if self.phase == SessionPhase::Closed {
            return Err(CaptureError::Closed);
        }
        let buffer = decode_image(bytes)?;
        self.release_stream();
        info!("capture: loaded {}x{} file", buffer.width(), buffer.height());
        self.phase = SessionPhase::Captured;
        Ok(&*self.buffer.insert(buffer))
    }

    /// Discard the captured image so a new one can be taken.
    pub fn retake(&mut self) {
        if self.phase == SessionPhase::Closed {
            return;
        }
        self.release_stream();
        self.buffer = None;
        self.phase = SessionPhase::Idle;
    }

    /// Release everything. Later calls fail with [`CaptureError::Closed`].
    pub fn close(&mut self) {
        self.release_stream();
        self.buffer = None;
        if self.phase != SessionPhase::Closed {
            info!("capture: closed");
        }
        self.phase = SessionPhase::Closed;
    }

    fn release_stream(&mut self) {
        if let Some(stream) = self.stream.take() {
            self.source.release(stream);
        }
    }
}

impl<S: CaptureSource> Drop for CaptureSession<S> {
    fn drop(&mut self) {
        self.release_stream();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Camera double. Counts releases so leaks show up as a mismatch
    /// between acquisitions and releases.
    pub(crate) struct FakeCamera {
        pub outcome: Result<(), AcquireError>,
        pub frame: PixelBuffer,
        pub acquired: Rc<Cell<u32>>,
        pub released: Rc<Cell<u32>>,
        /// Fired from inside `acquire`, as if the user closed the editor
        /// while the permission prompt was open.
        pub cancel_during_acquire: Option<CancelToken>,
    }

    impl FakeCamera {
        pub(crate) fn with_frame(frame: PixelBuffer) -> Self {
            Self {
                outcome: Ok(()),
                frame,
                acquired: Rc::default(),
                released: Rc::default(),
                cancel_during_acquire: None,
            }
        }

        pub(crate) fn failing(err: AcquireError) -> Self {
            let mut camera = Self::with_frame(gray(4, 4));
            camera.outcome = Err(err);
            camera
        }
    }

    #[async_trait(?Send)]
    impl CaptureSource for FakeCamera {
        type Stream = u32;

        async fn acquire(&mut self, _facing: Facing) -> Result<u32, AcquireError> {
            tokio::task::yield_now().await;
            if let Some(token) = &self.cancel_during_acquire {
                token.cancel();
            }
            self.outcome?;
            self.acquired.set(self.acquired.get() + 1);
            Ok(self.acquired.get())
        }

        fn grab_frame(&mut self, _stream: &u32) -> Result<PixelBuffer, CaptureError> {
            Ok(self.frame.clone())
        }

        fn release(&mut self, _stream: u32) {
            self.released.set(self.released.get() + 1);
        }
    }

    pub(crate) fn gray(width: u32, height: u32) -> PixelBuffer {
        PixelBuffer::new(width, height, vec![128; (width * height * 4) as usize]).unwrap()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_take_photo_releases_stream() {
        let camera = FakeCamera::with_frame(gray(8, 6));
        let released = camera.released.clone();
        let mut session = CaptureSession::new(camera);

        session.start(Facing::Environment, &CancelToken::new()).await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Live);
        assert!(session.is_live());

        let buffer = session.take_photo().unwrap();
        assert_eq!((buffer.width(), buffer.height()), (8, 6));
        assert_eq!(session.phase(), SessionPhase::Captured);
        assert!(!session.is_live());
        assert_eq!(released.get(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_acquire_failure_falls_back_to_file_picker() {
        let mut session = CaptureSession::new(FakeCamera::failing(AcquireError::PermissionDenied));

        let err = session
            .start(Facing::Environment, &CancelToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::Acquire(AcquireError::PermissionDenied)));
        assert_eq!(session.phase(), SessionPhase::FilePicker);
        assert_eq!(session.last_error(), Some(AcquireError::PermissionDenied));

        let png = {
            use image::ImageEncoder;
            let mut out = Vec::new();
            image::codecs::png::PngEncoder::new(&mut out)
                .write_image(&[255u8; 2 * 2 * 3], 2, 2, image::ExtendedColorType::Rgb8)
                .unwrap();
            out
        };
        session.load_file(&png).unwrap();
        assert_eq!(session.phase(), SessionPhase::Captured);
        assert_eq!(session.buffer().unwrap().pixel(1, 1), [255, 255, 255, 255]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_cancel_during_acquire_releases_stream() {
        let cancel = CancelToken::new();
        let mut camera = FakeCamera::with_frame(gray(4, 4));
        camera.cancel_during_acquire = Some(cancel.clone());
        let acquired = camera.acquired.clone();
        let released = camera.released.clone();
        let mut session = CaptureSession::new(camera);

        let err = session.start(Facing::User, &cancel).await.unwrap_err();
        assert!(matches!(err, CaptureError::Cancelled));
        assert_eq!(session.phase(), SessionPhase::Closed);
        assert!(!session.is_live());
        assert_eq!(acquired.get(), 1);
        assert_eq!(released.get(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_drop_releases_live_stream() {
        let camera = FakeCamera::with_frame(gray(4, 4));
        let released = camera.released.clone();
        {
            let mut session = CaptureSession::new(camera);
            session.start(Facing::Environment, &CancelToken::new()).await.unwrap();
            assert_eq!(released.get(), 0);
        }
        assert_eq!(released.get(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_close_is_final() {
        let camera = FakeCamera::with_frame(gray(4, 4));
        let released = camera.released.clone();
        let mut session = CaptureSession::new(camera);
        session.start(Facing::Environment, &CancelToken::new()).await.unwrap();

        session.close();
        session.close();
        assert_eq!(released.get(), 1);
        assert_eq!(session.phase(), SessionPhase::Closed);
        assert!(matches!(session.take_photo(), Err(CaptureError::Closed)));
        assert!(matches!(
            session.start(Facing::Environment, &CancelToken::new()).await,
            Err(CaptureError::Closed)
        ));
        session.retake();
        assert_eq!(session.phase(), SessionPhase::Closed);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_retake_returns_to_idle() {
        let mut session = CaptureSession::new(FakeCamera::with_frame(gray(4, 4)));
        session.start(Facing::Environment, &CancelToken::new()).await.unwrap();
        session.take_photo().unwrap();

        session.retake();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.buffer().is_none());

        session.start(Facing::Environment, &CancelToken::new()).await.unwrap();
        assert_eq!(session.phase(), SessionPhase::Live);
    }

    #[test]
    fn test_take_photo_without_stream() {
        let mut session = CaptureSession::new(FakeCamera::with_frame(gray(4, 4)));
        assert!(matches!(session.take_photo(), Err(CaptureError::NoStream)));
    }

    #[test]
    fn test_bad_upload_keeps_phase() {
        let mut session = CaptureSession::new(FakeCamera::with_frame(gray(4, 4)));
        assert!(matches!(
            session.load_file(b"not an image"),
            Err(CaptureError::Decode(_))
        ));
        assert_eq!(session.phase(), SessionPhase::Idle);
    }
}
