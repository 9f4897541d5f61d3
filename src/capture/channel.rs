use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::backend::CameraBackend;
use super::CaptureError;

/// Clip lifecycle inside the channel. The receiver half of the chunk
/// channel lives here between start and stop; the backend holds the sender.
enum ClipState {
    Idle,
    Recording {
        rx: UnboundedReceiver<Vec<u8>>,
        cancel: CancellationToken,
    },
}

/// Wraps the live camera stream and exposes the two acquisition
/// primitives: a single still frame on demand, or a start/stop bracketed
/// clip.
pub struct MediaCaptureChannel {
    backend: Box<dyn CameraBackend>,
    clip: ClipState,
}

impl MediaCaptureChannel {
    pub fn new(backend: Box<dyn CameraBackend>) -> Self {
        Self {
            backend,
            clip: ClipState::Idle,
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.clip, ClipState::Recording { .. })
    }

    pub fn clip_mime(&self) -> &str {
        self.backend.clip_mime()
    }

    /// Encode the current video frame as PNG. Reads the frame, nothing else.
    pub fn capture_still(&mut self) -> Result<Vec<u8>, CaptureError> {
        let frame = self
            .backend
            .current_frame()
            .ok_or(CaptureError::NoStreamAvailable)?;

        let mut png = Vec::new();
        frame.write_to(&mut png, image::ImageOutputFormat::Png)?;
        Ok(png)
    }

    /// Begin buffering the stream into a clip.
    pub fn start_recording(&mut self) -> Result<(), CaptureError> {
        if self.is_recording() {
            return Err(CaptureError::AlreadyRecording);
        }
        // The stream-readiness gate is the same one capture_still uses.
        if self.backend.current_frame().is_none() {
            return Err(CaptureError::NoStreamAvailable);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        self.backend.begin_clip(tx, cancel.clone())?;
        self.clip = ClipState::Recording { rx, cancel };
        info!("clip recording started");
        Ok(())
    }

    /// Finalize the clip into one binary object, chunks concatenated in
    /// arrival order. Suspends until the backend's final flush has landed:
    /// the sender is dropped at finalize, so draining to channel closure
    /// cannot miss the last chunk.
    pub async fn stop_recording(&mut self) -> Result<Vec<u8>, CaptureError> {
        let state = std::mem::replace(&mut self.clip, ClipState::Idle);
        let mut rx = match state {
            ClipState::Recording { rx, .. } => rx,
            ClipState::Idle => return Err(CaptureError::NotRecording),
        };

        self.backend.end_clip()?;

        let mut clip = Vec::new();
        let mut chunks = 0usize;
        while let Some(chunk) = rx.recv().await {
            clip.extend_from_slice(&chunk);
            chunks += 1;
        }
        info!(chunks, bytes = clip.len(), "clip recording finalized");
        Ok(clip)
    }

    /// Abandon an in-progress clip: the token tells the backend not to
    /// flush, and the buffered chunks are dropped unread.
    pub async fn abort_recording(&mut self) -> Result<(), CaptureError> {
        let state = std::mem::replace(&mut self.clip, ClipState::Idle);
        match state {
            ClipState::Recording { rx, cancel } => {
                cancel.cancel();
                self.backend.end_clip()?;
                drop(rx);
                debug!("clip recording aborted, buffered chunks discarded");
                Ok(())
            }
            ClipState::Idle => Err(CaptureError::NotRecording),
        }
    }
}
