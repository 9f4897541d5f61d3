use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use super::backend::CameraBackend;
use super::CaptureError;

/// Deterministic stand-in for a hardware camera. Serves a fixed frame (or
/// none, to model a stream that never became ready) and a scripted chunk
/// sequence: everything but the last chunk arrives while the clip is open,
/// the last one is flushed at finalize time, the way real recorders deliver
/// their tail.
pub struct ScriptedCamera {
    frame: Option<image::DynamicImage>,
    chunks: Vec<Vec<u8>>,
    sink: Option<UnboundedSender<Vec<u8>>>,
    cancel: Option<CancellationToken>,
    final_chunk: Option<Vec<u8>>,
}

impl ScriptedCamera {
    /// A ready stream serving a solid frame of the given size.
    pub fn ready(width: u32, height: u32) -> Self {
        Self {
            frame: Some(image::DynamicImage::new_rgb8(width, height)),
            chunks: Vec::new(),
            sink: None,
            cancel: None,
            final_chunk: None,
        }
    }

    /// A stream that never produces a frame (permissions denied, device
    /// missing).
    pub fn offline() -> Self {
        Self {
            frame: None,
            chunks: Vec::new(),
            sink: None,
            cancel: None,
            final_chunk: None,
        }
    }

    /// Script the chunk sequence the next clip will deliver.
    pub fn with_clip(mut self, chunks: Vec<Vec<u8>>) -> Self {
        self.chunks = chunks;
        self
    }
}

impl CameraBackend for ScriptedCamera {
    fn current_frame(&mut self) -> Option<image::DynamicImage> {
        self.frame.clone()
    }

    fn begin_clip(
        &mut self,
        sink: UnboundedSender<Vec<u8>>,
        cancel: CancellationToken,
    ) -> Result<(), CaptureError> {
        let mut chunks = self.chunks.clone();
        self.final_chunk = chunks.pop();

        // Everything but the tail "arrives" during the recording window.
        for chunk in chunks {
            let _ = sink.send(chunk);
        }
        self.sink = Some(sink);
        self.cancel = Some(cancel);
        Ok(())
    }

    fn end_clip(&mut self) -> Result<(), CaptureError> {
        let sink = self.sink.take().ok_or(CaptureError::NotRecording)?;
        let cancelled = self
            .cancel
            .take()
            .map(|c| c.is_cancelled())
            .unwrap_or(false);

        // A cancelled clip is abandoned: the tail is dropped, not flushed.
        let last = self.final_chunk.take();
        if !cancelled {
            if let Some(last) = last {
                let _ = sink.send(last);
            }
        }
        // Dropping the sender closes the chunk channel.
        drop(sink);
        Ok(())
    }
}
