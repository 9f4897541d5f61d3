use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use super::CaptureError;

/// Seam between the capture channel and whatever actually owns the camera
/// stream. The channel never touches stream internals, only this contract.
///
/// Clip chunks are pushed into the `sink` in arrival order; the backend
/// drops its sender when the clip is finalized, which closes the channel and
/// lets the consumer drain every buffered chunk without losing the final
/// flush.
pub trait CameraBackend: Send {
    /// Latest decoded frame, or `None` while the stream is not ready
    /// (permissions pending, device warming up).
    fn current_frame(&mut self) -> Option<image::DynamicImage>;

    /// Begin streaming container chunks into `sink`. The cancellation token
    /// is observed at finalize time: a cancelled clip is abandoned, not
    /// flushed.
    fn begin_clip(
        &mut self,
        sink: UnboundedSender<Vec<u8>>,
        cancel: CancellationToken,
    ) -> Result<(), CaptureError>;

    /// Finalize the clip: flush the last buffered chunk (unless cancelled)
    /// and drop the sink.
    fn end_clip(&mut self) -> Result<(), CaptureError>;

    /// Container MIME of recorded clips.
    fn clip_mime(&self) -> &str {
        "video/webm"
    }
}
