pub mod backend;
pub mod channel;
pub mod scripted;

pub use backend::CameraBackend;
pub use channel::MediaCaptureChannel;
pub use scripted::ScriptedCamera;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    /// The camera stream has not produced a frame yet.
    #[error("camera stream is not available yet")]
    NoStreamAvailable,

    /// start was called while a clip is already buffering.
    #[error("a recording is already in progress")]
    AlreadyRecording,

    /// stop/abort was called with no clip in progress.
    #[error("no recording is in progress")]
    NotRecording,

    #[error("frame encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}
