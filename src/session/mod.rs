pub mod event;
pub mod state;

pub use event::SessionEvent;
pub use state::{CaptureMode, CaptureSession, Notice, RecordingState, SubmissionState};
