use std::fmt;

use tracing::{debug, info, warn};

use super::event::SessionEvent;
use crate::capture::{CaptureError, MediaCaptureChannel};
use crate::media::{normalize, Artifact, PickedFile};
use crate::services::analysis::{AnalysisDispatcher, AnalysisResult};

const SNAPSHOT_MIME: &str = "image/png";

/// Which acquisition path is live. Exactly one at a time; switching is a
/// full reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Upload,
    Snapshot,
    Record,
}

/// Clip lifecycle as the session sees it. Only meaningful in Record mode;
/// the buffered chunks themselves live in the capture channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    Idle,
    Recording,
}

/// Lifecycle of the one observable submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionState {
    NotSubmitted,
    InFlight,
    Succeeded(AnalysisResult),
    Failed(String),
}

/// User-visible, non-blocking message. Recoverable faults surface as one of
/// these instead of propagating; the session stays interactive afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    CameraNotReady,
    NothingToAnalyze,
    /// The operation belongs to a different mode.
    WrongMode(CaptureMode),
    RecorderFault(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::CameraNotReady => write!(f, "Camera stream is not ready yet."),
            Notice::NothingToAnalyze => write!(f, "Please select a file or take a snapshot."),
            Notice::WrongMode(mode) => write!(f, "Switch to {:?} mode first.", mode),
            Notice::RecorderFault(msg) => write!(f, "Recorder error: {}", msg),
        }
    }
}

/// The capture-session state machine. Owns the current mode, the pending
/// artifact, and the lifecycle of the in-flight submission; nothing else
/// mutates any of them.
///
/// Every artifact replacement and every mode switch bumps `generation`.
/// `analyze` captures the generation at dispatch time, and a settle event
/// is applied only if its token still matches: a slow response to a state
/// the user already abandoned is discarded, never applied.
pub struct CaptureSession {
    mode: CaptureMode,
    artifact: Option<Artifact>,
    recording: RecordingState,
    submission: SubmissionState,
    generation: u64,
    channel: MediaCaptureChannel,
    dispatcher: AnalysisDispatcher,
}

impl CaptureSession {
    pub fn new(channel: MediaCaptureChannel, dispatcher: AnalysisDispatcher) -> Self {
        Self {
            mode: CaptureMode::Upload,
            artifact: None,
            recording: RecordingState::Idle,
            submission: SubmissionState::NotSubmitted,
            generation: 0,
            channel,
            dispatcher,
        }
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    pub fn recording(&self) -> RecordingState {
        self.recording
    }

    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Full reset: an in-progress clip is abandoned (not finalized), the
    /// pending artifact and any displayed result are dropped, and the
    /// generation moves on so a still-in-flight response cannot land.
    pub async fn set_mode(&mut self, next: CaptureMode) {
        if self.recording == RecordingState::Recording {
            if let Err(err) = self.channel.abort_recording().await {
                warn!("recorder abort on mode switch failed: {}", err);
            }
            self.recording = RecordingState::Idle;
        }

        self.mode = next;
        self.artifact = None;
        self.submission = SubmissionState::NotSubmitted;
        self.generation += 1;
        info!(mode = ?self.mode, generation = self.generation, "mode switched, session reset");
    }

    /// Upload mode: normalize a picked file into the pending artifact.
    pub fn select_file(&mut self, file: PickedFile) -> Option<Notice> {
        if self.mode != CaptureMode::Upload {
            return Some(Notice::WrongMode(CaptureMode::Upload));
        }
        let artifact = normalize::from_file(file);
        self.install_artifact(artifact);
        None
    }

    /// Snapshot mode: grab the current frame. A not-ready stream is a
    /// notice, not a fault; state is otherwise untouched.
    pub fn capture_snapshot(&mut self) -> Option<Notice> {
        if self.mode != CaptureMode::Snapshot {
            return Some(Notice::WrongMode(CaptureMode::Snapshot));
        }

        match self.channel.capture_still() {
            Ok(png) => {
                let artifact = normalize::from_raw(png, SNAPSHOT_MIME);
                self.install_artifact(artifact);
                None
            }
            Err(CaptureError::NoStreamAvailable) => Some(Notice::CameraNotReady),
            Err(err) => Some(Notice::RecorderFault(err.to_string())),
        }
    }

    /// Record mode: Idle starts a clip, Recording finalizes it into the
    /// pending artifact. The stop path suspends until the recorder's final
    /// chunk has been flushed.
    pub async fn toggle_recording(&mut self) -> Option<Notice> {
        if self.mode != CaptureMode::Record {
            return Some(Notice::WrongMode(CaptureMode::Record));
        }

        match self.recording {
            RecordingState::Idle => match self.channel.start_recording() {
                Ok(()) => {
                    self.recording = RecordingState::Recording;
                    None
                }
                Err(CaptureError::NoStreamAvailable) => Some(Notice::CameraNotReady),
                Err(err) => Some(Notice::RecorderFault(err.to_string())),
            },
            RecordingState::Recording => {
                self.recording = RecordingState::Idle;
                match self.channel.stop_recording().await {
                    Ok(clip) => {
                        let mime = self.channel.clip_mime().to_string();
                        let artifact = normalize::from_raw(clip, &mime);
                        self.install_artifact(artifact);
                        None
                    }
                    Err(err) => Some(Notice::RecorderFault(err.to_string())),
                }
            }
        }
    }

    /// Dispatch the pending artifact for analysis. Without an artifact this
    /// is a no-op notice: no network call, submission untouched.
    pub fn analyze(&mut self) -> Option<Notice> {
        let artifact = match &self.artifact {
            Some(artifact) => artifact.clone(),
            None => return Some(Notice::NothingToAnalyze),
        };

        self.submission = SubmissionState::InFlight;
        info!(
            generation = self.generation,
            file = %artifact.filename,
            "submitting pending artifact for analysis"
        );
        self.dispatcher.dispatch(artifact, self.generation);
        None
    }

    /// Apply an async completion. A settle event whose token no longer
    /// matches belongs to a state the user already moved past.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::AnalysisSettled { generation, outcome } => {
                if generation != self.generation {
                    debug!(
                        stale = generation,
                        current = self.generation,
                        "discarding stale analysis response"
                    );
                    return;
                }
                self.submission = match outcome {
                    Ok(result) => SubmissionState::Succeeded(result),
                    Err(message) => SubmissionState::Failed(message),
                };
            }
        }
    }

    /// The single artifact-replacement point. Bumping the generation here
    /// is what invalidates any response still in flight for the previous
    /// artifact.
    fn install_artifact(&mut self, artifact: Artifact) {
        self.generation += 1;
        info!(
            file = %artifact.filename,
            kind = ?artifact.kind,
            bytes = artifact.len(),
            generation = self.generation,
            "pending artifact replaced"
        );
        self.artifact = Some(artifact);
        self.submission = SubmissionState::NotSubmitted;
    }
}
