use tokio::sync::mpsc;

use vertero::capture::{MediaCaptureChannel, ScriptedCamera};
use vertero::media::{MediaKind, PickedFile};
use vertero::present;
use vertero::services::analysis::{decode_response, AnalysisDispatcher, AnalysisResult, AnalysisService};
use vertero::session::{
    CaptureMode, CaptureSession, Notice, RecordingState, SessionEvent, SubmissionState,
};

// Closed port: a dispatch that does fire settles as Failed instead of
// hanging, so no test needs a live analysis server.
const DEAD_ENDPOINT: &str = "http://127.0.0.1:1";

fn session_with(camera: ScriptedCamera) -> (CaptureSession, mpsc::Receiver<SessionEvent>) {
    let (tx, rx) = mpsc::channel(100);
    let dispatcher = AnalysisDispatcher::new(AnalysisService::new(DEAD_ENDPOINT), tx);
    let channel = MediaCaptureChannel::new(Box::new(camera));
    (CaptureSession::new(channel, dispatcher), rx)
}

fn mp4_file() -> PickedFile {
    PickedFile {
        name: "squat.mp4".to_string(),
        mime: Some("video/mp4".to_string()),
        bytes: vec![0u8; 2048],
    }
}

#[tokio::test]
async fn test_initial_state() {
    let (session, _rx) = session_with(ScriptedCamera::ready(64, 64));

    assert_eq!(session.mode(), CaptureMode::Upload);
    assert!(session.artifact().is_none());
    assert_eq!(session.recording(), RecordingState::Idle);
    assert_eq!(*session.submission(), SubmissionState::NotSubmitted);
    assert_eq!(session.generation(), 0);
}

#[tokio::test]
async fn test_mode_switch_is_full_reset() {
    let (mut session, _rx) = session_with(ScriptedCamera::ready(64, 64));

    // 1. Install an artifact and put a submission in flight
    assert!(session.select_file(mp4_file()).is_none());
    assert!(session.artifact().is_some());
    assert!(session.analyze().is_none());
    assert_eq!(*session.submission(), SubmissionState::InFlight);

    // 2. Every mode switch clears artifact + submission, even mid-flight
    let mut last_generation = session.generation();
    for mode in [CaptureMode::Snapshot, CaptureMode::Record, CaptureMode::Upload] {
        session.set_mode(mode).await;
        assert_eq!(session.mode(), mode);
        assert!(session.artifact().is_none(), "mode switch must drop the artifact");
        assert_eq!(*session.submission(), SubmissionState::NotSubmitted);
        assert_eq!(session.recording(), RecordingState::Idle);
        assert!(
            session.generation() > last_generation,
            "mode switch must advance the generation"
        );
        last_generation = session.generation();
    }
}

#[tokio::test]
async fn test_stale_settle_is_rejected() {
    let (mut session, _rx) = session_with(ScriptedCamera::ready(64, 64));

    // 1. Submit the first artifact
    session.select_file(mp4_file());
    let stale_generation = session.generation();
    session.analyze();
    assert_eq!(*session.submission(), SubmissionState::InFlight);

    // 2. User moves on: a new artifact supersedes the in-flight request
    session.select_file(PickedFile {
        name: "deadlift.mp4".to_string(),
        mime: Some("video/mp4".to_string()),
        bytes: vec![1u8; 512],
    });
    assert_eq!(*session.submission(), SubmissionState::NotSubmitted);

    // 3. The late response arrives carrying the superseded token
    let late = AnalysisResult {
        summary: vec!["✅ Good posture at 0:01".to_string()],
        ..AnalysisResult::default()
    };
    session.handle_event(SessionEvent::AnalysisSettled {
        generation: stale_generation,
        outcome: Ok(late),
    });

    // VERIFY: the stale response must not alter submission state
    assert_eq!(
        *session.submission(),
        SubmissionState::NotSubmitted,
        "stale settle must be discarded"
    );

    // 4. A settle for the current generation still lands normally
    session.analyze();
    session.handle_event(SessionEvent::AnalysisSettled {
        generation: session.generation(),
        outcome: Err("connection refused".to_string()),
    });
    assert_eq!(
        *session.submission(),
        SubmissionState::Failed("connection refused".to_string())
    );

    println!("Test Passed: Stale Settle Rejected");
}

#[tokio::test]
async fn test_analyze_without_artifact_is_a_noop() {
    let (mut session, mut rx) = session_with(ScriptedCamera::ready(64, 64));

    let notice = session.analyze();
    assert_eq!(notice, Some(Notice::NothingToAnalyze));
    assert_eq!(*session.submission(), SubmissionState::NotSubmitted);

    // Nothing was dispatched, so nothing can ever settle
    assert!(rx.try_recv().is_err(), "no network call may be made");
}

#[tokio::test]
async fn test_record_toggle_concatenates_chunks_in_order() {
    let camera = ScriptedCamera::ready(64, 64).with_clip(vec![
        b"first-".to_vec(),
        b"second-".to_vec(),
        b"final".to_vec(),
    ]);
    let (mut session, _rx) = session_with(camera);
    session.set_mode(CaptureMode::Record).await;

    // start
    assert!(session.toggle_recording().await.is_none());
    assert_eq!(session.recording(), RecordingState::Recording);
    assert!(session.artifact().is_none());

    // stop: exactly one artifact, chunks in arrival order, tail included
    assert!(session.toggle_recording().await.is_none());
    assert_eq!(session.recording(), RecordingState::Idle);

    let artifact = session.artifact().expect("stop must yield an artifact");
    assert_eq!(artifact.bytes, b"first-second-final".to_vec());
    assert_eq!(artifact.kind, MediaKind::Video);
    assert_eq!(artifact.mime, "video/webm");
    assert_eq!(*session.submission(), SubmissionState::NotSubmitted);
}

#[tokio::test]
async fn test_mode_switch_during_recording_discards_clip() {
    let camera = ScriptedCamera::ready(64, 64).with_clip(vec![b"partial".to_vec()]);
    let (mut session, _rx) = session_with(camera);

    session.set_mode(CaptureMode::Record).await;
    session.toggle_recording().await;
    assert_eq!(session.recording(), RecordingState::Recording);

    // Switching away abandons the clip instead of finalizing it
    session.set_mode(CaptureMode::Upload).await;
    assert_eq!(session.recording(), RecordingState::Idle);
    assert!(session.artifact().is_none(), "abandoned clip must not become an artifact");
}

#[tokio::test]
async fn test_snapshot_without_stream_is_nonfatal() {
    let (mut session, _rx) = session_with(ScriptedCamera::offline());
    session.set_mode(CaptureMode::Snapshot).await;

    let notice = session.capture_snapshot();
    assert_eq!(notice, Some(Notice::CameraNotReady));
    assert!(session.artifact().is_none());
    assert_eq!(*session.submission(), SubmissionState::NotSubmitted);

    // The session stays interactive: a later snapshot attempt is allowed
    assert_eq!(session.capture_snapshot(), Some(Notice::CameraNotReady));
}

#[tokio::test]
async fn test_snapshot_installs_png_artifact() {
    let (mut session, _rx) = session_with(ScriptedCamera::ready(32, 32));
    session.set_mode(CaptureMode::Snapshot).await;

    assert!(session.capture_snapshot().is_none());
    let artifact = session.artifact().expect("snapshot must yield an artifact");
    assert_eq!(artifact.kind, MediaKind::Image);
    assert_eq!(artifact.mime, "image/png");
    assert!(artifact.filename.starts_with("snapshot-"));
    // PNG signature
    assert_eq!(&artifact.bytes[..4], &[0x89, b'P', b'N', b'G']);
}

#[tokio::test]
async fn test_operations_gated_by_mode() {
    let (mut session, _rx) = session_with(ScriptedCamera::ready(64, 64));

    // Upload is the initial mode: snapshot and record are gated
    assert_eq!(
        session.capture_snapshot(),
        Some(Notice::WrongMode(CaptureMode::Snapshot))
    );
    assert_eq!(
        session.toggle_recording().await,
        Some(Notice::WrongMode(CaptureMode::Record))
    );

    session.set_mode(CaptureMode::Snapshot).await;
    assert_eq!(
        session.select_file(mp4_file()),
        Some(Notice::WrongMode(CaptureMode::Upload))
    );
    assert!(session.artifact().is_none(), "gated operation must not install anything");
}

#[tokio::test]
async fn test_upload_analyze_success_scenario() {
    // Upload a 2MB MP4, analyze, server answers with one positive summary
    // line and an annotated clip.
    let (mut session, _rx) = session_with(ScriptedCamera::ready(64, 64));

    session.select_file(PickedFile {
        name: "squat.mp4".to_string(),
        mime: Some("video/mp4".to_string()),
        bytes: vec![0u8; 2 * 1024 * 1024],
    });
    assert_eq!(session.artifact().unwrap().kind, MediaKind::Video);

    session.analyze();
    let result = decode_response(
        r#"{"summary": ["✅ Good posture at 0:01"], "annotated_video": "out/1.mp4"}"#,
    );
    session.handle_event(SessionEvent::AnalysisSettled {
        generation: session.generation(),
        outcome: Ok(result),
    });

    let SubmissionState::Succeeded(result) = session.submission() else {
        panic!("expected Succeeded, got {:?}", session.submission());
    };
    assert_eq!(result.summary, vec!["✅ Good posture at 0:01".to_string()]);

    let model = present::render(session.submission());
    assert_eq!(model.lines.len(), 1);
    assert_eq!(model.lines[0].tone, present::LineTone::Positive);
    let media = model.annotated.expect("video reference expected");
    assert_eq!(media.path, "out/1.mp4");
    assert_eq!(media.kind, MediaKind::Video);
}
