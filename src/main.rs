use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use vertero::capture::{MediaCaptureChannel, ScriptedCamera};
use vertero::media::PickedFile;
use vertero::services::analysis::{AnalysisDispatcher, AnalysisService, DEFAULT_ENDPOINT};
use vertero::session::{CaptureMode, CaptureSession, SubmissionState};
use vertero::{present, report};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("Vertero capture client booting...");

    let endpoint =
        std::env::var("VERTERO_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());
    tracing::info!("Analysis endpoint: {}", endpoint);

    // Session Channel (async completions re-enter here)
    let (tx, mut rx) = mpsc::channel(100);

    let service = AnalysisService::new(&endpoint);
    let dispatcher = AnalysisDispatcher::new(service, tx);

    // Scripted camera for snapshot/record modes; a hardware device plugs in
    // behind the same CameraBackend seam. Upload mode reads real files.
    let camera = ScriptedCamera::ready(640, 480).with_clip(vec![
        b"clip-chunk-0".to_vec(),
        b"clip-chunk-1".to_vec(),
        b"clip-chunk-2".to_vec(),
    ]);
    let channel = MediaCaptureChannel::new(Box::new(camera));
    let mut session = CaptureSession::new(channel, dispatcher);

    print_help();
    print_status(&session);

    // Driver Internal Channel: stdin lines feed the same drain loop the
    // settle events arrive on, so there is exactly one mutator.
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<String>(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if cmd_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            maybe_line = cmd_rx.recv() => {
                let Some(line) = maybe_line else { break };
                if !run_command(&mut session, line.trim()).await {
                    break;
                }
                print_status(&session);
            }
            maybe_event = rx.recv() => {
                let Some(event) = maybe_event else { break };
                session.handle_event(event);
                print_status(&session);
            }
        }
    }

    Ok(())
}

/// Map one command line onto a session operation. Returns false on quit.
async fn run_command(session: &mut CaptureSession, line: &str) -> bool {
    let mut words = line.split_whitespace();
    let notice = match (words.next(), words.next()) {
        (Some("mode"), Some(name)) => match parse_mode(name) {
            Some(mode) => {
                session.set_mode(mode).await;
                None
            }
            None => {
                println!("unknown mode '{}' (upload | snapshot | record)", name);
                None
            }
        },
        (Some("select"), Some(path)) => match tokio::fs::read(path).await {
            Ok(bytes) => {
                let name = std::path::Path::new(path)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.to_string());
                let mime = mime_guess::from_path(path).first_raw().map(String::from);
                session.select_file(PickedFile { name, mime, bytes })
            }
            Err(err) => {
                println!("cannot read {}: {}", path, err);
                None
            }
        },
        (Some("snap"), None) => session.capture_snapshot(),
        (Some("rec"), None) => session.toggle_recording().await,
        (Some("analyze"), None) => session.analyze(),
        (Some("report"), Some(path)) => {
            write_report(session, path).await;
            None
        }
        (Some("show"), None) => None,
        (Some("help"), None) => {
            print_help();
            None
        }
        (Some("quit"), None) | (Some("exit"), None) => return false,
        (Some(other), _) => {
            println!("unknown command '{}' (try help)", other);
            None
        }
        (None, _) => None,
    };

    if let Some(notice) = notice {
        println!("[notice] {}", notice);
    }
    true
}

async fn write_report(session: &CaptureSession, path: &str) {
    match session.submission() {
        SubmissionState::Succeeded(result) => {
            let text = report::render_text(result);
            match tokio::fs::write(path, text).await {
                Ok(()) => println!("report written to {}", path),
                Err(err) => println!("cannot write {}: {}", path, err),
            }
        }
        _ => println!("[notice] No analysis result to report yet."),
    }
}

fn parse_mode(name: &str) -> Option<CaptureMode> {
    match name {
        "upload" => Some(CaptureMode::Upload),
        "snapshot" => Some(CaptureMode::Snapshot),
        "record" => Some(CaptureMode::Record),
        _ => None,
    }
}

fn print_status(session: &CaptureSession) {
    let pending = match session.artifact() {
        Some(artifact) => format!(
            "{} ({:?}, {} bytes)",
            artifact.filename,
            artifact.kind,
            artifact.len()
        ),
        None => "none".to_string(),
    };
    println!(
        "-- mode: {:?} | recording: {:?} | pending: {}",
        session.mode(),
        session.recording(),
        pending
    );

    let model = present::render(session.submission());
    if model.loading {
        println!("Analyzing posture...");
    }
    if let Some(err) = &model.error {
        println!("Analysis failed: {}", err);
    }
    for line in &model.lines {
        println!("  [{:?}] {}", line.tone, line.text);
    }
    if let Some(media) = &model.annotated {
        println!("  annotated {:?}: {}", media.kind, media.path);
    }
}

fn print_help() {
    println!("commands:");
    println!("  mode upload|snapshot|record");
    println!("  select <path>   pick a file (upload mode)");
    println!("  snap            capture a snapshot (snapshot mode)");
    println!("  rec             start/stop recording (record mode)");
    println!("  analyze         submit the pending artifact");
    println!("  report <path>   write the paginated report");
    println!("  show | help | quit");
}
