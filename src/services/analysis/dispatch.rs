use tokio::sync::mpsc;
use tracing::warn;

use super::client::AnalysisService;
use crate::media::Artifact;
use crate::session::event::SessionEvent;

/// Runs submissions off the session's control flow and settles them back
/// onto its event channel. The generation captured at dispatch time travels
/// with the settle event; whether the response still matters is the
/// session's call, not ours, since the request itself is not abortable.
#[derive(Clone)]
pub struct AnalysisDispatcher {
    service: AnalysisService,
    tx: mpsc::Sender<SessionEvent>,
}

impl AnalysisDispatcher {
    pub fn new(service: AnalysisService, tx: mpsc::Sender<SessionEvent>) -> Self {
        Self { service, tx }
    }

    pub fn dispatch(&self, artifact: Artifact, generation: u64) {
        let service = self.service.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let outcome = service.submit(&artifact).await.map_err(|e| e.to_string());
            if let Err(msg) = &outcome {
                warn!(generation, "analysis submission failed: {}", msg);
            }
            // A closed channel means the session is gone; the settle just drops.
            let _ = tx.send(SessionEvent::AnalysisSettled { generation, outcome }).await;
        });
    }
}
