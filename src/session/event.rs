use crate::services::analysis::AnalysisResult;

/// Async completions re-entering the session's single control flow.
#[derive(Debug)]
pub enum SessionEvent {
    /// A submission resolved, one way or the other. `generation` is the
    /// session token captured when the request was dispatched; the session
    /// compares it against the current generation before applying anything.
    AnalysisSettled {
        generation: u64,
        outcome: Result<AnalysisResult, String>,
    },
}
