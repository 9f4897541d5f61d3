use serde::{Deserialize, Serialize};

use crate::media::MediaKind;

/// One per-frame observation from the analysis backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameFinding {
    #[serde(default)]
    pub frame: u32,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub good: bool,
}

/// Reference to one annotated media resource the backend rendered,
/// reachable as a relative path under the service's static mount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedMedia {
    pub path: String,
    pub kind: MediaKind,
}

/// Typed analysis response. Immutable once constructed; the empty default
/// is the degraded shape a malformed body collapses into.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Ordered summary entries. A leading `✅` marker tags an entry as
    /// positive at presentation time.
    pub summary: Vec<String>,
    /// Ordered per-frame findings.
    pub findings: Vec<FrameFinding>,
    /// At most one annotated still or clip.
    pub annotated: Option<AnnotatedMedia>,
}
