use serde::{Deserialize, Serialize};

use crate::services::analysis::{AnalysisResult, AnnotatedMedia};
use crate::session::SubmissionState;

/// Leading marker the backend puts on positive summary entries.
pub const POSITIVE_MARKER: &str = "✅";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineTone {
    Positive,
    Informational,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayLine {
    pub text: String,
    pub tone: LineTone,
}

/// What the surface shows for one submission state. Serializable so a shell
/// can take it as-is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayModel {
    pub loading: bool,
    pub error: Option<String>,
    pub lines: Vec<DisplayLine>,
    pub annotated: Option<AnnotatedMedia>,
}

/// Pure projection of the submission lifecycle into a display model. Owns
/// no state of its own.
pub fn render(submission: &SubmissionState) -> DisplayModel {
    match submission {
        SubmissionState::NotSubmitted => DisplayModel::default(),
        SubmissionState::InFlight => DisplayModel {
            loading: true,
            ..DisplayModel::default()
        },
        SubmissionState::Failed(message) => DisplayModel {
            error: Some(message.clone()),
            ..DisplayModel::default()
        },
        SubmissionState::Succeeded(result) => render_result(result),
    }
}

fn render_result(result: &AnalysisResult) -> DisplayModel {
    let mut lines: Vec<DisplayLine> = result
        .summary
        .iter()
        .map(|entry| DisplayLine {
            text: entry.clone(),
            tone: classify(entry),
        })
        .collect();

    // Per-frame findings follow the summary, rendered the way the result
    // list reads upstream.
    for finding in &result.findings {
        let mark = if finding.good { "✅" } else { "❌" };
        lines.push(DisplayLine {
            text: format!("{} Frame {} – {}", mark, finding.frame, finding.message),
            tone: if finding.good {
                LineTone::Positive
            } else {
                LineTone::Informational
            },
        });
    }

    DisplayModel {
        loading: false,
        error: None,
        lines,
        annotated: result.annotated.clone(),
    }
}

/// A leading marker tags the entry positive; everything else is timing or
/// informational.
fn classify(entry: &str) -> LineTone {
    if entry.trim_start().starts_with(POSITIVE_MARKER) {
        LineTone::Positive
    } else {
        LineTone::Informational
    }
}
