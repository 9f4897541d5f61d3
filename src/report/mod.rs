use crate::services::analysis::AnalysisResult;

/// Summary lines rendered per page before a break.
pub const LINES_PER_PAGE: usize = 30;

const REPORT_TITLE: &str = "Posture Analysis Report";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPage {
    pub lines: Vec<String>,
}

/// One line per summary entry, page break after a fixed line count. Pure
/// formatting; no state.
pub fn paginate(summary: &[String]) -> Vec<ReportPage> {
    summary
        .chunks(LINES_PER_PAGE)
        .map(|chunk| ReportPage {
            lines: chunk.to_vec(),
        })
        .collect()
}

/// Plain-text rendition of the paginated report, used by the
/// download-report action.
pub fn render_text(result: &AnalysisResult) -> String {
    let mut out = String::new();
    out.push_str(REPORT_TITLE);
    out.push('\n');

    let pages = paginate(&result.summary);
    if pages.is_empty() {
        out.push_str("(no summary entries)\n");
        return out;
    }

    for (index, page) in pages.iter().enumerate() {
        if index > 0 {
            out.push_str("\n--- page break ---\n");
        }
        for line in &page.lines {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}
