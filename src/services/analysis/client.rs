use reqwest::multipart;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use super::result::{AnalysisResult, AnnotatedMedia, FrameFinding};
use crate::media::{Artifact, MediaKind};

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

const UPLOAD_PATH: &str = "/upload/";
// Clip analysis runs pose detection frame by frame server-side; the
// network-level timeout has to cover that, not just the upload.
const UPLOAD_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("upload failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("analysis service returned {0}")]
    Rejected(StatusCode),
}

/// Client for the remote analysis endpoint. One multipart POST per
/// submission, single attempt, no retry.
#[derive(Clone)]
pub struct AnalysisService {
    client: Client,
    base_url: String,
}

/// Wire shape of the endpoint's JSON body. Every field is optional; a body
/// missing all of them decodes to the empty result.
#[derive(Debug, Default, Deserialize)]
struct WireResponse {
    #[serde(default)]
    summary: Vec<String>,
    #[serde(default)]
    results: Vec<FrameFinding>,
    #[serde(default)]
    annotated_image: Option<String>,
    #[serde(default)]
    annotated_video: Option<String>,
}

impl AnalysisService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }

    /// Submit the artifact as the single `file` field of a multipart form.
    pub async fn submit(&self, artifact: &Artifact) -> Result<AnalysisResult, AnalysisError> {
        let part = multipart::Part::bytes(artifact.bytes.clone())
            .file_name(artifact.filename.clone())
            .mime_str(&artifact.mime)?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}{}", self.base_url, UPLOAD_PATH))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AnalysisError::Rejected(response.status()));
        }

        let body = response.text().await?;
        Ok(decode_response(&body))
    }
}

/// Decode the endpoint's body into a typed result. Unknown fields are
/// ignored, missing fields default, and a body that is not the expected
/// shape at all degrades to the empty result. A submission that reached
/// the server never fails on decode.
pub fn decode_response(body: &str) -> AnalysisResult {
    let wire: WireResponse = match serde_json::from_str(body) {
        Ok(wire) => wire,
        Err(err) => {
            warn!("malformed analysis response, degrading to empty result: {}", err);
            WireResponse::default()
        }
    };

    // At most one annotated field is expected; image takes precedence if a
    // misbehaving server sends both.
    let annotated = match (wire.annotated_image, wire.annotated_video) {
        (Some(path), _) => Some(AnnotatedMedia {
            path,
            kind: MediaKind::Image,
        }),
        (None, Some(path)) => Some(AnnotatedMedia {
            path,
            kind: MediaKind::Video,
        }),
        (None, None) => None,
    };

    AnalysisResult {
        summary: wire.summary,
        findings: wire.results,
        annotated,
    }
}
