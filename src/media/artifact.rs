use serde::{Deserialize, Serialize};

/// Content kind of a pending submission, derived from its MIME type.
/// The analysis endpoint routes stills and clips differently, so the tag
/// travels with the artifact instead of being re-derived downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// `video/*` is a clip; everything else is treated as a still image.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("video") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }
}

/// The canonical pending submission. At most one exists per session;
/// producing a new one replaces the previous one wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub filename: String,
    pub kind: MediaKind,
}

impl Artifact {
    pub fn new(bytes: Vec<u8>, mime: String, filename: String) -> Self {
        let kind = MediaKind::from_mime(&mime);
        Self {
            bytes,
            mime,
            filename,
            kind,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
