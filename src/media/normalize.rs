use base64::Engine;
use thiserror::Error;
use uuid::Uuid;

use super::artifact::{Artifact, MediaKind};

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The data URL carries no payload we know how to decode
    /// (missing comma, missing `;base64` marker, or corrupt payload).
    #[error("data url has no decodable payload segment")]
    UnsupportedEncoding,
}

/// A user-picked file as handed over by the surrounding shell: name and
/// declared MIME come from the picker, bytes from the filesystem.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// Normalize a picked file. The declared MIME and name pass through
/// unchanged; an undeclared MIME is guessed from the extension, since the
/// analysis backend routes by extension anyway.
pub fn from_file(file: PickedFile) -> Artifact {
    let mime = file
        .mime
        .filter(|m| !m.is_empty())
        .or_else(|| mime_guess::from_path(&file.name).first_raw().map(String::from))
        .unwrap_or_else(|| FALLBACK_MIME.to_string());

    Artifact::new(file.bytes, mime, file.name)
}

/// Normalize a `data:<mime>;base64,<payload>` URL, the shape screenshot
/// captures arrive in. The declared media-type segment becomes the MIME,
/// the payload is base64-decoded, and a filename is synthesized.
pub fn from_data_url(url: &str) -> Result<Artifact, NormalizeError> {
    let rest = url.strip_prefix("data:").unwrap_or(url);

    let (head, payload) = rest
        .split_once(',')
        .ok_or(NormalizeError::UnsupportedEncoding)?;

    let mime = head
        .strip_suffix(";base64")
        .ok_or(NormalizeError::UnsupportedEncoding)?;
    let mime = if mime.is_empty() { FALLBACK_MIME } else { mime };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|_| NormalizeError::UnsupportedEncoding)?;

    let filename = synthesize_filename(mime);
    Ok(Artifact::new(bytes, mime.to_string(), filename))
}

/// Normalize a raw bytes + MIME pair (finalized recorder clips, encoded
/// still frames).
pub fn from_raw(bytes: Vec<u8>, mime: &str) -> Artifact {
    let filename = synthesize_filename(mime);
    Artifact::new(bytes, mime.to_string(), filename)
}

/// Captures carry no user-facing name, so one is minted from the kind and
/// the MIME subtype: `snapshot-<uuid>.png`, `clip-<uuid>.webm`.
fn synthesize_filename(mime: &str) -> String {
    let ext = mime.rsplit('/').next().unwrap_or("bin");
    let stem = match MediaKind::from_mime(mime) {
        MediaKind::Image => "snapshot",
        MediaKind::Video => "clip",
    };
    format!("{}-{}.{}", stem, Uuid::new_v4(), ext)
}
