use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("'{0}' is not an image type")]
    NotAnImage(String),
    #[error("Unrecognised image extension for {0}")]
    UnknownExtension(String),
}

/// Encode picked image bytes as a `data:` URI usable as an `img` source
pub fn data_uri(mime: &str, bytes: &[u8]) -> Result<String, IngestError> {
    let mime = mime.trim().to_ascii_lowercase();
    if !mime.starts_with("image/") {
        return Err(IngestError::NotAnImage(mime));
    }
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// Image MIME type for a file name, by extension
pub fn mime_for_path(path: &Path) -> Result<&'static str, IngestError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => Ok("image/png"),
        Some("jpg" | "jpeg") => Ok("image/jpeg"),
        Some("gif") => Ok("image/gif"),
        Some("webp") => Ok("image/webp"),
        Some("svg") => Ok("image/svg+xml"),
        Some("bmp") => Ok("image/bmp"),
        _ => Err(IngestError::UnknownExtension(path.display().to_string())),
    }
}
