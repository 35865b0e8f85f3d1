//! Base64 image payload carried in the `images` field of a resize request.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CoreError;

/// Base64 text of an image with no `data:<mime>;base64,` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload(String);

impl ImagePayload {
    /// Encode raw image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// Accept already-encoded text, stripping a data-URI prefix if present.
    pub fn from_base64(text: &str) -> Self {
        Self(strip_data_uri_prefix(text.trim()).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode back to bytes. Submission runs this to reject corrupt text
    /// before it reaches the backend.
    pub fn decode(&self) -> Result<Vec<u8>, CoreError> {
        STANDARD
            .decode(&self.0)
            .map_err(|e| CoreError::Decode(format!("Invalid base64 image payload: {e}")))
    }
}

/// Remove a leading `data:...,` header from a data URI.
///
/// Text without a `data:` scheme is returned unchanged.
pub fn strip_data_uri_prefix(text: &str) -> &str {
    if !text.starts_with("data:") {
        return text;
    }
    match text.find(',') {
        Some(idx) => &text[idx + 1..],
        None => text,
    }
}
