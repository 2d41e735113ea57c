//! Self-contained image data references.
//!
//! A [`DataRef`] is the `data:<mime>;base64,<payload>` textual form of an
//! image — directly displayable by a client and re-decodable here. Records
//! carry their pixels this way so the tray has no filesystem ties: once
//! uploaded, an image is fully described by its record.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("not a base64 data reference")]
    NotADataRef,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// An embedded binary-to-text image encoding (`data:` URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DataRef(String);

impl DataRef {
    /// Wrap encoded image bytes, sniffing the MIME type from the content.
    /// Unrecognized content falls back to a generic binary MIME type.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mime = image::guess_format(data)
            .map(|f| f.to_mime_type())
            .unwrap_or("application/octet-stream");
        Self(format!("data:{mime};base64,{}", STANDARD.encode(data)))
    }

    /// Wrap bytes known to be JPEG (codec output).
    pub fn jpeg(data: &[u8]) -> Self {
        Self(format!("data:image/jpeg;base64,{}", STANDARD.encode(data)))
    }

    /// Decode the reference back into raw encoded-image bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SourceError> {
        let payload = self
            .0
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, payload)| payload)
            .ok_or(SourceError::NotADataRef)?;
        Ok(STANDARD.decode(payload)?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
