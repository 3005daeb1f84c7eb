/// Shared data structures for the session
///
/// These structs represent the data model that flows between
/// ingestion, the edit service and the UI layer.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use crate::error::{Error, Result};

/// Identifier handed out by the session for every upload and edit request.
/// A completion carrying a ticket the session no longer waits for is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(pub u64);

/// An uploaded image in transport form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Base64-encoded file contents (no `data:` prefix)
    pub data: String,
    /// Detected MIME type (e.g., "image/jpeg")
    pub mime_type: String,
}

/// Where a generated image can be read from.
///
/// The service may answer with inline base64 data or with a URL. Callers
/// use `uri()` and `media::download::resolve_bytes` and never branch on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Inline { mime_type: String, data: String },
    Remote(String),
}

impl ImageSource {
    /// Parse a `data:<mime>;base64,<data>` URI or an http(s) URL
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(rest) = raw.strip_prefix("data:") {
            let (header, data) = rest.split_once(',')?;
            let mime_type = header.strip_suffix(";base64")?;
            if mime_type.is_empty() || data.is_empty() {
                return None;
            }
            return Some(ImageSource::Inline {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            });
        }

        if raw.starts_with("https://") || raw.starts_with("http://") {
            return Some(ImageSource::Remote(raw.to_string()));
        }

        None
    }

    /// Display/download reference: a `data:` URI or the remote URL
    pub fn uri(&self) -> String {
        match self {
            ImageSource::Inline { mime_type, data } => format!("data:{mime_type};base64,{data}"),
            ImageSource::Remote(url) => url.clone(),
        }
    }

    /// Decode inline data. Returns `None` for remote sources.
    pub fn decode_inline(&self) -> Option<Result<Vec<u8>>> {
        match self {
            ImageSource::Inline { data, .. } => Some(
                BASE64
                    .decode(data.as_bytes())
                    .map_err(|e| Error::service(format!("Generated image is not valid base64: {e}"))),
            ),
            ImageSource::Remote(_) => None,
        }
    }
}

/// The image attached to the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionImage {
    pub original: ImagePayload,
    /// Absent until a generation succeeds; overwritten by each success
    pub generated: Option<ImageSource>,
}

impl SessionImage {
    pub fn new(original: ImagePayload) -> Self {
        Self {
            original,
            generated: None,
        }
    }
}
