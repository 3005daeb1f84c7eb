/// Image ingestion: file on disk -> base64 payload + MIME type
///
/// Both the file picker and drag-and-drop funnel through `ingest_file`.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::ImageFormat;

use crate::error::{Error, Result, ValidationError};
use crate::state::ImagePayload;

/// Extensions offered by the file picker filter
pub const PICKER_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "gif", "bmp", "tif", "tiff", "avif", "ico",
];

/// A successfully ingested file
#[derive(Debug, Clone)]
pub struct IngestedImage {
    /// What the session stores
    pub payload: ImagePayload,
    /// Raw file contents, used only for the on-screen preview
    pub bytes: Vec<u8>,
}

/// Content type declared by the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Declared {
    Image(ImageFormat),
    /// Extension present but not an image type we know
    Other,
    /// No extension at all
    Unknown,
}

fn declared_type(path: &Path) -> Declared {
    match path.extension() {
        None => Declared::Unknown,
        Some(_) => match ImageFormat::from_path(path) {
            Ok(format) => Declared::Image(format),
            Err(_) => Declared::Other,
        },
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Show the native file picker filtered to image files
pub async fn pick_image() -> Option<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Select a Photo to Edit")
        .add_filter("Images", PICKER_EXTENSIONS)
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

/// Read a file from disk and turn it into an ingested image
pub async fn ingest_file(path: PathBuf) -> Result<IngestedImage> {
    let name = display_name(&path);

    // Reject obvious non-images before touching the disk
    if declared_type(&path) == Declared::Other {
        tracing::info!(file = %name, "Rejected non-image file");
        return Err(ValidationError::NotAnImage(name).into());
    }

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| Error::io(format!("Failed to read {name}"), e))?;

    let image = ingest_bytes(&path, bytes)?;
    tracing::info!(
        file = %name,
        mime_type = %image.payload.mime_type,
        bytes = image.bytes.len(),
        "Ingested image"
    );
    Ok(image)
}

/// Validate already-read file contents and encode them
pub fn ingest_bytes(path: &Path, bytes: Vec<u8>) -> Result<IngestedImage> {
    let name = display_name(path);
    let declared = declared_type(path);

    if declared == Declared::Other {
        return Err(ValidationError::NotAnImage(name).into());
    }
    if bytes.is_empty() {
        return Err(ValidationError::EmptyImage.into());
    }

    // Prefer what the bytes say; fall back to the extension
    let format = match (image::guess_format(&bytes), declared) {
        (Ok(sniffed), _) => sniffed,
        (Err(_), Declared::Image(format)) => format,
        (Err(_), _) => return Err(ValidationError::NotAnImage(name).into()),
    };

    Ok(IngestedImage {
        payload: ImagePayload {
            data: BASE64.encode(&bytes),
            mime_type: format.to_mime_type().to_string(),
        },
        bytes,
    })
}
