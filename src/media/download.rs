/// Resolving generated images to bytes and saving them to disk

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rfd::AsyncFileDialog;

use crate::error::{Error, Result};
use crate::service::GeminiClient;
use crate::state::ImageSource;

/// Suggested name in the save dialog
pub const SUGGESTED_FILE_NAME: &str = "studio-ai-edit.png";

/// Fetch the bytes behind a generated image, whatever form it came in.
///
/// Remote files go through the edit client so URLs on the service's own
/// origin carry the API key.
pub async fn resolve_bytes(source: &ImageSource, client: Option<&GeminiClient>) -> Result<Vec<u8>> {
    if let Some(decoded) = source.decode_inline() {
        return decoded;
    }

    let url = source.uri();
    tracing::debug!(%url, "Fetching remote image");
    let request = match client {
        Some(client) => client.file_request(&url),
        None => reqwest::Client::new().get(&url),
    };
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::service(format!(
            "Failed to fetch generated image: HTTP {status}"
        )));
    }
    Ok(response.bytes().await?.to_vec())
}

/// Write image bytes to `path`
pub async fn save_to(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| Error::io(format!("Failed to save {}", path.display()), e))
}

/// Ask the user where to save, starting in their downloads folder
async fn pick_destination() -> Option<PathBuf> {
    let mut dialog = AsyncFileDialog::new()
        .set_title("Save Edited Image")
        .set_file_name(SUGGESTED_FILE_NAME);
    if let Some(dir) = dirs::download_dir() {
        dialog = dialog.set_directory(dir);
    }
    dialog.save_file().await.map(|handle| handle.path().to_path_buf())
}

/// Save the generated image via a native dialog.
/// Returns `Ok(None)` when the user closes the dialog.
pub async fn download(source: ImageSource, client: Option<Arc<GeminiClient>>) -> Result<Option<PathBuf>> {
    let Some(path) = pick_destination().await else {
        return Ok(None);
    };

    let bytes = resolve_bytes(&source, client.as_deref()).await?;
    save_to(&path, &bytes).await?;

    tracing::info!(path = %path.display(), bytes = bytes.len(), "Saved edited image");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;
    use crate::service::local_server;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;
    use std::time::Duration;

    fn client_for(base_url: &str) -> GeminiClient {
        GeminiClient::new(&ServiceConfig {
            api_key: "test-key".into(),
            model: "m".into(),
            base_url: format!("{base_url}/v1beta"),
            request_timeout: Some(Duration::from_secs(5)),
            connect_timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_inline_source_resolves_without_network() {
        let source = ImageSource::Inline {
            mime_type: "image/png".into(),
            data: BASE64.encode(b"edited-pixels"),
        };
        let bytes = resolve_bytes(&source, None).await.unwrap();
        assert_eq!(bytes, b"edited-pixels");
    }

    #[tokio::test]
    async fn test_service_hosted_file_is_fetched_with_key() {
        let (listener, origin) = local_server::bind().await;
        let server = local_server::respond_once(listener, "200 OK", "image/png", b"remote-pixels".to_vec());

        let source = ImageSource::Remote(format!("{origin}/v1beta/files/out:download"));
        let bytes = resolve_bytes(&source, Some(&client_for(&origin))).await.unwrap();
        assert_eq!(bytes, b"remote-pixels");

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /v1beta/files/out:download HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
    }

    #[tokio::test]
    async fn test_foreign_host_never_sees_key() {
        let (listener, origin) = local_server::bind().await;
        let server = local_server::respond_once(listener, "200 OK", "image/png", b"cdn-pixels".to_vec());

        let source = ImageSource::Remote(format!("{origin}/out.png"));
        let client = client_for("https://generativelanguage.googleapis.com");
        assert_eq!(resolve_bytes(&source, Some(&client)).await.unwrap(), b"cdn-pixels");

        let request = server.await.unwrap();
        assert!(!request.to_ascii_lowercase().contains("x-goog-api-key"));
    }

    #[tokio::test]
    async fn test_remote_error_status_is_service_error() {
        let (listener, origin) = local_server::bind().await;
        let server = local_server::respond_once(listener, "403 Forbidden", "text/plain", b"denied".to_vec());

        let source = ImageSource::Remote(format!("{origin}/v1beta/files/out"));
        let err = resolve_bytes(&source, Some(&client_for(&origin))).await.unwrap_err();
        assert_eq!(err, Error::service("Failed to fetch generated image: HTTP 403 Forbidden"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_save_to_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SUGGESTED_FILE_NAME);

        save_to(&path, b"png-bytes").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(SUGGESTED_FILE_NAME);

        let err = save_to(&path, b"png-bytes").await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
