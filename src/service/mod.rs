/// Remote edit service
///
/// `GeminiClient` wraps the single external call
/// "submit (image, instruction) -> edited image". `run_edit` adapts it to the
/// session's `EditJob` so the UI can hand the result straight back as an event.

pub mod gemini;
#[cfg(test)]
pub(crate) mod local_server;

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::state::{EditJob, ImageSource};

pub use gemini::GeminiClient;

/// Execute one edit job. A missing client fails like any other service error.
pub async fn run_edit(client: Option<Arc<GeminiClient>>, job: EditJob) -> Result<ImageSource> {
    let Some(client) = client else {
        return Err(Error::service(
            "The edit service is not configured. Set GEMINI_API_KEY and restart.",
        ));
    };
    client
        .submit_edit(&job.image.data, &job.image.mime_type, &job.instruction)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ImagePayload, Ticket};

    #[tokio::test]
    async fn test_unconfigured_client_fails_as_service_error() {
        let job = EditJob {
            ticket: Ticket(1),
            image: ImagePayload {
                data: "QUJD".into(),
                mime_type: "image/png".into(),
            },
            instruction: "brighter".into(),
        };
        let err = run_edit(None, job).await.unwrap_err();
        assert!(matches!(err, Error::ExternalService(msg) if msg.contains("GEMINI_API_KEY")));
    }
}
