/// Gemini `generateContent` client for instruction-driven image edits
///
/// One call per edit: the original image travels inline next to the text
/// instruction, and the first image part of the reply is the result. No
/// retries. The overall wait is bounded by the configured request timeout.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ServiceConfig;
use crate::error::{Error, Result, ValidationError};
use crate::state::ImageSource;

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    request_timeout: Option<Duration>,
}

impl GeminiClient {
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| Error::Config(format!("HTTP client build failed: {e}")))?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            request_timeout: config.request_timeout,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// True when `url` lives on the same origin as the configured API
    fn is_service_url(&self, url: &str) -> bool {
        match (reqwest::Url::parse(url), reqwest::Url::parse(&self.base_url)) {
            (Ok(url), Ok(base)) => url.origin() == base.origin(),
            _ => false,
        }
    }

    /// GET request for a generated file. Files served by the API itself
    /// need the key; other hosts never see it.
    pub fn file_request(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.http.get(url);
        if self.is_service_url(url) {
            request.header("x-goog-api-key", &self.api_key)
        } else {
            request
        }
    }

    /// Submit `(image, instruction)` and return the edited image.
    ///
    /// Empty image data or a blank instruction is rejected without a request.
    pub async fn submit_edit(&self, image_data: &str, mime_type: &str, instruction: &str) -> Result<ImageSource> {
        if image_data.is_empty() {
            return Err(ValidationError::EmptyImage.into());
        }
        if instruction.trim().is_empty() {
            return Err(ValidationError::BlankInstruction.into());
        }

        let body = build_request(image_data, mime_type, instruction.trim());
        let started = std::time::Instant::now();
        let send = self.send_json(&body);

        let text = match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, send).await.map_err(|_| {
                Error::service(format!(
                    "The edit service did not respond within {} seconds.",
                    limit.as_secs()
                ))
            })??,
            None => send.await?,
        };

        tracing::debug!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Edit service responded"
        );
        parse_response(&text)
    }

    async fn send_json(&self, body: &impl Serialize) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        if !(200..300).contains(&status) {
            return Err(Error::service(api_error_message(status, &text)));
        }
        Ok(text)
    }
}

// Wire types
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: [RequestPart<'a>; 2],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum RequestPart<'a> {
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: &'a str,
        data: &'a str,
    },
    Text(&'a str),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 2],
}

fn build_request<'a>(image_data: &'a str, mime_type: &'a str, instruction: &'a str) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: [RequestContent {
            role: "user",
            parts: [
                RequestPart::InlineData { mime_type, data: image_data },
                RequestPart::Text(instruction),
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: ["IMAGE", "TEXT"],
        },
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct ResponsePart {
    text: Option<String>,
    #[serde(alias = "inline_data")]
    inline_data: Option<InlineData>,
    #[serde(alias = "file_data")]
    file_data: Option<FileData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(alias = "mime_type")]
    mime_type: Option<String>,
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    #[serde(alias = "file_uri")]
    file_uri: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

fn parse_response(text: &str) -> Result<ImageSource> {
    let response: GenerateResponse = serde_json::from_str(text)
        .map_err(|e| Error::service(format!("Malformed response from the edit service: {e}")))?;

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(Error::service(format!("The request was blocked by the edit service ({reason}).")));
    }

    let mut model_text = Vec::new();
    let mut finish_reason = None;
    for candidate in response.candidates {
        finish_reason = finish_reason.or(candidate.finish_reason);
        let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
        for part in parts {
            if let Some(inline) = part.inline_data.filter(|d| !d.data.is_empty()) {
                return Ok(ImageSource::Inline {
                    mime_type: inline.mime_type.unwrap_or_else(|| "image/png".to_string()),
                    data: inline.data,
                });
            }
            if let Some(source) = part.file_data.and_then(|f| ImageSource::parse(&f.file_uri)) {
                return Ok(source);
            }
            if let Some(text) = part.text.filter(|t| !t.trim().is_empty()) {
                model_text.push(text);
            }
        }
    }

    if !model_text.is_empty() {
        return Err(Error::service(format!("No image was generated: {}", model_text.join(" ").trim())));
    }
    match finish_reason {
        Some(reason) if reason != "STOP" => Err(Error::service(format!("No image was generated ({reason})."))),
        _ => Err(Error::service("No image was generated.")),
    }
}

fn api_error_message(status: u16, body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.trim().is_empty() => parsed.error.message,
        _ => format!("Edit service returned HTTP {status}"),
    }
}
