use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::info;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Errors from the vision-to-text model call. The pipeline makes a single
/// attempt; callers log and stop, there is no retry.
#[derive(Debug, Error)]
pub enum VisionError {
    #[error("vision request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("vision API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("vision API returned no text")]
    EmptyResponse,
}

/// Interface to the external vision-to-text model
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Submit an image and an instruction, await a single text response
    async fn extract_text(&self, image_jpeg: &[u8], instruction: &str)
        -> Result<String, VisionError>;
}

/// Vision client backed by the model provider's generateContent REST API
pub struct HttpVisionClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl HttpVisionClient {
    pub fn new(http: reqwest::Client, base_url: String, model: String, api_key: String) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

#[async_trait]
impl VisionClient for HttpVisionClient {
    async fn extract_text(
        &self,
        image_jpeg: &[u8],
        instruction: &str,
    ) -> Result<String, VisionError> {
        info!(
            "Submitting {} byte image to vision model {}",
            image_jpeg.len(),
            self.model
        );

        let body = json!({
            "contents": [{
                "parts": [
                    { "text": instruction },
                    {
                        "inline_data": {
                            "mime_type": "image/jpeg",
                            "data": BASE64.encode(image_jpeg),
                        }
                    }
                ]
            }]
        });

        let response = self.http.post(self.endpoint()).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(VisionError::Api { status, message });
        }

        let parsed = response.json::<GenerateContentResponse>().await?;
        let text: String = parsed
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(VisionError::EmptyResponse);
        }

        Ok(text)
    }
}
