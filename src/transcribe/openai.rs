// OpenAI Whisper adapter (multipart upload to /v1/audio/transcriptions)

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::provider::{ProviderError, TranscriptionProvider};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct OpenAiTranscriber {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiTranscriber {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Pull the human-readable message out of an OpenAI error body, falling
/// back to the raw body text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait::async_trait]
impl TranscriptionProvider for OpenAiTranscriber {
    async fn transcribe(
        &self,
        audio: &[u8],
        mime: &str,
        language: &str,
        vocabulary: &[String],
    ) -> Result<String, ProviderError> {
        let file_name = match mime {
            "audio/wav" => "chunk.wav",
            "audio/webm" | "audio/webm;codecs=opus" => "chunk.webm",
            _ => "chunk.bin",
        };

        let part = Part::bytes(audio.to_vec())
            .file_name(file_name)
            .mime_str(mime)
            .map_err(|e| ProviderError::Malformed(format!("invalid segment MIME: {}", e)))?;

        let mut form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("language", language.to_string());

        // Whisper takes vocabulary biasing as a free-text prompt
        if !vocabulary.is_empty() {
            form = form.text("prompt", vocabulary.join(", "));
        }

        debug!("Sending {} byte segment to OpenAI ({})", audio.len(), self.model);

        let response = self
            .client
            .post(format!("{}/audio/transcriptions", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(parsed.text)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
