// Deepgram adapter (raw bytes to /v1/listen)

use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::provider::{ProviderError, TranscriptionProvider};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub struct DeepgramTranscriber {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl DeepgramTranscriber {
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
struct ListenResponse {
    results: Option<ListenResults>,
}

#[derive(Debug, Deserialize)]
struct ListenResults {
    #[serde(default)]
    channels: Vec<Channel>,
    #[serde(default)]
    utterances: Vec<Utterance>,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

#[derive(Debug, Deserialize)]
struct Utterance {
    #[serde(default)]
    transcript: String,
}

#[derive(Debug, Deserialize)]
struct ListenError {
    #[serde(alias = "err_msg", alias = "reason")]
    message: Option<String>,
}

/// Normalize a Deepgram response to plain text: prefer the primary
/// alternative when non-blank, otherwise join the utterance-level
/// transcripts with single spaces.
fn normalize(response: &ListenResponse) -> String {
    let Some(results) = &response.results else {
        return String::new();
    };

    let primary = results
        .channels
        .first()
        .and_then(|c| c.alternatives.first())
        .map(|a| a.transcript.as_str())
        .unwrap_or("");

    if !primary.trim().is_empty() {
        return primary.to_string();
    }

    results
        .utterances
        .iter()
        .map(|u| u.transcript.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ListenError>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.to_string())
}

#[async_trait::async_trait]
impl TranscriptionProvider for DeepgramTranscriber {
    async fn transcribe(
        &self,
        audio: &[u8],
        mime: &str,
        language: &str,
        vocabulary: &[String],
    ) -> Result<String, ProviderError> {
        let mut request = self
            .client
            .post(format!("{}/v1/listen", self.base_url))
            .header("Authorization", format!("Token {}", self.api_key))
            .header("Content-Type", mime)
            .query(&[
                ("model", self.model.as_str()),
                ("language", language),
                ("smart_format", "true"),
            ])
            .timeout(REQUEST_TIMEOUT);

        for term in vocabulary {
            request = request.query(&[("keywords", term.as_str())]);
        }

        debug!(
            "Sending {} byte segment to Deepgram ({})",
            audio.len(),
            self.model
        );

        let response = request.body(audio.to_vec()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: ListenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        Ok(normalize(&parsed))
    }

    fn name(&self) -> &str {
        "deepgram"
    }
}
