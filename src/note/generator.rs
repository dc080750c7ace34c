// Note generation against a chat-completions backend

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::request::{NoteRequest, SCRIBE_SYSTEM_PROMPT};
use crate::config::{ConfigError, GenerationConfig};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Errors raised by note-generation backends. Always surfaced to the caller
/// as retryable: the finalized transcript is preserved, so a retry never
/// requires re-recording.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("note generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("note backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("note backend returned an empty note")]
    EmptyNote,

    #[error("unexpected note backend response: {0}")]
    Malformed(String),
}

/// Note-generation backend adapter
#[async_trait::async_trait]
pub trait NoteGenerator: Send + Sync {
    /// Produce a structured note for the given request
    async fn generate(&self, request: &NoteRequest) -> Result<String, GenerationError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// OpenAI chat-completions generator
pub struct OpenAiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: String, model: String, temperature: f32, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            temperature,
            base_url,
        }
    }

    /// Build a generator from configuration; fails before any network
    /// attempt when the credential is missing.
    pub fn from_config(config: &GenerationConfig) -> Result<Arc<dyn NoteGenerator>, ConfigError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingCredential {
                provider: "generation".to_string(),
                hint: "set generation.api_key or OPENAI_API_KEY".to_string(),
            })?;

        Ok(Arc::new(Self::new(
            api_key,
            config.model.clone(),
            config.temperature,
            config.base_url.clone(),
        )))
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait::async_trait]
impl NoteGenerator for OpenAiGenerator {
    async fn generate(&self, request: &NoteRequest) -> Result<String, GenerationError> {
        debug!(
            "Generating note ({} chars of transcript, model {})",
            request.transcript.len(),
            self.model
        );

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SCRIBE_SYSTEM_PROMPT },
                { "role": "user", "content": request.user_prompt() },
            ],
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Malformed(e.to_string()))?;

        let note = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        if note.trim().is_empty() {
            return Err(GenerationError::EmptyNote);
        }

        Ok(note)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
