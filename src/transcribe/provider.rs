use std::sync::Arc;
use thiserror::Error;

use crate::config::{ConfigError, TranscriptionConfig};

/// Maximum number of domain vocabulary hints forwarded to a provider
pub const MAX_VOCABULARY_TERMS: usize = 100;

/// Errors raised by transcription backend adapters
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network-level failure (no HTTP status available)
    #[error("transcription request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("provider returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Provider answered 2xx but the payload was not in the expected shape
    #[error("unexpected provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Transport(e) => e.status().map(|s| s.as_u16()),
            ProviderError::Status { status, .. } => Some(*status),
            ProviderError::Malformed(_) => None,
        }
    }
}

/// Transcription backend adapter
///
/// One implementation per provider; all share the same external contract so
/// the transcriber's outcome classification is provider-independent.
#[async_trait::async_trait]
pub trait TranscriptionProvider: Send + Sync {
    /// Transcribe encoded audio bytes to plain text.
    ///
    /// `vocabulary` is an already-normalized list of domain terms the
    /// provider may use for biasing; adapters are free to ignore it.
    async fn transcribe(
        &self,
        audio: &[u8],
        mime: &str,
        language: &str,
        vocabulary: &[String],
    ) -> Result<String, ProviderError>;

    /// Provider name for logging
    fn name(&self) -> &str;
}

/// De-duplicate (case-insensitively, first occurrence wins) and cap the
/// vocabulary hint list.
pub fn normalize_vocabulary(terms: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    terms
        .iter()
        .filter_map(|t| {
            let trimmed = t.trim();
            if trimmed.is_empty() {
                return None;
            }
            seen.insert(trimmed.to_lowercase())
                .then(|| trimmed.to_string())
        })
        .take(MAX_VOCABULARY_TERMS)
        .collect()
}

/// Transcription provider factory
///
/// Selects an adapter from configuration at construction time. Missing
/// credentials fail here, before any network attempt.
pub struct ProviderFactory;

impl ProviderFactory {
    pub fn create(
        config: &TranscriptionConfig,
    ) -> Result<Arc<dyn TranscriptionProvider>, ConfigError> {
        match config.provider.as_str() {
            "openai" => {
                let openai = &config.openai;
                let api_key = resolve_key(openai.api_key.as_deref(), "OPENAI_API_KEY")
                    .ok_or_else(|| ConfigError::MissingCredential {
                        provider: "openai".to_string(),
                        hint: "set transcription.openai.api_key or OPENAI_API_KEY".to_string(),
                    })?;
                Ok(Arc::new(super::openai::OpenAiTranscriber::new(
                    api_key,
                    openai.model.clone(),
                    openai.base_url.clone(),
                )))
            }
            "deepgram" => {
                let deepgram = &config.deepgram;
                let api_key = resolve_key(deepgram.api_key.as_deref(), "DEEPGRAM_API_KEY")
                    .ok_or_else(|| ConfigError::MissingCredential {
                        provider: "deepgram".to_string(),
                        hint: "set transcription.deepgram.api_key or DEEPGRAM_API_KEY".to_string(),
                    })?;
                Ok(Arc::new(super::deepgram::DeepgramTranscriber::new(
                    api_key,
                    deepgram.model.clone(),
                    deepgram.base_url.clone(),
                )))
            }
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}

fn resolve_key(configured: Option<&str>, env_var: &str) -> Option<String> {
    configured
        .map(|k| k.to_string())
        .filter(|k| !k.trim().is_empty())
        .or_else(|| std::env::var(env_var).ok().filter(|k| !k.trim().is_empty()))
}
