use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems that must surface before any network attempt
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing credential for {provider} ({hint})")]
    MissingCredential { provider: String, hint: String },

    #[error("unknown transcription provider: {0}")]
    UnknownProvider(String),
}

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub transcription: TranscriptionConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub recording: RecordingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptionConfig {
    /// Backend adapter: "openai" or "deepgram"
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Segments below this size are resolved as empty without a backend call
    #[serde(default = "default_min_chunk_bytes")]
    pub min_chunk_bytes: usize,

    /// Domain vocabulary hints (de-duplicated, capped at 100 terms)
    #[serde(default)]
    pub vocabulary: Vec<String>,

    #[serde(default)]
    pub openai: OpenAiProviderConfig,

    #[serde(default)]
    pub deepgram: DeepgramProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct OpenAiProviderConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_whisper_model")]
    pub model: String,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct DeepgramProviderConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_deepgram_model")]
    pub model: String,
    #[serde(default = "default_deepgram_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct GenerationConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// Kept low so the note leans deterministic
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct RecordingConfig {
    /// Length of each audio segment in seconds
    #[serde(default = "default_segment_secs")]
    pub segment_secs: u64,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_channels")]
    pub channels: u16,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// Directory holding templates.json and visits.json
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl StorageConfig {
    pub fn templates_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("templates.json")
    }

    pub fn visits_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("visits.json")
    }
}

impl Config {
    /// Load from an optional config file, overridden by SCRIBE__* environment
    /// variables (e.g. SCRIBE__TRANSCRIPTION__PROVIDER=deepgram).
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SCRIBE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

fn default_service_name() -> String {
    "ambient-scribe".to_string()
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_min_chunk_bytes() -> usize {
    1000
}

fn default_whisper_model() -> String {
    "whisper-1".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_deepgram_model() -> String {
    "nova-2".to_string()
}

fn default_deepgram_base_url() -> String {
    "https://api.deepgram.com".to_string()
}

fn default_generation_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_segment_secs() -> u64 {
    30
}

fn default_sample_rate() -> u32 {
    16000
}

fn default_channels() -> u16 {
    1
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            language: default_language(),
            min_chunk_bytes: default_min_chunk_bytes(),
            vocabulary: Vec::new(),
            openai: OpenAiProviderConfig::default(),
            deepgram: DeepgramProviderConfig::default(),
        }
    }
}

impl Default for OpenAiProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_whisper_model(),
            base_url: default_openai_base_url(),
        }
    }
}

impl Default for DeepgramProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_deepgram_model(),
            base_url: default_deepgram_base_url(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_generation_model(),
            temperature: default_temperature(),
            base_url: default_openai_base_url(),
        }
    }
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            segment_secs: default_segment_secs(),
            sample_rate: default_sample_rate(),
            channels: default_channels(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}
