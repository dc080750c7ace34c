//! Chunk transcription against pluggable backend providers
//!
//! One `ChunkTranscriber` serves a whole session: each dispatched segment is
//! an independent call, failures are classified as ignorable tail noise or
//! fatal, and the result is always a uniform `TranscriptionOutcome`.

pub mod deepgram;
pub mod openai;
pub mod outcome;
pub mod provider;
pub mod transcriber;

pub use deepgram::DeepgramTranscriber;
pub use openai::OpenAiTranscriber;
pub use outcome::{classify_failure, TranscriptionOutcome};
pub use provider::{
    normalize_vocabulary, ProviderError, ProviderFactory, TranscriptionProvider,
    MAX_VOCABULARY_TERMS,
};
pub use transcriber::{ChunkTranscriber, DEFAULT_MIN_CHUNK_BYTES};
