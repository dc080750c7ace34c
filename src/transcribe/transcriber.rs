use std::sync::Arc;
use tracing::{debug, warn};

use super::outcome::{classify_failure, TranscriptionOutcome};
use super::provider::{normalize_vocabulary, ProviderError, TranscriptionProvider};
use crate::audio::AudioSegment;

/// Segments below this size are never sent to a backend (avoids provider
/// errors on degenerate chunks)
pub const DEFAULT_MIN_CHUNK_BYTES: usize = 1000;

/// Transcribes one audio segment at a time against the configured provider
/// and normalizes every response or failure into a `TranscriptionOutcome`.
///
/// Invocations are independent; callers may run any number of them
/// concurrently. Completion order is unconstrained - sequencing is the
/// assembler's job.
pub struct ChunkTranscriber {
    provider: Arc<dyn TranscriptionProvider>,
    min_chunk_bytes: usize,
    language: String,
    vocabulary: Vec<String>,
}

impl ChunkTranscriber {
    pub fn new(
        provider: Arc<dyn TranscriptionProvider>,
        min_chunk_bytes: usize,
        language: impl Into<String>,
        vocabulary: &[String],
    ) -> Self {
        Self {
            provider,
            min_chunk_bytes,
            language: language.into(),
            vocabulary: normalize_vocabulary(vocabulary),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Transcribe a single segment. The segment is consumed; nothing else
    /// may hold a reference to it after dispatch.
    pub async fn transcribe(&self, segment: AudioSegment) -> TranscriptionOutcome {
        if segment.is_empty() {
            debug!("Segment {} is zero bytes, skipping backend", segment.sequence);
            return TranscriptionOutcome::Empty;
        }

        if segment.len() < self.min_chunk_bytes {
            debug!(
                "Segment {} is {} bytes (< {} minimum), skipping backend",
                segment.sequence,
                segment.len(),
                self.min_chunk_bytes
            );
            return TranscriptionOutcome::Empty;
        }

        match self
            .provider
            .transcribe(&segment.bytes, &segment.mime, &self.language, &self.vocabulary)
            .await
        {
            Ok(text) => {
                if text.trim().is_empty() {
                    TranscriptionOutcome::Empty
                } else {
                    TranscriptionOutcome::Text(text)
                }
            }
            Err(ProviderError::Status { status, message }) => {
                let outcome = classify_failure(Some(status), &message);
                if let TranscriptionOutcome::Ignorable { reason } = &outcome {
                    debug!(
                        "Segment {} ignorable ({}): {}",
                        segment.sequence, status, reason
                    );
                } else {
                    warn!(
                        "Segment {} failed ({}): {}",
                        segment.sequence, status, message
                    );
                }
                outcome
            }
            Err(e) => {
                warn!("Segment {} failed: {}", segment.sequence, e);
                TranscriptionOutcome::Fatal {
                    reason: e.to_string(),
                    status: e.status(),
                }
            }
        }
    }
}
