/// Normalized result of transcribing a single audio segment.
///
/// `Empty` and `Ignorable` both contribute an empty fragment to the
/// transcript; `Fatal` is logged by the session but never aborts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionOutcome {
    /// Provider returned usable text
    Text(String),

    /// Nothing to transcribe (degenerate or silent segment)
    Empty,

    /// Expected failure on a trailing sliver (too short / undecodable);
    /// absorbed silently as empty text
    Ignorable { reason: String },

    /// Unexpected provider or network failure; the chunk contributes
    /// nothing but the session continues
    Fatal {
        reason: String,
        status: Option<u16>,
    },
}

impl TranscriptionOutcome {
    pub fn is_fatal(&self) -> bool {
        matches!(self, TranscriptionOutcome::Fatal { .. })
    }
}

/// HTTP statuses a provider uses for degenerate audio
const IGNORABLE_STATUSES: [u16; 3] = [400, 415, 422];

/// Message substrings (matched case-insensitively) that mark a failure as
/// expected tail-chunk noise rather than a real error
const IGNORABLE_PATTERNS: [&str; 7] = [
    "too short",
    "empty",
    "could not decode",
    "undecodable",
    "unsupported",
    "invalid duration",
    "no audio",
];

/// Classify a provider failure as ignorable tail noise or a fatal error.
///
/// Ignorable requires BOTH a degenerate-audio status code and a matching
/// message; everything else is fatal.
pub fn classify_failure(status: Option<u16>, message: &str) -> TranscriptionOutcome {
    let ignorable_status = status.map(|s| IGNORABLE_STATUSES.contains(&s)).unwrap_or(false);
    if ignorable_status {
        let lowered = message.to_lowercase();
        if IGNORABLE_PATTERNS.iter().any(|p| lowered.contains(p)) {
            return TranscriptionOutcome::Ignorable {
                reason: message.to_string(),
            };
        }
    }

    TranscriptionOutcome::Fatal {
        reason: message.to_string(),
        status,
    }
}
