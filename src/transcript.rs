//! Ordered transcript assembly from out-of-order chunk completions

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

use crate::transcribe::TranscriptionOutcome;

/// A single positioned piece of the transcript
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptFragment {
    pub sequence: u64,
    pub text: String,
}

/// Accumulates transcript fragments keyed by capture sequence.
///
/// Network completion order is not submission order, so the join is always
/// re-derived from sequence-sorted fragments rather than append order.
/// `Empty` and `Ignorable` outcomes occupy their sequence slot with empty
/// text; `Fatal` outcomes leave a gap that is silently skipped.
#[derive(Debug, Default)]
pub struct TranscriptAssembler {
    fragments: BTreeMap<u64, String>,
}

impl TranscriptAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, sequence: u64, outcome: TranscriptionOutcome) {
        let text = match outcome {
            TranscriptionOutcome::Text(text) => text,
            TranscriptionOutcome::Empty | TranscriptionOutcome::Ignorable { .. } => String::new(),
            TranscriptionOutcome::Fatal { .. } => return,
        };

        if self.fragments.contains_key(&sequence) {
            warn!("Duplicate fragment for sequence {}, keeping first", sequence);
            return;
        }

        self.fragments.insert(sequence, text);
    }

    /// Number of fragments recorded so far (including empty slots)
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragments in sequence order, for live display
    pub fn fragments(&self) -> Vec<TranscriptFragment> {
        self.fragments
            .iter()
            .map(|(&sequence, text)| TranscriptFragment {
                sequence,
                text: text.clone(),
            })
            .collect()
    }

    /// The current partial transcript: space-joined non-empty fragments in
    /// sequence order
    pub fn live_text(&self) -> String {
        self.fragments
            .values()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The final transcript, trimmed of leading/trailing whitespace
    pub fn final_text(&self) -> String {
        self.live_text().trim().to_string()
    }
}
