use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lifecycle of a recording session.
///
/// Idle -> Recording <-> Paused -> Stopping -> Finalizing -> Complete, with
/// Cancelled reachable from anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Recording,
    Paused,
    Stopping,
    Finalizing,
    Complete,
    Cancelled,
}

/// Statistics about a recording session
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    /// Current lifecycle state
    pub state: SessionState,

    /// When recording started, if it has
    pub started_at: Option<DateTime<Utc>>,

    /// Seconds spent in the Recording state (pause does not reset this)
    pub elapsed_secs: u64,

    /// Number of segments handed to the transcriber
    pub segments_dispatched: usize,

    /// Number of fragments the assembler has accepted
    pub fragments_assembled: usize,

    /// Number of segments that failed with a fatal outcome
    pub failed_segments: usize,
}
