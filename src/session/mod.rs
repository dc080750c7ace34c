//! Recording session state machine
//!
//! Owns one capture backend, one transcriber and one assembler per session;
//! coordinates start/pause/resume/stop/cancel and guarantees stop() waits
//! for every in-flight chunk transcription before finalizing.

pub mod config;
pub mod session;
pub mod stats;

pub use config::SessionConfig;
pub use session::{RecordingSession, SessionError, StopOutcome};
pub use stats::{SessionState, SessionStats};
