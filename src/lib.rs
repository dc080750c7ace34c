pub mod audio;
pub mod config;
pub mod http;
pub mod note;
pub mod session;
pub mod store;
pub mod transcribe;
pub mod transcript;

pub use audio::{
    AudioCapture, AudioSegment, CaptureConfig, CaptureError, CaptureFactory, CaptureSource,
};
pub use config::{Config, ConfigError};
pub use http::{create_router, AppState};
pub use note::{NoteGenerator, NoteRequest, PatientInfo};
pub use session::{
    RecordingSession, SessionConfig, SessionError, SessionState, SessionStats, StopOutcome,
};
pub use store::{Template, TemplateStore, Visit, VisitStore};
pub use transcribe::{ChunkTranscriber, ProviderFactory, TranscriptionOutcome, TranscriptionProvider};
pub use transcript::{TranscriptAssembler, TranscriptFragment};
