//! Note request assembly and generation
//!
//! A `NoteRequest` is only ever built from a finalized transcript; the
//! generator behind the `NoteGenerator` seam turns it into a structured
//! clinical note.

pub mod generator;
pub mod request;

pub use generator::{GenerationError, NoteGenerator, OpenAiGenerator};
pub use request::{NoteRequest, PatientInfo, SCRIBE_SYSTEM_PROMPT};
