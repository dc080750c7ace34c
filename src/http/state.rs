use crate::note::NoteGenerator;
use crate::store::{TemplateStore, VisitStore};
use crate::transcribe::ChunkTranscriber;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub transcriber: Arc<ChunkTranscriber>,
    pub generator: Arc<dyn NoteGenerator>,
    pub templates: Arc<dyn TemplateStore>,
    pub visits: Arc<dyn VisitStore>,
}

impl AppState {
    pub fn new(
        transcriber: Arc<ChunkTranscriber>,
        generator: Arc<dyn NoteGenerator>,
        templates: Arc<dyn TemplateStore>,
        visits: Arc<dyn VisitStore>,
    ) -> Self {
        Self {
            transcriber,
            generator,
            templates,
            visits,
        }
    }
}
