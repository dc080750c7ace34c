use super::state::AppState;
use crate::audio::AudioSegment;
use crate::note::{NoteRequest, PatientInfo};
use crate::store::NewVisit;
use crate::transcribe::TranscriptionOutcome;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub transcript: Option<String>,
    pub template: Option<String>,
    pub patient_name: Option<String>,
    pub patient_dob: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /transcribe
/// Transcribe one multipart audio chunk
pub async fn transcribe(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let mut audio: Option<(Vec<u8>, String)> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() == Some("audio") {
                    let mime = field
                        .content_type()
                        .unwrap_or("audio/webm")
                        .to_string();
                    match field.bytes().await {
                        Ok(bytes) => audio = Some((bytes.to_vec(), mime)),
                        Err(e) => {
                            return (
                                StatusCode::BAD_REQUEST,
                                Json(ErrorResponse::with_details(
                                    "Failed to read audio field",
                                    e.to_string(),
                                )),
                            )
                                .into_response();
                        }
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::with_details(
                        "Invalid multipart body",
                        e.to_string(),
                    )),
                )
                    .into_response();
            }
        }
    }

    let Some((bytes, mime)) = audio else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("No audio provided")),
        )
            .into_response();
    };

    // Single stateless chunk; sequence is meaningless here
    let segment = AudioSegment::new(0, bytes, mime);

    match state.transcriber.transcribe(segment).await {
        TranscriptionOutcome::Text(text) => {
            (StatusCode::OK, Json(TranscribeResponse { text })).into_response()
        }
        // Ignorable failures look like silence to the caller
        TranscriptionOutcome::Empty | TranscriptionOutcome::Ignorable { .. } => (
            StatusCode::OK,
            Json(TranscribeResponse {
                text: String::new(),
            }),
        )
            .into_response(),
        TranscriptionOutcome::Fatal { reason, status } => {
            error!("Transcription failed (status {:?}): {}", status, reason);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_details("Transcription failed", reason)),
            )
                .into_response()
        }
    }
}

/// POST /generate
/// Generate a structured note from a transcript and template
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> impl IntoResponse {
    let transcript = req.transcript.unwrap_or_default();
    let template = req.template.unwrap_or_default();

    if transcript.trim().is_empty() || template.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("transcript and template are required")),
        )
            .into_response();
    }

    let patient = PatientInfo::new(req.patient_name, req.patient_dob);
    let request = NoteRequest::build(transcript, template, Some(&patient));

    match state.generator.generate(&request).await {
        Ok(note) => {
            info!("Note generated ({} chars)", note.len());
            (StatusCode::OK, Json(GenerateResponse { note })).into_response()
        }
        Err(e) => {
            error!("Note generation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Note generation failed")),
            )
                .into_response()
        }
    }
}

/// GET /templates
pub async fn list_templates(State(state): State<AppState>) -> impl IntoResponse {
    match state.templates.list() {
        Ok(templates) => (StatusCode::OK, Json(templates)).into_response(),
        Err(e) => {
            error!("Failed to list templates: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to list templates")),
            )
                .into_response()
        }
    }
}

/// POST /templates
pub async fn create_template(
    State(state): State<AppState>,
    Json(req): Json<CreateTemplateRequest>,
) -> impl IntoResponse {
    let name = req.name.unwrap_or_default();
    let content = req.content.unwrap_or_default();

    if name.trim().is_empty() || content.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("name and content are required")),
        )
            .into_response();
    }

    match state.templates.save(name.trim(), &content) {
        Ok(template) => (StatusCode::OK, Json(template)).into_response(),
        Err(e) => {
            error!("Failed to save template: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to save template")),
            )
                .into_response()
        }
    }
}

/// DELETE /templates/:id
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.templates.delete(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete template {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to delete template")),
            )
                .into_response()
        }
    }
}

/// GET /visits
pub async fn list_visits(State(state): State<AppState>) -> impl IntoResponse {
    match state.visits.list() {
        Ok(visits) => (StatusCode::OK, Json(visits)).into_response(),
        Err(e) => {
            error!("Failed to list visits: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to list visits")),
            )
                .into_response()
        }
    }
}

/// POST /visits
/// Persist a completed transcript + note pair
pub async fn save_visit(
    State(state): State<AppState>,
    Json(req): Json<NewVisit>,
) -> impl IntoResponse {
    if req.note.trim().is_empty() || req.transcript.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("note and transcript are required")),
        )
            .into_response();
    }

    match state.visits.save(req) {
        Ok(visit) => (StatusCode::OK, Json(visit)).into_response(),
        Err(e) => {
            error!("Failed to save visit: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to save visit")),
            )
                .into_response()
        }
    }
}

/// DELETE /visits/:id
pub async fn delete_visit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.visits.delete(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            error!("Failed to delete visit {}: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to delete visit")),
            )
                .into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
