//! HTTP API for the stateless scribe operations
//!
//! - POST /transcribe - transcribe one multipart audio chunk
//! - POST /generate - generate a note from transcript + template
//! - GET/POST /templates, DELETE /templates/:id - template storage
//! - GET/POST /visits, DELETE /visits/:id - visit storage
//! - GET /health - health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
