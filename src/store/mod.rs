//! Storage ports for templates and completed visits
//!
//! The pipeline core never touches ambient state; it goes through these
//! injected ports. The JSON-file implementations are the default single-user
//! deployment.

pub mod defaults;
pub mod templates;
pub mod visits;

pub use defaults::built_in_templates;
pub use templates::{JsonTemplateStore, Template, TemplateStore};
pub use visits::{JsonVisitStore, NewVisit, Visit, VisitStore, MAX_VISITS};
