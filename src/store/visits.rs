use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Visits kept per store; oldest are dropped past this cap
pub const MAX_VISITS: usize = 50;

/// A completed encounter: one per completed session, never mutated by the
/// pipeline, deleted only by explicit user action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: String,
    pub date: DateTime<Utc>,
    pub template_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_dob: Option<String>,
    pub note: String,
    pub transcript: String,
}

/// Fields for a visit about to be persisted (id and date are assigned by
/// the store)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
    pub template_name: String,
    pub patient_name: Option<String>,
    pub patient_dob: Option<String>,
    pub note: String,
    pub transcript: String,
}

/// Visit storage port. The pipeline writes exactly once per completed
/// session and never reads back.
pub trait VisitStore: Send + Sync {
    /// Persist a completed visit; returns it with id and date assigned
    fn save(&self, visit: NewVisit) -> Result<Visit>;

    /// Visits newest-first
    fn list(&self) -> Result<Vec<Visit>>;

    fn delete(&self, id: &str) -> Result<()>;
}

/// JSON-file-backed visit store, newest-first, capped at `MAX_VISITS`
pub struct JsonVisitStore {
    path: PathBuf,
}

impl JsonVisitStore {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create visit store directory: {:?}", parent))?;
        }
        info!("Visit store at {:?}", path);
        Ok(Self { path })
    }

    fn read_all(&self) -> Result<Vec<Visit>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read visit store: {:?}", self.path))?;
        serde_json::from_str(&raw).context("Visit store file is corrupt")
    }

    fn write_all(&self, visits: &[Visit]) -> Result<()> {
        let raw = serde_json::to_string_pretty(visits).context("Failed to encode visits")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write visit store: {:?}", self.path))
    }
}

impl VisitStore for JsonVisitStore {
    fn save(&self, visit: NewVisit) -> Result<Visit> {
        let visit = Visit {
            id: format!("visit-{}", uuid::Uuid::new_v4()),
            date: Utc::now(),
            template_name: visit.template_name,
            patient_name: visit.patient_name,
            patient_dob: visit.patient_dob,
            note: visit.note,
            transcript: visit.transcript,
        };

        let mut visits = self.read_all()?;
        visits.insert(0, visit.clone());
        visits.truncate(MAX_VISITS);
        self.write_all(&visits)?;

        info!("Saved visit {} ({})", visit.id, visit.template_name);
        Ok(visit)
    }

    fn list(&self) -> Result<Vec<Visit>> {
        self.read_all()
    }

    fn delete(&self, id: &str) -> Result<()> {
        let visits: Vec<Visit> = self
            .read_all()?
            .into_iter()
            .filter(|v| v.id != id)
            .collect();
        self.write_all(&visits)
    }
}
