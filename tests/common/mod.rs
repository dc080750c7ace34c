// Shared fixtures: scripted capture backend, scripted transcription
// provider, mock generator and an in-memory visit store.

#![allow(dead_code)]

use ambient_scribe::audio::{AudioCapture, AudioSegment, CaptureError, WAV_MIME};
use ambient_scribe::note::{GenerationError, NoteGenerator, NoteRequest};
use ambient_scribe::store::{NewVisit, Visit, VisitStore};
use ambient_scribe::transcribe::{ProviderError, TranscriptionProvider};
use anyhow::Result;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Build a segment whose payload is `size` copies of `key`; the scripted
/// provider dispatches on the first payload byte.
pub fn keyed_segment(sequence: u64, key: u8, size: usize) -> AudioSegment {
    AudioSegment::new(sequence, vec![key; size], WAV_MIME)
}

/// A provider response scripted per payload key
#[derive(Debug, Clone)]
pub struct Scripted {
    pub delay_ms: u64,
    pub result: Result<String, (u16, String)>,
}

impl Scripted {
    pub fn text(delay_ms: u64, text: &str) -> Self {
        Self {
            delay_ms,
            result: Ok(text.to_string()),
        }
    }

    pub fn failure(delay_ms: u64, status: u16, message: &str) -> Self {
        Self {
            delay_ms,
            result: Err((status, message.to_string())),
        }
    }
}

/// Transcription provider driven by a per-key script
pub struct ScriptedProvider {
    pub calls: AtomicUsize,
    script: HashMap<u8, Scripted>,
}

impl ScriptedProvider {
    pub fn new(script: HashMap<u8, Scripted>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            script,
        }
    }

    pub fn empty() -> Self {
        Self::new(HashMap::new())
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TranscriptionProvider for ScriptedProvider {
    async fn transcribe(
        &self,
        audio: &[u8],
        _mime: &str,
        _language: &str,
        _vocabulary: &[String],
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let key = audio.first().copied().unwrap_or(0);
        let Some(scripted) = self.script.get(&key).cloned() else {
            return Ok(String::new());
        };

        if scripted.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(scripted.delay_ms)).await;
        }

        match scripted.result {
            Ok(text) => Ok(text),
            Err((status, message)) => Err(ProviderError::Status { status, message }),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Capture backend that emits a fixed set of segments on start and an
/// optional tail segment on stop
pub struct ScriptedCapture {
    initial: Vec<AudioSegment>,
    tail: Option<AudioSegment>,
    deny_permission: bool,
    tx: Option<mpsc::Sender<AudioSegment>>,
}

impl ScriptedCapture {
    pub fn new(initial: Vec<AudioSegment>, tail: Option<AudioSegment>) -> Self {
        Self {
            initial,
            tail,
            deny_permission: false,
            tx: None,
        }
    }

    pub fn denied() -> Self {
        Self {
            initial: Vec::new(),
            tail: None,
            deny_permission: true,
            tx: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioCapture for ScriptedCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioSegment>, CaptureError> {
        if self.deny_permission {
            return Err(CaptureError::PermissionDenied(
                "microphone blocked".to_string(),
            ));
        }

        let (tx, rx) = mpsc::channel(64);
        for segment in self.initial.drain(..) {
            tx.send(segment)
                .await
                .map_err(|_| CaptureError::Device("receiver dropped".to_string()))?;
        }
        self.tx = Some(tx);
        Ok(rx)
    }

    async fn pause(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    async fn resume(&mut self) -> Result<(), CaptureError> {
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(tx) = self.tx.take() {
            if let Some(tail) = self.tail.take() {
                let _ = tx.send(tail).await;
            }
            // dropping tx closes the stream
        }
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.tx.is_some()
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Note generator returning a fixed note or failure, recording each request
pub struct MockGenerator {
    pub note: Result<String, String>,
    pub delay_ms: u64,
    pub requests: Mutex<Vec<NoteRequest>>,
}

impl MockGenerator {
    pub fn ok(note: &str) -> Self {
        Self {
            note: Ok(note.to_string()),
            delay_ms: 0,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            note: Err("backend unavailable".to_string()),
            delay_ms: 0,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A failing generator that takes `delay_ms` to answer
    pub fn failing_after(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            ..Self::failing()
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("mock lock").len()
    }
}

#[async_trait::async_trait]
impl NoteGenerator for MockGenerator {
    async fn generate(&self, request: &NoteRequest) -> Result<String, GenerationError> {
        self.requests
            .lock()
            .expect("mock lock")
            .push(request.clone());
        if self.delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.delay_ms)).await;
        }
        match &self.note {
            Ok(note) => Ok(note.clone()),
            Err(message) => Err(GenerationError::Status {
                status: 500,
                message: message.clone(),
            }),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// In-memory visit store
#[derive(Default)]
pub struct MemoryVisitStore {
    pub visits: Mutex<Vec<Visit>>,
}

impl MemoryVisitStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.visits.lock().expect("store lock").len()
    }
}

impl VisitStore for MemoryVisitStore {
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
        self.visits.lock().expect("store lock").insert(0, visit.clone());
        Ok(visit)
    }

    fn list(&self) -> Result<Vec<Visit>> {
        Ok(self.visits.lock().expect("store lock").clone())
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.visits.lock().expect("store lock").retain(|v| v.id != id);
        Ok(())
    }
}
