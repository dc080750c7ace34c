use super::config::SessionConfig;
use super::stats::{SessionState, SessionStats};
use crate::audio::{AudioCapture, CaptureError, CaptureFactory, CaptureSource};
use crate::config::RecordingConfig;
use crate::note::{NoteGenerator, NoteRequest};
use crate::store::{NewVisit, Visit, VisitStore};
use crate::transcribe::{ChunkTranscriber, TranscriptionOutcome};
use crate::transcript::{TranscriptAssembler, TranscriptFragment};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    /// Microphone acquisition or device failure; permission errors leave
    /// the session Idle so the caller may retry
    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("cannot {op} while session is {state:?}")]
    InvalidState {
        op: &'static str,
        state: SessionState,
    },
}

/// Result of a completed stop()
#[derive(Debug)]
pub enum StopOutcome {
    /// The trimmed transcript was blank; no note request was constructed
    NoTranscript,

    /// Transcript finalized, note generated and visit persisted
    Completed {
        transcript: String,
        note: String,
        /// None when the visit store write failed (logged, non-fatal)
        visit: Option<Visit>,
    },

    /// Note generation failed; the finalized transcript and the built
    /// request are preserved so retrying needs no re-recording
    GenerationFailed {
        transcript: String,
        request: NoteRequest,
    },

    /// The session was cancelled while stopping; nothing was persisted
    Cancelled,
}

/// A recording session that owns audio capture, chunk transcription and
/// transcript assembly.
///
/// The session dispatches each captured segment to the transcriber as an
/// independent task and collects the join handles in a pending-set; stop()
/// awaits the whole set (including the forced tail flush) before reading
/// the assembled transcript. Fatal chunk outcomes are logged and counted
/// but never halt the session.
pub struct RecordingSession {
    config: SessionConfig,

    /// Exclusive owner of the microphone for the session's lifetime
    capture: Mutex<Box<dyn AudioCapture>>,

    transcriber: Arc<ChunkTranscriber>,
    generator: Arc<dyn NoteGenerator>,
    visits: Arc<dyn VisitStore>,

    state: Arc<Mutex<SessionState>>,

    /// Set once by cancel(); late completions observe it and become no-ops
    cancelled: Arc<AtomicBool>,

    started_at: Mutex<Option<DateTime<Utc>>>,

    /// Seconds spent in Recording; monotonic within the session
    elapsed_secs: Arc<AtomicU64>,

    assembler: Arc<Mutex<TranscriptAssembler>>,

    /// Join handles for every dispatched chunk transcription
    pending: Arc<Mutex<Vec<JoinHandle<()>>>>,

    dispatch_task: Mutex<Option<JoinHandle<()>>>,
    clock_task: Mutex<Option<JoinHandle<()>>>,

    segments_dispatched: Arc<AtomicUsize>,
    failed_segments: Arc<AtomicUsize>,
}

impl RecordingSession {
    pub fn new(
        config: SessionConfig,
        capture: Box<dyn AudioCapture>,
        transcriber: Arc<ChunkTranscriber>,
        generator: Arc<dyn NoteGenerator>,
        visits: Arc<dyn VisitStore>,
    ) -> Self {
        Self {
            config,
            capture: Mutex::new(capture),
            transcriber,
            generator,
            visits,
            state: Arc::new(Mutex::new(SessionState::Idle)),
            cancelled: Arc::new(AtomicBool::new(false)),
            started_at: Mutex::new(None),
            elapsed_secs: Arc::new(AtomicU64::new(0)),
            assembler: Arc::new(Mutex::new(TranscriptAssembler::new())),
            pending: Arc::new(Mutex::new(Vec::new())),
            dispatch_task: Mutex::new(None),
            clock_task: Mutex::new(None),
            segments_dispatched: Arc::new(AtomicUsize::new(0)),
            failed_segments: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Build a session with a capture backend created from configuration.
    /// The session's segment-interval override, when set, takes precedence
    /// over the recording default.
    pub fn for_source(
        config: SessionConfig,
        source: CaptureSource,
        recording: &RecordingConfig,
        transcriber: Arc<ChunkTranscriber>,
        generator: Arc<dyn NoteGenerator>,
        visits: Arc<dyn VisitStore>,
    ) -> Result<Self, SessionError> {
        let capture = CaptureFactory::create(source, config.capture_config(recording))?;
        Ok(Self::new(config, capture, transcriber, generator, visits))
    }

    /// Start recording. Fails with a capture error (and stays Idle) when
    /// the microphone cannot be acquired.
    pub async fn start(&self) -> Result<(), SessionError> {
        {
            let state = self.state.lock().await;
            if *state != SessionState::Idle {
                return Err(SessionError::InvalidState {
                    op: "start",
                    state: *state,
                });
            }
        }

        info!("Starting recording session: {}", self.config.session_id);

        // Acquire the microphone before any state change so a refusal
        // leaves the session Idle and retryable
        let mut segment_rx = self.capture.lock().await.start().await?;

        *self.state.lock().await = SessionState::Recording;
        *self.started_at.lock().await = Some(Utc::now());

        // Dispatch task: one transcription task per captured segment. The
        // loop ends when the capture closes the channel after the tail
        // flush, so by the time it finishes every dispatched segment has a
        // handle in the pending-set.
        let transcriber = Arc::clone(&self.transcriber);
        let assembler = Arc::clone(&self.assembler);
        let pending = Arc::clone(&self.pending);
        let cancelled = Arc::clone(&self.cancelled);
        let dispatched = Arc::clone(&self.segments_dispatched);
        let failed = Arc::clone(&self.failed_segments);

        let dispatch = tokio::spawn(async move {
            while let Some(segment) = segment_rx.recv().await {
                if cancelled.load(Ordering::SeqCst) {
                    continue; // drain and discard
                }

                let sequence = segment.sequence;
                dispatched.fetch_add(1, Ordering::SeqCst);

                let transcriber = Arc::clone(&transcriber);
                let assembler = Arc::clone(&assembler);
                let cancelled = Arc::clone(&cancelled);
                let failed = Arc::clone(&failed);

                let handle = tokio::spawn(async move {
                    let outcome = transcriber.transcribe(segment).await;

                    // A completion that fires after cancellation must not
                    // mutate assembler state
                    if cancelled.load(Ordering::SeqCst) {
                        return;
                    }

                    if let TranscriptionOutcome::Fatal { reason, status } = &outcome {
                        error!(
                            "Chunk {} transcription failed (status {:?}): {}",
                            sequence, status, reason
                        );
                        failed.fetch_add(1, Ordering::SeqCst);
                    }

                    assembler.lock().await.append(sequence, outcome);
                });

                pending.lock().await.push(handle);
            }

            info!("Segment dispatch finished");
        });

        *self.dispatch_task.lock().await = Some(dispatch);

        // Clock task: +1 per second only while Recording
        let state = Arc::clone(&self.state);
        let elapsed = Arc::clone(&self.elapsed_secs);

        let clock = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(std::time::Duration::from_secs(1));
            ticker.tick().await; // first tick completes immediately
            loop {
                ticker.tick().await;
                match *state.lock().await {
                    SessionState::Recording => {
                        elapsed.fetch_add(1, Ordering::SeqCst);
                    }
                    SessionState::Paused
                    | SessionState::Stopping
                    | SessionState::Finalizing => {}
                    SessionState::Complete | SessionState::Cancelled | SessionState::Idle => {
                        break
                    }
                }
            }
        });

        *self.clock_task.lock().await = Some(clock);

        info!("Recording session started");

        Ok(())
    }

    /// Pause recording; no-op when already paused
    pub async fn pause(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        match *state {
            SessionState::Paused => Ok(()),
            SessionState::Recording => {
                self.capture.lock().await.pause().await?;
                *state = SessionState::Paused;
                info!("Session paused at {}s", self.elapsed_secs.load(Ordering::SeqCst));
                Ok(())
            }
            s => Err(SessionError::InvalidState { op: "pause", state: s }),
        }
    }

    /// Resume recording; no-op when already recording
    pub async fn resume(&self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        match *state {
            SessionState::Recording => Ok(()),
            SessionState::Paused => {
                self.capture.lock().await.resume().await?;
                *state = SessionState::Recording;
                info!("Session resumed");
                Ok(())
            }
            s => Err(SessionError::InvalidState { op: "resume", state: s }),
        }
    }

    /// Stop recording: flush the tail segment, await every in-flight
    /// transcription, finalize the transcript, generate the note and
    /// persist the visit.
    pub async fn stop(&self) -> Result<StopOutcome, SessionError> {
        {
            let mut state = self.state.lock().await;
            match *state {
                SessionState::Recording | SessionState::Paused => {
                    *state = SessionState::Stopping;
                }
                s => return Err(SessionError::InvalidState { op: "stop", state: s }),
            }
        }

        info!("Stopping recording session: {}", self.config.session_id);

        // Flush the tail segment and release the microphone; this closes
        // the segment channel
        self.capture.lock().await.stop().await?;

        // The dispatch loop only ends once the channel is closed, which
        // guarantees the tail's transcription is in the pending-set
        if let Some(task) = self.dispatch_task.lock().await.take() {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    error!("Dispatch task panicked: {}", e);
                }
            }
        }

        // Await the entire pending-set, tail included
        let handles: Vec<JoinHandle<()>> = self.pending.lock().await.drain(..).collect();
        for result in futures::future::join_all(handles).await {
            if let Err(e) = result {
                if !e.is_cancelled() {
                    error!("Transcription task panicked: {}", e);
                }
            }
        }

        if self.cancelled.load(Ordering::SeqCst) {
            return Ok(StopOutcome::Cancelled);
        }

        *self.state.lock().await = SessionState::Finalizing;

        let transcript = self.assembler.lock().await.final_text();
        if transcript.is_empty() {
            info!("Session produced no transcript");
            *self.state.lock().await = SessionState::Complete;
            return Ok(StopOutcome::NoTranscript);
        }

        info!(
            "Transcript finalized ({} chars), generating note",
            transcript.len()
        );

        let request = NoteRequest::build(
            transcript.clone(),
            self.config.template_body.clone(),
            Some(&self.config.patient),
        );

        match self.generator.generate(&request).await {
            Ok(note) => {
                // Cancellation during generation discards everything
                if self.cancelled.load(Ordering::SeqCst) {
                    return Ok(StopOutcome::Cancelled);
                }

                let visit = match self.visits.save(NewVisit {
                    template_name: self.config.template_name.clone(),
                    patient_name: request.patient_name.clone(),
                    patient_dob: request.patient_dob.clone(),
                    note: note.clone(),
                    transcript: transcript.clone(),
                }) {
                    Ok(visit) => Some(visit),
                    Err(e) => {
                        warn!("Failed to persist visit: {}", e);
                        None
                    }
                };

                *self.state.lock().await = SessionState::Complete;
                info!("Recording session complete");

                Ok(StopOutcome::Completed {
                    transcript,
                    note,
                    visit,
                })
            }
            Err(e) => {
                // Cancellation during generation discards the failure too;
                // the Cancelled state must not be overwritten
                if self.cancelled.load(Ordering::SeqCst) {
                    return Ok(StopOutcome::Cancelled);
                }

                warn!("Note generation failed: {}", e);
                *self.state.lock().await = SessionState::Complete;
                Ok(StopOutcome::GenerationFailed {
                    transcript,
                    request,
                })
            }
        }
    }

    /// Cancel the session: release the microphone immediately, discard all
    /// pending transcription results and persist nothing.
    pub async fn cancel(&self) -> Result<(), SessionError> {
        if self.cancelled.swap(true, Ordering::SeqCst) {
            return Ok(()); // already cancelled
        }

        info!("Cancelling recording session: {}", self.config.session_id);

        if let Err(e) = self.capture.lock().await.stop().await {
            warn!("Failed to stop capture during cancel: {}", e);
        }

        if let Some(task) = self.dispatch_task.lock().await.take() {
            task.abort();
        }
        for handle in self.pending.lock().await.drain(..) {
            handle.abort();
        }

        *self.state.lock().await = SessionState::Cancelled;

        info!("Recording session cancelled");

        Ok(())
    }

    pub async fn state(&self) -> SessionState {
        *self.state.lock().await
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    /// The current partial transcript
    pub async fn live_transcript(&self) -> String {
        self.assembler.lock().await.live_text()
    }

    /// Sequence-ordered fragments for display
    pub async fn fragments(&self) -> Vec<TranscriptFragment> {
        self.assembler.lock().await.fragments()
    }

    /// Get current session statistics
    pub async fn stats(&self) -> SessionStats {
        SessionStats {
            state: *self.state.lock().await,
            started_at: *self.started_at.lock().await,
            elapsed_secs: self.elapsed_secs.load(Ordering::SeqCst),
            segments_dispatched: self.segments_dispatched.load(Ordering::SeqCst),
            fragments_assembled: self.assembler.lock().await.len(),
            failed_segments: self.failed_segments.load(Ordering::SeqCst),
        }
    }
}
