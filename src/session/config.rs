use std::time::Duration;

use crate::audio::CaptureConfig;
use crate::config::RecordingConfig;
use crate::note::PatientInfo;

/// Configuration for a recording session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Unique session identifier
    pub session_id: String,

    /// Per-session override of the configured segment interval
    pub segment_interval: Option<Duration>,

    /// Name of the selected note template (recorded on the visit)
    pub template_name: String,

    /// Body of the selected note template
    pub template_body: String,

    /// Optional patient metadata for the note header and visit record
    pub patient: PatientInfo,
}

impl SessionConfig {
    pub fn new(template_name: impl Into<String>, template_body: impl Into<String>) -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            segment_interval: None,
            template_name: template_name.into(),
            template_body: template_body.into(),
            patient: PatientInfo::default(),
        }
    }

    pub fn with_patient(mut self, patient: PatientInfo) -> Self {
        self.patient = patient;
        self
    }

    pub fn with_segment_interval(mut self, interval: Duration) -> Self {
        self.segment_interval = Some(interval);
        self
    }

    /// Capture settings for this session: device format from the recording
    /// config, segment interval from the session when overridden.
    pub fn capture_config(&self, recording: &RecordingConfig) -> CaptureConfig {
        CaptureConfig {
            segment_interval: self
                .segment_interval
                .unwrap_or_else(|| Duration::from_secs(recording.segment_secs)),
            sample_rate: recording.sample_rate,
            channels: recording.channels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_config_follows_recording_settings() {
        let config = SessionConfig::new("Template", "BODY");
        let recording = RecordingConfig {
            segment_secs: 20,
            sample_rate: 48_000,
            channels: 2,
        };

        let capture = config.capture_config(&recording);
        assert_eq!(capture.segment_interval, Duration::from_secs(20));
        assert_eq!(capture.sample_rate, 48_000);
        assert_eq!(capture.channels, 2);
    }

    #[test]
    fn session_interval_overrides_recording_default() {
        let config = SessionConfig::new("Template", "BODY")
            .with_segment_interval(Duration::from_secs(10));
        let recording = RecordingConfig::default();

        let capture = config.capture_config(&recording);
        assert_eq!(capture.segment_interval, Duration::from_secs(10));
        assert_eq!(capture.sample_rate, recording.sample_rate);
    }
}
