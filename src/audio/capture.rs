use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

use super::segment::AudioSegment;

/// Errors raised by capture backends
#[derive(Debug, Error)]
pub enum CaptureError {
    /// Microphone access was refused or no input device is available.
    /// Starting a session fails but remains retryable.
    #[error("microphone access denied or unavailable: {0}")]
    PermissionDenied(String),

    /// The device was acquired but the stream failed afterwards
    #[error("audio device error: {0}")]
    Device(String),

    #[error("capture already started")]
    AlreadyCapturing,

    #[error("capture is not active")]
    NotActive,
}

/// Configuration for capture backends
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Length of each segment while recording (tail segments may be shorter)
    pub segment_interval: Duration,

    /// Target sample rate for PCM accumulation
    pub sample_rate: u32,

    /// Number of channels (1 = mono)
    pub channels: u16,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            segment_interval: Duration::from_secs(30),
            sample_rate: 16000,
            channels: 1,
        }
    }
}

/// Audio capture backend trait
///
/// A backend holds the microphone exclusively from `start()` until `stop()`
/// and emits one `AudioSegment` per elapsed interval while recording.
/// `stop()` flushes a final partial tail segment (possibly empty) and then
/// closes the channel, which is the end-of-stream signal. Pausing keeps the
/// device attached but stops segment production.
#[async_trait::async_trait]
pub trait AudioCapture: Send + Sync {
    /// Start capturing audio
    ///
    /// Returns a channel receiver that will receive encoded segments.
    /// Fails with `CaptureError::PermissionDenied` when the microphone
    /// cannot be acquired.
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioSegment>, CaptureError>;

    /// Suspend segment production without releasing the device
    async fn pause(&mut self) -> Result<(), CaptureError>;

    /// Resume segment production
    async fn resume(&mut self) -> Result<(), CaptureError>;

    /// Flush the tail segment, release the microphone and close the stream
    async fn stop(&mut self) -> Result<(), CaptureError>;

    /// Check if backend currently holds the device
    fn is_capturing(&self) -> bool;

    /// Get backend name for logging
    fn name(&self) -> &str;
}

/// Capture source type
#[derive(Debug, Clone)]
pub enum CaptureSource {
    /// Default system microphone (cpal)
    Microphone,
}

/// Capture backend factory
pub struct CaptureFactory;

impl CaptureFactory {
    pub fn create(
        source: CaptureSource,
        config: CaptureConfig,
    ) -> Result<Box<dyn AudioCapture>, CaptureError> {
        match source {
            CaptureSource::Microphone => {
                use super::microphone::MicrophoneCapture;
                Ok(Box::new(MicrophoneCapture::new(config)))
            }
        }
    }
}
