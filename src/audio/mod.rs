pub mod capture;
pub mod microphone;
pub mod segment;

pub use capture::{AudioCapture, CaptureConfig, CaptureError, CaptureFactory, CaptureSource};
pub use microphone::MicrophoneCapture;
pub use segment::{encode_wav_segment, AudioSegment, WAV_MIME};
