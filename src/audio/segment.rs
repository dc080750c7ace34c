use anyhow::{Context, Result};
use std::io::Cursor;

/// MIME type declared for WAV-encoded segments
pub const WAV_MIME: &str = "audio/wav";

/// One encoded audio segment produced by a capture backend.
///
/// Segments carry a monotonically increasing sequence index assigned at
/// capture time. Each segment is a self-contained container (WAV for the
/// microphone backend) so it can be transcribed independently of its
/// neighbors. A segment is consumed exactly once by the transcriber.
#[derive(Debug, Clone)]
pub struct AudioSegment {
    /// Position in capture order (0-indexed)
    pub sequence: u64,

    /// Encoded audio bytes
    pub bytes: Vec<u8>,

    /// Declared MIME/codec string (e.g. "audio/wav")
    pub mime: String,
}

impl AudioSegment {
    pub fn new(sequence: u64, bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            sequence,
            bytes,
            mime: mime.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encode a slice of 16-bit PCM samples as an in-memory WAV container.
///
/// An empty sample slice still produces a valid (header-only) WAV file; the
/// transcriber treats such degenerate segments as empty without a network
/// call, so a tail flush with no audio is harmless.
pub fn encode_wav_segment(
    sequence: u64,
    samples: &[i16],
    sample_rate: u32,
    channels: u16,
) -> Result<AudioSegment> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .context("Failed to create WAV writer for segment")?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .context("Failed to write sample to segment")?;
        }
        writer
            .finalize()
            .context("Failed to finalize WAV segment")?;
    }

    Ok(AudioSegment::new(sequence, cursor.into_inner(), WAV_MIME))
}
