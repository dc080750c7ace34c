// Default microphone backend using cpal
//
// The cpal stream is !Send, so it lives on a dedicated thread that feeds a
// shared PCM buffer. A tokio task slices the buffer into WAV segments every
// interval and flushes a final partial segment on stop.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::capture::{AudioCapture, CaptureConfig, CaptureError};
use super::segment::{encode_wav_segment, AudioSegment};

/// How often the segmenter checks the PCM buffer
const SEGMENTER_TICK_MS: u64 = 200;

type SampleBuffer = Arc<Mutex<Vec<i16>>>;

pub struct MicrophoneCapture {
    config: CaptureConfig,
    inner: Option<Inner>,
}

struct Inner {
    paused: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    stop_tx: std::sync::mpsc::Sender<()>,
    stream_thread: Option<std::thread::JoinHandle<()>>,
    segmenter: Option<JoinHandle<()>>,
}

impl MicrophoneCapture {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            inner: None,
        }
    }
}

#[async_trait::async_trait]
impl AudioCapture for MicrophoneCapture {
    async fn start(&mut self) -> Result<mpsc::Receiver<AudioSegment>, CaptureError> {
        if self.inner.is_some() {
            return Err(CaptureError::AlreadyCapturing);
        }

        info!("Starting microphone capture");

        let buffer: SampleBuffer = Arc::new(Mutex::new(Vec::new()));
        let paused = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));

        let (stop_tx, stop_rx) = std::sync::mpsc::channel();
        let (ready_tx, ready_rx) = oneshot::channel();

        // Device acquisition and stream lifetime are confined to this thread.
        // The stream is dropped (microphone released) when the thread exits,
        // on stop and on every error path alike.
        let thread_buffer = Arc::clone(&buffer);
        let thread_paused = Arc::clone(&paused);
        let thread_config = self.config.clone();
        let stream_thread = std::thread::spawn(move || {
            run_stream(thread_config, thread_buffer, thread_paused, ready_tx, stop_rx);
        });

        match ready_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = stream_thread.join();
                return Err(e);
            }
            Err(_) => {
                return Err(CaptureError::Device(
                    "capture thread exited before opening the stream".to_string(),
                ));
            }
        }

        let (seg_tx, seg_rx) = mpsc::channel(16);

        let seg_buffer = Arc::clone(&buffer);
        let seg_shutdown = Arc::clone(&shutdown);
        let config = self.config.clone();
        let segmenter = tokio::spawn(async move {
            run_segmenter(config, seg_buffer, seg_shutdown, seg_tx).await;
        });

        self.inner = Some(Inner {
            paused,
            shutdown,
            stop_tx,
            stream_thread: Some(stream_thread),
            segmenter: Some(segmenter),
        });

        info!("Microphone capture started");

        Ok(seg_rx)
    }

    async fn pause(&mut self) -> Result<(), CaptureError> {
        let inner = self.inner.as_ref().ok_or(CaptureError::NotActive)?;
        inner.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&mut self) -> Result<(), CaptureError> {
        let inner = self.inner.as_ref().ok_or(CaptureError::NotActive)?;
        inner.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), CaptureError> {
        let Some(mut inner) = self.inner.take() else {
            return Ok(());
        };

        info!("Stopping microphone capture");

        // Release the device first so no more samples arrive, then let the
        // segmenter flush whatever is buffered as the tail segment.
        let _ = inner.stop_tx.send(());
        if let Some(handle) = inner.stream_thread.take() {
            let _ = tokio::task::spawn_blocking(move || handle.join()).await;
        }

        inner.shutdown.store(true, Ordering::SeqCst);
        if let Some(segmenter) = inner.segmenter.take() {
            if let Err(e) = segmenter.await {
                error!("Segmenter task panicked: {}", e);
            }
        }

        info!("Microphone capture stopped");

        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.inner.is_some()
    }

    fn name(&self) -> &str {
        "cpal microphone"
    }
}

impl Drop for MicrophoneCapture {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            // Unblocks the stream thread so the device is released even when
            // stop() was never called.
            let _ = inner.stop_tx.send(());
            inner.shutdown.store(true, Ordering::SeqCst);
            warn!("Microphone capture dropped without stop(); device released");
        }
    }
}

fn lock_buffer(buffer: &SampleBuffer) -> std::sync::MutexGuard<'_, Vec<i16>> {
    buffer.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Opens the input stream and parks until told to stop.
fn run_stream(
    config: CaptureConfig,
    buffer: SampleBuffer,
    paused: Arc<AtomicBool>,
    ready_tx: oneshot::Sender<Result<(), CaptureError>>,
    stop_rx: std::sync::mpsc::Receiver<()>,
) {
    match build_stream(&config, buffer, paused) {
        Ok(stream) => {
            if let Err(e) = stream.play() {
                let _ = ready_tx.send(Err(CaptureError::Device(e.to_string())));
                return;
            }
            let _ = ready_tx.send(Ok(()));

            // Block until stop() or the sender is dropped
            let _ = stop_rx.recv();
            drop(stream);
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
        }
    }
}

fn build_stream(
    config: &CaptureConfig,
    buffer: SampleBuffer,
    paused: Arc<AtomicBool>,
) -> Result<cpal::Stream, CaptureError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or_else(|| CaptureError::PermissionDenied("no input device available".to_string()))?;

    info!(
        "Audio input device: {}",
        device.name().unwrap_or_else(|_| "unknown".to_string())
    );

    let supported = device
        .default_input_config()
        .map_err(|e| CaptureError::PermissionDenied(e.to_string()))?;

    let native_rate = supported.sample_rate().0;
    let native_channels = supported.channels();
    let target_rate = config.sample_rate;
    let target_channels = config.channels;

    info!(
        "Audio config: native {}Hz/{}ch, target {}Hz/{}ch",
        native_rate, native_channels, target_rate, target_channels
    );

    let err_fn = |err| error!("Input stream error: {}", err);

    let stream = match supported.sample_format() {
        cpal::SampleFormat::F32 => device.build_input_stream(
            &supported.into(),
            move |data: &[f32], _: &_| {
                if paused.load(Ordering::SeqCst) {
                    return;
                }
                let samples: Vec<i16> = data
                    .iter()
                    .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
                    .collect();
                push_samples(
                    &buffer,
                    samples,
                    native_rate,
                    native_channels,
                    target_rate,
                    target_channels,
                );
            },
            err_fn,
            None,
        ),
        cpal::SampleFormat::I16 => device.build_input_stream(
            &supported.into(),
            move |data: &[i16], _: &_| {
                if paused.load(Ordering::SeqCst) {
                    return;
                }
                push_samples(
                    &buffer,
                    data.to_vec(),
                    native_rate,
                    native_channels,
                    target_rate,
                    target_channels,
                );
            },
            err_fn,
            None,
        ),
        other => {
            return Err(CaptureError::Device(format!(
                "unsupported sample format: {:?}",
                other
            )))
        }
    };

    stream.map_err(|e| match e {
        cpal::BuildStreamError::DeviceNotAvailable => {
            CaptureError::PermissionDenied("input device not available".to_string())
        }
        e => CaptureError::Device(e.to_string()),
    })
}

/// Convert a native frame to the target format and append it to the buffer
fn push_samples(
    buffer: &SampleBuffer,
    samples: Vec<i16>,
    native_rate: u32,
    native_channels: u16,
    target_rate: u32,
    target_channels: u16,
) {
    let mut samples = samples;

    if native_channels > 1 && target_channels == 1 {
        samples = mix_to_mono(&samples, native_channels);
    }

    if native_rate != target_rate {
        samples = resample(&samples, native_rate, target_rate);
    }

    lock_buffer(buffer).extend_from_slice(&samples);
}

/// Downmix interleaved channels to mono by averaging each frame
fn mix_to_mono(samples: &[i16], channels: u16) -> Vec<i16> {
    let n = channels as usize;
    samples
        .chunks_exact(n)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / n as i32) as i16
        })
        .collect()
}

/// Resample between arbitrary rates using linear interpolation, so the
/// buffered PCM is actually at the rate the WAV header declares. Output
/// length is `len * target_rate / native_rate`, rounded up.
fn resample(samples: &[i16], native_rate: u32, target_rate: u32) -> Vec<i16> {
    if native_rate == target_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = target_rate as f64 / native_rate as f64;
    let output_len = (samples.len() as f64 * ratio).ceil() as usize;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let src_pos = i as f64 / ratio;
        let idx = src_pos as usize;
        let frac = (src_pos - idx as f64) as f32;

        let sample = if idx + 1 < samples.len() {
            samples[idx] as f32 * (1.0 - frac) + samples[idx + 1] as f32 * frac
        } else if idx < samples.len() {
            samples[idx] as f32
        } else {
            0.0
        };

        output.push(sample.round() as i16);
    }

    output
}

/// Emits one segment per elapsed interval while recording, then a final
/// partial tail segment on shutdown. Dropping the sender at the end of this
/// task is the end-of-stream signal.
async fn run_segmenter(
    config: CaptureConfig,
    buffer: SampleBuffer,
    shutdown: Arc<AtomicBool>,
    seg_tx: mpsc::Sender<AudioSegment>,
) {
    let samples_per_segment = (config.sample_rate as u128
        * config.channels as u128
        * config.segment_interval.as_millis()
        / 1000) as usize;

    let mut sequence: u64 = 0;

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        tokio::time::sleep(std::time::Duration::from_millis(SEGMENTER_TICK_MS)).await;

        // The buffer only grows while recording (the callback drops input
        // while paused), so pausing produces no segments.
        let ready = lock_buffer(&buffer).len() >= samples_per_segment;
        if !ready {
            continue;
        }

        let samples: Vec<i16> = lock_buffer(&buffer).drain(..).collect();
        match encode_wav_segment(sequence, &samples, config.sample_rate, config.channels) {
            Ok(segment) => {
                info!(
                    "Segment {} ready ({} samples, {} bytes)",
                    sequence,
                    samples.len(),
                    segment.len()
                );
                if seg_tx.send(segment).await.is_err() {
                    return; // receiver gone, session cancelled
                }
                sequence += 1;
            }
            Err(e) => error!("Failed to encode segment {}: {}", sequence, e),
        }
    }

    // Tail flush: always emit the final partial segment, even when empty
    let samples: Vec<i16> = lock_buffer(&buffer).drain(..).collect();
    match encode_wav_segment(sequence, &samples, config.sample_rate, config.channels) {
        Ok(segment) => {
            info!(
                "Tail segment {} ready ({} samples, {} bytes)",
                sequence,
                samples.len(),
                segment.len()
            );
            let _ = seg_tx.send(segment).await;
        }
        Err(e) => error!("Failed to encode tail segment {}: {}", sequence, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_downmix_averages_without_clipping() {
        // Full-scale stereo must not wrap or clip
        let loud = vec![i16::MAX, i16::MAX, i16::MIN, i16::MIN];
        assert_eq!(mix_to_mono(&loud, 2), vec![i16::MAX, i16::MIN]);

        let mixed = vec![20_000, 30_000, -10_000, 10_000];
        assert_eq!(mix_to_mono(&mixed, 2), vec![25_000, 0]);
    }

    #[test]
    fn resample_44100_to_16000_yields_target_rate_count() {
        // One second of 44.1 kHz input becomes ~16000 samples, so the PCM
        // matches the 16 kHz WAV header (decimation by a truncated integer
        // ratio would leave 22050)
        let input = vec![100i16; 44_100];
        let out = resample(&input, 44_100, 16_000);
        assert!(out.len().abs_diff(16_000) <= 1, "got {} samples", out.len());
    }

    #[test]
    fn resample_constant_signal_preserves_amplitude() {
        let input = vec![1200i16; 4410];
        for sample in resample(&input, 44_100, 16_000) {
            assert_eq!(sample, 1200);
        }
    }

    #[test]
    fn resample_interpolates_between_neighbors() {
        // 16k -> 8k halves the length; each kept point lands on an input
        // sample or midway between two
        let input = vec![0i16, 1000, 2000, 3000];
        assert_eq!(resample(&input, 16_000, 8_000), vec![0, 2000]);

        // 8k -> 16k doubles the length with midpoints filled in
        let up = resample(&[0i16, 1000], 8_000, 16_000);
        assert_eq!(up, vec![0, 500, 1000, 1000]);
    }

    #[test]
    fn resample_matching_rates_is_noop() {
        let input = vec![5i16, -5, 7];
        assert_eq!(resample(&input, 16_000, 16_000), input);
        assert!(resample(&[], 44_100, 16_000).is_empty());
    }
}
