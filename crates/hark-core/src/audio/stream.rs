//! Input stream construction shared by all sample formats.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use cpal::traits::DeviceTrait;
use cpal::{Device, Stream, StreamConfig};

use super::analyser::Analyser;
use super::capture::CaptureError;
use super::chunk::ChunkBuffer;

/// Global counter for stream errors (reset per recording session).
/// Used to provide rate-limited, user-friendly error reporting.
static STREAM_ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

/// Reset the stream error counter (call at start of a new recording).
pub(super) fn reset_stream_error_count() {
    STREAM_ERROR_COUNT.store(0, Ordering::Relaxed);
}

/// Total stream errors seen since the last reset.
pub fn stream_error_count() -> u64 {
    STREAM_ERROR_COUNT.load(Ordering::Relaxed)
}

/// Build an input stream that downmixes to mono f32 and fans each callback
/// out to the analyser ring and the chunk buffer.
///
/// Every callback appends exactly one chunk, so chunk order matches capture
/// order. Appends are silently dropped once the buffer reports full; the
/// session owner is expected to notice and stop.
pub(super) fn build_input_stream<T>(
    device: &Device,
    config: &StreamConfig,
    analyser: Arc<Mutex<Analyser>>,
    buffer: Arc<Mutex<ChunkBuffer>>,
) -> Result<Stream, CaptureError>
where
    T: cpal::Sample + cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let channels = config.channels as usize;

    // Rate-limited error handler for ALSA stream errors. These are common on
    // Linux (especially with USB audio) and non-fatal.
    let err_fn = |err| {
        let count = STREAM_ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
        if count == 0 {
            crate::verbose!(
                "Audio stream error (common on Linux, non-fatal): {err}\n\
                 Subsequent similar errors will be suppressed."
            );
        } else if count.is_multiple_of(1000) {
            crate::verbose!("Audio stream: {count} non-fatal errors (recording continues)");
        }
    };

    let stream = device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                let mono = downmix_to_mono(data, channels);
                if mono.is_empty() {
                    return;
                }
                analyser.lock().unwrap().push(&mono);
                let _ = buffer.lock().unwrap().push(&mono);
            },
            err_fn,
            None,
        )
        .map_err(CaptureError::from_build_error)?;

    Ok(stream)
}

/// Convert interleaved frames to mono f32 by averaging channels.
fn downmix_to_mono<T>(data: &[T], channels: usize) -> Vec<f32>
where
    T: cpal::Sample + cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    if channels <= 1 {
        return data
            .iter()
            .map(|&s| -> f32 { cpal::Sample::from_sample(s) })
            .collect();
    }

    data.chunks_exact(channels)
        .map(|frame| {
            frame
                .iter()
                .map(|&s| -> f32 { cpal::Sample::from_sample(s) })
                .sum::<f32>()
                / channels as f32
        })
        .collect()
}
