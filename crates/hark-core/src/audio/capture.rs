//! Live microphone capture session.
//!
//! A [`CaptureSession`] owns the input stream plus the two sinks its callback
//! writes into: the analyser ring for waveform display and the chunk buffer
//! holding the recording itself. Dropping the session (or calling
//! [`CaptureSession::finish`]) stops the callback, which releases the device.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use thiserror::Error;

use super::analyser::Analyser;
use super::chunk::{AudioChunk, ChunkBuffer};
use super::{devices, stream};

/// Reasons a capture session could not be opened or kept alive.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("microphone access denied by the operating system")]
    PermissionDenied,

    #[error("audio input device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("audio stream error: {0}")]
    Stream(String),
}

impl CaptureError {
    /// Sort a backend-specific error message into the permission bucket when
    /// it reads like one. cpal has no portable permission error, so this is
    /// as precise as it gets across hosts.
    fn from_message(msg: String) -> Self {
        let lower = msg.to_lowercase();
        if lower.contains("permission") || lower.contains("denied") || lower.contains("access") {
            CaptureError::PermissionDenied
        } else {
            CaptureError::Stream(msg)
        }
    }

    pub(super) fn from_build_error(err: cpal::BuildStreamError) -> Self {
        match err {
            cpal::BuildStreamError::DeviceNotAvailable => {
                CaptureError::DeviceUnavailable("device disappeared while opening stream".into())
            }
            cpal::BuildStreamError::StreamConfigNotSupported => {
                CaptureError::UnsupportedFormat("stream config rejected by device".into())
            }
            other => Self::from_message(other.to_string()),
        }
    }

    fn from_config_error(err: cpal::DefaultStreamConfigError) -> Self {
        match err {
            cpal::DefaultStreamConfigError::DeviceNotAvailable => {
                CaptureError::DeviceUnavailable("device disappeared while querying config".into())
            }
            cpal::DefaultStreamConfigError::StreamTypeNotSupported => {
                CaptureError::UnsupportedFormat("device offers no supported input config".into())
            }
            other => Self::from_message(other.to_string()),
        }
    }

    fn from_play_error(err: cpal::PlayStreamError) -> Self {
        match err {
            cpal::PlayStreamError::DeviceNotAvailable => {
                CaptureError::DeviceUnavailable("device disappeared while starting stream".into())
            }
            other => Self::from_message(other.to_string()),
        }
    }
}

/// An open microphone stream feeding the analyser and the chunk buffer.
pub struct CaptureSession {
    // Field order matters: the stream must drop before the sinks it writes to.
    stream: Stream,
    analyser: Arc<Mutex<Analyser>>,
    buffer: Arc<Mutex<ChunkBuffer>>,
    sample_rate: u32,
    device_name: String,
}

impl CaptureSession {
    /// Open the requested input device (or the system default) and start
    /// capturing immediately.
    ///
    /// `max_secs` caps the recording length; 0 means unlimited. The cap is
    /// converted to samples at the device's native rate.
    pub fn open(device_name: Option<&str>, max_secs: u64) -> Result<Self, CaptureError> {
        devices::init_platform();
        stream::reset_stream_error_count();

        let host = cpal::default_host();
        let (device, label) = find_device(&host, device_name)?;

        let supported = device
            .default_input_config()
            .map_err(CaptureError::from_config_error)?;
        let sample_format = supported.sample_format();
        let config: StreamConfig = supported.config();
        let sample_rate = config.sample_rate;

        let max_samples = (max_secs as usize).saturating_mul(sample_rate as usize);
        let analyser = Arc::new(Mutex::new(Analyser::new()));
        let buffer = Arc::new(Mutex::new(ChunkBuffer::new(max_samples)));

        let stream = match sample_format {
            cpal::SampleFormat::F32 => stream::build_input_stream::<f32>(
                &device,
                &config,
                analyser.clone(),
                buffer.clone(),
            )?,
            cpal::SampleFormat::I16 => stream::build_input_stream::<i16>(
                &device,
                &config,
                analyser.clone(),
                buffer.clone(),
            )?,
            cpal::SampleFormat::U16 => stream::build_input_stream::<u16>(
                &device,
                &config,
                analyser.clone(),
                buffer.clone(),
            )?,
            format => return Err(CaptureError::UnsupportedFormat(format.to_string())),
        };

        stream.play().map_err(CaptureError::from_play_error)?;

        crate::verbose!(
            "capture started on '{label}' at {sample_rate} Hz ({} channels downmixed)",
            config.channels
        );

        Ok(Self {
            stream,
            analyser,
            buffer,
            sample_rate,
            device_name: label,
        })
    }

    /// Byte snapshot of the newest analysis window, for waveform rendering.
    pub fn byte_snapshot(&self) -> Vec<u8> {
        self.analyser.lock().unwrap().byte_snapshot()
    }

    /// True once the chunk buffer has hit its sample cap.
    pub fn is_full(&self) -> bool {
        self.buffer.lock().unwrap().is_full()
    }

    /// Samples captured so far.
    pub fn captured_samples(&self) -> usize {
        self.buffer.lock().unwrap().total_samples()
    }

    /// Seconds of audio captured so far.
    pub fn elapsed_secs(&self) -> f32 {
        self.captured_samples() as f32 / self.sample_rate as f32
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Stop the stream and hand back everything captured.
    ///
    /// The stream is dropped before the drain, so no callback can append
    /// while or after the chunks are taken.
    pub(super) fn finish(self) -> (Vec<AudioChunk>, u32) {
        let Self {
            stream,
            buffer,
            sample_rate,
            ..
        } = self;
        drop(stream);
        let chunks = buffer.lock().unwrap().drain();
        (chunks, sample_rate)
    }
}

fn find_device(host: &cpal::Host, name: Option<&str>) -> Result<(Device, String), CaptureError> {
    match name {
        None => {
            let device = host.default_input_device().ok_or_else(|| {
                CaptureError::DeviceUnavailable("no input device available".into())
            })?;
            let label = device
                .description()
                .map(|d| d.to_string())
                .unwrap_or_else(|_| "default input".to_string());
            Ok((device, label))
        }
        Some(wanted) => {
            let devices = host
                .input_devices()
                .map_err(|e| CaptureError::from_message(e.to_string()))?;
            for device in devices {
                if let Ok(desc) = device.description() {
                    let label = desc.to_string();
                    if label == wanted {
                        return Ok((device, label));
                    }
                }
            }
            Err(CaptureError::DeviceUnavailable(wanted.to_string()))
        }
    }
}
