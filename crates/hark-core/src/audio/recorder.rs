//! Recording controller: a strict Idle/Recording state machine.
//!
//! `start` opens a fresh capture session (fresh chunk buffer, fresh analyser),
//! so a new recording can never inherit audio from the previous one. `stop`
//! tears the session down, drains the chunks once, and encodes them into an
//! [`AudioClip`]. Both are safe to call in either state; the call that does
//! not apply is a no-op.

use anyhow::Result;

use super::capture::{CaptureError, CaptureSession};
use super::wav::AudioClip;

/// Configuration for the recorder.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Device name to use (None = system default)
    pub device_name: Option<String>,

    /// Maximum recording length in seconds (0 = unlimited)
    pub max_secs: u64,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            device_name: None,
            max_secs: 600,
        }
    }
}

impl RecorderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the device name.
    pub fn with_device(mut self, device_name: impl Into<String>) -> Self {
        self.device_name = Some(device_name.into());
        self
    }

    /// Set the recording length cap in seconds (0 = unlimited).
    pub fn with_max_secs(mut self, max_secs: u64) -> Self {
        self.max_secs = max_secs;
        self
    }
}

/// Observable recorder state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// Owns at most one live [`CaptureSession`] at a time.
pub struct Recorder {
    config: RecorderConfig,
    session: Option<CaptureSession>,
}

impl Recorder {
    pub fn new(config: RecorderConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    pub fn state(&self) -> RecorderState {
        if self.session.is_some() {
            RecorderState::Recording
        } else {
            RecorderState::Idle
        }
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// The live capture session, while recording.
    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    /// Begin a new recording. Does nothing if one is already running.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.session.is_some() {
            crate::verbose!("start ignored: already recording");
            return Ok(());
        }
        let session =
            CaptureSession::open(self.config.device_name.as_deref(), self.config.max_secs)?;
        self.session = Some(session);
        Ok(())
    }

    /// Stop the current recording and encode what was captured.
    ///
    /// Returns `None` when no recording is running. The capture stream is
    /// detached before the chunk buffer is drained, so the drain happens
    /// exactly once per recording.
    pub fn stop(&mut self) -> Result<Option<AudioClip>> {
        let Some(session) = self.session.take() else {
            crate::verbose!("stop ignored: not recording");
            return Ok(None);
        };

        let (chunks, sample_rate) = session.finish();
        let clip = AudioClip::from_chunks(&chunks, sample_rate)?;
        crate::verbose!(
            "recording stopped: {} chunks, {:.1}s at {} Hz",
            chunks.len(),
            clip.duration_secs(),
            sample_rate
        );
        let stream_errors = super::stream::stream_error_count();
        if stream_errors > 0 {
            crate::verbose!("{stream_errors} non-fatal stream errors during capture");
        }
        Ok(Some(clip))
    }
}
