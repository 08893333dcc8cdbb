//! Microphone capture, waveform analysis, and WAV assembly.

pub mod analyser;
pub mod capture;
pub mod chunk;
pub mod devices;
pub mod recorder;
mod stream;
pub mod wav;

pub use analyser::{ANALYSIS_WINDOW, Analyser, SNAPSHOT_LEN};
pub use capture::{CaptureError, CaptureSession};
pub use chunk::{AudioChunk, ChunkBuffer};
pub use devices::{AudioDeviceInfo, list_input_devices};
pub use recorder::{Recorder, RecorderConfig, RecorderState};
pub use wav::AudioClip;
