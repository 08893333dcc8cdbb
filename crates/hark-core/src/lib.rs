pub mod audio;
pub mod settings;
pub mod transcribe;
pub mod verbose;

pub use audio::{
    AudioChunk, AudioClip, CaptureError, CaptureSession, Recorder, RecorderConfig, RecorderState,
    list_input_devices,
};
pub use settings::Settings;
pub use transcribe::{
    DEFAULT_TIMEOUT_SECS, TRANSCRIBE_ERROR_MESSAGE, TranscribeError, TranscriptionClient,
    validate_endpoint,
};
pub use verbose::set_verbose;
