//! HTTP client for the transcription endpoint.
//!
//! The contract is a single multipart POST: the recording goes up as an
//! `audio` form part named `recording.wav` with an `audio/wav` content type,
//! and the response body comes back as the transcript verbatim. No JSON
//! envelope, no retries. Any 2xx status counts as success; everything else is
//! surfaced as [`TranscribeError::Status`], and failures to reach the server
//! at all as [`TranscribeError::Transport`].

use std::time::Duration;

use thiserror::Error;

use crate::audio::wav::{AudioClip, WAV_FILENAME, WAV_MIME};

/// Default request timeout for the transcription upload.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Fixed message shown to the user when transcription fails for any reason.
/// Details still go to verbose output for debugging.
pub const TRANSCRIBE_ERROR_MESSAGE: &str = "Error transcribing audio.";

/// Ways a transcription request can fail.
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("{0}")]
    InvalidEndpoint(String),

    #[error("transcription service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not reach transcription service: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client bound to one validated endpoint URL.
#[derive(Debug)]
pub struct TranscriptionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl TranscriptionClient {
    /// Build a client for the given endpoint with the given request timeout.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, TranscribeError> {
        let endpoint = validate_endpoint(endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TranscribeError::Transport)?;
        Ok(Self { client, endpoint })
    }

    /// Upload the clip and return the response body as the transcript.
    ///
    /// The body is passed through untouched; if the server wraps its result
    /// in JSON, the caller sees the JSON.
    pub async fn transcribe(&self, clip: &AudioClip) -> Result<String, TranscribeError> {
        let form = reqwest::multipart::Form::new().part(
            "audio",
            reqwest::multipart::Part::bytes(clip.data.clone())
                .file_name(WAV_FILENAME)
                .mime_str(WAV_MIME)?,
        );

        crate::verbose!(
            "uploading {} bytes ({:.1}s of audio) to {}",
            clip.data.len(),
            clip.duration_secs(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranscribeError::Status { status, body });
        }

        Ok(response.text().await?)
    }
}

/// Check that the endpoint looks like an HTTP URL with a host.
///
/// The URL is used exactly as configured (aside from whitespace trimming);
/// the path is the caller's business. Returns the trimmed URL.
pub fn validate_endpoint(url: &str) -> Result<String, TranscribeError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(TranscribeError::InvalidEndpoint(
            "Transcription endpoint not configured.\n\
             Set with: hark config --endpoint http://localhost:8765/transcribe"
                .into(),
        ));
    }

    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(TranscribeError::InvalidEndpoint(format!(
            "Invalid endpoint URL: must start with http:// or https://\n\
             Got: {trimmed}\n\
             Example: hark config --endpoint http://localhost:8765/transcribe"
        )));
    }

    let after_scheme = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .unwrap_or("");
    if after_scheme.is_empty() || after_scheme.starts_with('/') {
        return Err(TranscribeError::InvalidEndpoint(format!(
            "Invalid endpoint URL: missing host\n\
             Got: {trimmed}\n\
             Example: hark config --endpoint http://localhost:8765/transcribe"
        )));
    }

    Ok(trimmed.to_string())
}
