//! In-memory WAV assembly for finished recordings.
//!
//! Recordings are encoded as 16-bit signed PCM, mono, at the capture sample
//! rate. Encoding happens once, at stop time, from the drained chunk list.

use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result};

use super::chunk::AudioChunk;

/// MIME type attached to uploaded recordings.
pub const WAV_MIME: &str = "audio/wav";

/// Filename attached to uploaded recordings.
pub const WAV_FILENAME: &str = "recording.wav";

/// A finished recording, encoded and ready to upload or save.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Complete WAV file bytes (header + data).
    pub data: Vec<u8>,
    pub sample_rate: u32,
    pub sample_count: usize,
}

impl AudioClip {
    /// Encode the chunk list into a WAV clip.
    pub fn from_chunks(chunks: &[AudioChunk], sample_rate: u32) -> Result<Self> {
        let sample_count = chunks.iter().map(|c| c.samples.len()).sum();
        let data = encode_wav(chunks, sample_rate)?;
        Ok(Self {
            data,
            sample_rate,
            sample_count,
        })
    }

    /// Recording length in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.sample_count as f32 / self.sample_rate as f32
    }

    /// Write the clip to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.data)
            .with_context(|| format!("Failed to write {}", path.display()))
    }
}

fn encode_wav(chunks: &[AudioChunk], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut bytes = Vec::new();
    {
        let cursor = Cursor::new(&mut bytes);
        let mut writer =
            hound::WavWriter::new(cursor, spec).context("Failed to start WAV encoding")?;
        for chunk in chunks {
            for &sample in &chunk.samples {
                writer.write_sample((sample.clamp(-1.0, 1.0) * 32767.0) as i16)?;
            }
        }
        writer.finalize().context("Failed to finalize WAV data")?;
    }
    Ok(bytes)
}
