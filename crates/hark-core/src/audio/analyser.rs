//! Time-domain analysis window for waveform display.
//!
//! The capture callback feeds every mono sample into a fixed ring of the most
//! recent [`ANALYSIS_WINDOW`] samples. The UI pulls a byte snapshot of the
//! newest half window each frame, quantized so that silence sits at byte 128
//! and full scale reaches 0 / 255. The snapshot is a copy; the lock is held
//! only long enough to read the ring.

/// Number of recent samples retained for analysis.
pub const ANALYSIS_WINDOW: usize = 2048;

/// Number of bytes returned per snapshot (newest half of the window).
pub const SNAPSHOT_LEN: usize = ANALYSIS_WINDOW / 2;

/// Byte value representing a zero-amplitude sample.
pub const BYTE_MIDPOINT: u8 = 128;

/// Ring buffer over the most recent capture samples.
pub struct Analyser {
    ring: Vec<f32>,
    pos: usize,
    filled: usize,
}

impl Analyser {
    pub fn new() -> Self {
        Self {
            ring: vec![0.0; ANALYSIS_WINDOW],
            pos: 0,
            filled: 0,
        }
    }

    /// Append samples, overwriting the oldest entries once the window is full.
    pub fn push(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.ring[self.pos] = sample;
            self.pos = (self.pos + 1) % ANALYSIS_WINDOW;
        }
        self.filled = (self.filled + samples.len()).min(ANALYSIS_WINDOW);
    }

    /// Drop all retained samples so the next snapshot reads as silence.
    pub fn reset(&mut self) {
        self.ring.fill(0.0);
        self.pos = 0;
        self.filled = 0;
    }

    /// Quantized view of the newest [`SNAPSHOT_LEN`] samples, oldest first.
    ///
    /// When fewer samples than that have been captured, the leading bytes
    /// read as the midpoint, so a fresh analyser yields a flat line.
    pub fn byte_snapshot(&self) -> Vec<u8> {
        let mut out = vec![BYTE_MIDPOINT; SNAPSHOT_LEN];
        let available = self.filled.min(SNAPSHOT_LEN);
        for i in 0..available {
            // Walk backwards from the write position: offset 1 is the newest
            // sample, offset `available` the oldest one included.
            let offset = available - i;
            let idx = (self.pos + ANALYSIS_WINDOW - offset) % ANALYSIS_WINDOW;
            out[SNAPSHOT_LEN - available + i] = sample_to_byte(self.ring[idx]);
        }
        out
    }
}

impl Default for Analyser {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a sample in [-1.0, 1.0] to an unsigned byte centred on 128.
fn sample_to_byte(sample: f32) -> u8 {
    (sample * 128.0 + 128.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_analyser_reads_as_silence() {
        let analyser = Analyser::new();
        let snapshot = analyser.byte_snapshot();
        assert_eq!(snapshot.len(), SNAPSHOT_LEN);
        assert!(snapshot.iter().all(|&b| b == BYTE_MIDPOINT));
    }

    #[test]
    fn byte_mapping_is_midpoint_centred_and_clamped() {
        assert_eq!(sample_to_byte(0.0), 128);
        assert_eq!(sample_to_byte(0.5), 192);
        assert_eq!(sample_to_byte(-0.5), 64);
        assert_eq!(sample_to_byte(-1.0), 0);
        // +1.0 would quantize to 256; it clamps to the top of the byte range.
        assert_eq!(sample_to_byte(1.0), 255);
        assert_eq!(sample_to_byte(9.0), 255);
        assert_eq!(sample_to_byte(-9.0), 0);
    }

    #[test]
    fn partial_fill_pads_oldest_bytes_with_midpoint() {
        let mut analyser = Analyser::new();
        analyser.push(&[0.5; 10]);
        let snapshot = analyser.byte_snapshot();
        assert!(snapshot[..SNAPSHOT_LEN - 10].iter().all(|&b| b == 128));
        assert!(snapshot[SNAPSHOT_LEN - 10..].iter().all(|&b| b == 192));
    }

    #[test]
    fn snapshot_keeps_newest_samples_in_order() {
        let mut analyser = Analyser::new();
        // Push more than a full window so the ring wraps.
        let ramp: Vec<f32> = (0..ANALYSIS_WINDOW + 500)
            .map(|i| (i % 200) as f32 / 400.0)
            .collect();
        analyser.push(&ramp);

        let snapshot = analyser.byte_snapshot();
        let expected: Vec<u8> = ramp[ramp.len() - SNAPSHOT_LEN..]
            .iter()
            .map(|&s| sample_to_byte(s))
            .collect();
        assert_eq!(snapshot, expected);
    }

    #[test]
    fn reset_returns_to_silence() {
        let mut analyser = Analyser::new();
        analyser.push(&[0.9; ANALYSIS_WINDOW]);
        analyser.reset();
        assert!(analyser.byte_snapshot().iter().all(|&b| b == BYTE_MIDPOINT));
    }
}
