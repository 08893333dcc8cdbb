//! Ordered chunk storage for an in-progress recording.
//!
//! Each capture callback appends one chunk; assembly concatenates them in
//! arrival order, so the buffer is strictly append-only while a recording is
//! live. A configurable sample cap bounds memory: the append that would cross
//! the cap is clipped to land exactly on it and the buffer is marked full,
//! after which further appends are rejected. The owner is expected to stop
//! the recording when it observes the full flag.

/// One capture callback's worth of mono samples.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub samples: Vec<f32>,
}

/// Append-only list of [`AudioChunk`]s with an optional sample cap.
pub struct ChunkBuffer {
    chunks: Vec<AudioChunk>,
    total_samples: usize,
    /// 0 = unlimited
    max_samples: usize,
    full: bool,
}

impl ChunkBuffer {
    pub fn new(max_samples: usize) -> Self {
        Self {
            chunks: Vec::new(),
            total_samples: 0,
            max_samples,
            full: false,
        }
    }

    /// Append one chunk. Returns false if the buffer is already full and the
    /// samples were dropped.
    pub fn push(&mut self, samples: &[f32]) -> bool {
        if self.full {
            return false;
        }
        if samples.is_empty() {
            return true;
        }

        let mut samples = samples;
        if self.max_samples > 0 {
            let remaining = self.max_samples - self.total_samples;
            if samples.len() >= remaining {
                samples = &samples[..remaining];
                self.full = true;
            }
        }

        self.total_samples += samples.len();
        self.chunks.push(AudioChunk {
            samples: samples.to_vec(),
        });
        true
    }

    /// True once the sample cap has been reached.
    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Total samples across all chunks.
    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Discard everything and clear the full flag, ready for a new recording.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.total_samples = 0;
        self.full = false;
    }

    /// Take all chunks out of the buffer, leaving it empty.
    pub fn drain(&mut self) -> Vec<AudioChunk> {
        self.total_samples = 0;
        self.full = false;
        std::mem::take(&mut self.chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(chunks: &[AudioChunk]) -> Vec<f32> {
        chunks.iter().flat_map(|c| c.samples.clone()).collect()
    }

    #[test]
    fn chunks_concatenate_in_arrival_order() {
        let mut buffer = ChunkBuffer::new(0);
        buffer.push(&[1.0, 2.0]);
        buffer.push(&[3.0]);
        buffer.push(&[4.0, 5.0, 6.0]);

        assert_eq!(buffer.chunk_count(), 3);
        assert_eq!(buffer.total_samples(), 6);
        let chunks = buffer.drain();
        assert_eq!(flatten(&chunks), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn drain_leaves_buffer_empty() {
        let mut buffer = ChunkBuffer::new(0);
        buffer.push(&[0.1, 0.2]);
        let _ = buffer.drain();
        assert_eq!(buffer.chunk_count(), 0);
        assert_eq!(buffer.total_samples(), 0);
    }

    #[test]
    fn clear_resets_for_a_new_recording() {
        let mut buffer = ChunkBuffer::new(4);
        buffer.push(&[0.0; 4]);
        assert!(buffer.is_full());

        buffer.clear();
        assert!(!buffer.is_full());
        assert_eq!(buffer.total_samples(), 0);
        assert!(buffer.push(&[0.5]));
    }

    #[test]
    fn crossing_chunk_is_clipped_to_the_cap() {
        let mut buffer = ChunkBuffer::new(5);
        assert!(buffer.push(&[1.0, 2.0, 3.0]));
        assert!(!buffer.is_full());
        // Three more samples would cross the cap of five; only two fit.
        assert!(buffer.push(&[4.0, 5.0, 6.0]));
        assert!(buffer.is_full());
        assert_eq!(buffer.total_samples(), 5);

        // Once full, appends are rejected outright.
        assert!(!buffer.push(&[7.0]));
        assert_eq!(buffer.total_samples(), 5);

        let chunks = buffer.drain();
        assert_eq!(flatten(&chunks), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn chunk_landing_exactly_on_the_cap_marks_full() {
        let mut buffer = ChunkBuffer::new(4);
        assert!(buffer.push(&[1.0, 2.0, 3.0, 4.0]));
        assert!(buffer.is_full());
        assert_eq!(buffer.total_samples(), 4);
    }

    #[test]
    fn zero_cap_means_unlimited() {
        let mut buffer = ChunkBuffer::new(0);
        for _ in 0..100 {
            assert!(buffer.push(&[0.0; 1024]));
        }
        assert!(!buffer.is_full());
        assert_eq!(buffer.total_samples(), 102_400);
    }
}
