//! Captured audio chunk value object

use super::sample_format::{PcmSample, SampleFormat};

/// One callback's worth of mono samples, as raw little-endian bytes.
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    bytes: Vec<u8>,
    format: SampleFormat,
}

impl Chunk {
    /// Copy a slice of delivered samples into a new chunk
    pub fn from_samples<T: PcmSample>(samples: &[T]) -> Self {
        let mut bytes = Vec::with_capacity(samples.len() * T::FORMAT.sample_width());
        for &sample in samples {
            sample.extend_le_bytes(&mut bytes);
        }
        Self {
            bytes,
            format: T::FORMAT,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Number of frames (mono, so one sample per frame)
    pub fn frames(&self) -> usize {
        self.bytes.len() / self.format.sample_width()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
