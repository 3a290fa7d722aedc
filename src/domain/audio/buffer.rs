//! Ordered buffer of captured chunks

use super::chunk::Chunk;
use super::sample_format::SampleFormat;
use crate::domain::error::UnsupportedFormatError;

/// Divisor mapping i16 into [-1.0, 1.0)
const I16_SCALE: f32 = 32768.0;

/// Append-only sequence of chunks in arrival order.
#[derive(Debug, Clone, Default)]
pub struct ChunkBuffer {
    chunks: Vec<Chunk>,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: Chunk) {
        self.chunks.push(chunk);
    }

    /// Drop every chunk (start of a new session)
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Sum of per-chunk frame counts
    pub fn total_frames(&self) -> usize {
        self.chunks.iter().map(Chunk::frames).sum()
    }

    /// Captured length in seconds; 0.0 when nothing was captured
    pub fn duration_secs(&self, sample_rate: u32) -> f64 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.total_frames() as f64 / f64::from(sample_rate)
    }

    /// All chunk payloads joined in arrival order
    pub fn concat_bytes(&self) -> Vec<u8> {
        let len = self.chunks.iter().map(|c| c.bytes().len()).sum();
        let mut out = Vec::with_capacity(len);
        for chunk in &self.chunks {
            out.extend_from_slice(chunk.bytes());
        }
        out
    }

    /// Rescale the buffer to floats in [-1.0, 1.0).
    ///
    /// Only `I16` is supported; every other format yields an error naming it.
    pub fn normalized(&self, format: SampleFormat) -> Result<Vec<f32>, UnsupportedFormatError> {
        match format {
            SampleFormat::I16 => Ok(self
                .concat_bytes()
                .chunks_exact(2)
                .map(|b| f32::from(i16::from_le_bytes([b[0], b[1]])) / I16_SCALE)
                .collect()),
            SampleFormat::U8 | SampleFormat::I32 | SampleFormat::F32 => {
                Err(UnsupportedFormatError { format })
            }
        }
    }
}
