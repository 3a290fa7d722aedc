//! WAV encoder port interface

use std::fs::File;

use thiserror::Error;

use crate::domain::audio::SampleFormat;

/// WAV encoding errors
#[derive(Debug, Clone, Error)]
pub enum EncodingError {
    #[error("Failed to create output file: {0}")]
    CreateFailed(String),

    #[error("Failed to write WAV data: {0}")]
    WriteFailed(String),
}

/// Container parameters for a WAV file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    pub channels: u16,
    pub sample_rate: u32,
    pub sample_format: SampleFormat,
}

impl WavFormat {
    /// Sample width in bytes
    pub const fn sample_width(&self) -> usize {
        self.sample_format.sample_width()
    }
}

/// Port for writing a raw interleaved payload as a WAV container
pub trait WavEncoder {
    /// Encode `payload` (little-endian samples) into `dest`.
    ///
    /// The caller owns `dest` and closes it whatever the outcome.
    fn encode(&self, format: &WavFormat, payload: &[u8], dest: &mut File)
        -> Result<(), EncodingError>;
}
