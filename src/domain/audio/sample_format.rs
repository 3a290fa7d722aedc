//! Sample format value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::SampleFormatParseError;

/// Binary representation of one captured sample.
///
/// Chunk payloads are always stored little-endian, matching the WAV
/// container layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SampleFormat {
    /// Unsigned 8-bit integer, offset binary (silence = 128)
    U8,
    /// Signed 16-bit integer
    #[default]
    I16,
    /// Signed 32-bit integer
    I32,
    /// 32-bit IEEE float
    F32,
}

impl SampleFormat {
    pub const ALL: [SampleFormat; 4] = [Self::U8, Self::I16, Self::I32, Self::F32];

    /// Width of one sample in bytes
    pub const fn sample_width(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::I16 => 2,
            Self::I32 | Self::F32 => 4,
        }
    }

    pub const fn bits_per_sample(&self) -> u16 {
        (self.sample_width() * 8) as u16
    }

    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F32)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::F32 => "f32",
        }
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleFormat {
    type Err = SampleFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "u8" => Ok(Self::U8),
            "i16" | "int16" => Ok(Self::I16),
            "i32" | "int32" => Ok(Self::I32),
            "f32" | "float32" => Ok(Self::F32),
            _ => Err(SampleFormatParseError {
                input: s.to_string(),
            }),
        }
    }
}

/// A primitive sample type that can be appended to a chunk payload.
pub trait PcmSample: Copy + Send + 'static {
    const FORMAT: SampleFormat;

    /// Append this sample's little-endian bytes to `out`
    fn extend_le_bytes(self, out: &mut Vec<u8>);
}

impl PcmSample for u8 {
    const FORMAT: SampleFormat = SampleFormat::U8;

    fn extend_le_bytes(self, out: &mut Vec<u8>) {
        out.push(self);
    }
}

impl PcmSample for i16 {
    const FORMAT: SampleFormat = SampleFormat::I16;

    fn extend_le_bytes(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl PcmSample for i32 {
    const FORMAT: SampleFormat = SampleFormat::I32;

    fn extend_le_bytes(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}

impl PcmSample for f32 {
    const FORMAT: SampleFormat = SampleFormat::F32;

    fn extend_le_bytes(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }
}
