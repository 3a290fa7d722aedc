//! WAV encoder using hound
//!
//! Writes the raw little-endian payload sample by sample so the data chunk
//! of the resulting file is byte-identical to the input.

use std::fs::File;
use std::io::BufWriter;

use hound::{WavSpec, WavWriter};

use crate::application::ports::{EncodingError, WavEncoder, WavFormat};
use crate::domain::audio::SampleFormat;

/// WAV encoder backed by hound
#[derive(Debug, Clone, Copy, Default)]
pub struct HoundWavEncoder;

impl HoundWavEncoder {
    pub fn new() -> Self {
        Self
    }

    fn spec(format: &WavFormat) -> WavSpec {
        WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: format.sample_format.bits_per_sample(),
            sample_format: if format.sample_format.is_float() {
                hound::SampleFormat::Float
            } else {
                hound::SampleFormat::Int
            },
        }
    }

    fn write_payload<W>(
        writer: &mut WavWriter<W>,
        format: SampleFormat,
        payload: &[u8],
    ) -> hound::Result<()>
    where
        W: std::io::Write + std::io::Seek,
    {
        let width = format.sample_width();
        for b in payload.chunks_exact(width) {
            match format {
                // hound stores 8-bit samples as offset binary, so shift back to signed
                SampleFormat::U8 => writer.write_sample((i16::from(b[0]) - 128) as i8)?,
                SampleFormat::I16 => writer.write_sample(i16::from_le_bytes([b[0], b[1]]))?,
                SampleFormat::I32 => {
                    writer.write_sample(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))?
                }
                SampleFormat::F32 => {
                    writer.write_sample(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))?
                }
            }
        }
        Ok(())
    }
}

impl WavEncoder for HoundWavEncoder {
    fn encode(
        &self,
        format: &WavFormat,
        payload: &[u8],
        dest: &mut File,
    ) -> Result<(), EncodingError> {
        let write_err = |e: hound::Error| EncodingError::WriteFailed(e.to_string());

        let mut writer =
            WavWriter::new(BufWriter::new(dest), Self::spec(format)).map_err(write_err)?;

        Self::write_payload(&mut writer, format.sample_format, payload).map_err(write_err)?;

        // flush surfaces buffered I/O errors that finalize would leave to Drop
        writer.flush().map_err(write_err)?;
        writer.finalize().map_err(write_err)
    }
}
