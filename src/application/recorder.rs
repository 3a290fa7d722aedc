//! Speech recorder: capture session lifecycle and buffer accessors

use std::fs::File;
use std::path::{Path, PathBuf};

use crossbeam_channel::Receiver;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::audio::{Chunk, ChunkBuffer, SampleFormat};
use crate::domain::config::{DEFAULT_SAMPLE_FORMAT, DEFAULT_SAMPLE_RATE};
use crate::domain::error::UnsupportedFormatError;

use super::ports::{
    CaptureDevice, CaptureError, CaptureStream, EncodingError, StreamSpec, WavEncoder, WavFormat,
};

/// Prefix for generated temporary recordings
const TEMP_FILE_PREFIX: &str = "speech-";

/// Suffix for generated temporary recordings
const TEMP_FILE_SUFFIX: &str = ".wav";

/// Recorder errors
#[derive(Debug, Clone, Error)]
pub enum RecorderError {
    #[error("Audio device error: {0}")]
    Device(#[from] CaptureError),

    #[error("No recording session is active")]
    NoActiveSession,

    #[error("A recording session is still active; stop it first")]
    SessionActive,

    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormatError),

    #[error("Failed to save audio: {0}")]
    Encoding(#[from] EncodingError),
}

/// Fixed capture parameters for a recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecorderConfig {
    pub sample_rate: u32,
    pub sample_format: SampleFormat,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            sample_format: DEFAULT_SAMPLE_FORMAT,
        }
    }
}

/// Stream and queue of a running session
struct ActiveSession {
    stream: Box<dyn CaptureStream>,
    receiver: Receiver<Chunk>,
}

/// Records mono audio from a capture device into an ordered chunk buffer.
///
/// The capture callback only ever sends chunks over a channel. They are
/// moved into the buffer by `stop_recording`, after the stream has been
/// closed, so the buffer is never touched by the driver thread.
pub struct SpeechRecorder<D, E> {
    device: D,
    encoder: E,
    config: RecorderConfig,
    buffer: ChunkBuffer,
    session: Option<ActiveSession>,
    temp_dir: Option<PathBuf>,
}

impl<D: CaptureDevice, E: WavEncoder> SpeechRecorder<D, E> {
    pub fn new(device: D, encoder: E, config: RecorderConfig) -> Self {
        Self {
            device,
            encoder,
            config,
            buffer: ChunkBuffer::new(),
            session: None,
            temp_dir: None,
        }
    }

    /// Create unnamed recordings in `dir` instead of the system temp dir
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn config(&self) -> RecorderConfig {
        self.config
    }

    pub fn is_recording(&self) -> bool {
        self.session.is_some()
    }

    /// Number of chunks held from the last completed session
    pub fn chunk_count(&self) -> usize {
        self.buffer.len()
    }

    /// Discard the previous buffer, open a mono input stream and start it.
    pub fn start_recording(&mut self) -> Result<(), RecorderError> {
        if self.session.is_some() {
            return Err(RecorderError::SessionActive);
        }

        self.buffer.clear();

        let spec = StreamSpec::mono(self.config.sample_rate, self.config.sample_format);
        let (sender, receiver) = crossbeam_channel::unbounded();
        let mut stream = self.device.open(&spec, sender)?;

        if let Err(e) = stream.start() {
            if let Err(close_err) = stream.close() {
                warn!("Failed to close stream after start error: {}", close_err);
            }
            return Err(e.into());
        }

        info!(
            sample_rate = spec.sample_rate,
            format = %spec.format,
            "Recording started"
        );
        self.session = Some(ActiveSession { stream, receiver });
        Ok(())
    }

    /// Stop and close the active stream, then move every delivered chunk
    /// into the buffer.
    ///
    /// The stream is closed even when stopping fails; the stop error is
    /// reported after the close.
    pub fn stop_recording(&mut self) -> Result<(), RecorderError> {
        let ActiveSession {
            mut stream,
            receiver,
        } = self.session.take().ok_or(RecorderError::NoActiveSession)?;

        let stopped = stream.stop();
        let closed = stream.close();

        for chunk in receiver.try_iter() {
            if chunk.format() != self.config.sample_format {
                warn!(
                    expected = %self.config.sample_format,
                    got = %chunk.format(),
                    "Dropping chunk with unexpected sample format"
                );
                continue;
            }
            self.buffer.push(chunk);
        }

        info!(
            chunks = self.buffer.len(),
            frames = self.buffer.total_frames(),
            "Recording stopped"
        );

        stopped?;
        closed?;
        Ok(())
    }

    /// Write the buffer as a mono WAV file.
    ///
    /// Without a path, a new temporary `.wav` file is created and kept.
    /// Returns the path written. A failed save leaves no file behind.
    pub fn save_audio(&self, path: Option<&Path>) -> Result<PathBuf, RecorderError> {
        self.ensure_idle()?;

        let format = WavFormat {
            channels: 1,
            sample_rate: self.config.sample_rate,
            sample_format: self.config.sample_format,
        };
        let payload = self.buffer.concat_bytes();

        match path {
            Some(path) => {
                let mut file = Self::create_file(path)?;
                debug!(bytes = payload.len(), path = %path.display(), "Encoding WAV");

                if let Err(e) = self.encoder.encode(&format, &payload, &mut file) {
                    drop(file);
                    if let Err(rm) = std::fs::remove_file(path) {
                        warn!("Failed to remove partial file {}: {}", path.display(), rm);
                    }
                    return Err(e.into());
                }
                Ok(path.to_path_buf())
            }
            None => {
                let mut tmp = self.create_temp_file()?;
                debug!(bytes = payload.len(), path = %tmp.path().display(), "Encoding WAV");

                // Dropping `tmp` on error deletes the file
                self.encoder.encode(&format, &payload, tmp.as_file_mut())?;

                let (_, path) = tmp
                    .keep()
                    .map_err(|e| EncodingError::CreateFailed(e.error.to_string()))?;
                Ok(path)
            }
        }
    }

    /// The buffer rescaled to floats in [-1.0, 1.0).
    ///
    /// Only available for signed 16-bit recordings.
    pub fn get_audio_data(&self) -> Result<Vec<f32>, RecorderError> {
        self.ensure_idle()?;
        Ok(self.buffer.normalized(self.config.sample_format)?)
    }

    /// Seconds of audio in the buffer (0.0 if empty).
    ///
    /// Chunks only reach the buffer on stop, so a running session is
    /// rejected like the other accessors.
    pub fn get_audio_duration(&self) -> Result<f64, RecorderError> {
        self.ensure_idle()?;
        Ok(self.buffer.duration_secs(self.config.sample_rate))
    }

    fn ensure_idle(&self) -> Result<(), RecorderError> {
        if self.session.is_some() {
            return Err(RecorderError::SessionActive);
        }
        Ok(())
    }

    fn create_file(path: &Path) -> Result<File, EncodingError> {
        File::create(path)
            .map_err(|e| EncodingError::CreateFailed(format!("{}: {}", path.display(), e)))
    }

    fn create_temp_file(&self) -> Result<NamedTempFile, EncodingError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_FILE_PREFIX).suffix(TEMP_FILE_SUFFIX);

        let created = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        created.map_err(|e| EncodingError::CreateFailed(e.to_string()))
    }
}

impl<D, E> Drop for SpeechRecorder<D, E> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(e) = session.stream.close() {
                warn!("Failed to close stream on drop: {}", e);
            }
        }
    }
}
