//! Audio capture port interfaces

use crossbeam_channel::Sender;
use thiserror::Error;

use crate::domain::audio::{Chunk, SampleFormat};

/// Capture facility errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("No audio input device available")]
    NoInputDevice,

    #[error("Failed to open input stream: {0}")]
    OpenFailed(String),

    #[error("Failed to start input stream: {0}")]
    StartFailed(String),

    #[error("Failed to stop input stream: {0}")]
    StopFailed(String),

    #[error("Failed to close input stream: {0}")]
    CloseFailed(String),
}

/// Parameters for opening an input stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSpec {
    pub sample_rate: u32,
    pub channels: u16,
    pub format: SampleFormat,
}

impl StreamSpec {
    /// Single-channel stream at the given rate/format
    pub const fn mono(sample_rate: u32, format: SampleFormat) -> Self {
        Self {
            sample_rate,
            channels: 1,
            format,
        }
    }
}

/// Where the capture callback delivers each chunk.
///
/// The stream owns its sender; dropping the stream disconnects the channel.
pub type ChunkSender = Sender<Chunk>;

/// Port for an OS/driver level audio input facility
pub trait CaptureDevice {
    /// Open (but do not start) an input stream that sends every delivered
    /// chunk to `sink`, in delivery order.
    fn open(&self, spec: &StreamSpec, sink: ChunkSender)
        -> Result<Box<dyn CaptureStream>, CaptureError>;
}

/// An opened input stream.
///
/// After `close` returns, the callback must never fire again.
pub trait CaptureStream {
    fn start(&mut self) -> Result<(), CaptureError>;

    fn stop(&mut self) -> Result<(), CaptureError>;

    /// Release the stream. Consumes the handle so it can only happen once.
    fn close(self: Box<Self>) -> Result<(), CaptureError>;
}
