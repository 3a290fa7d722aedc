//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod encoder;

// Re-export common types
pub use capture::{CaptureDevice, CaptureError, CaptureStream, ChunkSender, StreamSpec};
pub use config::ConfigStore;
pub use encoder::{EncodingError, WavEncoder, WavFormat};
