//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the audio host, the filesystem and config storage.

pub mod config;
pub mod recording;

// Re-export adapters
pub use config::XdgConfigStore;
pub use recording::{create_recorder, CpalCapture, DefaultRecorder, HoundWavEncoder};
