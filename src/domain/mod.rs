//! Domain layer - Core business logic
//!
//! Contains value objects and domain errors.
//! This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod error;
pub mod recording;

// Re-export common types
pub use audio::{Chunk, ChunkBuffer, PcmSample, SampleFormat};
pub use config::AppConfig;
pub use error::*;
pub use recording::Duration;
