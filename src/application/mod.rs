//! Application layer - Use cases and port interfaces
//!
//! Contains the recorder component, the record use case and the trait
//! definitions for external system interactions.

pub mod ports;
pub mod record;
pub mod recorder;

// Re-export use cases
pub use record::{
    ProgressCallback, RecordCallbacks, RecordError, RecordInput, RecordOutput,
    RecordSessionUseCase, SampleStats,
};
pub use recorder::{RecorderConfig, RecorderError, SpeechRecorder};
