//! SpeechRecorder - minimal microphone capture
//!
//! Records mono audio from an input device into an ordered buffer of
//! chunks, then exposes it as a WAV file, as normalized `f32` samples, or
//! as a duration.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Sample formats, chunks, the chunk buffer, config and errors
//! - **Application**: The `SpeechRecorder` component, the record use case and port traits
//! - **Infrastructure**: Adapter implementations (cpal capture, hound WAV, XDG config)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
