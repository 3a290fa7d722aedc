//! Domain error types

use thiserror::Error;

use super::audio::SampleFormat;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 30s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an unknown sample format name is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid sample format: \"{input}\". Valid formats are: u8, i16, i32, f32")]
pub struct SampleFormatParseError {
    pub input: String,
}

/// Error when a buffer cannot be converted to normalized floats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Sample format {format} is not supported for float conversion (only i16)")]
pub struct UnsupportedFormatError {
    pub format: SampleFormat,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
