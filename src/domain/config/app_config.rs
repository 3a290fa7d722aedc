//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::audio::SampleFormat;
use crate::domain::recording::Duration;

/// Default capture rate in Hz
pub const DEFAULT_SAMPLE_RATE: u32 = 16000;

/// Default capture format
pub const DEFAULT_SAMPLE_FORMAT: SampleFormat = SampleFormat::I16;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub sample_rate: Option<u32>,
    pub sample_format: Option<String>,
    pub duration: Option<String>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            sample_rate: Some(DEFAULT_SAMPLE_RATE),
            sample_format: Some(DEFAULT_SAMPLE_FORMAT.to_string()),
            duration: Some(Duration::default_duration().to_string()),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    pub fn merge(self, other: Self) -> Self {
        Self {
            sample_rate: other.sample_rate.or(self.sample_rate),
            sample_format: other.sample_format.or(self.sample_format),
            duration: other.duration.or(self.duration),
        }
    }

    pub fn sample_rate_or_default(&self) -> u32 {
        self.sample_rate
            .filter(|&rate| rate > 0)
            .unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    /// Parsed sample format, or the default if not set/invalid
    pub fn sample_format_or_default(&self) -> SampleFormat {
        self.sample_format
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SAMPLE_FORMAT)
    }

    /// Parsed duration, or the default if not set/invalid
    pub fn duration_or_default(&self) -> Duration {
        self.duration
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_duration)
    }
}
