//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::audio::SampleFormat;
use crate::domain::recording::Duration;

/// SpeechRecorder - record the microphone to a WAV file
#[derive(Parser, Debug)]
#[command(name = "speech-recorder")]
#[command(version)]
#[command(about = "Record microphone audio to a mono WAV file")]
#[command(long_about = None)]
pub struct Cli {
    /// Recording duration (e.g., 10s, 1m, 2m30s); Ctrl+C stops early
    #[arg(short = 'd', long, value_name = "TIME")]
    pub duration: Option<String>,

    /// Output WAV file (default: a new temporary file)
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Sample rate in Hz
    #[arg(
        short = 'r',
        long,
        value_name = "HZ",
        env = "SPEECH_RECORDER_RATE",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub rate: Option<u32>,

    /// Sample format
    #[arg(short = 'f', long, value_name = "FORMAT", env = "SPEECH_RECORDER_FORMAT")]
    pub format: Option<FormatArg>,

    /// Print sample count, peak and RMS after recording (i16 only)
    #[arg(long)]
    pub stats: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Sample format argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    U8,
    I16,
    I32,
    F32,
}

impl From<FormatArg> for SampleFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::U8 => SampleFormat::U8,
            FormatArg::I16 => SampleFormat::I16,
            FormatArg::I32 => SampleFormat::I32,
            FormatArg::F32 => SampleFormat::F32,
        }
    }
}

/// Parsed record options
#[derive(Debug, Clone)]
pub struct RecordOptions {
    pub duration: Duration,
    pub output: Option<PathBuf>,
    pub sample_rate: u32,
    pub sample_format: SampleFormat,
    pub stats: bool,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &["sample_rate", "sample_format", "duration"];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
