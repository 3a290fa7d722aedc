//! Configuration value objects

mod app_config;

pub use app_config::{AppConfig, DEFAULT_SAMPLE_FORMAT, DEFAULT_SAMPLE_RATE};
