//! Recording value objects

mod duration;

pub use duration::{Duration, DEFAULT_DURATION_SECS};
