//! Recording length value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default recording length (10 seconds)
pub const DEFAULT_DURATION_SECS: u64 = 10;

/// How long a CLI recording session runs before it is stopped.
/// Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    milliseconds: u64,
}

impl Duration {
    pub const fn from_millis(ms: u64) -> Self {
        Self { milliseconds: ms }
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self {
            milliseconds: secs * 1000,
        }
    }

    pub const fn default_duration() -> Self {
        Self::from_secs(DEFAULT_DURATION_SECS)
    }

    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }

    /// Whether `elapsed` has reached this duration
    pub fn is_reached_by(&self, elapsed: StdDuration) -> bool {
        elapsed >= self.as_std()
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    /// Accepts "30s", "1m", "2m30s" (case-insensitive, surrounding whitespace ignored)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationParseError {
            input: s.to_string(),
        };
        let input = s.trim().to_ascii_lowercase();

        let (minutes, rest) = match input.split_once('m') {
            Some((m, rest)) => (Some(m), rest),
            None => (None, input.as_str()),
        };
        let seconds = match rest {
            "" => None,
            r => Some(r.strip_suffix('s').ok_or_else(invalid)?),
        };
        if minutes.is_none() && seconds.is_none() {
            return Err(invalid());
        }

        let parse_part = |part: Option<&str>| -> Result<u64, DurationParseError> {
            match part {
                None => Ok(0),
                Some(p) if !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()) => {
                    p.parse().map_err(|_| invalid())
                }
                Some(_) => Err(invalid()),
            }
        };

        let mins = parse_part(minutes)?;
        let secs = parse_part(seconds)?;
        let total_ms = mins
            .checked_mul(60)
            .and_then(|m| m.checked_add(secs))
            .and_then(|s| s.checked_mul(1000))
            .ok_or_else(invalid)?;

        if total_ms == 0 {
            return Err(invalid());
        }

        Ok(Self::from_millis(total_ms))
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.as_secs();
        match (total_secs / 60, total_secs % 60) {
            (0, s) => write!(f, "{}s", s),
            (m, 0) => write!(f, "{}m", m),
            (m, s) => write!(f, "{}m{}s", m, s),
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_duration()
    }
}
