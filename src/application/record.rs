//! Record-to-file use case

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tokio::time::{interval, Duration as TokioDuration};
use tracing::warn;

use crate::domain::recording::Duration;

use super::ports::{CaptureDevice, WavEncoder};
use super::recorder::{RecorderError, SpeechRecorder};

/// How often the session loop checks for the deadline or an interrupt
const POLL_INTERVAL_MS: u64 = 100;

/// Errors from the record use case
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Recording failed: {0}")]
    Recorder(#[from] RecorderError),
}

/// Progress callback type. Parameters: (elapsed_ms, total_ms)
pub type ProgressCallback = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Input parameters for the record use case
#[derive(Debug, Clone, Default)]
pub struct RecordInput {
    /// Maximum recording length
    pub duration: Duration,
    /// Destination file; a temporary file is used when `None`
    pub output: Option<PathBuf>,
    /// Compute sample statistics from the normalized buffer
    pub collect_stats: bool,
}

/// Summary statistics over normalized samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    pub samples: usize,
    pub peak: f32,
    pub rms: f32,
}

impl SampleStats {
    pub fn from_samples(samples: &[f32]) -> Self {
        if samples.is_empty() {
            return Self {
                samples: 0,
                peak: 0.0,
                rms: 0.0,
            };
        }

        let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        let sum_sq: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
        let rms = (sum_sq / samples.len() as f64).sqrt() as f32;

        Self {
            samples: samples.len(),
            peak,
            rms,
        }
    }
}

/// Output from the record use case
#[derive(Debug, Clone)]
pub struct RecordOutput {
    /// Where the WAV file was written
    pub path: PathBuf,
    /// Captured audio length in seconds
    pub duration_secs: f64,
    /// Number of chunks delivered by the device
    pub chunks: usize,
    /// Present when requested and the format supports it
    pub stats: Option<SampleStats>,
    /// True if the session ended before the deadline
    pub interrupted: bool,
}

/// Callbacks for session events
#[derive(Default)]
pub struct RecordCallbacks {
    pub on_progress: Option<ProgressCallback>,
    pub on_recording_start: Option<Box<dyn Fn() + Send + Sync>>,
    /// Called with the captured duration in seconds
    pub on_recording_end: Option<Box<dyn Fn(f64) + Send + Sync>>,
}

/// Records one session of at most `duration`, then saves it.
pub struct RecordSessionUseCase<D, E> {
    recorder: SpeechRecorder<D, E>,
}

impl<D: CaptureDevice, E: WavEncoder> RecordSessionUseCase<D, E> {
    pub fn new(recorder: SpeechRecorder<D, E>) -> Self {
        Self { recorder }
    }

    pub fn recorder(&self) -> &SpeechRecorder<D, E> {
        &self.recorder
    }

    /// Run the session until the deadline passes or `interrupt` is set.
    pub async fn execute(
        &mut self,
        input: RecordInput,
        callbacks: RecordCallbacks,
        interrupt: Arc<AtomicBool>,
    ) -> Result<RecordOutput, RecordError> {
        let total_ms = input.duration.as_millis();

        self.recorder.start_recording()?;
        if let Some(ref cb) = callbacks.on_recording_start {
            cb();
        }

        let started = Instant::now();
        let mut ticker = interval(TokioDuration::from_millis(POLL_INTERVAL_MS));
        let interrupted = loop {
            ticker.tick().await;

            let elapsed = started.elapsed();
            if let Some(ref cb) = callbacks.on_progress {
                cb((elapsed.as_millis() as u64).min(total_ms), total_ms);
            }

            if interrupt.load(Ordering::SeqCst) {
                break true;
            }
            if input.duration.is_reached_by(elapsed) {
                break false;
            }
        };

        self.recorder.stop_recording()?;

        let duration_secs = self.recorder.get_audio_duration()?;
        if let Some(ref cb) = callbacks.on_recording_end {
            cb(duration_secs);
        }

        let path = self.recorder.save_audio(input.output.as_deref())?;

        let stats = if input.collect_stats {
            match self.recorder.get_audio_data() {
                Ok(samples) => Some(SampleStats::from_samples(&samples)),
                Err(RecorderError::UnsupportedFormat(e)) => {
                    warn!("Skipping sample statistics: {}", e);
                    None
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            None
        };

        Ok(RecordOutput {
            path,
            duration_secs,
            chunks: self.recorder.chunk_count(),
            stats,
            interrupted,
        })
    }
}
