//! Recording infrastructure module
//!
//! Microphone capture through cpal and WAV output through hound.

mod cpal_capture;
mod wav_encoder;

pub use cpal_capture::CpalCapture;
pub use wav_encoder::HoundWavEncoder;

use crate::application::{RecorderConfig, SpeechRecorder};

/// Recorder wired to the platform's default input device
pub type DefaultRecorder = SpeechRecorder<CpalCapture, HoundWavEncoder>;

/// Create a recorder for the default input device
pub fn create_recorder(config: RecorderConfig) -> DefaultRecorder {
    SpeechRecorder::new(CpalCapture::new(), HoundWavEncoder::new(), config)
}
