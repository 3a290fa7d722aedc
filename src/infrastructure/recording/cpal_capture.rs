//! Microphone capture using cpal
//!
//! Opens the default input device as a mono stream at the requested rate
//! and sample format. Nothing is resampled or mixed; if the device cannot
//! provide that exact configuration, opening fails.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SizedSample, StreamConfig};
use tracing::{debug, error, info};

use crate::application::ports::{
    CaptureDevice, CaptureError, CaptureStream, ChunkSender, StreamSpec,
};
use crate::domain::audio::{Chunk, PcmSample, SampleFormat};

/// Capture device backed by the default cpal host's default input
pub struct CpalCapture {
    host: cpal::Host,
}

impl CpalCapture {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    fn input_device(&self) -> Result<cpal::Device, CaptureError> {
        self.host
            .default_input_device()
            .ok_or(CaptureError::NoInputDevice)
    }

    fn stream_config(spec: &StreamSpec) -> StreamConfig {
        StreamConfig {
            channels: spec.channels,
            sample_rate: cpal::SampleRate(spec.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        }
    }

    /// Build an input stream whose callback copies each delivery into a chunk
    fn build_stream<T>(
        device: &cpal::Device,
        config: &StreamConfig,
        sink: ChunkSender,
    ) -> Result<cpal::Stream, CaptureError>
    where
        T: PcmSample + SizedSample,
    {
        let mut forwarder = ChunkForwarder::new(sink);
        device
            .build_input_stream(
                config,
                move |data: &[T], _: &cpal::InputCallbackInfo| forwarder.forward(data),
                |err| error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| CaptureError::OpenFailed(e.to_string()))
    }
}

impl Default for CpalCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureDevice for CpalCapture {
    fn open(
        &self,
        spec: &StreamSpec,
        sink: ChunkSender,
    ) -> Result<Box<dyn CaptureStream>, CaptureError> {
        let device = self.input_device()?;
        info!(
            device = %device.name().unwrap_or_else(|_| "Unknown".to_string()),
            "Using input device"
        );

        let config = Self::stream_config(spec);
        debug!(?config, format = %spec.format, "Opening input stream");

        let stream = match spec.format {
            SampleFormat::U8 => Self::build_stream::<u8>(&device, &config, sink)?,
            SampleFormat::I16 => Self::build_stream::<i16>(&device, &config, sink)?,
            SampleFormat::I32 => Self::build_stream::<i32>(&device, &config, sink)?,
            SampleFormat::F32 => Self::build_stream::<f32>(&device, &config, sink)?,
        };

        Ok(Box::new(CpalStream { stream }))
    }
}

/// Sends each callback delivery to the recorder as a chunk
struct ChunkForwarder {
    sink: ChunkSender,
    disconnected: bool,
}

impl ChunkForwarder {
    fn new(sink: ChunkSender) -> Self {
        Self {
            sink,
            disconnected: false,
        }
    }

    fn forward<T: PcmSample>(&mut self, data: &[T]) {
        if self.sink.send(Chunk::from_samples(data)).is_err() && !self.disconnected {
            // Receiver gone means the recorder was dropped mid-session
            self.disconnected = true;
            debug!("Chunk receiver closed; discarding captured audio");
        }
    }
}

/// An open cpal input stream.
///
/// cpal streams are not `Send`; the handle stays on the thread that opened it.
struct CpalStream {
    stream: cpal::Stream,
}

impl CaptureStream for CpalStream {
    fn start(&mut self) -> Result<(), CaptureError> {
        self.stream
            .play()
            .map_err(|e| CaptureError::StartFailed(e.to_string()))
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.stream
            .pause()
            .map_err(|e| CaptureError::StopFailed(e.to_string()))
    }

    fn close(self: Box<Self>) -> Result<(), CaptureError> {
        // Dropping the stream joins the backend's callback thread and drops
        // the data callback together with its sender.
        drop(self.stream);
        Ok(())
    }
}
