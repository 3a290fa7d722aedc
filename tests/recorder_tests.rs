//! Recorder integration tests
//!
//! A scripted capture device stands in for the microphone: on `start` it
//! spawns a "driver" thread that delivers a fixed list of chunks, and
//! `stop` joins that thread.

use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use hound::WavReader;

use speech_recorder::application::ports::{
    CaptureDevice, CaptureError, CaptureStream, ChunkSender, EncodingError, StreamSpec,
    WavEncoder, WavFormat,
};
use speech_recorder::application::{
    RecordCallbacks, RecordInput, RecordSessionUseCase, RecorderConfig, RecorderError,
    SpeechRecorder,
};
use speech_recorder::domain::audio::{Chunk, SampleFormat};
use speech_recorder::domain::recording::Duration;
use speech_recorder::domain::UnsupportedFormatError;
use speech_recorder::infrastructure::HoundWavEncoder;

/// Counters shared between a test and the streams its device opens
#[derive(Default)]
struct StreamLog {
    opened: AtomicUsize,
    closed: AtomicUsize,
    last_spec: Mutex<Option<StreamSpec>>,
}

struct ScriptedDevice {
    script: Vec<Chunk>,
    fail_open: bool,
    fail_stop: bool,
    log: Arc<StreamLog>,
}

impl ScriptedDevice {
    fn new(script: Vec<Chunk>) -> Self {
        Self {
            script,
            fail_open: false,
            fail_stop: false,
            log: Arc::new(StreamLog::default()),
        }
    }
}

impl CaptureDevice for ScriptedDevice {
    fn open(
        &self,
        spec: &StreamSpec,
        sink: ChunkSender,
    ) -> Result<Box<dyn CaptureStream>, CaptureError> {
        if self.fail_open {
            return Err(CaptureError::OpenFailed("device busy".to_string()));
        }
        self.log.opened.fetch_add(1, Ordering::SeqCst);
        *self.log.last_spec.lock().unwrap() = Some(*spec);

        Ok(Box::new(ScriptedStream {
            script: self.script.clone(),
            sink,
            worker: None,
            fail_stop: self.fail_stop,
            log: Arc::clone(&self.log),
        }))
    }
}

struct ScriptedStream {
    script: Vec<Chunk>,
    sink: ChunkSender,
    worker: Option<JoinHandle<()>>,
    fail_stop: bool,
    log: Arc<StreamLog>,
}

impl CaptureStream for ScriptedStream {
    fn start(&mut self) -> Result<(), CaptureError> {
        let sink = self.sink.clone();
        let script = self.script.clone();
        self.worker = Some(std::thread::spawn(move || {
            for chunk in script {
                sink.send(chunk).unwrap();
            }
        }));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        if let Some(worker) = self.worker.take() {
            worker.join().unwrap();
        }
        if self.fail_stop {
            return Err(CaptureError::StopFailed("driver hung".to_string()));
        }
        Ok(())
    }

    fn close(mut self: Box<Self>) -> Result<(), CaptureError> {
        if let Some(worker) = self.worker.take() {
            worker.join().unwrap();
        }
        self.log.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

struct FailingEncoder;

impl WavEncoder for FailingEncoder {
    fn encode(
        &self,
        _format: &WavFormat,
        _payload: &[u8],
        _dest: &mut File,
    ) -> Result<(), EncodingError> {
        Err(EncodingError::WriteFailed("disk full".to_string()))
    }
}

fn constant_chunk(frames: usize, value: i16) -> Chunk {
    Chunk::from_samples(&vec![value; frames])
}

fn i16_recorder(script: Vec<Chunk>) -> SpeechRecorder<ScriptedDevice, HoundWavEncoder> {
    SpeechRecorder::new(
        ScriptedDevice::new(script),
        HoundWavEncoder::new(),
        RecorderConfig::default(),
    )
}

fn record_once<D: CaptureDevice, E: WavEncoder>(recorder: &mut SpeechRecorder<D, E>) {
    recorder.start_recording().unwrap();
    recorder.stop_recording().unwrap();
}

fn read_payload(path: &Path) -> (hound::WavSpec, Vec<u8>) {
    let mut reader = WavReader::open(path).unwrap();
    let spec = reader.spec();
    let payload = reader
        .samples::<i16>()
        .flat_map(|s| s.unwrap().to_le_bytes())
        .collect();
    (spec, payload)
}

#[test]
fn end_to_end_three_chunks() {
    let mut recorder = i16_recorder(vec![
        constant_chunk(160, 1000),
        constant_chunk(320, 1000),
        constant_chunk(160, 1000),
    ]);
    record_once(&mut recorder);

    assert_eq!(recorder.chunk_count(), 3);
    assert!((recorder.get_audio_duration().unwrap() - 0.04).abs() < 1e-12);

    let samples = recorder.get_audio_data().unwrap();
    assert_eq!(samples.len(), 640);
    for s in samples {
        assert!((s - 0.030_518).abs() < 1e-6);
    }
}

#[test]
fn duration_is_zero_without_chunks() {
    let mut recorder = i16_recorder(Vec::new());
    record_once(&mut recorder);
    assert_eq!(recorder.get_audio_duration().unwrap(), 0.0);
    assert!(recorder.get_audio_data().unwrap().is_empty());
}

#[test]
fn duration_uses_configured_rate() {
    let device = ScriptedDevice::new(vec![constant_chunk(4410, 0), constant_chunk(4410, 0)]);
    let mut recorder = SpeechRecorder::new(
        device,
        HoundWavEncoder::new(),
        RecorderConfig {
            sample_rate: 44100,
            sample_format: SampleFormat::I16,
        },
    );
    record_once(&mut recorder);
    assert!((recorder.get_audio_duration().unwrap() - 0.2).abs() < 1e-12);
}

#[test]
fn normalized_extremes() {
    let mut recorder = i16_recorder(vec![Chunk::from_samples(&[i16::MAX, i16::MIN])]);
    record_once(&mut recorder);

    let samples = recorder.get_audio_data().unwrap();
    assert!((samples[0] - 0.999_969).abs() < 1e-6);
    assert_eq!(samples[1], -1.0);
}

#[test]
fn saved_payload_matches_chunks_in_order() {
    let chunks = vec![
        Chunk::from_samples(&(0..100).collect::<Vec<i16>>()),
        Chunk::from_samples(&(-50..0).collect::<Vec<i16>>()),
        Chunk::from_samples(&[i16::MAX, i16::MIN, 7]),
    ];
    let expected: Vec<u8> = chunks.iter().flat_map(|c| c.bytes().to_vec()).collect();

    let mut recorder = i16_recorder(chunks);
    record_once(&mut recorder);

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.wav");
    let path = recorder.save_audio(Some(target.as_path())).unwrap();
    assert_eq!(path, target);

    let (spec, payload) = read_payload(&path);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(payload, expected);
}

#[test]
fn save_can_repeat() {
    let mut recorder = i16_recorder(vec![constant_chunk(10, 5)]);
    record_once(&mut recorder);

    let dir = tempfile::tempdir().unwrap();
    let first = recorder.save_audio(Some(dir.path().join("a.wav").as_path())).unwrap();
    let second = recorder.save_audio(Some(dir.path().join("b.wav").as_path())).unwrap();
    assert_eq!(read_payload(&first).1, read_payload(&second).1);
}

#[test]
fn save_without_path_creates_temp_wav() {
    let mut recorder = i16_recorder(vec![constant_chunk(32, -3)]);
    record_once(&mut recorder);

    let path = recorder.save_audio(None).unwrap();
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("wav"));
    assert!(path.exists());

    let (_, payload) = read_payload(&path);
    assert_eq!(payload.len(), 64);

    std::fs::remove_file(path).unwrap();
}

#[test]
fn save_into_missing_directory_is_encoding_error() {
    let mut recorder = i16_recorder(vec![constant_chunk(8, 1)]);
    record_once(&mut recorder);

    let dir = tempfile::tempdir().unwrap();
    let err = recorder
        .save_audio(Some(dir.path().join("missing").join("out.wav").as_path()))
        .unwrap_err();
    assert!(matches!(
        err,
        RecorderError::Encoding(EncodingError::CreateFailed(_))
    ));
}

#[test]
fn encoder_failure_surfaces() {
    let mut recorder = SpeechRecorder::new(
        ScriptedDevice::new(vec![constant_chunk(8, 1)]),
        FailingEncoder,
        RecorderConfig::default(),
    );
    record_once(&mut recorder);

    let dir = tempfile::tempdir().unwrap();
    let err = recorder
        .save_audio(Some(dir.path().join("out.wav").as_path()))
        .unwrap_err();
    assert!(matches!(
        err,
        RecorderError::Encoding(EncodingError::WriteFailed(_))
    ));
}

#[test]
fn failed_temp_save_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut recorder = SpeechRecorder::new(
        ScriptedDevice::new(vec![constant_chunk(8, 1)]),
        FailingEncoder,
        RecorderConfig::default(),
    )
    .with_temp_dir(dir.path());
    record_once(&mut recorder);

    let err = recorder.save_audio(None).unwrap_err();
    assert!(matches!(
        err,
        RecorderError::Encoding(EncodingError::WriteFailed(_))
    ));

    let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert!(leftovers.is_empty(), "left behind: {:?}", leftovers);
}

#[test]
fn failed_save_to_path_removes_file() {
    let mut recorder = SpeechRecorder::new(
        ScriptedDevice::new(vec![constant_chunk(8, 1)]),
        FailingEncoder,
        RecorderConfig::default(),
    );
    record_once(&mut recorder);

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.wav");
    assert!(recorder.save_audio(Some(target.as_path())).is_err());
    assert!(!target.exists());
}

#[test]
fn temp_save_uses_configured_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut recorder = i16_recorder(vec![constant_chunk(4, 2)]).with_temp_dir(dir.path());
    record_once(&mut recorder);

    let path = recorder.save_audio(None).unwrap();
    assert_eq!(path.parent(), Some(dir.path()));
    assert!(path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("speech-") && n.ends_with(".wav")));
    assert_eq!(read_payload(&path).1.len(), 8);
}

#[test]
fn second_start_discards_previous_chunks() {
    let mut recorder = i16_recorder(vec![constant_chunk(160, 1), constant_chunk(160, 1)]);
    record_once(&mut recorder);
    assert_eq!(recorder.chunk_count(), 2);

    recorder.start_recording().unwrap();
    assert_eq!(recorder.chunk_count(), 0);

    recorder.stop_recording().unwrap();
    assert_eq!(recorder.chunk_count(), 2);
}

#[test]
fn stop_without_start_is_no_active_session() {
    let mut recorder = i16_recorder(Vec::new());
    assert!(matches!(
        recorder.stop_recording(),
        Err(RecorderError::NoActiveSession)
    ));
}

#[test]
fn stop_twice_is_no_active_session() {
    let mut recorder = i16_recorder(Vec::new());
    record_once(&mut recorder);
    assert!(matches!(
        recorder.stop_recording(),
        Err(RecorderError::NoActiveSession)
    ));
}

#[test]
fn get_audio_data_rejects_non_i16_formats() {
    let device = ScriptedDevice::new(vec![Chunk::from_samples(&[1i32, 2, 3])]);
    let mut recorder = SpeechRecorder::new(
        device,
        HoundWavEncoder::new(),
        RecorderConfig {
            sample_rate: 16000,
            sample_format: SampleFormat::I32,
        },
    );
    record_once(&mut recorder);

    assert_eq!(recorder.get_audio_duration().unwrap(), 3.0 / 16000.0);
    match recorder.get_audio_data() {
        Err(RecorderError::UnsupportedFormat(UnsupportedFormatError { format })) => {
            assert_eq!(format, SampleFormat::I32)
        }
        other => panic!("expected UnsupportedFormat, got {:?}", other),
    }
}

#[test]
fn open_failure_is_device_error() {
    let mut device = ScriptedDevice::new(Vec::new());
    device.fail_open = true;
    let mut recorder = SpeechRecorder::new(device, HoundWavEncoder::new(), RecorderConfig::default());

    assert!(matches!(
        recorder.start_recording(),
        Err(RecorderError::Device(CaptureError::OpenFailed(_)))
    ));
    assert!(!recorder.is_recording());
}

#[test]
fn stream_is_opened_mono_with_configured_parameters() {
    let device = ScriptedDevice::new(Vec::new());
    let log = Arc::clone(&device.log);
    let mut recorder = SpeechRecorder::new(
        device,
        HoundWavEncoder::new(),
        RecorderConfig {
            sample_rate: 48000,
            sample_format: SampleFormat::F32,
        },
    );
    record_once(&mut recorder);

    assert_eq!(
        *log.last_spec.lock().unwrap(),
        Some(StreamSpec {
            sample_rate: 48000,
            channels: 1,
            format: SampleFormat::F32,
        })
    );
}

#[test]
fn failed_stop_still_closes_once_and_keeps_chunks() {
    let mut device = ScriptedDevice::new(vec![constant_chunk(16, 9)]);
    device.fail_stop = true;
    let log = Arc::clone(&device.log);
    let mut recorder = SpeechRecorder::new(device, HoundWavEncoder::new(), RecorderConfig::default());

    recorder.start_recording().unwrap();
    let err = recorder.stop_recording().unwrap_err();

    assert!(matches!(
        err,
        RecorderError::Device(CaptureError::StopFailed(_))
    ));
    assert_eq!(log.closed.load(Ordering::SeqCst), 1);
    assert!(!recorder.is_recording());
    assert_eq!(recorder.chunk_count(), 1);
}

#[test]
fn accessors_reject_active_session() {
    let mut recorder = i16_recorder(vec![constant_chunk(16, 9)]);
    recorder.start_recording().unwrap();

    assert!(recorder.is_recording());
    assert!(matches!(
        recorder.start_recording(),
        Err(RecorderError::SessionActive)
    ));
    assert!(matches!(
        recorder.get_audio_data(),
        Err(RecorderError::SessionActive)
    ));
    assert!(matches!(
        recorder.save_audio(None),
        Err(RecorderError::SessionActive)
    ));
    assert!(matches!(
        recorder.get_audio_duration(),
        Err(RecorderError::SessionActive)
    ));

    recorder.stop_recording().unwrap();
    assert_eq!(recorder.get_audio_data().unwrap().len(), 16);
}

#[test]
fn every_cycle_opens_and_closes_one_stream() {
    let device = ScriptedDevice::new(vec![constant_chunk(1, 1)]);
    let log = Arc::clone(&device.log);
    let mut recorder = SpeechRecorder::new(device, HoundWavEncoder::new(), RecorderConfig::default());

    for _ in 0..3 {
        record_once(&mut recorder);
    }
    assert_eq!(log.opened.load(Ordering::SeqCst), 3);
    assert_eq!(log.closed.load(Ordering::SeqCst), 3);
}

#[test]
fn dropping_active_recorder_closes_stream() {
    let device = ScriptedDevice::new(Vec::new());
    let log = Arc::clone(&device.log);
    let mut recorder = SpeechRecorder::new(device, HoundWavEncoder::new(), RecorderConfig::default());

    recorder.start_recording().unwrap();
    drop(recorder);
    assert_eq!(log.closed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn record_session_saves_and_reports_stats() {
    let recorder = i16_recorder(vec![constant_chunk(160, 16384), constant_chunk(160, -16384)]);
    let mut use_case = RecordSessionUseCase::new(recorder);
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("session.wav");

    let ticks = Arc::new(AtomicUsize::new(0));
    let ticks_cb = Arc::clone(&ticks);
    let callbacks = RecordCallbacks {
        on_progress: Some(Arc::new(move |elapsed: u64, total: u64| {
            assert!(elapsed <= total);
            ticks_cb.fetch_add(1, Ordering::SeqCst);
        })),
        ..Default::default()
    };

    let output = use_case
        .execute(
            RecordInput {
                duration: Duration::from_millis(200),
                output: Some(target.clone()),
                collect_stats: true,
            },
            callbacks,
            Arc::new(AtomicBool::new(false)),
        )
        .await
        .unwrap();

    assert_eq!(output.path, target);
    assert!(!output.interrupted);
    assert_eq!(output.chunks, 2);
    assert!((output.duration_secs - 0.02).abs() < 1e-12);
    assert!(ticks.load(Ordering::SeqCst) >= 2);

    let stats = output.stats.unwrap();
    assert_eq!(stats.samples, 320);
    assert_eq!(stats.peak, 0.5);
    assert!((stats.rms - 0.5).abs() < 1e-6);
    assert!(target.exists());
}

#[tokio::test]
async fn record_session_stops_on_interrupt() {
    let recorder = i16_recorder(vec![constant_chunk(16, 1)]);
    let mut use_case = RecordSessionUseCase::new(recorder);
    let dir = tempfile::tempdir().unwrap();

    let output = use_case
        .execute(
            RecordInput {
                duration: Duration::from_secs(600),
                output: Some(dir.path().join("short.wav")),
                collect_stats: false,
            },
            RecordCallbacks::default(),
            Arc::new(AtomicBool::new(true)),
        )
        .await
        .unwrap();

    assert!(output.interrupted);
    assert!(output.stats.is_none());
    assert!(!use_case.recorder().is_recording());
}

#[tokio::test]
async fn record_session_skips_stats_for_float_format() {
    let device = ScriptedDevice::new(vec![Chunk::from_samples(&[0.25f32, -0.25])]);
    let recorder = SpeechRecorder::new(
        device,
        HoundWavEncoder::new(),
        RecorderConfig {
            sample_rate: 16000,
            sample_format: SampleFormat::F32,
        },
    );
    let mut use_case = RecordSessionUseCase::new(recorder);
    let dir = tempfile::tempdir().unwrap();

    let output = use_case
        .execute(
            RecordInput {
                duration: Duration::from_millis(100),
                output: Some(dir.path().join("float.wav")),
                collect_stats: true,
            },
            RecordCallbacks::default(),
            Arc::new(AtomicBool::new(false)),
        )
        .await
        .unwrap();

    assert!(output.stats.is_none());
    let reader = WavReader::open(&output.path).unwrap();
    assert_eq!(reader.spec().sample_format, hound::SampleFormat::Float);
    assert_eq!(reader.len(), 2);
}
