//! Main app runner for recording mode

use std::process::ExitCode;
use std::sync::Arc;

use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::application::{
    ProgressCallback, RecordCallbacks, RecordInput, RecordSessionUseCase, RecorderConfig,
};
use crate::domain::config::AppConfig;
use crate::infrastructure::{create_recorder, XdgConfigStore};

use super::args::RecordOptions;
use super::presenter::Presenter;
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Record one session from the default input device and save it
pub async fn run_record(options: RecordOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    let recorder = create_recorder(RecorderConfig {
        sample_rate: options.sample_rate,
        sample_format: options.sample_format,
    });
    let mut use_case = RecordSessionUseCase::new(recorder);

    let input = RecordInput {
        duration: options.duration,
        output: options.output.clone(),
        collect_stats: options.stats,
    };

    presenter.start_spinner(&format!(
        "Recording {} Hz {} for up to {} (Ctrl+C to stop)...",
        options.sample_rate, options.sample_format, options.duration
    ));

    let on_progress = presenter.spinner_handle().map(|bar| {
        let cb: ProgressCallback = Arc::new(move |elapsed: u64, total: u64| {
            bar.set_message(format!(
                "Recording... {}",
                Presenter::format_progress(elapsed, total)
            ));
        });
        cb
    });
    let on_recording_end = presenter.spinner_handle().map(|bar| {
        let cb: Box<dyn Fn(f64) + Send + Sync> = Box::new(move |secs: f64| {
            bar.set_message(format!("Saving {:.2}s of audio...", secs));
        });
        cb
    });
    let callbacks = RecordCallbacks {
        on_progress,
        on_recording_start: None,
        on_recording_end,
    };

    match use_case.execute(input, callbacks, shutdown.flag()).await {
        Ok(output) => {
            presenter.spinner_success(&format!(
                "Recorded {:.2}s ({} chunks)",
                output.duration_secs, output.chunks
            ));

            if output.interrupted {
                presenter.info("Stopped early by Ctrl+C");
            }

            match output.stats {
                Some(stats) => presenter.info(&format!(
                    "{} samples, peak {:.3}, rms {:.3}",
                    stats.samples, stats.peak, stats.rms
                )),
                None if options.stats => presenter.warn(&format!(
                    "Sample statistics are only available for i16 recordings (got {})",
                    options.sample_format
                )),
                None => {}
            }

            presenter.output(&output.path.to_string_lossy());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.spinner_fail("Recording failed");
            presenter.error(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Load and merge configuration: defaults < file < CLI
pub async fn load_merged_config<S: ConfigStore>(store: &S, cli_config: AppConfig) -> AppConfig {
    let file_config = match store.load().await {
        Ok(config) => config,
        Err(e) => {
            debug!("Ignoring unreadable config file: {}", e);
            AppConfig::empty()
        }
    };

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Merge using the default XDG config location
pub async fn load_default_config(cli_config: AppConfig) -> AppConfig {
    load_merged_config(&XdgConfigStore::new(), cli_config).await
}
