//! SpeechRecorder CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use speech_recorder::cli::{
    app::{load_default_config, run_record, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
    RecordOptions,
};
use speech_recorder::domain::audio::SampleFormat;
use speech_recorder::domain::config::AppConfig;
use speech_recorder::domain::recording::Duration;
use speech_recorder::infrastructure::XdgConfigStore;

/// Log filter used when RUST_LOG is not set
const DEFAULT_LOG_FILTER: &str = "speech_recorder=warn";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let presenter = Presenter::new();

    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    let cli_config = AppConfig {
        sample_rate: cli.rate,
        sample_format: cli.format.map(|f| SampleFormat::from(f).to_string()),
        duration: cli.duration.clone(),
    };
    let config = load_default_config(cli_config).await;

    let duration = match config.duration.as_deref() {
        Some(s) => match s.parse::<Duration>() {
            Ok(d) => d,
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => Duration::default_duration(),
    };

    let sample_format = match config.sample_format.as_deref() {
        Some(s) => match s.parse::<SampleFormat>() {
            Ok(f) => f,
            Err(e) => {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_USAGE_ERROR);
            }
        },
        None => SampleFormat::default(),
    };

    let options = RecordOptions {
        duration,
        output: cli.output,
        sample_rate: config.sample_rate_or_default(),
        sample_format,
        stats: cli.stats,
    };

    run_record(options).await
}
