//! # Form Builder
//!
//! Command-line host for the form builder engine.

use builder_cli::{open_store, run, CliArgs, CliConfig, LogFormat};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,builder_core=debug,builder_cli=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init(),
    }
}

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = CliConfig::from(&args);
    init_tracing(config.log_format);

    tracing::debug!("Data directory: {}", config.data_dir.display());
    let store = open_store(&config)?;

    let stdout = std::io::stdout();
    run(&config, &store, &args.command, &mut stdout.lock())?;
    Ok(())
}
