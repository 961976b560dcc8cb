//! Subscriber setup: console output plus an optional DEBUG run log

use anyhow::{Context, bail};
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};
use workforce_core::config::LoggingConfig;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber
///
/// The console honors `RUST_LOG`, falling back to the configured level. The
/// run log, when given, always records at DEBUG; keep the returned guard
/// alive until the session ends so buffered lines reach the file.
pub fn init(config: &LoggingConfig, run_log: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let mut layers: Vec<BoxedLayer> = vec![console_layer(&config.format, filter)];
    let mut guard = None;

    if let Some(path) = run_log {
        let (Some(dir), Some(file_name)) = (path.parent(), path.file_name()) else {
            bail!("invalid run log path {}", path.display());
        };
        let appender = tracing_appender::rolling::never(dir, file_name);
        let (writer, worker_guard) = tracing_appender::non_blocking(appender);
        guard = Some(worker_guard);

        layers.push(
            fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(LevelFilter::DEBUG)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .context("failed to install tracing subscriber")?;
    Ok(guard)
}

fn console_layer(format: &str, filter: EnvFilter) -> BoxedLayer {
    match format {
        "json" => fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
        "pretty" => fmt::layer()
            .pretty()
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
        _ => fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(io::stderr)
            .with_filter(filter)
            .boxed(),
    }
}
