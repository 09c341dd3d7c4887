//! Tracing subscriber setup.
//!
//! Headless commands log to stderr so stdout stays clean for transcripts and
//! JSON. The interactive UI owns the terminal, so its logs go to a daily
//! rolling file instead.

use color_eyre::eyre::{eyre, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_NAME: &str = "workflow.log";

/// Default filter for a `-v` count. `RUST_LOG` overrides it.
fn env_filter(verbose: u8) -> EnvFilter {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Log to stderr.
pub fn init_stderr(verbose: u8, json: bool) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(verbose));

    let result = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init()
    };

    result.map_err(|e| eyre!("failed to initialize logging: {e}"))
}

/// Log to `log_dir/workflow.log.<date>`.
///
/// The returned guard flushes buffered lines when dropped; keep it alive
/// until the UI exits.
pub fn init_file(log_dir: &Path, verbose: u8, json: bool) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    // File logs never go below info
    let registry = tracing_subscriber::registry().with(env_filter(verbose.max(1)));
    let result = if json {
        registry
            .with(fmt::layer().json().with_writer(writer))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(writer).with_ansi(false))
            .try_init()
    };
    result.map_err(|e| eyre!("failed to initialize logging: {e}"))?;

    tracing::debug!(dir = %log_dir.display(), "file logging initialized");
    Ok(guard)
}
