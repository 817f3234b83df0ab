//! Tracing subscriber setup shared by the binaries.

use std::io::IsTerminal;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::sanitize::SanitizingMakeWriter;
use crate::config::{AppConfig, LogMode};

/// Install the global subscriber.
///
/// In `auto` mode, `prefer_file_on_tty` selects a file sink when stdout is a
/// terminal; the TUI needs this because log lines would corrupt the alternate
/// screen. The returned guard must be held until shutdown to flush the writer.
///
/// # Errors
/// Returns an IO error if the log file cannot be opened.
pub fn init(config: &AppConfig, prefer_file_on_tty: bool) -> std::io::Result<WorkerGuard> {
    let use_file = match config.log_mode {
        LogMode::File => true,
        LogMode::Stdout => false,
        LogMode::Auto => prefer_file_on_tty && std::io::stdout().is_terminal(),
    };

    let (writer, guard) = if use_file {
        if let Some(parent) = config.log_file.parent() {
            // Best-effort: a missing directory is reported by open() below.
            let _ = std::fs::create_dir_all(parent);
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_file)?;
        tracing_appender::non_blocking(file)
    } else {
        tracing_appender::non_blocking(std::io::stdout())
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(!use_file)
                .with_writer(SanitizingMakeWriter::new(writer)),
        )
        .init();

    Ok(guard)
}
