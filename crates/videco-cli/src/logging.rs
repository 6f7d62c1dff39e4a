//! Logging setup for the harness.
//!
//! Initializes a global tracing subscriber that writes to both stderr and
//! an append-only log file. The log stream is the only per-job
//! success/failure signal the harness emits; the process exit code says
//! nothing about individual jobs.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Initialize tracing to stderr plus the given append-only file.
///
/// The returned guard must be held for the lifetime of the process so
/// buffered file output is flushed on exit.
pub fn init(log_file: &Path) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let dir = match log_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let name = log_file
        .file_name()
        .ok_or_else(|| format!("log file path has no file name: {}", log_file.display()))?;

    let file_appender = rolling::never(dir, name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()?;

    Ok(guard)
}
