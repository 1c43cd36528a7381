//! File logging for kaser.
//!
//! The terminal owns stdout and stderr while the browser runs, so tracing output
//! goes to `<data-local-dir>/kaser/kaser.log`. Nothing is installed unless
//! `KASER_LOG` is set; its value is the filter directive.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use std::path::PathBuf;

pub const LOG_ENV: &str = "KASER_LOG";
const LOG_FILE: &str = "kaser.log";

/// Directory the log file is written to.
pub fn log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("kaser"))
}

/// Installs the file subscriber. The returned guard must live as long as the
/// process or buffered lines are lost.
pub fn init() -> Option<WorkerGuard> {
    let directive = std::env::var(LOG_ENV).ok()?;
    let dir = log_dir()?;
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("[kaser] Cannot create log directory {}: {}", dir.display(), e);
        return None;
    }

    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|e| {
        eprintln!("[kaser] Invalid {} value '{}': {}", LOG_ENV, directive, e);
        EnvFilter::new("info")
    });

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Some(guard)
}
