//! Tracing initialization for embedding applications.
//!
//! The subsystem itself only emits `tracing` events; hosts decide where they
//! go. [`init_file_logging`] wires the conventional setup: a non-blocking
//! appender onto a log file, an `RUST_LOG`-style env filter, and plain
//! `YYYY-MM-DD HH:MM:SS` timestamps. When the file cannot be opened the
//! subscriber falls back to stderr so startup is never blocked on a log
//! path.

use std::fmt;
use std::path::Path;
use std::sync::OnceLock;
use std::time::SystemTime;

/// Timestamp formatter rendering wall-clock UTC seconds.
struct OrdinaTimer;

impl tracing_subscriber::fmt::time::FormatTime for OrdinaTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> fmt::Result {
        let secs = match SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
            Ok(d) => i64::try_from(d.as_secs()).unwrap_or(0),
            Err(_) => 0,
        };
        w.write_str(&crate::util::ts_to_date(Some(secs)))
    }
}

/// Keeps the non-blocking writer's worker thread alive for the process
/// lifetime.
static LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

/// Build the env filter, defaulting to `info` when `RUST_LOG` is unset.
fn env_filter() -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
}

/// Initialize a file-backed tracing subscriber, appending to `log_path`.
///
/// Falls back to a stderr subscriber when the file cannot be opened.
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_file_logging(log_path: &Path) {
    if let Some(dir) = log_path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
    {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            let installed = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking)
                .with_timer(OrdinaTimer)
                .try_init()
                .is_ok();
            if installed {
                let _ = LOG_GUARD.set(guard);
                tracing::info!(path = %log_path.display(), "logging initialized");
            }
        }
        Err(e) => {
            init_stderr_logging();
            tracing::warn!(error = %e, "failed to open log file; using stderr");
        }
    }
}

/// Initialize a stderr tracing subscriber (tests, local runs).
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_ansi(true)
        .with_timer(OrdinaTimer)
        .try_init();
}
