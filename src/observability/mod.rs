//! Structured logging infrastructure.
//!
//! Production-grade logging with the tracing framework: environment-based
//! filtering, pretty console output for development, JSON for log
//! aggregation, and optional daily-rotating file output.
//!
//! # Environment Configuration
//!
//! ```bash
//! # Set log level for all modules
//! RUST_LOG=debug cargo run -- watch
//!
//! # Component-specific levels
//! RUST_LOG=reorg_monitor=debug,alloy=warn cargo run -- watch
//!
//! # Enable JSON output for production
//! LOG_JSON=true cargo run -- watch
//!
//! # Write logs to file with daily rotation
//! LOG_FILE=./logs/monitor.log cargo run -- watch
//! ```

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the tracing subscriber with configurable output formats.
///
/// # Arguments
///
/// * `log_level` - Optional level override (e.g., "debug"). Falls back to
///   the `RUST_LOG` environment variable, then to a quiet default.
/// * `log_file` - Optional file path; enables daily log rotation.
/// * `json_output` - JSON console output when true, pretty-printed
///   otherwise.
///
/// When file logging is enabled the returned [`WorkerGuard`] keeps the
/// non-blocking writer alive; hold it for the lifetime of the program or
/// buffered log lines are lost. Returns `Ok(None)` for console-only
/// logging.
///
/// # Errors
///
/// Returns an error if the log file's parent directory cannot be created
/// or if a global subscriber is already installed.
pub fn init_tracing(
    log_level: Option<String>,
    log_file: Option<PathBuf>,
    json_output: bool,
) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let env_filter = if let Ok(filter) = std::env::var("RUST_LOG") {
        EnvFilter::new(filter)
    } else if let Some(level) = log_level {
        EnvFilter::new(level)
    } else {
        // Default: info for our app, warn for dependencies
        EnvFilter::new("reorg_monitor=info,warn")
    };

    let console_layer = if json_output {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer().pretty().with_target(true).boxed()
    };

    let (file_layer, guard) = if let Some(ref path) = log_file {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file_appender = tracing_appender::rolling::daily(
            path.parent().unwrap_or_else(|| Path::new(".")),
            path.file_name().unwrap_or_else(|| OsStr::new("monitor.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // File output is always JSON for structured log analysis
        let layer = fmt::layer()
            .json()
            .with_writer(non_blocking)
            .with_current_span(true)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(file) = file_layer {
        subscriber.with(file).try_init()?;
    } else {
        subscriber.try_init()?;
    }

    info!(
        json_output,
        file_logging = log_file.is_some(),
        "Tracing initialized"
    );

    Ok(guard)
}

/// Initialize tracing for unit and integration tests, with output
/// directed to the test harness (`cargo test -- --nocapture`).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .pretty()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reinitialization_fails_without_panicking() {
        let log_dir = std::env::temp_dir().join("reorg-monitor-log-test");
        let first = init_tracing(
            Some("info".to_string()),
            Some(log_dir.join("monitor.log")),
            false,
        );

        // Whichever test installs the global subscriber first, a
        // file-logging install that succeeds must hand back the writer
        // guard.
        if let Ok(guard) = &first {
            assert!(guard.is_some());
        }

        // The global subscriber is set by now; reinstalling reports an
        // error instead of panicking, regardless of test ordering.
        let second = init_tracing(None, None, false);
        assert!(second.is_err());
    }

    #[test]
    fn test_init_test_tracing_is_reentrant() {
        init_test_tracing();
        init_test_tracing();
    }
}
