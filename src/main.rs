//! CLI entry point for the reorg monitor.
//!
//! # Architecture Flow
//!
//! ```text
//! main.rs (Runtime Initialization)
//!     ↓
//! CLI Layer (src/cli.rs)
//!     ↓
//! 1. Config Layer (src/config.rs)   → Load environment variables
//! 2. RPC Layer (src/rpc.rs)         → Create provider + header source
//! 3. Reorg Core (src/reorg/)        → Fetch windows, align, poll
//! 4. CLI Layer (output)             → Display per-cycle reports
//! ```
//!
//! main.rs only initializes the async runtime and tracing; all business
//! logic lives in the library, and errors bubble up as `MonitorResult<T>`.

use reorg_monitor::{cli, observability};
use tracing::error;

/// Entry point for the reorg monitor.
#[tokio::main]
async fn main() {
    // Initialize structured logging first. Configuration via environment:
    // - RUST_LOG: log level (e.g. "debug", "reorg_monitor=trace,alloy=warn")
    // - LOG_JSON: JSON console output ("true" or "false")
    // - LOG_FILE: write logs to file with daily rotation
    let log_level = std::env::var("RUST_LOG").ok();
    let log_file = std::env::var("LOG_FILE").ok().map(std::path::PathBuf::from);
    let json_output = std::env::var("LOG_JSON")
        .unwrap_or_else(|_| "false".to_string())
        .parse::<bool>()
        .unwrap_or(false);

    // The guard keeps the non-blocking file writer alive; it must live
    // until the process exits or buffered log lines are dropped.
    let _guard = match observability::init_tracing(log_level, log_file, json_output) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize tracing: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = cli::run().await {
        error!(error = %e, "Application error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
