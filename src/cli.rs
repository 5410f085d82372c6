//! Command-line interface for the reorg monitor.
//!
//! # Commands
//!
//! - `watch`: Monitor the chain for reorganizations until Ctrl-C
//! - `snapshot`: Fetch one window of recent headers and print it
//!
//! # Example
//!
//! ```bash
//! # Continuous monitoring
//! reorg-monitor watch
//!
//! # Wider window, slower polling
//! reorg-monitor watch --window-size 16 --interval 30
//!
//! # One-shot look at the chain head
//! reorg-monitor snapshot
//! ```

use crate::config::Config;
use crate::error::{MonitorError, MonitorResult};
use crate::reorg::{BlockRecord, HeaderSource, ReorgMonitor, WindowFetcher};
use crate::rpc::{create_provider, RpcHeaderSource};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::time::Duration;
use tracing::{info, warn};

/// Chain reorganization monitor
#[derive(Parser, Debug)]
#[command(name = "reorg-monitor")]
#[command(about = "Sliding-window chain reorganization monitor for Ethereum nodes", long_about = None)]
#[command(version)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Monitor the chain for reorganizations until interrupted
    Watch {
        /// Polling interval in seconds (default: from env, then 16)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Sliding window size in headers (default: from env, then 9)
        #[arg(short, long)]
        window_size: Option<usize>,
    },

    /// Fetch one window of recent headers and print it
    Snapshot {
        /// Sliding window size in headers (default: from env, then 9)
        #[arg(short, long)]
        window_size: Option<usize>,
    },
}

/// Parse CLI arguments and execute the appropriate command.
///
/// # Errors
///
/// Returns an error if configuration loading, the RPC connection, or the
/// command itself fails fatally. Retryable failures inside `watch` are
/// handled by its restart loop and never surface here.
pub async fn run() -> MonitorResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            interval,
            window_size,
        } => run_watch_command(interval, window_size).await,
        Commands::Snapshot { window_size } => run_snapshot_command(window_size).await,
    }
}

/// Execute the watch command (continuous monitoring).
///
/// Runs detection cycles forever, restarting the whole cycle from
/// initialization after a cooldown when a retryable error occurs
/// (connectivity trouble is typically transient, so the process is
/// preserved). Fatal errors terminate the command. Every sleep lives
/// under the `select!` with the Ctrl-C signal, so shutdown is prompt at
/// any suspension point.
async fn run_watch_command(
    interval: Option<u64>,
    window_size: Option<usize>,
) -> MonitorResult<()> {
    let config = Config::from_env()?.apply_overrides(window_size, interval)?;

    info!(
        window_size = config.window_size(),
        interval_secs = config.poll_interval().as_secs(),
        "Starting reorg watch"
    );
    println!(
        "{}",
        "Watching for chain reorganizations...".cyan().bold()
    );

    let provider = create_provider(config.rpc_url()).await?;
    let source = RpcHeaderSource::new(provider);
    let mut monitor = ReorgMonitor::new(
        source,
        config.window_size(),
        config.poll_interval(),
        config.fetch_pause(),
        config.retry_pause(),
    );

    // Setup graceful shutdown handler
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut cooldown = None;
    loop {
        tokio::select! {
            // Handle shutdown signal
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                println!();
                println!("{}", "Reorg monitor stopped.".yellow().bold());
                println!("Reorgs observed this run: {}", monitor.reorg_count());
                break;
            }

            // Run detection; `track` only ever returns with an error
            err = track(&mut monitor, cooldown) => {
                if err.is_retryable() {
                    warn!(error = %err, "Tracking failed, restarting after cooldown");
                    println!("{} {err}", "Warning:".yellow().bold());
                    println!(
                        "Restarting the monitor in {} seconds.",
                        config.retry_cooldown().as_secs()
                    );
                    cooldown = Some(config.retry_cooldown());
                } else {
                    return Err(err);
                }
            }
        }
    }

    Ok(())
}

/// Run detection cycles until one fails, sleeping `cooldown` first when
/// recovering from a previous failure.
async fn track<S: HeaderSource>(
    monitor: &mut ReorgMonitor<S>,
    cooldown: Option<Duration>,
) -> MonitorError {
    if let Some(pause) = cooldown {
        tokio::time::sleep(pause).await;
    }

    match detection_cycles(monitor).await {
        // detection_cycles loops forever; only errors reach here.
        Ok(()) => MonitorError::fetch("detection loop ended unexpectedly", None),
        Err(err) => err,
    }
}

/// Initialize a window and poll forever, printing a report per cycle.
async fn detection_cycles<S: HeaderSource>(monitor: &mut ReorgMonitor<S>) -> MonitorResult<()> {
    let mut current = monitor.initialize().await?;
    println!(
        "Tracking heights {}..={}",
        current.first().number,
        current.highest_height()
    );

    loop {
        let report = monitor.run_cycle(&current).await?;

        if report.reorg_detected() {
            print_reorg(&report.discarded);
        } else {
            print_no_reorg(report.window.highest_height());
        }

        current = report.window;
    }
}

/// Execute the snapshot command (one-time window fetch).
async fn run_snapshot_command(window_size: Option<usize>) -> MonitorResult<()> {
    let config = Config::from_env()?.apply_overrides(window_size, None)?;

    let provider = create_provider(config.rpc_url()).await?;
    let source = RpcHeaderSource::new(provider);
    let fetcher = WindowFetcher::new(source, config.fetch_pause(), config.retry_pause());

    let window = fetcher.fetch_window(config.window_size()).await?;

    println!(
        "{}",
        format!(
            "Current window: heights {}..={}",
            window.first().number,
            window.highest_height()
        )
        .cyan()
        .bold()
    );
    // Newest first, matching how reorg reports read.
    for header in window.headers().iter().rev() {
        println!("  {}", format_header(header));
    }

    Ok(())
}

/// Print a discarded-header report, highest height first.
fn print_reorg(discarded: &[BlockRecord]) {
    println!();
    println!(
        "{}",
        "Chain reorg detected! The discarded blocks are:".red().bold()
    );
    for header in discarded {
        println!("  {}", format_header(header).red());
    }
    println!();
}

/// Print the per-cycle status line when no reorg was found.
fn print_no_reorg(height: u64) {
    println!(
        "{} height = {height}",
        "No reorg detected, new".green()
    );
}

/// One line per header: height, fingerprint, human-readable timestamp.
fn format_header(header: &BlockRecord) -> String {
    let when = chrono::DateTime::from_timestamp(header.timestamp as i64, 0)
        .map_or_else(|| header.timestamp.to_string(), |t| t.to_rfc3339());
    format!("height {:>10}  {}  {when}", header.number, header.hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::B256;

    #[test]
    fn test_format_header_includes_height_and_hash() {
        let header = BlockRecord::new(
            19_000_000,
            B256::repeat_byte(0xAB),
            B256::repeat_byte(0xAC),
            1_700_000_000,
        );

        let line = format_header(&header);
        assert!(line.contains("19000000"));
        assert!(line.contains("0xabab"));
        assert!(line.contains("2023")); // timestamp rendered as a date
    }

    #[test]
    fn test_cli_parses_watch_overrides() {
        let cli = Cli::try_parse_from([
            "reorg-monitor",
            "watch",
            "--interval",
            "30",
            "--window-size",
            "16",
        ])
        .unwrap();

        match cli.command {
            Commands::Watch {
                interval,
                window_size,
            } => {
                assert_eq!(interval, Some(30));
                assert_eq!(window_size, Some(16));
            }
            Commands::Snapshot { .. } => panic!("parsed wrong command"),
        }
    }

    #[test]
    fn test_cli_parses_snapshot() {
        let cli = Cli::try_parse_from(["reorg-monitor", "snapshot"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Snapshot { window_size: None }
        ));
    }
}
