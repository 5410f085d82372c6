//! Configuration management for the reorg monitor.
//!
//! This module handles loading and validating configuration from
//! environment variables using the `dotenvy` crate. Verbosity and timing
//! are explicit configuration values handed to the monitor at
//! construction; there is no process-global mutable state.
//!
//! ## Environment Variables
//!
//! Required:
//! - `RPC_URL`: HTTP endpoint of the Ethereum node
//!
//! Optional (with defaults):
//! - `WINDOW_SIZE`: Headers kept in the sliding window (default: 9 — past
//!   8 blocks finality is assumed confirmed)
//! - `POLL_INTERVAL_SECS`: Pause between polling cycles (default: 16)
//! - `FETCH_PAUSE_MS`: Pause between individual header requests
//!   (default: 200)
//! - `RETRY_PAUSE_MS`: Pause between attempts while waiting for a new
//!   block (default: 200)
//! - `RETRY_COOLDOWN_SECS`: Cooldown before restarting after a retryable
//!   error (default: 5)
//! - `RUST_LOG`: Logging level (default: "info")
//!
//! ## Example
//!
//! ```no_run
//! use reorg_monitor::config::Config;
//! use reorg_monitor::error::MonitorResult;
//!
//! # fn main() -> MonitorResult<()> {
//! let config = Config::from_env()?;
//! println!("Window size: {}", config.window_size());
//! # Ok(())
//! # }
//! ```

use crate::error::{MonitorError, MonitorResult};
use std::env;
use std::time::Duration;

/// Default number of headers in the sliding window.
pub const DEFAULT_WINDOW_SIZE: usize = 9;

/// Default pause between polling cycles, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 16;

/// Main configuration struct for the monitor.
///
/// Contains all runtime configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ethereum RPC URL
    rpc_url: String,

    /// Number of headers in the sliding window
    window_size: usize,

    /// Pause between polling cycles, in seconds
    poll_interval_secs: u64,

    /// Pause between individual header requests, in milliseconds
    fetch_pause_ms: u64,

    /// Pause between attempts while waiting for a new block, in milliseconds
    retry_pause_ms: u64,

    /// Cooldown before restarting after a retryable error, in seconds
    retry_cooldown_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This function:
    /// 1. Loads the `.env` file using `dotenvy` (if present)
    /// 2. Reads and validates all environment variables
    /// 3. Applies defaults for optional variables
    ///
    /// # Errors
    ///
    /// Returns an error if `RPC_URL` is missing or empty, if a numeric
    /// variable fails to parse, or if `WINDOW_SIZE` is zero.
    pub fn from_env() -> MonitorResult<Self> {
        // Load .env file if present (ignore error if file doesn't exist)
        dotenvy::dotenv().ok();

        let rpc_url = env::var("RPC_URL").map_err(|e| {
            MonitorError::config(
                "RPC_URL environment variable is required",
                Some(Box::new(e)),
            )
        })?;

        if rpc_url.is_empty() {
            return Err(MonitorError::config(
                "RPC_URL must be set to the node's HTTP endpoint",
                None,
            ));
        }

        let window_size = parse_var("WINDOW_SIZE", DEFAULT_WINDOW_SIZE as u64)? as usize;
        if window_size < 1 {
            return Err(MonitorError::invalid_window_size(window_size));
        }

        let poll_interval_secs = parse_var("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        let fetch_pause_ms = parse_var("FETCH_PAUSE_MS", 200)?;
        let retry_pause_ms = parse_var("RETRY_PAUSE_MS", 200)?;
        let retry_cooldown_secs = parse_var("RETRY_COOLDOWN_SECS", 5)?;

        Ok(Self {
            rpc_url,
            window_size,
            poll_interval_secs,
            fetch_pause_ms,
            retry_pause_ms,
            retry_cooldown_secs,
        })
    }

    /// Apply command-line overrides on top of the environment values.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidWindowSize`] if a zero window size
    /// is requested.
    pub fn apply_overrides(
        mut self,
        window_size: Option<usize>,
        poll_interval_secs: Option<u64>,
    ) -> MonitorResult<Self> {
        if let Some(size) = window_size {
            if size < 1 {
                return Err(MonitorError::invalid_window_size(size));
            }
            self.window_size = size;
        }
        if let Some(secs) = poll_interval_secs {
            self.poll_interval_secs = secs;
        }
        Ok(self)
    }

    /// Get the Ethereum RPC URL.
    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Get the sliding window size.
    #[must_use]
    pub const fn window_size(&self) -> usize {
        self.window_size
    }

    /// Get the pause between polling cycles.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Get the pause between individual header requests.
    #[must_use]
    pub const fn fetch_pause(&self) -> Duration {
        Duration::from_millis(self.fetch_pause_ms)
    }

    /// Get the pause between attempts while waiting for a new block.
    #[must_use]
    pub const fn retry_pause(&self) -> Duration {
        Duration::from_millis(self.retry_pause_ms)
    }

    /// Get the cooldown before restarting after a retryable error.
    #[must_use]
    pub const fn retry_cooldown(&self) -> Duration {
        Duration::from_secs(self.retry_cooldown_secs)
    }
}

/// Read an optional numeric environment variable, falling back to
/// `default` when unset.
fn parse_var(name: &str, default: u64) -> MonitorResult<u64> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw.parse::<u64>().map_err(|e| {
            MonitorError::config(
                format!("{name} must be a valid number, got: {raw}"),
                Some(Box::new(e)),
            )
        }),
    }
}
