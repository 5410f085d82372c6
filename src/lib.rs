//! # Chain Reorg Monitor
//!
//! Sliding-window chain reorganization monitor for Ethereum nodes, built
//! on [Alloy](https://github.com/alloy-rs/alloy).
//!
//! The monitor keeps a window of the N most recent block headers and,
//! after every polling interval, fetches a fresh window and aligns it
//! against the previous one by height. Headers from the old window whose
//! height reappears in the new window with a different content
//! fingerprint were discarded by a reorg, and are reported highest-first.
//!
//! ## Features
//!
//! - **Structural header equality** - headers compare by every field,
//!   never by height alone
//! - **Bounded lookback** - forks deeper than the window surface as a
//!   loud no-overlap error instead of being silently missed
//! - **Restart-with-cooldown** - transient RPC failures restart the
//!   detection cycle without killing the process
//! - **Prompt shutdown** - every sleep is cancellable via Ctrl-C
//! - **Full async/await** support with Tokio
//!
//! ## Architecture
//!
//! The crate is organized leaves-first:
//!
//! 1. **Config Layer** ([`config`]) - Environment variable loading
//! 2. **RPC Layer** ([`rpc`]) - Ethereum provider and header source
//! 3. **Reorg Core** ([`reorg`]) - Window fetching, alignment, polling
//! 4. **CLI Layer** ([`cli`]) - Commands and report formatting
//!
//! ## Quick Start
//!
//! ### Using the CLI
//!
//! ```bash
//! # Continuous monitoring
//! cargo run --release -- watch
//!
//! # One-shot window fetch
//! cargo run --release -- snapshot
//! ```
//!
//! ### Using as a Library
//!
//! ```rust,no_run
//! use reorg_monitor::{config::Config, reorg::ReorgMonitor, rpc};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let provider = rpc::create_provider(config.rpc_url()).await?;
//!     let source = rpc::RpcHeaderSource::new(provider);
//!
//!     let mut monitor = ReorgMonitor::new(
//!         source,
//!         config.window_size(),
//!         config.poll_interval(),
//!         config.fetch_pause(),
//!         config.retry_pause(),
//!     );
//!
//!     let mut current = monitor.initialize().await?;
//!     loop {
//!         let report = monitor.run_cycle(&current).await?;
//!         for header in &report.discarded {
//!             println!("discarded {header}");
//!         }
//!         current = report.window;
//!     }
//! }
//! ```
//!
//! ## Environment Setup
//!
//! Create a `.env` file with your node endpoint:
//!
//! ```text
//! RPC_URL=https://eth-mainnet.example.com/rpc
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`error::MonitorResult<T>`](error::MonitorResult)
//! for consistent error propagation:
//!
//! ```rust
//! use reorg_monitor::error::{MonitorError, MonitorResult};
//!
//! fn example() -> MonitorResult<()> {
//!     // Operations that can fail return MonitorResult
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod reorg;
pub mod rpc;
