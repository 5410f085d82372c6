//! Chain reorganization detection.
//!
//! This module is the core of the crate: it maintains a sliding window of
//! recently observed block headers and, after every polling interval,
//! fetches a fresh window and compares the two to find headers that were
//! replaced by a competing fork.
//!
//! ## How It Works
//!
//! 1. **Window Fetch**: fetch N consecutive headers ending at the chain
//!    head, newest first with a short pause between requests
//!    ([`fetcher::WindowFetcher`])
//! 2. **Alignment**: line the new window up against the old one by
//!    locating the old window's last height inside the new window
//!    ([`compare::compare`])
//! 3. **Overlap Walk**: compare the overlapping heights pairwise; every
//!    pair that differs structurally marks a discarded header
//! 4. **Adopt**: the new window replaces the old one wholesale and the
//!    cycle repeats ([`monitor::ReorgMonitor`])
//!
//! Forks deeper than the window length are out of reach by design; when
//! more than `N - 1` blocks arrive between polls the comparison fails
//! loudly with a no-overlap error instead of pretending nothing happened.
//!
//! ## Example
//!
//! ```rust,ignore
//! use reorg_monitor::reorg::ReorgMonitor;
//! use std::time::Duration;
//!
//! # async fn example(source: impl reorg_monitor::reorg::HeaderSource) -> eyre::Result<()> {
//! let mut monitor = ReorgMonitor::new(
//!     source,
//!     9,
//!     Duration::from_secs(16),
//!     Duration::from_millis(200),
//!     Duration::from_millis(200),
//! );
//!
//! let mut current = monitor.initialize().await?;
//! loop {
//!     let report = monitor.run_cycle(&current).await?;
//!     for header in &report.discarded {
//!         println!("discarded {header}");
//!     }
//!     current = report.window;
//! }
//! # }
//! ```

pub mod compare;
pub mod fetcher;
pub mod monitor;
pub mod window;

use crate::error::MonitorResult;

pub use compare::compare;
pub use fetcher::WindowFetcher;
pub use monitor::{CycleReport, ReorgMonitor};
pub use window::{BlockRecord, Window};

/// The monitor's view of a chain node.
///
/// Both operations may fail transiently; callers treat every error as a
/// [`crate::error::MonitorError::FetchError`] and recover per the watch
/// loop's restart policy. Reconnecting a dropped connection is the
/// implementor's concern, not the monitor's.
///
/// Implemented by [`crate::rpc::RpcHeaderSource`] in production and by
/// scripted in-memory chains in tests.
#[allow(async_fn_in_trait)]
pub trait HeaderSource {
    /// Height of the current chain head.
    async fn current_height(&self) -> MonitorResult<u64>;

    /// The canonical header at `height`, per the node's current view.
    async fn header_at(&self, height: u64) -> MonitorResult<BlockRecord>;
}
