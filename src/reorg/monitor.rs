//! The poll-compare-report cycle.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::MonitorResult;
use crate::reorg::compare::compare;
use crate::reorg::fetcher::WindowFetcher;
use crate::reorg::window::{BlockRecord, Window};
use crate::reorg::HeaderSource;

/// Outcome of one completed polling cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// The freshly fetched window; the caller adopts it as current.
    pub window: Window,

    /// Headers of the previous window replaced by a competing fork,
    /// highest height first. Empty when no reorg occurred.
    pub discarded: Vec<BlockRecord>,
}

impl CycleReport {
    /// Whether this cycle observed a reorg.
    #[must_use]
    pub fn reorg_detected(&self) -> bool {
        !self.discarded.is_empty()
    }
}

/// Chain reorganization monitor.
///
/// Owns the window fetcher and the polling parameters, and drives the
/// `Initializing -> Polling -> Reporting` cycle. The monitor itself holds
/// no window: the caller keeps exactly one current window, feeds it to
/// [`ReorgMonitor::run_cycle`], and replaces it with the returned window
/// only when the cycle succeeds. A failed cycle leaves the previous
/// window current, so state is never partially mutated.
///
/// Polling is strictly sequential; each window is compared against the
/// window that immediately preceded it.
///
/// ## Example
///
/// ```rust,ignore
/// use reorg_monitor::reorg::ReorgMonitor;
///
/// let mut monitor = ReorgMonitor::new(source, 9, poll, fetch_pause, retry_pause);
/// let mut current = monitor.initialize().await?;
/// loop {
///     let report = monitor.run_cycle(&current).await?;
///     if report.reorg_detected() {
///         println!("reorg! {} blocks discarded", report.discarded.len());
///     }
///     current = report.window;
/// }
/// ```
#[derive(Debug)]
pub struct ReorgMonitor<S> {
    fetcher: WindowFetcher<S>,
    window_size: usize,
    poll_interval: Duration,
    reorg_count: u64,
}

impl<S: HeaderSource> ReorgMonitor<S> {
    /// Create a monitor over the given header source.
    pub const fn new(
        source: S,
        window_size: usize,
        poll_interval: Duration,
        fetch_pause: Duration,
        retry_pause: Duration,
    ) -> Self {
        Self {
            fetcher: WindowFetcher::new(source, fetch_pause, retry_pause),
            window_size,
            poll_interval,
            reorg_count: 0,
        }
    }

    /// Total number of reorgs observed since construction.
    #[must_use]
    pub const fn reorg_count(&self) -> u64 {
        self.reorg_count
    }

    /// Fetch the initial window of recent headers.
    ///
    /// # Errors
    ///
    /// Propagates fetch and window-size errors from the fetcher; the
    /// caller decides whether to restart.
    pub async fn initialize(&self) -> MonitorResult<Window> {
        let window = self.fetcher.fetch_window(self.window_size).await?;
        info!(
            from = window.first().number,
            to = window.highest_height(),
            "Initial window fetched"
        );
        Ok(window)
    }

    /// Run one polling cycle against the caller's current window.
    ///
    /// Sleeps the poll interval, fetches a strictly newer window of the
    /// same size, compares it against `current`, and reports the result.
    /// The returned [`CycleReport::window`] becomes the caller's new
    /// current window.
    ///
    /// # Errors
    ///
    /// Propagates fetch errors and comparison errors
    /// ([`crate::error::MonitorError::LengthMismatch`],
    /// [`crate::error::MonitorError::NoOverlap`]) without handling them;
    /// the watch loop owns the restart policy.
    pub async fn run_cycle(&mut self, current: &Window) -> MonitorResult<CycleReport> {
        debug!(
            interval_secs = self.poll_interval.as_secs(),
            "Waiting for next poll"
        );
        tokio::time::sleep(self.poll_interval).await;

        // Strictly newer: at least one block past the current window.
        let min_height = current.highest_height() + 1;
        let next = self
            .fetcher
            .fetch_window_at_least(self.window_size, min_height)
            .await?;

        let discarded = compare(current, &next)?;
        if discarded.is_empty() {
            info!(height = next.highest_height(), "No reorg, new height reached");
        } else {
            self.reorg_count += 1;
            warn!(
                depth = discarded.len(),
                top = discarded[0].number,
                total = self.reorg_count,
                "Reorg detected"
            );
        }

        Ok(CycleReport {
            window: next,
            discarded,
        })
    }
}
