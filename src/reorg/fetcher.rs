//! Window fetching against a [`HeaderSource`].
//!
//! The fetcher produces [`Window`]s of N consecutive headers ending at the
//! chain head. Headers are fetched newest-first with a short pause between
//! requests: fetching downward from a single sampled head height keeps the
//! window consistent even while the head advances, and the pause avoids
//! hammering the remote node. This is a best-effort mitigation of head
//! races, not a guarantee; the comparison layer tolerates the residue.

use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::error::{MonitorError, MonitorResult};
use crate::reorg::window::Window;
use crate::reorg::HeaderSource;

/// Fetches header windows from a [`HeaderSource`], tolerating chain-head
/// races and rate-limiting the remote node.
///
/// Transient fetch errors are *not* retried here; they propagate to the
/// watch loop, whose restart-with-cooldown policy owns recovery.
#[derive(Debug)]
pub struct WindowFetcher<S> {
    source: S,

    /// Pause between individual header requests within one window.
    fetch_pause: Duration,

    /// Pause between attempts while waiting for a new block.
    retry_pause: Duration,
}

impl<S: HeaderSource> WindowFetcher<S> {
    /// Create a fetcher over the given source.
    pub const fn new(source: S, fetch_pause: Duration, retry_pause: Duration) -> Self {
        Self {
            source,
            fetch_pause,
            retry_pause,
        }
    }

    /// Fetch a window of `n` consecutive headers ending at the current
    /// chain head.
    ///
    /// Headers are requested in descending height order, newest first,
    /// with [`Self::fetch_pause`] between requests.
    ///
    /// # Errors
    ///
    /// - [`MonitorError::InvalidWindowSize`] if `n < 1`.
    /// - [`MonitorError::FetchError`] if the head query or any individual
    ///   header fetch fails, or if the chain holds fewer than `n` blocks.
    #[instrument(skip(self), fields(head = tracing::field::Empty))]
    pub async fn fetch_window(&self, n: usize) -> MonitorResult<Window> {
        if n < 1 {
            return Err(MonitorError::invalid_window_size(n));
        }

        let head = self.source.current_height().await?;
        tracing::Span::current().record("head", head);

        if head + 1 < n as u64 {
            return Err(MonitorError::fetch(
                format!("chain has only {} blocks, window needs {n}", head + 1),
                None,
            ));
        }

        let mut headers = Vec::with_capacity(n);
        for offset in 0..n as u64 {
            let header = self.source.header_at(head - offset).await?;
            debug!(%header, "Fetched header");
            headers.push(header);

            if offset + 1 < n as u64 {
                tokio::time::sleep(self.fetch_pause).await;
            }
        }
        headers.reverse();

        Window::new(headers)
    }

    /// Fetch a window of `n` headers whose last height is at least
    /// `min_height`, retrying until the node produces a new block.
    ///
    /// Between attempts the fetcher sleeps [`Self::retry_pause`]. The loop
    /// never masks fetch errors: any failure from [`Self::fetch_window`]
    /// propagates immediately.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_window`].
    pub async fn fetch_window_at_least(&self, n: usize, min_height: u64) -> MonitorResult<Window> {
        loop {
            let window = self.fetch_window(n).await?;
            if window.highest_height() >= min_height {
                return Ok(window);
            }

            warn!(
                head = window.highest_height(),
                min_height, "No new block yet, trying again"
            );
            tokio::time::sleep(self.retry_pause).await;
        }
    }
}
