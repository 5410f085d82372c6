//! Integration tests for window fetching and the monitor cycle.
//!
//! These tests drive the fetcher and monitor against a scripted in-memory
//! chain instead of a live node, covering:
//! 1. Window shape guarantees (length, consecutive ascending heights)
//! 2. Descending fetch order and error propagation
//! 3. The at-least retry loop waiting out a quiet chain
//! 4. Full polling cycles across simulated reorgs
//!
//! All pauses are set to zero so the tests complete immediately.

use alloy::primitives::B256;
use reorg_monitor::error::{MonitorError, MonitorResult};
use reorg_monitor::reorg::{BlockRecord, HeaderSource, ReorgMonitor, WindowFetcher};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ZERO: Duration = Duration::ZERO;

/// Canonical header at `number`: fingerprint derived from the height, so
/// independently built copies compare equal.
fn canonical(number: u64) -> BlockRecord {
    BlockRecord::new(
        number,
        B256::repeat_byte(number as u8),
        B256::repeat_byte(number.wrapping_sub(1) as u8),
        1_700_000_000 + number * 12,
    )
}

/// Competing header at `number`: same height, different fingerprint.
fn fork(number: u64) -> BlockRecord {
    BlockRecord::new(
        number,
        B256::repeat_byte(0x80 | number as u8),
        B256::repeat_byte(0x80 | number.wrapping_sub(1) as u8),
        1_700_000_000 + number * 12,
    )
}

#[derive(Default)]
struct ChainState {
    blocks: Vec<BlockRecord>,
    fetch_order: Vec<u64>,
    fail_at_height: Option<u64>,
    height_queries: u64,
    /// After this many height queries, extend the canonical chain by one
    /// block (simulates the node producing a block mid-retry-loop).
    extend_after_queries: Option<u64>,
}

/// Scripted in-memory chain. Cloning shares the underlying state, so a
/// test can mutate the chain while the monitor owns a handle to it.
#[derive(Clone, Default)]
struct MockChain {
    state: Arc<Mutex<ChainState>>,
}

impl MockChain {
    fn with_canonical(heights: std::ops::RangeInclusive<u64>) -> Self {
        let chain = Self::default();
        chain.state.lock().unwrap().blocks = heights.map(canonical).collect();
        chain
    }

    /// Extend the canonical chain up to `to`.
    fn extend_to(&self, to: u64) {
        let mut state = self.state.lock().unwrap();
        let from = state.blocks.last().map_or(0, |b| b.number + 1);
        state.blocks.extend((from..=to).map(canonical));
    }

    /// Replace everything from `from` upward with a competing fork that
    /// extends up to `to`.
    fn reorg_from(&self, from: u64, to: u64) {
        let mut state = self.state.lock().unwrap();
        state.blocks.retain(|b| b.number < from);
        state.blocks.extend((from..=to).map(fork));
    }

    fn fail_at_height(&self, height: u64) {
        self.state.lock().unwrap().fail_at_height = Some(height);
    }

    fn extend_after_queries(&self, queries: u64) {
        self.state.lock().unwrap().extend_after_queries = Some(queries);
    }

    fn fetch_order(&self) -> Vec<u64> {
        self.state.lock().unwrap().fetch_order.clone()
    }
}

impl HeaderSource for MockChain {
    async fn current_height(&self) -> MonitorResult<u64> {
        let mut state = self.state.lock().unwrap();
        state.height_queries += 1;

        if let Some(queries) = state.extend_after_queries {
            if state.height_queries > queries {
                let next = state.blocks.last().map_or(0, |b| b.number + 1);
                state.blocks.push(canonical(next));
                state.extend_after_queries = None;
            }
        }

        state
            .blocks
            .last()
            .map(|b| b.number)
            .ok_or_else(|| MonitorError::fetch("empty chain", None))
    }

    async fn header_at(&self, height: u64) -> MonitorResult<BlockRecord> {
        let mut state = self.state.lock().unwrap();
        state.fetch_order.push(height);

        if state.fail_at_height == Some(height) {
            return Err(MonitorError::fetch(
                format!("simulated failure at height {height}"),
                None,
            ));
        }

        state
            .blocks
            .iter()
            .find(|b| b.number == height)
            .cloned()
            .ok_or_else(|| MonitorError::fetch(format!("block {height} not found"), None))
    }
}

fn fetcher(chain: &MockChain) -> WindowFetcher<MockChain> {
    WindowFetcher::new(chain.clone(), ZERO, ZERO)
}

fn monitor(chain: &MockChain, window_size: usize) -> ReorgMonitor<MockChain> {
    ReorgMonitor::new(chain.clone(), window_size, ZERO, ZERO, ZERO)
}

// --- Window fetcher ---

#[tokio::test]
async fn fetched_windows_are_consecutive_and_exactly_n() {
    let chain = MockChain::with_canonical(0..=20);
    let window = fetcher(&chain).fetch_window(9).await.unwrap();

    assert_eq!(window.len(), 9);
    assert_eq!(window.first().number, 12);
    assert_eq!(window.highest_height(), 20);
    for pair in window.headers().windows(2) {
        assert_eq!(pair[1].number, pair[0].number + 1);
    }
}

#[tokio::test]
async fn headers_are_fetched_newest_first() {
    let chain = MockChain::with_canonical(0..=10);
    fetcher(&chain).fetch_window(4).await.unwrap();

    assert_eq!(chain.fetch_order(), vec![10, 9, 8, 7]);
}

#[tokio::test]
async fn zero_window_size_is_rejected() {
    let chain = MockChain::with_canonical(0..=10);
    let result = fetcher(&chain).fetch_window(0).await;

    assert!(matches!(
        result,
        Err(MonitorError::InvalidWindowSize { size: 0 })
    ));
}

#[tokio::test]
async fn short_chain_is_a_fetch_error() {
    let chain = MockChain::with_canonical(0..=3);
    let result = fetcher(&chain).fetch_window(9).await;

    assert!(matches!(result, Err(MonitorError::FetchError { .. })));
}

#[tokio::test]
async fn individual_fetch_failures_propagate() {
    let chain = MockChain::with_canonical(0..=10);
    chain.fail_at_height(8);

    let result = fetcher(&chain).fetch_window(5).await;
    assert!(matches!(result, Err(MonitorError::FetchError { .. })));
}

#[tokio::test]
async fn at_least_returns_immediately_when_head_is_new_enough() {
    let chain = MockChain::with_canonical(0..=10);
    let window = fetcher(&chain).fetch_window_at_least(4, 10).await.unwrap();

    assert_eq!(window.highest_height(), 10);
}

#[tokio::test]
async fn at_least_waits_for_a_new_block() {
    let chain = MockChain::with_canonical(0..=10);
    // Head stays at 10 for the first two height queries, then block 11
    // appears.
    chain.extend_after_queries(2);

    let window = fetcher(&chain).fetch_window_at_least(4, 11).await.unwrap();
    assert_eq!(window.highest_height(), 11);
    assert_eq!(window.first().number, 8);
}

#[tokio::test]
async fn at_least_never_masks_fetch_errors() {
    let chain = MockChain::with_canonical(0..=10);
    chain.fail_at_height(9);

    let result = fetcher(&chain).fetch_window_at_least(4, 11).await;
    assert!(matches!(result, Err(MonitorError::FetchError { .. })));
}

// --- Monitor cycle ---

#[tokio::test]
async fn quiet_chain_reports_no_reorg_and_advances() {
    let chain = MockChain::with_canonical(0..=9);
    let mut monitor = monitor(&chain, 9);

    let current = monitor.initialize().await.unwrap();
    assert_eq!(current.first().number, 1);
    assert_eq!(current.highest_height(), 9);

    // One new canonical block arrives before the next poll.
    chain.extend_to(10);

    let report = monitor.run_cycle(&current).await.unwrap();
    assert!(!report.reorg_detected());
    assert!(report.discarded.is_empty());
    assert_eq!(report.window.highest_height(), 10);
    assert_eq!(monitor.reorg_count(), 0);

    // Next cycle polls from the adopted window's head + 1.
    assert_eq!(report.window.highest_height() + 1, 11);
}

#[tokio::test]
async fn reorg_is_reported_highest_first() {
    let chain = MockChain::with_canonical(0..=9);
    let mut monitor = monitor(&chain, 4);

    let current = monitor.initialize().await.unwrap();
    assert_eq!(current.first().number, 6);

    // Heights 8 and 9 are replaced by a competing fork that also adds 10.
    chain.reorg_from(8, 10);

    let report = monitor.run_cycle(&current).await.unwrap();
    assert!(report.reorg_detected());
    assert_eq!(report.discarded, vec![canonical(9), canonical(8)]);
    assert_eq!(monitor.reorg_count(), 1);

    // The fork itself is now current history; a further quiet cycle is
    // clean.
    chain.extend_to(11);
    let next = monitor.run_cycle(&report.window).await.unwrap();
    assert!(!next.reorg_detected());
    assert_eq!(monitor.reorg_count(), 1);
}

#[tokio::test]
async fn gap_wider_than_window_surfaces_no_overlap() {
    let chain = MockChain::with_canonical(0..=9);
    let mut monitor = monitor(&chain, 3);

    let current = monitor.initialize().await.unwrap();
    assert_eq!(current.highest_height(), 9);

    // Far more blocks than the window can bridge arrive between polls.
    chain.extend_to(20);

    let result = monitor.run_cycle(&current).await;
    assert!(matches!(
        result,
        Err(MonitorError::NoOverlap {
            old_last: 9,
            new_first: 18,
            new_last: 20
        })
    ));

    // The failed cycle left the caller's window untouched; after a
    // restart-style re-initialization the monitor recovers.
    assert_eq!(current.highest_height(), 9);
    let reseeded = monitor.initialize().await.unwrap();
    assert_eq!(reseeded.highest_height(), 20);
}

#[tokio::test]
async fn cycle_propagates_fetch_errors_and_preserves_window() {
    let chain = MockChain::with_canonical(0..=9);
    let mut monitor = monitor(&chain, 4);

    let current = monitor.initialize().await.unwrap();

    chain.extend_to(10);
    chain.fail_at_height(9);

    let result = monitor.run_cycle(&current).await;
    assert!(matches!(result, Err(MonitorError::FetchError { .. })));
    assert!(result.unwrap_err().is_retryable());

    // Previous window remains current until a cycle completes.
    assert_eq!(current.highest_height(), 9);
}
