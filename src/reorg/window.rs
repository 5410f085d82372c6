//! Header and window value types.

use alloy::primitives::B256;
use alloy::rpc::types::Block;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MonitorError, MonitorResult};

/// Immutable record of one observed block header.
///
/// Stores the fields needed to detect reorgs:
/// - Block number and hash
/// - Parent hash (to describe chain linkage in reports)
/// - Timestamp (for human-readable reports)
///
/// The `hash` is the node's content fingerprint over all header fields, so
/// two competing headers at the same height always differ. Equality is
/// full structural equality over every field; headers are never compared
/// by height alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRecord {
    /// Block number
    pub number: u64,

    /// Block hash (content fingerprint)
    pub hash: B256,

    /// Parent block hash
    pub parent_hash: B256,

    /// Block timestamp (Unix epoch seconds)
    pub timestamp: u64,
}

impl BlockRecord {
    /// Create a `BlockRecord` from an Alloy block.
    ///
    /// Extracts the essential fields needed for reorg detection.
    #[must_use]
    pub fn from_block(block: &Block) -> Self {
        Self {
            number: block.header.number,
            hash: block.header.hash,
            parent_hash: block.header.parent_hash,
            timestamp: block.header.timestamp,
        }
    }

    /// Create a new `BlockRecord` manually (useful for testing).
    #[must_use]
    pub const fn new(number: u64, hash: B256, parent_hash: B256, timestamp: u64) -> Self {
        Self {
            number,
            hash,
            parent_hash,
            timestamp,
        }
    }
}

impl fmt::Display for BlockRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block {} ({})", self.number, self.hash)
    }
}

/// A fixed-size sequence of headers with strictly consecutive ascending
/// heights.
///
/// The window is the bounded lookback buffer of the monitor: reorgs deeper
/// than the window length cannot be observed. Windows are self-contained
/// values; each polling cycle produces a brand-new window that replaces
/// the previous one wholesale.
///
/// Invariants (checked at construction): at least one header, and
/// `headers[i + 1].number == headers[i].number + 1` for every `i`.
/// A violated window is a fetch-layer bug and is reported as a fetch
/// error, not silently accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    headers: Vec<BlockRecord>,
}

impl Window {
    /// Build a window from headers sorted ascending by height.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::InvalidWindowSize`] if `headers` is empty,
    /// or a fetch error if heights are not strictly consecutive.
    pub fn new(headers: Vec<BlockRecord>) -> MonitorResult<Self> {
        if headers.is_empty() {
            return Err(MonitorError::invalid_window_size(0));
        }

        for pair in headers.windows(2) {
            if pair[1].number != pair[0].number + 1 {
                return Err(MonitorError::fetch(
                    format!(
                        "window heights not consecutive: height {} followed by {}",
                        pair[0].number, pair[1].number
                    ),
                    None,
                ));
            }
        }

        Ok(Self { headers })
    }

    /// Number of headers in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Whether the window holds no headers. Always `false` for a
    /// constructed window; provided for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// The headers, ascending by height.
    #[must_use]
    pub fn headers(&self) -> &[BlockRecord] {
        &self.headers
    }

    /// The oldest (lowest) header.
    #[must_use]
    pub fn first(&self) -> &BlockRecord {
        &self.headers[0]
    }

    /// The newest (highest) header.
    #[must_use]
    pub fn last(&self) -> &BlockRecord {
        &self.headers[self.headers.len() - 1]
    }

    /// Height of the newest header.
    #[must_use]
    pub fn highest_height(&self) -> u64 {
        self.last().number
    }
}
