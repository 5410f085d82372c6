//! Error types for the reorg monitor.
//!
//! This module provides a unified error type [`MonitorError`] covering every
//! failure mode of the monitor, from transient RPC trouble to contract
//! violations in the window comparison.
//!
//! # Design
//!
//! The taxonomy follows the restart policy of the watch loop:
//! - [`MonitorError::FetchError`]: transient failure reaching the node;
//!   recovered by restarting the detection cycle after a cooldown.
//! - [`MonitorError::NoOverlap`]: the new window shares no height with the
//!   old one. A configuration/timing problem (window too small relative to
//!   chain speed), surfaced loudly rather than treated as "no reorg".
//!   Restarting re-seeds the window, so it is retryable.
//! - [`MonitorError::InvalidWindowSize`] and [`MonitorError::LengthMismatch`]:
//!   configuration or programming defects; retrying cannot help.
//! - [`MonitorError::ConfigError`]: environment/configuration issues at
//!   startup.
//!
//! All errors implement [`std::error::Error`] and carry the underlying error
//! in the source chain where one exists.
//!
//! # Example
//!
//! ```
//! use reorg_monitor::error::{MonitorError, MonitorResult};
//!
//! fn validate_size(size: usize) -> MonitorResult<()> {
//!     if size < 1 {
//!         return Err(MonitorError::invalid_window_size(size));
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

/// Result type alias using [`MonitorError`].
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Unified error type for the reorg monitor.
#[derive(Debug)]
pub enum MonitorError {
    /// Configuration or environment variable errors.
    ConfigError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Transient failure fetching from the header source.
    ///
    /// Covers connection errors, timeouts, missing blocks and any other
    /// RPC-level trouble. The watch loop recovers from this by restarting
    /// the whole detection cycle after a cooldown.
    FetchError {
        /// Human-readable error message
        message: String,
        /// Optional underlying error
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A window of fewer than one header was requested.
    InvalidWindowSize {
        /// The requested window size
        size: usize,
    },

    /// Two windows of different lengths were passed to the comparer.
    ///
    /// Cannot occur if the window fetcher is correct; treated as a
    /// contract violation and never retried.
    LengthMismatch {
        /// Length of the current (old) window
        current: usize,
        /// Length of the next (new) window
        next: usize,
    },

    /// The new window shares no height with the old window's last header.
    ///
    /// More than `window size - 1` blocks were produced between polls, so
    /// reorgs in the gap could have been missed. This is a scope limit of
    /// the sliding-window scheme and is surfaced rather than ignored.
    NoOverlap {
        /// Highest height of the old window
        old_last: u64,
        /// Lowest height of the new window
        new_first: u64,
        /// Highest height of the new window
        new_last: u64,
    },
}

impl MonitorError {
    /// Create a new configuration error.
    ///
    /// # Example
    ///
    /// ```
    /// use reorg_monitor::error::MonitorError;
    ///
    /// let err = MonitorError::config("RPC_URL not set", None);
    /// assert!(matches!(err, MonitorError::ConfigError { .. }));
    /// ```
    #[must_use]
    pub fn config(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            source,
        }
    }

    /// Create a new fetch error.
    ///
    /// # Example
    ///
    /// ```
    /// use reorg_monitor::error::MonitorError;
    ///
    /// let err = MonitorError::fetch("connection refused", None);
    /// assert!(matches!(err, MonitorError::FetchError { .. }));
    /// ```
    #[must_use]
    pub fn fetch(
        message: impl Into<String>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::FetchError {
            message: message.into(),
            source,
        }
    }

    /// Create a new invalid-window-size error.
    #[must_use]
    pub const fn invalid_window_size(size: usize) -> Self {
        Self::InvalidWindowSize { size }
    }

    /// Create a new length-mismatch error.
    #[must_use]
    pub const fn length_mismatch(current: usize, next: usize) -> Self {
        Self::LengthMismatch { current, next }
    }

    /// Create a new no-overlap error.
    #[must_use]
    pub const fn no_overlap(old_last: u64, new_first: u64, new_last: u64) -> Self {
        Self::NoOverlap {
            old_last,
            new_first,
            new_last,
        }
    }

    /// Whether the watch loop may recover by restarting the detection
    /// cycle after a cooldown.
    ///
    /// Transient fetch failures and missed overlaps are retryable; window
    /// size and length-mismatch defects are not, nor are configuration
    /// errors.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchError { .. } | Self::NoOverlap { .. })
    }
}

impl fmt::Display for MonitorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigError { message, .. } => write!(f, "Configuration error: {message}"),
            Self::FetchError { message, .. } => write!(f, "Fetch error: {message}"),
            Self::InvalidWindowSize { size } => {
                write!(f, "Invalid window size: {size} (must be at least 1)")
            }
            Self::LengthMismatch { current, next } => {
                write!(
                    f,
                    "Window length mismatch: current has {current} headers, next has {next}"
                )
            }
            Self::NoOverlap {
                old_last,
                new_first,
                new_last,
            } => {
                write!(
                    f,
                    "No overlap between windows: old window ends at height {old_last}, \
                     new window covers heights {new_first}..={new_last}; \
                     increase WINDOW_SIZE or decrease POLL_INTERVAL_SECS"
                )
            }
        }
    }
}

impl std::error::Error for MonitorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigError { source, .. } | Self::FetchError { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &dyn std::error::Error),
            Self::InvalidWindowSize { .. }
            | Self::LengthMismatch { .. }
            | Self::NoOverlap { .. } => None,
        }
    }
}

/// Convert from `eyre::Report` to `MonitorError`.
///
/// Used for wrapping errors that do not fit a specific category; they are
/// categorized as fetch errors, the only transient kind.
impl From<eyre::Report> for MonitorError {
    fn from(err: eyre::Report) -> Self {
        Self::FetchError {
            message: err.to_string(),
            source: None,
        }
    }
}
