//! Window alignment and overlap comparison.
//!
//! Given the current window and the freshly fetched next window, this
//! module determines which trailing headers of the current window were
//! discarded because a competing header at the same height replaced them.
//!
//! ## Algorithm
//!
//! 1. Reject windows of unequal length.
//! 2. Find the alignment offset: the index in the next window whose height
//!    equals the current window's last height. Since both windows have
//!    consecutive heights, this single index lines up the whole overlap
//!    region. The scan runs from the last index backward, so identical
//!    windows align at the last index and compare to an empty result; if
//!    the scan exhausts without a match, the windows share no height
//!    range and [`MonitorError::NoOverlap`] is returned.
//! 3. Walk the overlap in lock-step from the top down, collecting every
//!    current-window header whose counterpart at the same height differs
//!    structurally.
//!
//! ```text
//! current:  2  3  4  5  6  7
//! next:        3  4  5  6' 7' 8
//!                       ^^^^^
//! offset = 4 (height 7 sits at index 4 of next); discarded = [7, 6]
//! ```
//!
//! The backward scan assumes at most `window length - 1` new blocks
//! arrived between polls; wider gaps surface as `NoOverlap` rather than
//! being silently treated as "no reorg", since reorgs beyond the window
//! could have been missed.

use tracing::{debug, trace};

use crate::error::{MonitorError, MonitorResult};
use crate::reorg::window::{BlockRecord, Window};

/// Compare the current window against its successor and return the
/// discarded headers, highest height first.
///
/// An empty result means no reorg occurred in the overlap region.
///
/// # Errors
///
/// - [`MonitorError::LengthMismatch`] if the windows differ in length.
/// - [`MonitorError::NoOverlap`] if no height in `next` matches the last
///   height of `current` (more blocks arrived than the window can bridge).
pub fn compare(current: &Window, next: &Window) -> MonitorResult<Vec<BlockRecord>> {
    if current.len() != next.len() {
        return Err(MonitorError::length_mismatch(current.len(), next.len()));
    }

    let offset = alignment_offset(current, next)?;
    debug!(
        offset,
        overlap_top = current.highest_height(),
        "Windows aligned"
    );

    Ok(discarded_headers(current, next, offset))
}

/// Find the index in `next` that lines up with the last header of
/// `current`, by height.
///
/// Scans from the last index of `next` backward. When `next` has advanced
/// past `current` the match sits below the last index; when both windows
/// end at the same height the match is the last index itself, so
/// comparing a window against itself always aligns.
fn alignment_offset(current: &Window, next: &Window) -> MonitorResult<usize> {
    let target = current.highest_height();

    (0..next.len())
        .rev()
        .find(|&i| next.headers()[i].number == target)
        .ok_or_else(|| {
            MonitorError::no_overlap(target, next.first().number, next.highest_height())
        })
}

/// Collect the headers of `current` that were replaced in the overlap
/// region, visiting pairs from the highest shared height downward.
fn discarded_headers(current: &Window, next: &Window, offset: usize) -> Vec<BlockRecord> {
    let old = current.headers();
    let new = next.headers();
    let top = old.len() - 1;

    let mut discarded = Vec::new();
    for step in 0..=offset {
        let i = offset - step;
        let j = top - step;

        if old[j] == new[i] {
            trace!(height = old[j].number, "Header unchanged");
        } else {
            // Same height, different fingerprint: this header was discarded.
            debug!(height = old[j].number, hash = %old[j].hash, "Header replaced");
            discarded.push(old[j].clone());
        }
    }
    discarded
}
