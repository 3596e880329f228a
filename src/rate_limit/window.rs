//! Rate Window Module
//!
//! Defines the per-subject counter for one fixed time window.

use crate::cache::current_timestamp_ms;

// == Rate Window ==
/// Attempt counter for a single subject within the current fixed window.
#[derive(Debug, Clone)]
pub struct RateWindow {
    /// Attempts recorded in this window
    pub count: u32,
    /// Timestamp (Unix milliseconds) at which the window resets
    pub reset_at: u64,
}

impl RateWindow {
    // == Constructor ==
    /// Opens a fresh window with one attempt already recorded.
    pub fn open(window_ms: u64) -> Self {
        Self {
            count: 1,
            reset_at: current_timestamp_ms() + window_ms,
        }
    }

    // == Is Stale ==
    /// A window is stale once the current time reaches `reset_at`; stale
    /// windows are replaced wholesale on the next check, never merged.
    pub fn is_stale_at(&self, now_ms: u64) -> bool {
        now_ms >= self.reset_at
    }

    /// Checks staleness against the current wall clock.
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(current_timestamp_ms())
    }
}
