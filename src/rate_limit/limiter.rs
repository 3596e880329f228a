//! Rate Limiter Module
//!
//! Fixed-window limiter keyed by caller-supplied subject strings.
//!
//! Fixed windows are deliberately simple and slightly permissive at the
//! boundary: a subject can perform close to `2 * max_attempts` in a short
//! span straddling a reset. That tradeoff is intentional for operations
//! that are sensitive but not adversarial-security-critical; do not swap
//! in a sliding window here without a requirements change.

use std::collections::HashMap;

use crate::cache::current_timestamp_ms;
use crate::rate_limit::{KeyTracker, RateWindow};

// == Rate Limiter ==
/// Per-subject fixed-window attempt counter.
///
/// Fully synchronous; per-key exclusion comes from single-threaded use
/// behind a lock, so no internal locking is added.
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum attempts allowed per window
    max_attempts: u32,
    /// Window length in milliseconds
    window_ms: u64,
    /// Active windows by subject key
    windows: HashMap<String, RateWindow>,
    /// Recency order for bounded eviction
    tracker: KeyTracker,
    /// Upper bound on distinct tracked keys, None = unbounded
    max_tracked_keys: Option<usize>,
}

impl RateLimiter {
    // == Constructor ==
    /// Creates a limiter allowing `max_attempts` per `window_ms`.
    ///
    /// # Panics
    /// Panics if `max_attempts` or `window_ms` is zero; both are
    /// deploy-time constants, not runtime inputs.
    pub fn new(max_attempts: u32, window_ms: u64) -> Self {
        assert!(max_attempts > 0, "max_attempts must be positive");
        assert!(window_ms > 0, "window_ms must be positive");
        Self {
            max_attempts,
            window_ms,
            windows: HashMap::new(),
            tracker: KeyTracker::new(),
            max_tracked_keys: None,
        }
    }

    /// Bounds the number of distinct subjects tracked; once full, the
    /// least recently checked stale window is evicted to admit a new one.
    /// Live windows are never evicted, so decisions inside a window are
    /// identical with and without the bound; while every window is live
    /// the bound is exceeded rather than enforced.
    pub fn with_max_tracked_keys(mut self, max_keys: usize) -> Self {
        self.max_tracked_keys = Some(max_keys);
        self
    }

    /// Maximum attempts per window.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Window length in milliseconds.
    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    // == Is Allowed ==
    /// Records an attempt for `key` and decides whether it may proceed.
    ///
    /// - No window yet: open one with count 1, allow.
    /// - Stale window: replace it wholesale with a fresh one, allow.
    /// - Live window under the limit: increment, allow.
    /// - Live window at the limit: deny without incrementing, so repeated
    ///   checks after saturation do not corrupt state.
    pub fn is_allowed(&mut self, key: &str) -> bool {
        let now = current_timestamp_ms();

        match self.windows.get_mut(key) {
            Some(window) if window.is_stale_at(now) => {
                *window = RateWindow::open(self.window_ms);
                self.tracker.touch(key);
                true
            }
            Some(window) => {
                if window.count < self.max_attempts {
                    window.count += 1;
                    self.tracker.touch(key);
                    true
                } else {
                    // Denied checks still refresh recency: a subject being
                    // actively throttled must not drift toward eviction
                    self.tracker.touch(key);
                    false
                }
            }
            None => {
                self.admit(key, now);
                true
            }
        }
    }

    fn admit(&mut self, key: &str, now: u64) {
        if let Some(max_keys) = self.max_tracked_keys {
            if self.windows.len() >= max_keys {
                self.evict_stale(now);
            }
        }
        self.windows
            .insert(key.to_string(), RateWindow::open(self.window_ms));
        self.tracker.touch(key);
    }

    /// Evicts the least recently checked stale window, if any.
    ///
    /// A stale window resets lazily on its next check anyway, so dropping
    /// it is invisible to `is_allowed`. A live window is never evicted:
    /// dropping one would restart its count mid-window.
    fn evict_stale(&mut self, now: u64) {
        let stale = self
            .tracker
            .keys_oldest_first()
            .find(|key| {
                self.windows
                    .get(*key)
                    .is_some_and(|window| window.is_stale_at(now))
            })
            .map(String::from);

        if let Some(key) = stale {
            self.windows.remove(&key);
            self.tracker.remove(&key);
        }
    }

    // == Remaining Attempts ==
    /// Attempts left for `key` in its current window.
    ///
    /// Read-only: a fresh or stale window reports the full allowance
    /// without opening one.
    pub fn remaining_attempts(&self, key: &str) -> u32 {
        match self.windows.get(key) {
            Some(window) if !window.is_stale() => {
                self.max_attempts.saturating_sub(window.count)
            }
            _ => self.max_attempts,
        }
    }

    // == Time Until Reset ==
    /// Milliseconds until `key`'s window resets, 0 if none is live.
    pub fn time_until_reset(&self, key: &str) -> u64 {
        match self.windows.get(key) {
            Some(window) if !window.is_stale() => {
                window.reset_at.saturating_sub(current_timestamp_ms())
            }
            _ => 0,
        }
    }

    // == Clear ==
    /// Drops `key`'s window entirely, returning it to the fresh state.
    pub fn clear(&mut self, key: &str) {
        self.windows.remove(key);
        self.tracker.remove(key);
    }

    // == Cleanup ==
    /// Removes every stale window.
    ///
    /// Memory management only: stale windows already self-reset lazily,
    /// so this never changes an `is_allowed` decision.
    pub fn cleanup(&mut self) -> usize {
        let now = current_timestamp_ms();
        let stale_keys: Vec<String> = self
            .windows
            .iter()
            .filter(|(_, window)| window.is_stale_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = stale_keys.len();
        for key in stale_keys {
            self.windows.remove(&key);
            self.tracker.remove(&key);
        }
        count
    }

    // == Tracked Keys ==
    /// Number of subjects currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}
