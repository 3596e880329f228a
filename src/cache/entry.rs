//! Stored Entry Module
//!
//! Defines the serialized envelope a TTL store entry is persisted as.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Stored Entry ==
/// The on-storage envelope for a single cached value.
///
/// Persisted as JSON; a payload that fails to decode back into this shape
/// is treated as corrupt and purged by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntry {
    /// The cached value, any JSON-serializable shape
    pub data: Value,
    /// Write timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Lifetime in milliseconds from `stored_at`
    pub ttl_ms: u64,
}

impl StoredEntry {
    // == Constructor ==
    /// Wraps `data` in an envelope stamped with the current wall clock.
    pub fn new(data: Value, ttl_ms: u64) -> Self {
        Self {
            data,
            stored_at: current_timestamp_ms(),
            ttl_ms,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived its TTL at time `now_ms`.
    ///
    /// An entry is readable while `now - stored_at <= ttl_ms`; it expires
    /// strictly after the full TTL has elapsed. The clock is sampled at
    /// read time, so a suspended process expires entries correctly on
    /// resume without any timer having fired.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.stored_at) > self.ttl_ms
    }

    /// Checks expiry against the current wall clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    // == Time To Live ==
    /// Remaining lifetime in milliseconds, 0 once expired.
    ///
    /// The deadline saturates, so a near-`u64::MAX` TTL reads as
    /// effectively unbounded instead of wrapping.
    pub fn ttl_remaining_ms(&self) -> u64 {
        self.stored_at
            .saturating_add(self.ttl_ms)
            .saturating_sub(current_timestamp_ms())
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    Utc::now().timestamp_millis() as u64
}
