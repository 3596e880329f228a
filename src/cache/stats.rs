//! Cache Statistics Module
//!
//! Tracks TTL store metrics: hits, misses, and expiry purges.

use serde::Serialize;

// == Cache Stats ==
/// Tracks TTL store performance metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of reads that returned a live value
    pub hits: u64,
    /// Number of reads that found nothing usable (absent, expired, corrupt)
    pub misses: u64,
    /// Number of entries purged because their TTL elapsed
    pub expired: u64,
    /// Number of entries purged because their payload failed to decode
    pub corrupt: u64,
    /// Current number of namespaced entries in storage
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Expired ==
    /// Increments the expiry-purge counter.
    pub fn record_expired(&mut self) {
        self.expired += 1;
    }

    // == Record Corrupt ==
    /// Increments the corrupt-purge counter.
    pub fn record_corrupt(&mut self) {
        self.corrupt += 1;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
