//! TTL Cache Module
//!
//! Namespaced key-value memoization with per-entry expiry, backed by a
//! synchronous durable storage primitive. Expiry is lazy (checked on read)
//! plus a periodic sweep; no per-entry timers.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::{current_timestamp_ms, StoredEntry};
pub use stats::CacheStats;
pub use store::TtlStore;

// == Public Constants ==
/// Maximum allowed key length in bytes (before namespacing)
pub const MAX_KEY_LENGTH: usize = 256;
