//! Storage Backend Trait
//!
//! Defines the synchronous key-value primitive the TTL store is built over.

use thiserror::Error;

// == Storage Error ==
/// Failures the underlying storage primitive may raise.
///
/// Callers higher up (the TTL store) catch these and degrade to a cache
/// miss rather than surfacing them to application code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Write rejected because the backend is out of space
    #[error("Storage quota exceeded")]
    QuotaExceeded,

    /// Backend is not usable at all (disabled, detached, corrupted)
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Convenience Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

// == Storage Backend ==
/// Synchronous string key-value storage.
///
/// Operations are atomic per key; there are no torn writes and no
/// cross-key transactions. Implementations may reject writes with
/// [`StorageError::QuotaExceeded`].
pub trait StorageBackend {
    /// Reads the raw string stored under `key`, or None if absent.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Writes `value` under `key`, overwriting any previous value.
    fn write(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Deletes `key`. Deleting an absent key is a no-op.
    fn delete(&mut self, key: &str) -> StorageResult<()>;

    /// Lists every key currently present, in no particular order.
    fn list_keys(&self) -> StorageResult<Vec<String>>;
}
