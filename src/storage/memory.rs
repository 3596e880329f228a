//! In-Memory Storage Backend
//!
//! HashMap-backed implementation of the storage primitive with an optional
//! byte quota, so quota-exhaustion paths are exercisable in tests.

use std::collections::HashMap;

use super::backend::{StorageBackend, StorageError, StorageResult};

// == Memory Backend ==
/// In-memory storage with an optional total-size quota.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    /// Raw key-value entries
    entries: HashMap<String, String>,
    /// Maximum combined byte size of keys + values, None = unbounded
    quota_bytes: Option<usize>,
}

impl MemoryBackend {
    // == Constructor ==
    /// Creates an unbounded in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that rejects writes once the combined size of all
    /// keys and values would exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Current combined byte footprint of keys and values.
    pub fn used_bytes(&self) -> usize {
        self.entries.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota) = self.quota_bytes {
            let replaced = self.entries.get(key).map(|v| key.len() + v.len()).unwrap_or(0);
            let projected = self.used_bytes() - replaced + key.len() + value.len();
            if projected > quota {
                return Err(StorageError::QuotaExceeded);
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> StorageResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn list_keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}
