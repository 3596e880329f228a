//! TTL Store Module
//!
//! Namespaced memoization cache over a synchronous storage backend.
//! Storage faults never cross this boundary: a failed write is logged and
//! dropped, a corrupt or expired entry reads as absent and is purged.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{current_timestamp_ms, CacheStats, StoredEntry, MAX_KEY_LENGTH};
use crate::storage::StorageBackend;

// == TTL Store ==
/// Key-value cache with per-entry expiry over an injected storage backend.
///
/// Constructed once at startup and passed by reference to consumers; there
/// is no hidden module-level instance.
#[derive(Debug)]
pub struct TtlStore<B: StorageBackend> {
    /// Underlying synchronous storage
    backend: B,
    /// Prefix reserved for this store's keys
    namespace: String,
    /// Default TTL in milliseconds for entries without an explicit TTL
    default_ttl_ms: u64,
    /// Performance statistics
    stats: CacheStats,
}

impl<B: StorageBackend> TtlStore<B> {
    // == Constructor ==
    /// Creates a new TtlStore over `backend`.
    ///
    /// # Arguments
    /// * `backend` - The storage primitive to persist into
    /// * `namespace` - Key prefix reserved for this store
    /// * `default_ttl_ms` - TTL applied when `set` is called without one
    pub fn new(backend: B, namespace: impl Into<String>, default_ttl_ms: u64) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
            default_ttl_ms,
            stats: CacheStats::new(),
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.namespace, key)
    }

    fn namespaced_keys(&self) -> Vec<String> {
        match self.backend.list_keys() {
            Ok(keys) => keys
                .into_iter()
                .filter(|k| k.starts_with(&self.namespace))
                .collect(),
            Err(err) => {
                warn!("TTL store: listing keys failed: {}", err);
                Vec::new()
            }
        }
    }

    // == Set ==
    /// Stores `data` under the namespaced key with the given TTL.
    ///
    /// Never fails from the caller's perspective: serialization or storage
    /// errors (quota, unavailable) are logged and the prior state is left
    /// unchanged. Keys longer than [`MAX_KEY_LENGTH`] are rejected the same
    /// way.
    pub fn set<T: Serialize>(&mut self, key: &str, data: &T, ttl_ms: Option<u64>) {
        if key.len() > MAX_KEY_LENGTH {
            warn!("TTL store: key exceeds {} bytes, dropping set", MAX_KEY_LENGTH);
            return;
        }

        let value = match serde_json::to_value(data) {
            Ok(v) => v,
            Err(err) => {
                warn!("TTL store: value for '{}' not serializable: {}", key, err);
                return;
            }
        };

        let entry = StoredEntry::new(value, ttl_ms.unwrap_or(self.default_ttl_ms));
        // Envelope encoding cannot fail once the payload is a Value
        let encoded = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(err) => {
                warn!("TTL store: envelope encoding for '{}' failed: {}", key, err);
                return;
            }
        };

        if let Err(err) = self.backend.write(&self.namespaced(key), &encoded) {
            warn!("TTL store: write for '{}' failed: {}", key, err);
            return;
        }

        self.stats.set_total_entries(self.namespaced_keys().len());
    }

    // == Get ==
    /// Retrieves the value stored under `key`, or None.
    ///
    /// Expired entries are deleted as a side effect and read as absent.
    /// Entries whose payload no longer decodes are purged the same way.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let storage_key = self.namespaced(key);

        let raw = match self.backend.read(&storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                self.stats.record_miss();
                return None;
            }
            Err(err) => {
                warn!("TTL store: read for '{}' failed: {}", key, err);
                self.stats.record_miss();
                return None;
            }
        };

        let entry: StoredEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(_) => {
                debug!("TTL store: purging corrupt entry '{}'", key);
                self.purge(&storage_key);
                self.stats.record_corrupt();
                self.stats.record_miss();
                return None;
            }
        };

        if entry.is_expired() {
            self.purge(&storage_key);
            self.stats.record_expired();
            self.stats.record_miss();
            return None;
        }

        match serde_json::from_value(entry.data) {
            Ok(data) => {
                self.stats.record_hit();
                Some(data)
            }
            Err(_) => {
                // Stored shape does not match what the caller asked for
                debug!("TTL store: purging mistyped entry '{}'", key);
                self.purge(&storage_key);
                self.stats.record_corrupt();
                self.stats.record_miss();
                None
            }
        }
    }

    fn purge(&mut self, storage_key: &str) {
        if let Err(err) = self.backend.delete(storage_key) {
            warn!("TTL store: purge of '{}' failed: {}", storage_key, err);
        }
        self.stats.set_total_entries(self.namespaced_keys().len());
    }

    // == Remove ==
    /// Deletes `key`. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &str) {
        self.purge(&self.namespaced(key));
    }

    // == Clear ==
    /// Deletes every entry under this store's namespace, none outside it.
    pub fn clear(&mut self) {
        for storage_key in self.namespaced_keys() {
            if let Err(err) = self.backend.delete(&storage_key) {
                warn!("TTL store: clear failed for '{}': {}", storage_key, err);
            }
        }
        self.stats.set_total_entries(0);
    }

    // == Size ==
    /// Approximate character footprint of all namespaced entries.
    ///
    /// Diagnostic only; not used for any correctness decision.
    pub fn size(&self) -> usize {
        self.namespaced_keys()
            .iter()
            .map(|storage_key| {
                let value_len = self
                    .backend
                    .read(storage_key)
                    .ok()
                    .flatten()
                    .map(|v| v.len())
                    .unwrap_or(0);
                storage_key.len() + value_len
            })
            .sum()
    }

    // == Clean Expired ==
    /// Sweeps the namespace, deleting every expired entry and every entry
    /// whose payload no longer parses.
    ///
    /// Returns the number of entries removed. Invoked periodically by an
    /// external scheduler; safe to interleave with `get`/`set` since the
    /// backend is synchronous and atomic per key.
    pub fn clean_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let mut removed = 0;

        for storage_key in self.namespaced_keys() {
            let raw = match self.backend.read(&storage_key) {
                Ok(Some(raw)) => raw,
                Ok(None) => continue,
                Err(err) => {
                    warn!("TTL store: sweep read of '{}' failed: {}", storage_key, err);
                    continue;
                }
            };

            let expired = match serde_json::from_str::<StoredEntry>(&raw) {
                Ok(entry) => entry.is_expired_at(now),
                // Unparseable entries are swept too
                Err(_) => true,
            };

            if expired {
                if let Err(err) = self.backend.delete(&storage_key) {
                    warn!("TTL store: sweep delete of '{}' failed: {}", storage_key, err);
                    continue;
                }
                removed += 1;
            }
        }

        self.stats.set_total_entries(self.namespaced_keys().len());
        removed
    }

    // == Stats ==
    /// Returns current store statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.namespaced_keys().len());
        stats
    }

    // == Length ==
    /// Returns the current number of namespaced entries.
    pub fn len(&self) -> usize {
        self.namespaced_keys().len()
    }

    // == Is Empty ==
    /// Returns true if the namespace holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read-only access to the underlying backend.
    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryBackend, StorageBackend};
    use serde::Deserialize;
    use serde_json::{json, Value};
    use std::thread::sleep;
    use std::time::Duration;

    fn test_store() -> TtlStore<MemoryBackend> {
        TtlStore::new(MemoryBackend::new(), "appcache:", 300_000)
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Profile {
        name: String,
        tags: Vec<String>,
    }

    #[test]
    fn test_set_and_get_roundtrip() {
        let mut store = test_store();

        let profile = Profile {
            name: "ada".to_string(),
            tags: vec!["admin".to_string(), "editor".to_string()],
        };
        store.set("profile", &profile, None);

        let read: Option<Profile> = store.get("profile");
        assert_eq!(read, Some(profile));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_absent() {
        let mut store = test_store();

        let read: Option<Value> = store.get("missing");
        assert_eq!(read, None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_expired_entry_is_absent_and_purged() {
        let mut store = test_store();

        store.set("short", &json!("v"), Some(1));
        sleep(Duration::from_millis(20));

        let read: Option<Value> = store.get("short");
        assert_eq!(read, None);

        // Purged from the backing listing, not just hidden
        assert!(store.backend().list_keys().unwrap().is_empty());
        assert_eq!(store.stats().expired, 1);
    }

    #[test]
    fn test_corrupt_entry_is_absent_and_purged() {
        let mut store = test_store();

        store.set("good", &json!(1), None);
        // Write garbage directly under the namespace
        store.backend.write("appcache:bad", "not json{{").unwrap();

        let read: Option<Value> = store.get("bad");
        assert_eq!(read, None);
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().corrupt, 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = test_store();

        store.set("k", &json!(1), None);
        store.remove("k");
        store.remove("k");

        let read: Option<Value> = store.get("k");
        assert_eq!(read, None);
    }

    #[test]
    fn test_clear_only_touches_namespace() {
        let mut store = test_store();

        store.set("a", &json!(1), None);
        store.set("b", &json!(2), None);
        store.backend.write("unrelated", "kept").unwrap();

        store.clear();

        assert!(store.is_empty());
        assert_eq!(
            store.backend().read("unrelated").unwrap(),
            Some("kept".to_string())
        );
    }

    #[test]
    fn test_clean_expired_mixed() {
        let mut store = test_store();

        store.set("stale1", &json!("a"), Some(1));
        store.set("stale2", &json!("b"), Some(1));
        store.set("live", &json!("c"), Some(60_000));
        store.backend.write("appcache:junk", "###").unwrap();

        sleep(Duration::from_millis(20));

        let removed = store.clean_expired();
        assert_eq!(removed, 3); // two expired + one unparseable
        assert_eq!(store.len(), 1);

        let read: Option<Value> = store.get("live");
        assert_eq!(read, Some(json!("c")));
    }

    #[test]
    fn test_quota_failure_degrades_silently() {
        let mut store = TtlStore::new(MemoryBackend::with_quota(150), "appcache:", 300_000);

        store.set("first", &json!("x"), None);
        let before = store.len();
        assert_eq!(before, 1);

        // Far beyond the quota; must not panic and must not disturb state
        store.set("huge", &"y".repeat(500), None);

        assert_eq!(store.len(), before);
    }

    #[test]
    fn test_size_is_nonzero_after_set() {
        let mut store = test_store();

        assert_eq!(store.size(), 0);
        store.set("k", &json!({"payload": "0123456789"}), None);
        assert!(store.size() > 10);
    }

    #[test]
    fn test_overwrite_resets_ttl_and_value() {
        let mut store = test_store();

        store.set("k", &json!("v1"), Some(1));
        store.set("k", &json!("v2"), Some(60_000));
        sleep(Duration::from_millis(20));

        let read: Option<Value> = store.get("k");
        assert_eq!(read, Some(json!("v2")));
    }
}
