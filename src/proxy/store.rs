//! Durable Cache Storage
//!
//! The generation-named response cache the proxy serves from. Each
//! generation maps URLs to stored responses; exactly one generation is
//! current at a time and stale ones are deleted on activation.

use std::collections::HashMap;

use crate::proxy::FetchResponse;

// == Cache Storage ==
/// Durable cache primitive: named generations of URL-to-response maps.
pub trait CacheStorage {
    /// Opens (creating if absent) the generation named `name`.
    fn open(&mut self, name: &str);

    /// Looks up `url` in generation `name`.
    fn match_url(&self, name: &str, url: &str) -> Option<FetchResponse>;

    /// Stores `response` under `url` in generation `name`, overwriting
    /// any previous entry. Opens the generation if needed.
    fn put(&mut self, name: &str, url: &str, response: FetchResponse);

    /// Stores a batch of entries in one step. Used by install seeding so
    /// a generation is never observable half-populated.
    fn put_all(&mut self, name: &str, entries: Vec<(String, FetchResponse)>);

    /// Names of all generations currently present.
    fn list_names(&self) -> Vec<String>;

    /// Deletes generation `name`; returns true if it existed.
    fn delete(&mut self, name: &str) -> bool;
}

// == Memory Cache Storage ==
/// In-process implementation of the durable cache primitive.
#[derive(Debug, Default)]
pub struct MemoryCacheStorage {
    generations: HashMap<String, HashMap<String, FetchResponse>>,
}

impl MemoryCacheStorage {
    /// Creates an empty cache storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in generation `name`, 0 if absent.
    pub fn generation_len(&self, name: &str) -> usize {
        self.generations.get(name).map(HashMap::len).unwrap_or(0)
    }
}

impl CacheStorage for MemoryCacheStorage {
    fn open(&mut self, name: &str) {
        self.generations.entry(name.to_string()).or_default();
    }

    fn match_url(&self, name: &str, url: &str) -> Option<FetchResponse> {
        self.generations.get(name)?.get(url).cloned()
    }

    fn put(&mut self, name: &str, url: &str, response: FetchResponse) {
        self.generations
            .entry(name.to_string())
            .or_default()
            .insert(url.to_string(), response);
    }

    fn put_all(&mut self, name: &str, entries: Vec<(String, FetchResponse)>) {
        let generation = self.generations.entry(name.to_string()).or_default();
        for (url, response) in entries {
            generation.insert(url, response);
        }
    }

    fn list_names(&self) -> Vec<String> {
        self.generations.keys().cloned().collect()
    }

    fn delete(&mut self, name: &str) -> bool {
        self.generations.remove(name).is_some()
    }
}
