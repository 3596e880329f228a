//! Key Tracker Module
//!
//! Least-recently-checked ordering over limiter subjects, used to bound
//! the number of distinct keys a limiter tracks.

use std::collections::VecDeque;

// == Key Tracker ==
/// Tracks subject-key recency for bounded limiters.
///
/// Keys are stored in a VecDeque where:
/// - Front = Most recently checked
/// - Back = Least recently checked
#[derive(Debug, Default)]
pub struct KeyTracker {
    /// Order of keys by last check
    order: VecDeque<String>,
}

impl KeyTracker {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Touch ==
    /// Marks a key as recently checked (moves to front).
    pub fn touch(&mut self, key: &str) {
        self.remove(key);
        self.order.push_front(key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        self.order.retain(|k| k != key);
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently checked key.
    ///
    /// Returns None if the tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    // == Iteration ==
    /// Keys from least to most recently checked.
    pub fn keys_oldest_first(&self) -> impl Iterator<Item = &str> {
        self.order.iter().rev().map(String::as_str)
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_new() {
        let tracker = KeyTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.len(), 0);
    }

    #[test]
    fn test_touch_and_evict_order() {
        let mut tracker = KeyTracker::new();

        tracker.touch("a");
        tracker.touch("b");
        tracker.touch("c");

        // "a" is least recently checked
        assert_eq!(tracker.evict_oldest(), Some("a".to_string()));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_touch_existing_moves_to_front() {
        let mut tracker = KeyTracker::new();

        tracker.touch("a");
        tracker.touch("b");
        tracker.touch("a");

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.evict_oldest(), Some("b".to_string()));
    }

    #[test]
    fn test_evict_empty() {
        let mut tracker = KeyTracker::new();
        assert_eq!(tracker.evict_oldest(), None);
    }

    #[test]
    fn test_keys_oldest_first_order() {
        let mut tracker = KeyTracker::new();

        tracker.touch("a");
        tracker.touch("b");
        tracker.touch("a");

        let keys: Vec<&str> = tracker.keys_oldest_first().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_remove_nonexistent_key() {
        let mut tracker = KeyTracker::new();

        tracker.touch("a");
        tracker.remove("missing");

        assert_eq!(tracker.len(), 1);
    }
}
