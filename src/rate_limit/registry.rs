//! Limiter Registry Module
//!
//! One named limiter per sensitive-operation class (profile update,
//! password change, image upload, account deletion). Classes are fully
//! independent; throttling one never affects another.

use std::collections::HashMap;

use crate::rate_limit::RateLimiter;

// == Limit Policy ==
/// Threshold configuration for one operation class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitPolicy {
    /// Maximum attempts allowed per window
    pub max_attempts: u32,
    /// Window length in milliseconds
    pub window_ms: u64,
}

impl LimitPolicy {
    pub const fn new(max_attempts: u32, window_ms: u64) -> Self {
        Self {
            max_attempts,
            window_ms,
        }
    }
}

// == Limiter Registry ==
/// Named collection of independent rate limiters.
#[derive(Debug, Default)]
pub struct LimiterRegistry {
    limiters: HashMap<String, RateLimiter>,
}

impl LimiterRegistry {
    // == Constructor ==
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from named policies.
    pub fn from_policies<'a>(
        policies: impl IntoIterator<Item = (&'a str, LimitPolicy)>,
    ) -> Self {
        let mut registry = Self::new();
        for (class, policy) in policies {
            registry.register(class, policy);
        }
        registry
    }

    /// Bounds the distinct subjects tracked per class; see
    /// [`RateLimiter::with_max_tracked_keys`].
    pub fn with_max_tracked_keys(mut self, max_keys: usize) -> Self {
        self.limiters = self
            .limiters
            .into_iter()
            .map(|(class, limiter)| (class, limiter.with_max_tracked_keys(max_keys)))
            .collect();
        self
    }

    // == Register ==
    /// Adds (or replaces) the limiter for `class`.
    pub fn register(&mut self, class: &str, policy: LimitPolicy) {
        self.limiters.insert(
            class.to_string(),
            RateLimiter::new(policy.max_attempts, policy.window_ms),
        );
    }

    // == Lookup ==
    /// Mutable access to the limiter for `class`, if registered.
    pub fn get_mut(&mut self, class: &str) -> Option<&mut RateLimiter> {
        self.limiters.get_mut(class)
    }

    /// Shared access to the limiter for `class`, if registered.
    pub fn get(&self, class: &str) -> Option<&RateLimiter> {
        self.limiters.get(class)
    }

    /// Registered class names, in no particular order.
    pub fn classes(&self) -> Vec<&str> {
        self.limiters.keys().map(String::as_str).collect()
    }

    // == Cleanup All ==
    /// Sweeps stale windows out of every limiter; returns total removed.
    pub fn cleanup_all(&mut self) -> usize {
        self.limiters
            .values_mut()
            .map(|limiter| limiter.cleanup())
            .sum()
    }

    /// Total subjects tracked across all classes.
    pub fn tracked_keys(&self) -> usize {
        self.limiters.values().map(|l| l.tracked_keys()).sum()
    }
}
