//! Request DTOs for the governance facade
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Request body for the cache SET operation (PUT /cache/set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value to memoize
/// - `ttl_ms`: Optional TTL in milliseconds (store default if omitted)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store, arbitrary JSON
    pub value: Value,
    /// Optional TTL in milliseconds
    #[serde(default)]
    pub ttl_ms: Option<u64>,
}

impl SetRequest {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > crate::cache::MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} characters",
                crate::cache::MAX_KEY_LENGTH
            ));
        }
        None
    }
}

/// Request body for a rate-limit check (POST /limits/:class/check)
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRequest {
    /// Subject being throttled (user id, IP, ...)
    pub key: String,
}

/// Request body for a diagnostic proxy fetch (POST /proxy/fetch)
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyFetchRequest {
    /// Target URL, absolute or root-relative
    pub url: String,
    /// HTTP method, GET if omitted
    #[serde(default)]
    pub method: Option<String>,
    /// Whether this models a top-level navigation
    #[serde(default)]
    pub navigation: bool,
}
