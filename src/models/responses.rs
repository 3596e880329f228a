//! Response DTOs for the governance facade
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::proxy::{LifecycleState, ProxyStats};

/// Response for a successful cache SET.
#[derive(Debug, Serialize)]
pub struct SetResponse {
    pub message: String,
}

impl SetResponse {
    pub fn new(key: String) -> Self {
        Self {
            message: format!("Stored '{}'", key),
        }
    }
}

/// Response for a cache GET hit.
#[derive(Debug, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: String, value: Value) -> Self {
        Self { key, value }
    }
}

/// Response for a cache DELETE.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

impl DeleteResponse {
    pub fn new(key: String) -> Self {
        Self {
            message: format!("Removed '{}'", key),
        }
    }
}

/// Response for the cache footprint query.
#[derive(Debug, Serialize)]
pub struct SizeResponse {
    /// Approximate character footprint of the namespace
    pub size_bytes: usize,
    /// Number of entries currently stored
    pub entries: usize,
}

/// Response for a rate-limit check.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    /// Whether the attempt may proceed
    pub allowed: bool,
    /// Attempts left in the current window after this check
    pub remaining_attempts: u32,
    /// Milliseconds until the window resets, 0 if none is live
    pub retry_after_ms: u64,
}

/// Response for a read-only rate-limit status query.
#[derive(Debug, Serialize)]
pub struct LimitStatusResponse {
    pub class: String,
    pub key: String,
    pub remaining_attempts: u32,
    pub time_until_reset_ms: u64,
}

/// Response for a diagnostic proxy fetch.
#[derive(Debug, Serialize)]
pub struct ProxyFetchResponse {
    pub status: u16,
    pub kind: String,
    pub content_type: Option<String>,
    /// Body rendered as UTF-8 (lossy); diagnostics only
    pub body: String,
}

/// Response for GET /stats, aggregating all three mechanisms.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub cache: CacheStats,
    pub proxy: ProxyStats,
    pub proxy_state: LifecycleState,
    pub limiter_tracked_keys: usize,
}

/// Response for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}
