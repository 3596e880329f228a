//! Configuration Module
//!
//! Handles loading and managing governance configuration from
//! environment variables. The exclusion list and shell manifest are
//! configuration, never code: changing what gets cached requires no
//! change to the proxy's decision logic.

use std::env;

use crate::rate_limit::LimitPolicy;

// == Policy Defaults ==
const DEFAULT_PROFILE_UPDATE: LimitPolicy = LimitPolicy::new(5, 60_000);
const DEFAULT_PASSWORD_CHANGE: LimitPolicy = LimitPolicy::new(3, 300_000);
const DEFAULT_IMAGE_UPLOAD: LimitPolicy = LimitPolicy::new(10, 60_000);
const DEFAULT_ACCOUNT_DELETION: LimitPolicy = LimitPolicy::new(2, 3_600_000);

/// Governance layer configuration.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Key prefix reserved for the TTL store
    pub namespace: String,
    /// Default TTL in milliseconds for entries without an explicit TTL
    pub default_ttl_ms: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Periodic sweep interval in seconds
    pub sweep_interval_secs: u64,
    /// Current cache generation name, fixed per deploy
    pub cache_version: String,
    /// Origin the shell resources are fetched from
    pub app_origin: String,
    /// Static shell resources seeded at install
    pub shell_manifest: Vec<String>,
    /// URL markers that must never be cached
    pub cache_exclusions: Vec<String>,
    /// Offline fallback document for navigations
    pub root_document: String,
    /// Per-class rate-limit thresholds
    pub limit_profile_update: LimitPolicy,
    pub limit_password_change: LimitPolicy,
    pub limit_image_upload: LimitPolicy,
    pub limit_account_deletion: LimitPolicy,
    /// Bound on distinct subjects tracked per class, None = unbounded
    pub limit_max_tracked_keys: Option<usize>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_NAMESPACE` - TTL store key prefix (default: "appcache:")
    /// - `DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 300)
    /// - `CACHE_VERSION` - Cache generation name (default: "shell-v1")
    /// - `APP_ORIGIN` - Origin of the host serving the shell (default: "http://127.0.0.1:8080")
    /// - `SHELL_MANIFEST` - Comma-separated shell resource URLs
    /// - `CACHE_EXCLUSIONS` - Comma-separated never-cache URL markers
    /// - `ROOT_DOCUMENT` - Offline navigation fallback (default: "/")
    /// - `LIMIT_<CLASS>` - "max_attempts/window_ms" per operation class
    /// - `LIMIT_MAX_TRACKED_KEYS` - Per-class bound on distinct tracked subjects (default: unbounded)
    pub fn from_env() -> Self {
        Self {
            namespace: env::var("CACHE_NAMESPACE").unwrap_or_else(|_| "appcache:".to_string()),
            default_ttl_ms: parse_env("DEFAULT_TTL_MS", 300_000),
            server_port: parse_env("SERVER_PORT", 3000),
            sweep_interval_secs: parse_env("SWEEP_INTERVAL", 300),
            cache_version: env::var("CACHE_VERSION").unwrap_or_else(|_| "shell-v1".to_string()),
            app_origin: env::var("APP_ORIGIN")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string()),
            shell_manifest: parse_list("SHELL_MANIFEST", &default_manifest()),
            cache_exclusions: parse_list("CACHE_EXCLUSIONS", &default_exclusions()),
            root_document: env::var("ROOT_DOCUMENT").unwrap_or_else(|_| "/".to_string()),
            limit_profile_update: parse_policy("LIMIT_PROFILE_UPDATE", DEFAULT_PROFILE_UPDATE),
            limit_password_change: parse_policy("LIMIT_PASSWORD_CHANGE", DEFAULT_PASSWORD_CHANGE),
            limit_image_upload: parse_policy("LIMIT_IMAGE_UPLOAD", DEFAULT_IMAGE_UPLOAD),
            limit_account_deletion: parse_policy(
                "LIMIT_ACCOUNT_DELETION",
                DEFAULT_ACCOUNT_DELETION,
            ),
            limit_max_tracked_keys: env::var("LIMIT_MAX_TRACKED_KEYS")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Named policies for every sensitive-operation class.
    pub fn limit_policies(&self) -> [(&'static str, LimitPolicy); 4] {
        [
            ("profile_update", self.limit_profile_update),
            ("password_change", self.limit_password_change),
            ("image_upload", self.limit_image_upload),
            ("account_deletion", self.limit_account_deletion),
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            namespace: "appcache:".to_string(),
            default_ttl_ms: 300_000,
            server_port: 3000,
            sweep_interval_secs: 300,
            cache_version: "shell-v1".to_string(),
            app_origin: "http://127.0.0.1:8080".to_string(),
            shell_manifest: default_manifest(),
            cache_exclusions: default_exclusions(),
            root_document: "/".to_string(),
            limit_profile_update: DEFAULT_PROFILE_UPDATE,
            limit_password_change: DEFAULT_PASSWORD_CHANGE,
            limit_image_upload: DEFAULT_IMAGE_UPLOAD,
            limit_account_deletion: DEFAULT_ACCOUNT_DELETION,
            limit_max_tracked_keys: None,
        }
    }
}

fn default_manifest() -> Vec<String> {
    ["/", "/index.html", "/assets/app.js", "/assets/app.css"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_exclusions() -> Vec<String> {
    ["/api/", "/rest/", "/auth/"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn parse_list(name: &str, default: &[String]) -> Vec<String> {
    env::var(name)
        .ok()
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_else(|| default.to_vec())
}

/// Parses "max_attempts/window_ms", e.g. "5/60000".
fn parse_policy(name: &str, default: LimitPolicy) -> LimitPolicy {
    env::var(name)
        .ok()
        .and_then(|v| {
            let (max, window) = v.split_once('/')?;
            Some(LimitPolicy::new(
                max.trim().parse().ok()?,
                window.trim().parse().ok()?,
            ))
        })
        .unwrap_or(default)
}
