//! API Handlers
//!
//! HTTP request handlers for each governance facade endpoint.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    http::Method,
    Json,
};
use serde_json::Value;

use crate::cache::TtlStore;
use crate::config::Config;
use crate::error::{GovernorError, Result};
use crate::models::{
    CheckRequest, CheckResponse, DeleteResponse, GetResponse, HealthResponse,
    LimitStatusResponse, ProxyFetchRequest, ProxyFetchResponse, SetRequest, SetResponse,
    SizeResponse, StatsResponse,
};
use crate::proxy::{CacheProxy, FetchRequest, HttpFetcher, MemoryCacheStorage};
use crate::rate_limit::LimiterRegistry;
use crate::storage::MemoryBackend;

/// The proxy type the facade serves.
pub type AppProxy = CacheProxy<MemoryCacheStorage, HttpFetcher>;

/// The TTL store type the facade serves.
pub type AppStore = TtlStore<MemoryBackend>;

/// Application state shared across all handlers.
///
/// All three mechanisms live behind `Arc<RwLock<>>`; the event-loop model
/// of single-threaded cooperative access maps onto short lock scopes here.
#[derive(Clone)]
pub struct AppState {
    /// TTL memoization store
    pub store: Arc<RwLock<AppStore>>,
    /// Per-operation-class rate limiters
    pub limits: Arc<RwLock<LimiterRegistry>>,
    /// Versioned cache proxy
    pub proxy: Arc<RwLock<AppProxy>>,
}

impl AppState {
    /// Creates a new AppState from already-built components.
    pub fn new(store: AppStore, limits: LimiterRegistry, proxy: AppProxy) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            limits: Arc::new(RwLock::new(limits)),
            proxy: Arc::new(RwLock::new(proxy)),
        }
    }

    /// Builds all three mechanisms from configuration.
    ///
    /// The proxy comes back uninstalled; the boot sequence drives
    /// install/activate before serving.
    pub fn from_config(config: &Config) -> Self {
        let store = TtlStore::new(
            MemoryBackend::new(),
            config.namespace.clone(),
            config.default_ttl_ms,
        );
        let mut limits = LimiterRegistry::from_policies(config.limit_policies());
        if let Some(max_keys) = config.limit_max_tracked_keys {
            limits = limits.with_max_tracked_keys(max_keys);
        }
        let proxy = CacheProxy::new(
            config.cache_version.clone(),
            config.shell_manifest.clone(),
            config.cache_exclusions.clone(),
            config.root_document.clone(),
            MemoryCacheStorage::new(),
            HttpFetcher::new(config.app_origin.clone()),
        );
        Self::new(store, limits, proxy)
    }
}

// == Cache Handlers ==

/// Handler for PUT /cache/set
///
/// Memoizes a JSON value with an optional TTL. Storage faults degrade
/// silently inside the store, so this only fails on invalid input.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(GovernorError::InvalidRequest(error_msg));
    }

    let mut store = state.store.write().await;
    store.set(&req.key, &req.value, req.ttl_ms);

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /cache/get/:key
///
/// Retrieves a live value; expired or corrupt entries read as absent.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: a read may purge an expired entry
    let mut store = state.store.write().await;
    match store.get::<Value>(&key) {
        Some(value) => Ok(Json(GetResponse::new(key, value))),
        None => Err(GovernorError::NotFound(key)),
    }
}

/// Handler for DELETE /cache/del/:key
///
/// Idempotent removal; deleting an absent key still succeeds.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let mut store = state.store.write().await;
    store.remove(&key);

    Json(DeleteResponse::new(key))
}

/// Handler for DELETE /cache/clear
pub async fn clear_handler(State(state): State<AppState>) -> Json<DeleteResponse> {
    let mut store = state.store.write().await;
    store.clear();

    Json(DeleteResponse::new("namespace".to_string()))
}

/// Handler for GET /cache/size
pub async fn size_handler(State(state): State<AppState>) -> Json<SizeResponse> {
    let store = state.store.read().await;

    Json(SizeResponse {
        size_bytes: store.size(),
        entries: store.len(),
    })
}

// == Rate Limit Handlers ==

/// Handler for POST /limits/:class/check
///
/// Records an attempt and decides it. A saturated window is a normal
/// `allowed: false` response, never an error status.
pub async fn check_limit_handler(
    State(state): State<AppState>,
    Path(class): Path<String>,
    Json(req): Json<CheckRequest>,
) -> Result<Json<CheckResponse>> {
    if req.key.is_empty() {
        return Err(GovernorError::InvalidRequest("Key cannot be empty".to_string()));
    }

    let mut limits = state.limits.write().await;
    let limiter = limits
        .get_mut(&class)
        .ok_or_else(|| GovernorError::UnknownClass(class.clone()))?;

    let allowed = limiter.is_allowed(&req.key);

    Ok(Json(CheckResponse {
        allowed,
        remaining_attempts: limiter.remaining_attempts(&req.key),
        retry_after_ms: limiter.time_until_reset(&req.key),
    }))
}

/// Handler for GET /limits/:class/status/:key
///
/// Read-only status; never records an attempt.
pub async fn limit_status_handler(
    State(state): State<AppState>,
    Path((class, key)): Path<(String, String)>,
) -> Result<Json<LimitStatusResponse>> {
    let limits = state.limits.read().await;
    let limiter = limits
        .get(&class)
        .ok_or_else(|| GovernorError::UnknownClass(class.clone()))?;

    Ok(Json(LimitStatusResponse {
        remaining_attempts: limiter.remaining_attempts(&key),
        time_until_reset_ms: limiter.time_until_reset(&key),
        class,
        key,
    }))
}

/// Handler for DELETE /limits/:class/:key
pub async fn clear_limit_handler(
    State(state): State<AppState>,
    Path((class, key)): Path<(String, String)>,
) -> Result<Json<DeleteResponse>> {
    let mut limits = state.limits.write().await;
    let limiter = limits
        .get_mut(&class)
        .ok_or_else(|| GovernorError::UnknownClass(class.clone()))?;

    limiter.clear(&key);
    Ok(Json(DeleteResponse::new(format!("{}/{}", class, key))))
}

// == Proxy Handlers ==

/// Handler for POST /proxy/fetch
///
/// Runs one request through the interception policy and reports how it
/// resolved. Diagnostic surface; the policy itself is identical to what
/// in-app traffic gets.
pub async fn proxy_fetch_handler(
    State(state): State<AppState>,
    Json(req): Json<ProxyFetchRequest>,
) -> Result<Json<ProxyFetchResponse>> {
    let method = match &req.method {
        Some(m) => Method::from_bytes(m.as_bytes())
            .map_err(|_| GovernorError::InvalidRequest(format!("Unknown method: {}", m)))?,
        None => Method::GET,
    };

    let mut request = FetchRequest::new(method, req.url);
    request.is_navigation = req.navigation;

    let mut proxy = state.proxy.write().await;
    let response = proxy.handle(&request).await?;

    Ok(Json(ProxyFetchResponse {
        status: response.status,
        kind: format!("{:?}", response.kind).to_lowercase(),
        content_type: response.content_type,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    }))
}

// == Diagnostics ==

/// Handler for GET /stats
///
/// Aggregates counters from all three mechanisms.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let store = state.store.read().await;
    let limits = state.limits.read().await;
    let proxy = state.proxy.read().await;

    Json(StatsResponse {
        cache: store.stats(),
        proxy: proxy.stats(),
        proxy_state: proxy.state(),
        limiter_tracked_keys: limits.tracked_keys(),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
