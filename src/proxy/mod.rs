//! Cache Proxy Module
//!
//! Network-interception layer over a versioned durable cache. Serves the
//! static application shell cache-first, passes dynamic traffic through
//! untouched, and prunes stale cache generations on activation.

mod fetch;
mod service;
mod state;
mod store;
mod types;

// Re-export public types
pub use fetch::{Fetch, HttpFetcher};
pub use service::{CacheProxy, ProxyStats};
pub use state::LifecycleState;
pub use store::{CacheStorage, MemoryCacheStorage};
pub use types::{FetchRequest, FetchResponse, ResponseKind};
