//! Gatekeeper - a client-side resource governance layer
//!
//! Three cooperating mechanisms: a TTL memoization store over durable
//! storage, fixed-window rate limiters for sensitive operations, and a
//! versioned cache-first proxy for the static application shell.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod rate_limit;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_sweep_task;
