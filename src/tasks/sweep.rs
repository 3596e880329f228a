//! Periodic Sweep Task
//!
//! Background task that periodically removes expired TTL entries and
//! stale rate windows. Cadence is a tuning parameter, not a correctness
//! requirement: both stores already expire lazily on access, the sweep
//! only reclaims memory for entries nobody touches again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlStore;
use crate::rate_limit::LimiterRegistry;
use crate::storage::StorageBackend;

/// Spawns a background task that periodically sweeps both stores.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. It acquires write locks briefly to purge expired TTL
/// entries and stale rate windows.
///
/// # Arguments
/// * `store` - Shared TTL store to sweep
/// * `limits` - Shared limiter registry to sweep
/// * `interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_sweep_task<B>(
    store: Arc<RwLock<TtlStore<B>>>,
    limits: Arc<RwLock<LimiterRegistry>>,
    interval_secs: u64,
) -> JoinHandle<()>
where
    B: StorageBackend + Send + Sync + 'static,
{
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!("Starting sweep task with interval of {} seconds", interval_secs);

        loop {
            tokio::time::sleep(interval).await;

            let expired = {
                let mut store_guard = store.write().await;
                store_guard.clean_expired()
            };
            let stale = {
                let mut limits_guard = limits.write().await;
                limits_guard.cleanup_all()
            };

            if expired > 0 || stale > 0 {
                info!(
                    "Sweep: removed {} expired cache entries, {} stale rate windows",
                    expired, stale
                );
            } else {
                debug!("Sweep: nothing to remove");
            }
        }
    })
}
