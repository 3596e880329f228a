//! Gatekeeper - a client-side resource governance layer
//!
//! Boots the TTL store, rate limiters, and cache proxy, then serves the
//! governance facade over HTTP.

mod api;
mod cache;
mod config;
mod error;
mod models;
mod proxy;
mod rate_limit;
mod storage;
mod tasks;

use std::net::SocketAddr;

use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use config::Config;
use tasks::spawn_sweep_task;

/// Main entry point for the governance layer.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Construct the TTL store, limiter registry, and cache proxy
/// 4. Install and activate the proxy (install retries once, then aborts)
/// 5. Start the background sweep task
/// 6. Create Axum router with all endpoints
/// 7. Start HTTP server on configured port
/// 8. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatekeeper=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Gatekeeper governance layer");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: namespace={}, default_ttl={}ms, port={}, sweep_interval={}s, cache_version={}",
        config.namespace,
        config.default_ttl_ms,
        config.server_port,
        config.sweep_interval_secs,
        config.cache_version
    );

    // Build the three mechanisms
    let state = AppState::from_config(&config);
    info!("Stores initialized");

    // Seed the shell cache and take control of interception. A failed
    // install leaves the proxy uninstalled, so one retry is safe.
    {
        let mut proxy = state.proxy.write().await;
        if let Err(err) = proxy.install().await {
            warn!("Proxy install failed ({}), retrying once", err);
            if let Err(err) = proxy.install().await {
                error!("Proxy install failed again: {}", err);
                std::process::exit(1);
            }
        }
        if let Err(err) = proxy.activate() {
            error!("Proxy activation failed: {}", err);
            std::process::exit(1);
        }
        info!("Cache proxy active, generation '{}'", proxy.version());
    }

    // Start background sweep task
    let sweep_handle = spawn_sweep_task(
        state.store.clone(),
        state.limits.clone(),
        config.sweep_interval_secs,
    );
    info!("Background sweep task started");

    // Create router with all endpoints
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .unwrap();

    info!("Server shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(sweep_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the sweep task
    sweep_handle.abort();
    warn!("Sweep task aborted");
}
