//! statcache - A caching proxy for a game-statistics API
//!
//! Serves upstream API responses through a bounded, time-windowed cache.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use statcache::{api::create_router, spawn_cleanup_task, AppState, Config};

/// Main entry point for the statcache proxy.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the cache file and build the upstream client
/// 4. Check the upstream connection (a failure is only logged)
/// 5. Start background clean task
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "statcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting statcache proxy");

    let config = Config::from_env();
    info!(
        "Configuration loaded: cache_path={}, freshness={}m, capacity={}, enabled={}",
        config.cache_path.display(),
        config.freshness_minutes,
        config.cache_capacity,
        config.cache_enabled
    );
    info!(
        "Upstream={}, port={}, cleanup_interval={}s",
        config.api_base_url, config.server_port, config.cleanup_interval
    );
    if config.auth_key.is_none() {
        warn!("No upstream auth key configured, requests are sent unauthenticated");
    }

    let state = AppState::from_config(&config).context("Failed to open cache")?;
    info!("Cache opened at {}", config.cache_path.display());

    match state.client.test_connection().await {
        Ok(_) => info!("Upstream API reachable"),
        Err(err) => warn!("Upstream connection test failed: {}", err),
    }

    let cleanup_handle = spawn_cleanup_task(state.cache(), config.cleanup_interval);
    info!("Background clean task started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the clean task and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
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

    cleanup_handle.abort();
    warn!("Clean task aborted");
}
