//! distcache - A distributed in-memory cache node
//!
//! Starts one node of the cluster. Membership comes from `PEERS` at startup
//! and can be replaced later through `PUT /peers`.

use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use distcache::{Config, NodeServer};

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Bind the listener and build the store, ring and dispatcher
/// 4. Serve the API until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "distcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting distcache node");

    let config = Config::from_env();
    info!(
        "Configuration loaded: listen_addr={}, max_cache_bytes={}, peers={:?}, ring_replicas={}, forward_timeout_ms={}",
        config.listen_addr,
        config.max_cache_bytes,
        config.peers,
        config.ring_replicas,
        config.forward_timeout_ms
    );

    let server = NodeServer::bind(&config).await?;
    info!("Node identity: {}", server.addr());

    server.serve_with_shutdown(shutdown_signal()).await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
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
}
