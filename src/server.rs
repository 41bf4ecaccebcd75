//! Node Server
//!
//! Binds the listener and serves the API. The bound (or advertised) address
//! is the node's identity on the ring.

use std::future::Future;

use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::error::Result;

/// A bound but not yet serving cache node.
pub struct NodeServer {
    listener: TcpListener,
    state: AppState,
}

impl NodeServer {
    /// Binds `config.listen_addr` and builds the node state.
    ///
    /// Binding port 0 picks a free port; the resulting address becomes the
    /// node identity unless `advertise_addr` is set.
    pub async fn bind(config: &Config) -> Result<Self> {
        let listener = TcpListener::bind(&config.listen_addr).await?;
        let local_addr = match &config.advertise_addr {
            Some(addr) => addr.clone(),
            None => listener.local_addr()?.to_string(),
        };

        let state = AppState::from_config(local_addr, config)?;
        info!(
            node = state.dispatcher.local_addr(),
            max_bytes = config.max_cache_bytes,
            replicas = state.dispatcher.peers().replicas(),
            peers = ?state.dispatcher.peers().peers(),
            "cache node bound"
        );

        Ok(Self { listener, state })
    }

    /// This node's identity on the ring.
    pub fn addr(&self) -> &str {
        self.state.dispatcher.local_addr()
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Serves until the process is stopped.
    pub async fn serve(self) -> Result<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Serves until `signal` completes, then drains in-flight requests.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Server listening on http://{}", self.listener.local_addr()?);
        axum::serve(self.listener, create_router(self.state))
            .with_graceful_shutdown(signal)
            .await?;
        Ok(())
    }
}
