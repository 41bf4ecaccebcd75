//! API Handlers
//!
//! HTTP request handlers for each cache node endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use tracing::info;

use crate::config::Config;
use crate::dispatch::{Dispatcher, FORWARDED_HEADER};
use crate::error::{CacheError, Result};
use crate::models::{
    HealthResponse, KeysResponse, PeersResponse, SetPeersRequest, StatsResponse, TransactRequest,
    TransactResponse,
};

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Creates a new AppState for the node identified by `local_addr`.
    pub fn from_config(local_addr: impl Into<String>, config: &Config) -> Result<Self> {
        Ok(Self::new(Dispatcher::from_config(local_addr, config)?))
    }
}

/// Handler for POST /trxn
///
/// Requests already forwarded by another node are executed locally so a
/// transaction never takes more than one hop. Malformed bodies are rejected
/// as invalid requests.
pub async fn transact_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<TransactRequest>, JsonRejection>,
) -> Result<Json<TransactResponse>> {
    let Json(req) = payload?;
    let response = if headers.contains_key(FORWARDED_HEADER) {
        state.dispatcher.local_execute(req).await?
    } else {
        state.dispatcher.transact(req).await?
    };

    Ok(Json(response))
}

/// Handler for GET /peers
pub async fn peers_handler(State(state): State<AppState>) -> Json<PeersResponse> {
    Json(PeersResponse {
        node: state.dispatcher.local_addr().to_string(),
        peers: state.dispatcher.peers().peers(),
    })
}

/// Handler for PUT /peers
///
/// Replaces the whole peer set.
pub async fn set_peers_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SetPeersRequest>, JsonRejection>,
) -> Result<Json<PeersResponse>> {
    let Json(req) = payload?;
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ring = state.dispatcher.peers();
    ring.set_peers(req.peers);
    let peers = ring.peers();
    info!(node = state.dispatcher.local_addr(), ?peers, "peer set replaced");

    Ok(Json(PeersResponse {
        node: state.dispatcher.local_addr().to_string(),
        peers,
    }))
}

/// Handler for GET /keys
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    let mut keys = state.dispatcher.cache().read().await.keys();
    keys.sort();

    Json(KeysResponse {
        node: state.dispatcher.local_addr().to_string(),
        keys,
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.dispatcher.cache().read().await;

    Json(StatsResponse::new(
        state.dispatcher.local_addr(),
        &cache.stats(),
        cache.max_bytes(),
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;

    const NODE: &str = "127.0.0.1:7101";

    fn test_state() -> AppState {
        AppState::from_config(NODE, &Config::default()).unwrap()
    }

    #[tokio::test]
    async fn test_transact_set_and_get() {
        let state = test_state();

        let resp = transact_handler(
            State(state.clone()),
            HeaderMap::new(),
            Ok(Json(TransactRequest::set("test_key", "test_value"))),
        )
        .await
        .unwrap();
        assert_eq!(resp.status, Status::Ok);

        let resp = transact_handler(
            State(state),
            HeaderMap::new(),
            Ok(Json(TransactRequest::get("test_key"))),
        )
        .await
        .unwrap();
        assert_eq!(resp.value, "test_value");
        assert_eq!(resp.server, NODE);
    }

    #[tokio::test]
    async fn test_forwarded_request_skips_resolution() {
        let state = test_state();
        // Every key now resolves to a peer that does not exist
        state.dispatcher.peers().set_peers(["127.0.0.1:1"]);

        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_HEADER, "127.0.0.1:9999".parse().unwrap());
        let resp = transact_handler(
            State(state.clone()),
            headers,
            Ok(Json(TransactRequest::set("k", "v"))),
        )
        .await
        .unwrap();

        assert_eq!(resp.server, NODE);
        assert_eq!(state.dispatcher.cache().read().await.keys(), vec!["k".to_string()]);
    }

    #[tokio::test]
    async fn test_set_peers_rejects_empty() {
        let state = test_state();

        let result = set_peers_handler(State(state.clone()), Ok(Json(SetPeersRequest { peers: vec![] }))).await;

        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
        assert_eq!(state.dispatcher.peers().peers(), vec![NODE.to_string()]);
    }

    #[tokio::test]
    async fn test_set_peers_replaces_set() {
        let state = test_state();
        let req = SetPeersRequest {
            peers: vec!["10.0.0.2:7000".to_string(), NODE.to_string()],
        };

        let resp = set_peers_handler(State(state.clone()), Ok(Json(req))).await.unwrap();

        assert_eq!(resp.peers, vec!["10.0.0.2:7000".to_string(), NODE.to_string()]);
        assert_eq!(peers_handler(State(state)).await.peers.len(), 2);
    }

    #[tokio::test]
    async fn test_keys_and_stats_handlers() {
        let state = test_state();
        for key in ["b", "a"] {
            state
                .dispatcher
                .transact(TransactRequest::set(key, "value"))
                .await
                .unwrap();
        }

        let keys = keys_handler(State(state.clone())).await;
        assert_eq!(keys.keys, vec!["a".to_string(), "b".to_string()]);

        let stats = stats_handler(State(state)).await;
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
