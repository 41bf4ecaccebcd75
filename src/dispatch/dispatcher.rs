//! Transaction Dispatcher
//!
//! Resolves the owner of a key and either executes the transaction against
//! the local store or forwards it, once, to the owning peer.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::dispatch::PeerClient;
use crate::error::{CacheError, Result};
use crate::models::{TransactRequest, TransactResponse, TrxnType};
use crate::peers::PeerRing;

/// Coordinates transactions for one node.
///
/// Holds no mutable state of its own; the store and ring carry their own
/// synchronization, so clones can be used from any number of tasks.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    local_addr: String,
    cache: Arc<RwLock<CacheStore>>,
    peers: Arc<PeerRing>,
    client: PeerClient,
}

impl Dispatcher {
    pub fn new(
        local_addr: impl Into<String>,
        cache: Arc<RwLock<CacheStore>>,
        peers: Arc<PeerRing>,
        client: PeerClient,
    ) -> Self {
        Self {
            local_addr: local_addr.into(),
            cache,
            peers,
            client,
        }
    }

    /// Creates a dispatcher for `local_addr` with a fresh store and a ring
    /// seeded from the configured peers, or the node alone when none are set.
    pub fn from_config(local_addr: impl Into<String>, config: &Config) -> Result<Self> {
        let local_addr = local_addr.into();
        let peers = if config.peers.is_empty() {
            vec![local_addr.clone()]
        } else {
            config.peers.clone()
        };

        let cache = CacheStore::new(config.max_cache_bytes);
        let ring = PeerRing::with_replicas(config.ring_replicas, peers);
        let client = PeerClient::new(local_addr.clone(), config.forward_timeout())?;

        Ok(Self::new(
            local_addr,
            Arc::new(RwLock::new(cache)),
            Arc::new(ring),
            client,
        ))
    }

    // == Transact ==
    /// Executes `req` on the node owning its key.
    ///
    /// The owner's response is relayed unchanged, including its `server`.
    /// Transport failures toward the owner are returned, never retried.
    pub async fn transact(&self, req: TransactRequest) -> Result<TransactResponse> {
        if req.trxn_type == TrxnType::Unknown {
            return Err(CacheError::InvalidTrxnType(req.trxn_type));
        }
        if let Some(message) = req.validate() {
            return Err(CacheError::InvalidRequest(message));
        }

        let owner = self
            .peers
            .resolve(&req.key)
            .ok_or_else(|| CacheError::NoPeers(req.key.clone()))?;

        if owner == self.local_addr {
            return self.local_execute(req).await;
        }

        self.client.forward(&owner, &req).await
    }

    // == Local Execute ==
    /// Executes `req` against the local store only.
    ///
    /// A GET miss is a `status=ERR` response, not an error.
    pub async fn local_execute(&self, req: TransactRequest) -> Result<TransactResponse> {
        debug!(key = %req.key, trxn_type = ?req.trxn_type, "executing locally");

        match req.trxn_type {
            TrxnType::Get => {
                // Promotion reorders recency, so even a read takes the write lock
                let value = self.cache.write().await.get(&req.key);
                Ok(match value {
                    Some(value) => TransactResponse::ok(&self.local_addr, req.key, value),
                    None => {
                        let message = format!("cannot find key: {:?}", req.key);
                        TransactResponse::err(&self.local_addr, req.key, message)
                    }
                })
            }
            TrxnType::Set => {
                if let Some(message) = req.validate() {
                    return Err(CacheError::InvalidRequest(message));
                }
                let ttl = req.ttl_duration();
                self.cache
                    .write()
                    .await
                    .set_with_ttl(req.key.clone(), req.value, ttl);
                Ok(TransactResponse::ok(&self.local_addr, req.key, String::new()))
            }
            TrxnType::Delete => {
                self.cache.write().await.delete(&req.key);
                Ok(TransactResponse::ok(&self.local_addr, req.key, String::new()))
            }
            TrxnType::Unknown => Err(CacheError::InvalidTrxnType(req.trxn_type)),
        }
    }

    // == Accessors ==
    /// This node's identity on the ring.
    pub fn local_addr(&self) -> &str {
        &self.local_addr
    }

    pub fn cache(&self) -> &Arc<RwLock<CacheStore>> {
        &self.cache
    }

    pub fn peers(&self) -> &Arc<PeerRing> {
        &self.peers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Status;
    use std::time::Duration;

    const LOCAL: &str = "127.0.0.1:7001";

    fn local_dispatcher() -> Dispatcher {
        let client = PeerClient::new(LOCAL, Duration::from_millis(500)).unwrap();
        Dispatcher::new(
            LOCAL,
            Arc::new(RwLock::new(CacheStore::new(1024))),
            Arc::new(PeerRing::new(LOCAL)),
            client,
        )
    }

    #[tokio::test]
    async fn test_set_then_get_served_locally() {
        let dispatcher = local_dispatcher();

        let resp = dispatcher
            .transact(TransactRequest::set("test1", "value1"))
            .await
            .unwrap();
        assert_eq!(resp.status, Status::Ok);
        assert_eq!(resp.server, LOCAL);

        let resp = dispatcher.transact(TransactRequest::get("test1")).await.unwrap();
        assert_eq!(resp, TransactResponse::ok(LOCAL, "test1", "value1"));
    }

    #[tokio::test]
    async fn test_get_missing_is_soft_error() {
        let dispatcher = local_dispatcher();

        let resp = dispatcher.transact(TransactRequest::get("missing")).await.unwrap();

        assert_eq!(resp.status, Status::Err);
        assert_eq!(resp.key, "missing");
        assert_eq!(resp.value, r#"cannot find key: "missing""#);
    }

    #[tokio::test]
    async fn test_delete_is_ok_whether_or_not_present() {
        let dispatcher = local_dispatcher();
        dispatcher
            .transact(TransactRequest::set("k", "v"))
            .await
            .unwrap();

        for _ in 0..2 {
            let resp = dispatcher.transact(TransactRequest::delete("k")).await.unwrap();
            assert!(resp.is_ok());
        }
        let resp = dispatcher.transact(TransactRequest::get("k")).await.unwrap();
        assert!(!resp.is_ok());
        assert_eq!(dispatcher.cache().read().await.total_bytes(), 0);
    }

    #[tokio::test]
    async fn test_set_with_ttl_expires() {
        let dispatcher = local_dispatcher();
        let mut req = TransactRequest::set_with_ttl("k", "v", 1);
        dispatcher.transact(req.clone()).await.unwrap();
        assert!(dispatcher.transact(TransactRequest::get("k")).await.unwrap().is_ok());

        // A zero TTL expires immediately
        req.ttl = Some(0);
        dispatcher.transact(req).await.unwrap();
        assert!(!dispatcher.transact(TransactRequest::get("k")).await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_unknown_type_aborts() {
        let dispatcher = local_dispatcher();
        let req = TransactRequest {
            trxn_type: TrxnType::Unknown,
            ..TransactRequest::get("k")
        };

        let err = dispatcher.transact(req.clone()).await.unwrap_err();
        assert!(matches!(err, CacheError::InvalidTrxnType(TrxnType::Unknown)));

        let err = dispatcher.local_execute(req).await.unwrap_err();
        assert!(matches!(err, CacheError::InvalidTrxnType(_)));
    }

    #[tokio::test]
    async fn test_oversized_ttl_rejected_before_touching_store() {
        let dispatcher = local_dispatcher();
        dispatcher
            .transact(TransactRequest::set("k", "v"))
            .await
            .unwrap();
        let req = TransactRequest::set_with_ttl("k", "a-much-longer-value", u64::MAX);

        let err = dispatcher.transact(req.clone()).await.unwrap_err();
        assert!(matches!(err, CacheError::InvalidRequest(_)));
        let err = dispatcher.local_execute(req).await.unwrap_err();
        assert!(matches!(err, CacheError::InvalidRequest(_)));

        let resp = dispatcher.transact(TransactRequest::get("k")).await.unwrap();
        assert_eq!(resp.value, "v");
        assert_eq!(dispatcher.cache().read().await.total_bytes(), 1 + 1 + 8);
    }

    #[tokio::test]
    async fn test_empty_ring_reports_no_peers() {
        let dispatcher = local_dispatcher();
        dispatcher.peers().set_peers(Vec::<String>::new());

        let err = dispatcher.transact(TransactRequest::get("k")).await.unwrap_err();
        assert!(matches!(err, CacheError::NoPeers(_)));
    }

    #[tokio::test]
    async fn test_unreachable_owner_propagates_transport_error() {
        let dispatcher = local_dispatcher();
        // Port 1 on loopback refuses connections; the node itself leaves the ring
        dispatcher.peers().set_peers(["127.0.0.1:1"]);

        let err = dispatcher
            .transact(TransactRequest::set("k", "v"))
            .await
            .unwrap_err();

        assert!(err.is_transport(), "unexpected error: {err:?}");
        assert!(dispatcher.cache().read().await.is_empty());
    }

    #[tokio::test]
    async fn test_from_config_seeds_ring_with_self() {
        let dispatcher = Dispatcher::from_config(LOCAL, &Config::default()).unwrap();

        assert_eq!(dispatcher.local_addr(), LOCAL);
        assert_eq!(dispatcher.peers().peers(), vec![LOCAL.to_string()]);
    }
}
