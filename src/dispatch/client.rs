//! Peer Client
//!
//! Forwards a transaction to the owning peer over HTTP.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::{CacheError, Result};
use crate::models::{ErrorResponse, TransactRequest, TransactResponse};

/// Header marking a request as already forwarded once. Its value is the
/// address of the forwarding node.
///
/// Receivers trust it without authentication, so the `/trxn` port must only
/// be reachable from a trusted cluster network: any caller that sets it can
/// write to a node that does not own the key.
pub const FORWARDED_HEADER: &str = "x-distcache-forwarded-by";

/// HTTP client used to relay transactions to other nodes.
#[derive(Debug, Clone)]
pub struct PeerClient {
    http: Client,
    /// Address of the node doing the forwarding
    origin: String,
}

impl PeerClient {
    /// Builds a client whose round trips are bounded by `timeout`.
    pub fn new(origin: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| CacheError::Internal(format!("failed to build peer client: {e}")))?;

        Ok(Self {
            http,
            origin: origin.into(),
        })
    }

    // == Forward ==
    /// Sends `req` to `peer` exactly once and returns its response verbatim.
    ///
    /// Transport failures and non-2xx answers are returned as errors; no other
    /// peer is tried.
    pub async fn forward(&self, peer: &str, req: &TransactRequest) -> Result<TransactResponse> {
        let url = format!("http://{peer}/trxn");
        debug!(peer, key = %req.key, trxn_type = ?req.trxn_type, "forwarding transaction");

        let response = self
            .http
            .post(&url)
            .header(FORWARDED_HEADER, &self.origin)
            .json(req)
            .send()
            .await
            .map_err(|e| {
                warn!(peer, error = %e, "forwarding failed");
                CacheError::from_forward(peer, e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => status.to_string(),
            };
            warn!(peer, status = status.as_u16(), %message, "peer rejected transaction");
            return Err(CacheError::PeerRejected {
                peer: peer.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<TransactResponse>()
            .await
            .map_err(|e| CacheError::from_forward(peer, e))
    }
}
