//! Response DTOs for the cache node API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::{Deserialize, Serialize};

use crate::cache::CacheStats;

/// Outcome of a processed transaction.
///
/// `Err` is a soft, protocol-level failure (e.g. key not found), not a
/// transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "ERR")]
    Err,
}

/// Response body for POST /trxn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactResponse {
    pub status: Status,
    /// Address of the node that produced this response
    pub server: String,
    /// Echo of the requested key
    pub key: String,
    /// GET result, or an error message when `status` is ERR
    #[serde(default)]
    pub value: String,
}

impl TransactResponse {
    pub fn ok(server: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            server: server.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn err(server: impl Into<String>, key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: Status::Err,
            server: server.into(),
            key: key.into(),
            value: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

/// Response body for GET /peers and PUT /peers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeersResponse {
    /// This node's identity on the ring
    pub node: String,
    /// Current peer set, sorted
    pub peers: Vec<String>,
}

/// Response body for GET /keys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeysResponse {
    pub node: String,
    /// Live keys held locally, sorted
    pub keys: Vec<String>,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub node: String,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Entries physically held, including expired ones not yet dropped
    pub total_entries: usize,
    pub total_bytes: u64,
    pub max_bytes: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(node: impl Into<String>, stats: &CacheStats, max_bytes: u64) -> Self {
        Self {
            node: node.into(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            total_entries: stats.total_entries,
            total_bytes: stats.total_bytes,
            max_bytes,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
