//! Request DTOs for the cache node API
//!
//! Defines the structure of incoming HTTP request bodies.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest accepted wire TTL, ten years in seconds.
pub const MAX_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Kind of cache transaction carried by a [`TransactRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrxnType {
    Get,
    Set,
    Delete,
    /// Any unrecognised `type` on the wire
    #[serde(other)]
    Unknown,
}

/// Request body for POST /trxn
///
/// # Fields
/// - `type`: GET, SET or DELETE
/// - `key`: The cache key
/// - `value`: The value to store (SET only)
/// - `ttl`: Optional TTL in seconds (SET only, untimed when absent)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactRequest {
    #[serde(rename = "type")]
    pub trxn_type: TrxnType,
    pub key: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,
}

impl TransactRequest {
    pub fn get(key: impl Into<String>) -> Self {
        Self {
            trxn_type: TrxnType::Get,
            key: key.into(),
            value: String::new(),
            ttl: None,
        }
    }

    pub fn set(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trxn_type: TrxnType::Set,
            key: key.into(),
            value: value.into(),
            ttl: None,
        }
    }

    /// SET that expires after `ttl_secs` seconds.
    pub fn set_with_ttl(key: impl Into<String>, value: impl Into<String>, ttl_secs: u64) -> Self {
        Self {
            ttl: Some(ttl_secs),
            ..Self::set(key, value)
        }
    }

    pub fn delete(key: impl Into<String>) -> Self {
        Self {
            trxn_type: TrxnType::Delete,
            key: key.into(),
            value: String::new(),
            ttl: None,
        }
    }

    pub fn ttl_duration(&self) -> Option<Duration> {
        self.ttl.map(Duration::from_secs)
    }

    /// Returns an error message if validation fails, None if valid.
    ///
    /// Only SET carries a TTL; GET and DELETE ignore the field.
    pub fn validate(&self) -> Option<String> {
        match self.ttl {
            Some(ttl) if self.trxn_type == TrxnType::Set && ttl > MAX_TTL_SECS => Some(format!(
                "ttl {ttl} exceeds the maximum of {MAX_TTL_SECS} seconds"
            )),
            _ => None,
        }
    }
}

/// Request body for PUT /peers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPeersRequest {
    /// Full replacement peer set
    pub peers: Vec<String>,
}

impl SetPeersRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.peers.is_empty() {
            return Some("Peer set cannot be empty".to_string());
        }
        if self.peers.iter().any(|peer| peer.trim().is_empty()) {
            return Some("Peer address cannot be empty".to_string());
        }
        None
    }
}
