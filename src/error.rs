//! Error types for the cache node
//!
//! Provides unified error handling using thiserror. A missing key is not an
//! error here: it is a `status=ERR` response. These variants are failures
//! that abort a call.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::{ErrorResponse, TrxnType};

// == Cache Error Enum ==
/// Unified error type for the cache node.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Transaction type outside GET/SET/DELETE
    #[error("invalid TrxnType: {0:?}")]
    InvalidTrxnType(TrxnType),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The peer set is empty so no owner can be resolved
    #[error("No peers available to own key {0:?}")]
    NoPeers(String),

    /// Dialling or talking to the owning peer failed
    #[error("Peer {peer} unreachable: {message}")]
    PeerUnreachable { peer: String, message: String },

    /// The owning peer did not answer within the forward timeout
    #[error("Peer {peer} timed out")]
    PeerTimeout { peer: String },

    /// The owning peer answered with a failure status
    #[error("Peer {peer} rejected transaction ({status}): {message}")]
    PeerRejected {
        peer: String,
        status: u16,
        message: String,
    },

    /// Listener or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Maps a forwarding failure from the HTTP client.
    pub fn from_forward(peer: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CacheError::PeerTimeout {
                peer: peer.to_string(),
            }
        } else {
            CacheError::PeerUnreachable {
                peer: peer.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// True for failures talking to another node, as opposed to bad input.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            CacheError::PeerUnreachable { .. }
                | CacheError::PeerTimeout { .. }
                | CacheError::PeerRejected { .. }
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::InvalidTrxnType(_) | CacheError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::NoPeers(_) => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::PeerUnreachable { .. } | CacheError::PeerRejected { .. } => {
                StatusCode::BAD_GATEWAY
            }
            CacheError::PeerTimeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            CacheError::Io(_) | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse::new(self.to_string()));

        (self.status_code(), body).into_response()
    }
}

// A body that is not a well-formed request is a protocol violation like any other
impl From<JsonRejection> for CacheError {
    fn from(rejection: JsonRejection) -> Self {
        CacheError::InvalidRequest(rejection.body_text())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache node.
pub type Result<T> = std::result::Result<T, CacheError>;
