//! Request and Response models for the cache node API
//!
//! This module defines the DTOs (Data Transfer Objects) carried over HTTP,
//! both by clients and by nodes forwarding transactions to each other.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{SetPeersRequest, TransactRequest, TrxnType, MAX_TTL_SECS};
pub use responses::{
    ErrorResponse, HealthResponse, KeysResponse, PeersResponse, StatsResponse, Status,
    TransactResponse,
};
