//! API Module
//!
//! HTTP handlers and routing for the cache node. The same `/trxn` endpoint
//! serves clients and peers forwarding to this node.
//!
//! # Endpoints
//! - `POST /trxn` - Execute or forward a transaction
//! - `GET|PUT /peers` - Read or replace the peer set
//! - `GET /keys` - Live local keys
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
