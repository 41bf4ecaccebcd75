//! distcache - A distributed in-memory cache node
//!
//! Each node holds a byte-bounded LRU cache with TTL expiration and routes
//! every key to exactly one owning node through a consistent-hash ring,
//! forwarding transactions it does not own to that peer.

pub mod api;
pub mod cache;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod peers;
pub mod server;

pub use api::AppState;
pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::{CacheError, Result};
pub use server::NodeServer;
