//! Cache Module
//!
//! Provides the node-local, byte-bounded cache with TTL expiration and LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::{Entry, ENTRY_OVERHEAD};
pub use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Default byte budget of a node's store (256 MiB)
pub const DEFAULT_MAX_CACHE_BYTES: u64 = 1 << 28;
