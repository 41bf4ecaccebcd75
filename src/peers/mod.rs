//! Peers Module
//!
//! Cluster membership and key ownership via consistent hashing.

mod ring;

pub use ring::{ring_hash, PeerRing};
