//! Peer Ring Module
//!
//! Consistent-hash ring mapping keys to the peer that owns them.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use sha2::{Digest, Sha256};

/// Hashes `data` onto the ring coordinate space.
pub fn ring_hash(data: &[u8]) -> u32 {
    let digest = Sha256::digest(data);
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

// == Ring Snapshot ==
/// Immutable ring built from one peer set.
#[derive(Debug, Default)]
struct Ring {
    /// Ring position -> peer identifier
    positions: BTreeMap<u32, String>,
    /// Sorted, de-duplicated peer set the ring was built from
    peers: Vec<String>,
}

impl Ring {
    fn build(replicas: usize, mut peers: Vec<String>) -> Self {
        peers.sort();
        peers.dedup();

        let mut positions = BTreeMap::new();
        for peer in &peers {
            for i in 0..replicas {
                positions.insert(ring_hash(format!("{i}{peer}").as_bytes()), peer.clone());
            }
        }

        Self { positions, peers }
    }

    /// Successor lookup: first position at or after the key hash, wrapping
    /// around to the first position.
    fn owner(&self, key: &str) -> Option<&str> {
        let hash = ring_hash(key.as_bytes());
        self.positions
            .range(hash..)
            .next()
            .or_else(|| self.positions.iter().next())
            .map(|(_, peer)| peer.as_str())
    }
}

// == Peer Ring ==
/// Thread-safe consistent-hash ring over the known peer set.
///
/// The ring is an immutable snapshot behind one lock. [`PeerRing::set_peers`]
/// builds the replacement off-lock and swaps it in, so a concurrent
/// [`PeerRing::resolve`] sees either the old or the new peer set in full.
///
/// Each peer occupies `replicas` ring positions (one by default). With a
/// single position per peer the share of keys each peer owns follows the
/// spacing of the hashed positions and is not explicitly balanced.
#[derive(Debug)]
pub struct PeerRing {
    replicas: usize,
    ring: RwLock<Arc<Ring>>,
}

impl PeerRing {
    /// Creates a ring seeded with the local node's own address.
    pub fn new(local_addr: impl Into<String>) -> Self {
        Self::with_replicas(1, [local_addr.into()])
    }

    /// Creates a ring with `replicas` positions per peer. Zero is treated as one.
    pub fn with_replicas<I, S>(replicas: usize, peers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let replicas = replicas.max(1);
        let ring = Ring::build(replicas, peers.into_iter().map(Into::into).collect());
        Self {
            replicas,
            ring: RwLock::new(Arc::new(ring)),
        }
    }

    // == Resolve ==
    /// Returns the peer owning `key`, or None if the peer set is empty.
    pub fn resolve(&self, key: &str) -> Option<String> {
        self.snapshot().owner(key).map(str::to_string)
    }

    // == Set Peers ==
    /// Replaces the whole peer set and rebuilds the ring.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ring = Arc::new(Ring::build(
            self.replicas,
            peers.into_iter().map(Into::into).collect(),
        ));
        *self.ring.write().unwrap_or_else(PoisonError::into_inner) = ring;
    }

    /// Current peer set, sorted.
    pub fn peers(&self) -> Vec<String> {
        self.snapshot().peers.clone()
    }

    pub fn replicas(&self) -> usize {
        self.replicas
    }

    fn snapshot(&self) -> Arc<Ring> {
        Arc::clone(&self.ring.read().unwrap_or_else(PoisonError::into_inner))
    }
}
