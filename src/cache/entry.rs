//! Cache Entry Module
//!
//! Defines the unit stored in the cache, with byte-size accounting and TTL support.

use std::time::{Duration, Instant};

/// Fixed per-entry overhead added to the key and value lengths.
pub const ENTRY_OVERHEAD: usize = 8;

// == Entry ==
/// A single key/value pair with an optional expiry instant.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The entry key
    pub key: String,
    /// The stored value
    pub value: String,
    /// Expiry instant, None = no expiration
    pub expires_at: Option<Instant>,
    size: usize,
}

impl Entry {
    // == Constructor ==
    /// Creates a new entry, expiring `ttl` from now when given.
    pub fn new(key: String, value: String, ttl: Option<Duration>) -> Self {
        let size = Self::size_of(&key, &value);
        Self {
            key,
            value,
            expires_at: expiry_from_now(ttl),
            size,
        }
    }

    // == Update ==
    /// Replaces value and expiry in place and recomputes the size.
    ///
    /// Returns the previous size so the caller can apply the delta.
    pub fn update(&mut self, value: String, ttl: Option<Duration>) -> usize {
        let expires_at = expiry_from_now(ttl);
        let size = Self::size_of(&self.key, &value);

        let old_size = std::mem::replace(&mut self.size, size);
        self.value = value;
        self.expires_at = expires_at;
        old_size
    }

    /// Bytes charged against the store budget.
    pub fn size(&self) -> usize {
        self.size
    }

    // == Is Expired ==
    /// Checks whether the entry has expired.
    ///
    /// An entry is valid while the current instant is strictly before its
    /// expiry instant; it is expired from the expiry instant onwards.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    fn size_of(key: &str, value: &str) -> usize {
        key.len() + value.len() + ENTRY_OVERHEAD
    }
}

/// Expiry instant for a lifetime starting now.
///
/// A lifetime past the end of the monotonic clock never expires.
fn expiry_from_now(ttl: Option<Duration>) -> Option<Instant> {
    ttl.and_then(|ttl| Instant::now().checked_add(ttl))
}
