//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, a byte
//! budget and lazy TTL expiration.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::cache::{CacheStats, Entry, LruTracker};

// == Cache Store ==
/// Byte-bounded cache storage with LRU eviction and TTL support.
///
/// The store itself is not synchronized. Nodes share it behind a single
/// `tokio::sync::RwLock`, and every method that reorders recency (including
/// [`CacheStore::get`]) takes `&mut self` so it can only run under the write
/// lock.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, Entry>,
    /// Recency ordering over exactly the keys in `entries`
    lru: LruTracker,
    stats: CacheStats,
    /// Sum of `Entry::size` over `entries`
    total_bytes: u64,
    max_bytes: u64,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store bounded by `max_bytes`.
    pub fn new(max_bytes: u64) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            total_bytes: 0,
            max_bytes,
        }
    }

    // == Get ==
    /// Retrieves a live value by key and promotes it to most recently used.
    ///
    /// Expired entries are dropped on sight and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_miss();
            return None;
        }

        self.lru.touch(key);
        self.stats.record_hit();
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Inserts or overwrites a value with no expiry.
    pub fn set(&mut self, key: String, value: String) {
        self.set_with_ttl(key, value, None);
    }

    // == Set With TTL ==
    /// Inserts or overwrites a value, expiring after `ttl` when given.
    ///
    /// Overwrites update the entry in place, adjust the byte total by the size
    /// delta and promote the key. Least recently used entries are then evicted
    /// until the store is back within budget.
    pub fn set_with_ttl(&mut self, key: String, value: String, ttl: Option<Duration>) {
        match self.entries.get_mut(&key) {
            Some(entry) => {
                let old_size = entry.update(value, ttl);
                self.total_bytes = self.total_bytes - old_size as u64 + entry.size() as u64;
            }
            None => {
                let entry = Entry::new(key.clone(), value, ttl);
                self.total_bytes += entry.size() as u64;
                self.entries.insert(key.clone(), entry);
            }
        }
        self.lru.touch(&key);
        self.evict_to_budget();
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Keys ==
    /// Snapshot of all logically live keys, in unspecified order.
    pub fn keys(&self) -> Vec<String> {
        let now = Instant::now();
        self.entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.key.clone())
            .collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.total_bytes = self.total_bytes;
        stats
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Number of entries physically held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evicts from the LRU tail until within budget. The last remaining entry
    /// is never evicted, so a single oversized entry is kept alone.
    fn evict_to_budget(&mut self) {
        while self.total_bytes > self.max_bytes && self.lru.len() > 1 {
            let Some(oldest) = self.lru.evict_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&oldest) {
                self.total_bytes -= entry.size() as u64;
                self.stats.record_eviction();
                trace!(key = %oldest, size = entry.size(), "evicted entry");
            }
        }
    }

    fn remove_entry(&mut self, key: &str) -> Option<Entry> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.total_bytes -= entry.size() as u64;
        Some(entry)
    }
}
