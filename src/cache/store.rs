//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::cache::{CacheEntry, CacheStats, Clock, RecencyList, SystemClock};
use crate::config::CacheConfig;
use crate::error::CacheError;

// == Slot ==
/// Stored entry plus its position in the recency list.
#[derive(Debug)]
struct Slot<V> {
    entry: CacheEntry<V>,
    link: usize,
}

// == Cache Store ==
/// Bounded key/value storage with LRU eviction and per-entry TTL.
///
/// Expiry is lazy: reads compare the clock against `expires_at` and purge
/// what they find stale. `purge_expired` is available for periodic sweeps.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, Slot<V>>,
    /// Access order, oldest first
    recency: RecencyList,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL for entries set without an override
    default_ttl: Duration,
    /// Lower bound on every held `expires_at`; nothing can be expired before it
    earliest_expiry: u64,
    clock: Arc<dyn Clock>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a store on the wall clock.
    ///
    /// Fails with `CacheError::InvalidConfig` for zero capacity or TTL.
    pub fn new(config: &CacheConfig) -> Result<Self, CacheError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a store reading time from `clock`.
    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Result<Self, CacheError> {
        config.validate()?;

        Ok(Self {
            entries: HashMap::with_capacity(config.max_entries),
            recency: RecencyList::with_capacity(config.max_entries),
            stats: CacheStats::new(),
            max_entries: config.max_entries,
            default_ttl: config.default_ttl,
            earliest_expiry: u64::MAX,
            clock,
        })
    }

    // == Get ==
    /// Returns a clone of the live value for `key`.
    ///
    /// A hit promotes the key to most recently used. An expired entry is
    /// purged and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let value = self.lookup(key);
        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    /// Same as [`get`](Self::get) but left out of the hit/miss counters.
    ///
    /// For a caller re-checking a key it has already counted as a miss.
    pub fn get_untracked(&mut self, key: &str) -> Option<V> {
        self.lookup(key)
    }

    // == Set ==
    /// Inserts or overwrites `key`.
    ///
    /// `ttl` of `None` (or zero) uses the default TTL. Overwriting refreshes
    /// value, TTL and recency without evicting anything. A new key arriving
    /// at capacity first purges expired entries, and evicts the least
    /// recently used entry only if every held entry is still live.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();
        let ttl = ttl.filter(|ttl| !ttl.is_zero()).unwrap_or(self.default_ttl);
        let now = self.clock.now_ms();
        let entry = CacheEntry::new(value, now, ttl);

        if let Some(slot) = self.entries.get_mut(&key) {
            self.earliest_expiry = self.earliest_expiry.min(entry.expires_at);
            slot.entry = entry;
            self.recency.touch(slot.link);
            return;
        }

        if self.entries.len() >= self.max_entries && now >= self.earliest_expiry {
            self.purge_expired();
        }
        if self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }

        self.earliest_expiry = self.earliest_expiry.min(entry.expires_at);

        let link = self.recency.push_newest(key.clone());
        self.entries.insert(key, Slot { entry, link });
    }

    // == Delete ==
    /// Removes `key`. Returns whether anything was removed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Keys ==
    /// Snapshot of tracked keys, least recently used first.
    ///
    /// Includes entries that have expired but have not been purged yet.
    pub fn keys(&self) -> Vec<String> {
        self.recency.iter().map(str::to_owned).collect()
    }

    // == Clear ==
    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.earliest_expiry = u64::MAX;
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, slot)| slot.entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove_entry(key);
        }
        self.earliest_expiry = self
            .entries
            .values()
            .map(|slot| slot.entry.expires_at)
            .min()
            .unwrap_or(u64::MAX);

        self.stats.record_expirations(expired.len());
        expired.len()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Number of entries physically held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let slot = self.entries.remove(key)?;
        self.recency.remove(slot.link);
        Some(slot.entry)
    }

    fn lookup(&mut self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        let slot = self.entries.get(key)?;

        if slot.entry.is_expired_at(now) {
            self.remove_entry(key);
            self.stats.record_expirations(1);
            return None;
        }

        let (value, link) = (slot.entry.value.clone(), slot.link);
        self.recency.touch(link);
        Some(value)
    }

    /// Drops the least recently used entry. Callers purge expired entries
    /// first, so the victim is live.
    fn evict_oldest(&mut self) {
        let Some(victim) = self.recency.pop_oldest() else {
            return;
        };

        if self.entries.remove(&victim).is_some() {
            self.stats.record_eviction();
            debug!(key = %victim, "evicted least recently used entry");
        }
    }
}
