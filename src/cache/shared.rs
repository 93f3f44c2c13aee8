//! Shared Cache Module
//!
//! Cloneable handle that lets concurrent request handlers use one store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::cache::{CacheStats, CacheStore, Clock};
use crate::config::CacheConfig;
use crate::error::CacheError;

// == Shared Cache ==
/// Thread-safe wrapper around [`CacheStore`].
///
/// Every method takes the lock for exactly one synchronous store operation,
/// so a guard is never held across an upstream call.
#[derive(Debug)]
pub struct SharedCache<V> {
    inner: Arc<RwLock<CacheStore<V>>>,
}

impl<V> Clone for SharedCache<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone> SharedCache<V> {
    pub fn new(config: &CacheConfig) -> Result<Self, CacheError> {
        Ok(Self::from_store(CacheStore::new(config)?))
    }

    pub fn with_clock(config: &CacheConfig, clock: Arc<dyn Clock>) -> Result<Self, CacheError> {
        Ok(Self::from_store(CacheStore::with_clock(config, clock)?))
    }

    pub fn from_store(store: CacheStore<V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Write lock: a hit updates recency and stats.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.inner.write().await.get(key)
    }

    /// Lookup that does not count toward hits or misses.
    pub async fn get_untracked(&self, key: &str) -> Option<V> {
        self.inner.write().await.get_untracked(key)
    }

    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.inner.write().await.set(key, value, ttl);
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.inner.write().await.delete(key)
    }

    pub async fn keys(&self) -> Vec<String> {
        self.inner.read().await.keys()
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }

    pub async fn purge_expired(&self) -> usize {
        self.inner.write().await.purge_expired()
    }

    pub async fn stats(&self) -> CacheStats {
        self.inner.read().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn capacity(&self) -> usize {
        self.inner.read().await.capacity()
    }
}
