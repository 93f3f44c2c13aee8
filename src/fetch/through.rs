//! Fetch-Through Module
//!
//! Returns cached values or runs the upstream call and stores its result.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::debug;

use crate::cache::SharedCache;

type Gate = Arc<tokio::sync::Mutex<()>>;
type GateMap = Arc<Mutex<HashMap<String, Gate>>>;

// == Fetch Through ==
/// Cache-aside wrapper around a [`SharedCache`].
///
/// With coalescing on, concurrent misses for one key queue on a per-key gate.
/// Whoever holds the gate re-checks the cache before fetching, so only the
/// first caller goes upstream and the rest read its stored result. A failed
/// fetch stores nothing, and the next caller in line tries again.
#[derive(Debug)]
pub struct FetchThrough<V> {
    cache: SharedCache<V>,
    in_flight: Option<GateMap>,
}

impl<V> Clone for FetchThrough<V> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<V: Clone> FetchThrough<V> {
    /// Creates a wrapper with stampede protection enabled.
    pub fn new(cache: SharedCache<V>) -> Self {
        Self {
            cache,
            in_flight: Some(Arc::default()),
        }
    }

    /// Creates a wrapper that lets concurrent misses fetch independently.
    pub fn without_coalescing(cache: SharedCache<V>) -> Self {
        Self {
            cache,
            in_flight: None,
        }
    }

    pub fn cache(&self) -> &SharedCache<V> {
        &self.cache
    }

    pub fn is_coalescing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Number of keys with a fetch currently queued or running.
    pub fn in_flight(&self) -> usize {
        self.in_flight
            .as_ref()
            .map(|map| map.lock().unwrap_or_else(PoisonError::into_inner).len())
            .unwrap_or(0)
    }

    // == Get Or Fetch ==
    /// Returns the live value for `key`, or runs `fetch` and caches its `Ok`.
    ///
    /// `ttl` overrides the cache default for the stored value. Errors from
    /// `fetch` are returned unchanged and never cached.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        fetch: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.cache.get(key).await {
            debug!(key, "cache hit");
            return Ok(value);
        }

        let Some(map) = &self.in_flight else {
            return self.fetch_and_store(key, ttl, fetch).await;
        };

        let guard = InFlightGuard::acquire(map, key);
        let _permit = guard.gate.lock().await;

        // Filled by whoever held the gate before us. The miss above was
        // already counted, so this second look stays out of the stats.
        if let Some(value) = self.cache.get_untracked(key).await {
            debug!(key, "cache hit after waiting on in-flight fetch");
            return Ok(value);
        }

        self.fetch_and_store(key, ttl, fetch).await
    }

    async fn fetch_and_store<F, Fut, E>(
        &self,
        key: &str,
        ttl: Option<Duration>,
        fetch: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        debug!(key, "cache miss, fetching upstream");
        let value = fetch().await?;
        self.cache.set(key, value.clone(), ttl).await;
        Ok(value)
    }
}

// == In-Flight Guard ==
/// Holds a reference to a key's gate and drops the map entry when the last
/// interested caller leaves, including callers whose future was cancelled.
struct InFlightGuard<'a> {
    map: &'a GateMap,
    key: &'a str,
    gate: Gate,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(map: &'a GateMap, key: &'a str) -> Self {
        let gate = map
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_default()
            .clone();
        Self { map, key, gate }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map plus ours means nobody else is waiting
        if Arc::strong_count(&self.gate) <= 2 {
            map.remove(self.key);
        }
    }
}
