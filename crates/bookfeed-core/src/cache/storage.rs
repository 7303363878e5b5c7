//! In-memory conditional cache storage

use super::clock::{Clock, SystemClock};
use super::types::{CacheEntry, CacheLookup, CacheStatistics, Validator, expiry};
use crate::config::CacheConfig;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Bounded TTL cache with FIFO eviction and per-entry validators.
///
/// All operations are synchronous and take a short-lived lock, so the cache
/// can be shared as an `Arc` between the request client and any number of
/// tasks.
#[derive(Debug)]
pub struct ConditionalCache<V> {
    inner: Mutex<CacheInner<V>>,
    capacity: usize,
    default_ttl: Duration,
    clock: Arc<dyn Clock>,
    pub(super) sweeper: Mutex<Option<CancellationToken>>,
}

#[derive(Debug)]
struct CacheInner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// Keys in insertion order; front is evicted first
    order: VecDeque<String>,
    stats: CacheStatistics,
}

impl<V> CacheInner<V> {
    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        self.stats.entry_count = self.entries.len();
        Some(entry)
    }
}

impl<V: Clone> ConditionalCache<V> {
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                order: VecDeque::new(),
                stats: CacheStatistics::default(),
            }),
            capacity: capacity.max(1),
            default_ttl: crate::config::timeouts::cache::ttl(),
            clock,
            sweeper: Mutex::new(None),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.capacity).with_default_ttl(config.default_ttl)
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Insert or overwrite `key`.
    ///
    /// Overwriting keeps the key's original insertion position. A new key
    /// inserted into a full cache first evicts the earliest-inserted key.
    pub fn set(
        &self,
        key: impl Into<String>,
        value: V,
        ttl: Duration,
        validator: Option<Validator>,
    ) {
        let key = key.into();
        let entry = CacheEntry::new(value, self.clock.now(), ttl, validator);
        let mut inner = self.inner.lock();

        if let Some(existing) = inner.entries.get_mut(&key) {
            *existing = entry;
            return;
        }

        while inner.entries.len() >= self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            if inner.entries.remove(&oldest).is_some() {
                inner.stats.evictions += 1;
                tracing::debug!(key = %oldest, "evicted oldest cache entry");
            }
        }

        inner.order.push_back(key.clone());
        inner.entries.insert(key, entry);
        inner.stats.entry_count = inner.entries.len();
    }

    /// Insert with the cache's default TTL and no validator
    pub fn insert(&self, key: impl Into<String>, value: V) {
        self.set(key, value, self.default_ttl, None);
    }

    /// Fetch a live value; expired entries are removed and reported as a miss
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_with_metadata(key).map(|lookup| lookup.value)
    }

    /// Fetch a live value together with its validator
    pub fn get_with_metadata(&self, key: &str) -> Option<CacheLookup<V>> {
        let now = self.clock.now();
        let mut inner = self.inner.lock();

        match inner.entries.get(key).map(|entry| entry.is_expired_at(now)) {
            None => {
                inner.stats.misses += 1;
                return None;
            }
            Some(true) => {
                inner.remove(key);
                inner.stats.expirations += 1;
                inner.stats.misses += 1;
                return None;
            }
            Some(false) => {}
        }

        inner.stats.hits += 1;
        inner.entries.get(key).map(|entry| CacheLookup {
            value: entry.payload.clone(),
            validator: entry.validator.clone(),
            expires_at: entry.expires_at,
            remaining: entry.remaining_at(now),
        })
    }

    /// Restart an entry's lifetime after the origin confirmed it unchanged.
    ///
    /// A `Some` validator replaces the stored one. Returns `false` when the
    /// key is not present.
    pub fn refresh(&self, key: &str, ttl: Duration, validator: Option<Validator>) -> bool {
        let now = self.clock.now();
        let mut inner = self.inner.lock();
        let Some(entry) = inner.entries.get_mut(key) else {
            return false;
        };
        entry.created_at = now;
        entry.expires_at = expiry(now, ttl);
        if validator.is_some() {
            entry.validator = validator;
        }
        true
    }

    /// Whether a live entry exists, without touching statistics
    pub fn contains(&self, key: &str) -> bool {
        let now = self.clock.now();
        self.inner
            .lock()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired_at(now))
    }

    /// Remove one entry
    pub fn delete(&self, key: &str) -> bool {
        self.inner.lock().remove(key).is_some()
    }

    /// Remove all entries
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
        inner.stats.entry_count = 0;
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut inner = self.inner.lock();

        let expired: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            inner.remove(key);
        }
        inner.stats.expirations += expired.len() as u64;

        if !expired.is_empty() {
            tracing::debug!(removed = expired.len(), "swept expired cache entries");
        }
        expired.len()
    }

    /// Physically stored entries, including expired ones not yet swept
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn statistics(&self) -> CacheStatistics {
        self.inner.lock().stats.clone()
    }
}
