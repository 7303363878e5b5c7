//! Cache types and data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Revalidation metadata captured from an origin response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// Value of the `ETag` response header
    pub etag: Option<String>,
    /// Value of the `Last-Modified` response header, kept verbatim
    pub last_modified: Option<String>,
}

impl Validator {
    pub fn new(etag: Option<String>, last_modified: Option<String>) -> Self {
        Self {
            etag,
            last_modified,
        }
    }

    /// Build a validator from response headers; `None` when neither header is present
    pub fn from_headers(headers: &reqwest::header::HeaderMap) -> Option<Self> {
        let read = |name: reqwest::header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let validator = Self {
            etag: read(reqwest::header::ETAG),
            last_modified: read(reqwest::header::LAST_MODIFIED),
        };
        (!validator.is_empty()).then_some(validator)
    }

    pub fn is_empty(&self) -> bool {
        self.etag.is_none() && self.last_modified.is_none()
    }
}

/// One cached payload with its lifetime and validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<V> {
    pub payload: V,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub validator: Option<Validator>,
}

impl<V> CacheEntry<V> {
    pub fn new(
        payload: V,
        now: DateTime<Utc>,
        ttl: Duration,
        validator: Option<Validator>,
    ) -> Self {
        Self {
            payload,
            created_at: now,
            expires_at: expiry(now, ttl),
            validator,
        }
    }

    /// Check if the entry has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Lifetime left at `now`, zero once expired
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

pub(super) fn expiry(now: DateTime<Utc>, ttl: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(ttl)
        .ok()
        .and_then(|ttl| now.checked_add_signed(ttl))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Result of [`ConditionalCache::get_with_metadata`](super::ConditionalCache::get_with_metadata)
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup<V> {
    pub value: V,
    pub validator: Option<Validator>,
    pub expires_at: DateTime<Utc>,
    /// Lifetime left at lookup time
    pub remaining: Duration,
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatistics {
    pub entry_count: usize,
    pub hits: u64,
    pub misses: u64,
    /// Entries removed to make room for new keys
    pub evictions: u64,
    /// Entries removed because their TTL ran out
    pub expirations: u64,
}

impl CacheStatistics {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Derive a cache key from method and URL.
///
/// Query parameters are sorted so that `?a=1&b=2` and `?b=2&a=1` share an entry.
pub fn request_key(method: &str, url: &reqwest::Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    pairs.sort();

    let mut base = url.clone();
    base.set_query(None);
    base.set_fragment(None);

    if pairs.is_empty() {
        return format!("{} {}", method.to_uppercase(), base);
    }

    let query = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");
    format!("{} {}?{}", method.to_uppercase(), base, query)
}
