//! Request client type definitions

use super::auth::TokenProvider;
use crate::cache::{ConditionalCache, Validator};
use crate::config::ClientConfig;
use crate::error::{FeedError, FeedResult};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Client for single request/response exchanges.
///
/// # Examples
///
/// ```no_run
/// use bookfeed_core::cache::ConditionalCache;
/// use bookfeed_core::client::RequestClient;
/// use bookfeed_core::config::ClientConfig;
/// use reqwest::Method;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let cache = Arc::new(ConditionalCache::new(100));
/// let client = RequestClient::new(ClientConfig::new("https://shop.example.com"))?
///     .with_cache(cache);
///
/// let response = client.send(Method::GET, "/api/books/42", None).await?;
/// println!("{} ({:?})", response.data, response.cache_status);
/// # Ok(())
/// # }
/// ```
pub struct RequestClient {
    pub(super) http: reqwest::Client,
    pub(super) config: ClientConfig,
    pub(super) base_url: Url,
    pub(super) cache: Option<Arc<ConditionalCache<CachedResponse>>>,
    pub(super) cache_ttl: Duration,
    pub(super) revalidate_window: Duration,
    pub(super) tokens: Option<Arc<dyn TokenProvider>>,
}

/// Payload stored in the conditional cache for a GET
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub status: u16,
    pub data: serde_json::Value,
}

/// How a response was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheStatus {
    /// Served from the cache without touching the network
    Hit,
    /// Origin answered 304; the cached payload was served and its TTL renewed
    Revalidated,
    /// Fetched from the origin (and cached when cacheable)
    Miss,
    /// Caching not applicable to this request
    Bypass,
}

/// Cache behavior for one request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Serve fresh hits, revalidate hits close to expiry
    #[default]
    Default,
    /// Always confirm a hit with the origin when a validator is stored
    Revalidate,
    /// Neither read nor write the cache
    Bypass,
}

/// Per-request options for [`RequestClient::send_with`]
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub body: Option<serde_json::Value>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub cache: CachePolicy,
    /// TTL for the cached response; falls back to the cache default
    pub ttl: Option<Duration>,
    /// Sent as `Idempotency-Key`; makes non-idempotent methods retryable
    pub idempotency_key: Option<String>,
    pub cancel: Option<CancellationToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache = policy;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Result of a successful exchange
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub data: serde_json::Value,
    pub validator: Option<Validator>,
    pub cache_status: CacheStatus,
    /// Network attempts made; zero for cache hits
    pub attempts: u32,
}

impl ApiResponse {
    /// Decode the JSON body into a typed value
    pub fn json<T: DeserializeOwned>(&self) -> FeedResult<T> {
        serde_json::from_value(self.data.clone()).map_err(|e| {
            FeedError::json_with_context(e.to_string(), "Decoding response body")
        })
    }
}

/// One network attempt, used for retry decisions and duration logging
#[derive(Debug, Clone)]
pub struct RequestAttempt {
    pub request_id: uuid::Uuid,
    pub method: Method,
    pub url: Url,
    /// 1-based
    pub attempt_number: u32,
    pub started_at: Instant,
}

impl RequestAttempt {
    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}

/// Raw outcome of one exchange before cache handling
#[derive(Debug, Clone)]
pub(super) struct Exchange {
    pub status: reqwest::StatusCode,
    pub headers: reqwest::header::HeaderMap,
    pub body: Vec<u8>,
}
