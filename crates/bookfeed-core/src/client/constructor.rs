//! Request client constructor and accessors

use super::auth::TokenProvider;
use super::types::{CachedResponse, RequestClient};
use crate::cache::ConditionalCache;
use crate::config::{CacheConfig, ClientConfig};
use crate::error::{FeedError, FeedResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

impl RequestClient {
    /// Create a new request client without a cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the base URL does
    /// not parse, or the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> FeedResult<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            FeedError::config_with_context(
                format!("Invalid base URL '{}': {}", config.base_url, e),
                "Creating request client",
            )
        })?;

        let mut headers = HeaderMap::new();
        for (key, value) in &config.default_headers {
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(val)) => {
                    headers.insert(name, val);
                }
                _ => tracing::warn!(header = %key, "skipping invalid default header"),
            }
        }

        // The per-exchange timeout is applied around send + body read, so the
        // reqwest client only bounds connection setup.
        let http = Client::builder()
            .connect_timeout(config.request_timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| FeedError::config(format!("Failed to create HTTP client: {}", e)))?;

        debug!(
            base_url = %base_url,
            timeout_ms = config.request_timeout.as_millis() as u64,
            max_retries = config.max_retries,
            "created request client"
        );

        let cache_defaults = CacheConfig::default();
        Ok(Self {
            http,
            config,
            base_url,
            cache: None,
            cache_ttl: cache_defaults.default_ttl,
            revalidate_window: cache_defaults.revalidate_window,
            tokens: None,
        })
    }

    /// Attach a shared cache; its default TTL becomes the client's cache TTL
    pub fn with_cache(mut self, cache: Arc<ConditionalCache<CachedResponse>>) -> Self {
        self.cache_ttl = cache.default_ttl();
        self.cache = Some(cache);
        self
    }

    /// Apply TTL and revalidation window from cache configuration
    pub fn with_cache_config(mut self, config: &CacheConfig) -> Self {
        self.cache_ttl = config.default_ttl;
        self.revalidate_window = config.revalidate_window;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_revalidate_window(mut self, window: Duration) -> Self {
        self.revalidate_window = window;
        self
    }

    pub fn with_token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn cache(&self) -> Option<&Arc<ConditionalCache<CachedResponse>>> {
        self.cache.as_ref()
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.http
    }

    pub(crate) fn token_provider(&self) -> Option<Arc<dyn TokenProvider>> {
        self.tokens.clone()
    }

    /// Current bearer token, if a provider is attached and signed in
    pub(crate) fn bearer_token(&self) -> Option<String> {
        self.tokens.as_ref().and_then(|t| t.bearer_token())
    }

    /// Resolve an absolute URL or a path relative to the base URL
    pub fn resolve(&self, path_or_url: &str) -> FeedResult<Url> {
        if let Ok(url) = Url::parse(path_or_url) {
            return Ok(url);
        }
        self.base_url.join(path_or_url).map_err(|e| {
            FeedError::invalid_input_field(format!("Cannot resolve '{}': {}", path_or_url, e), "url")
        })
    }
}
