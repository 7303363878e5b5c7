//! Configuration data model

use super::timeouts;
use crate::error::{FeedError, FeedResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub client: ClientConfig,
    pub cache: CacheConfig,
    pub stream: StreamConfig,
    pub recommendations: RecommendationConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Validate every section
    pub fn validate(&self) -> FeedResult<()> {
        self.client.validate()?;
        self.cache.validate()?;
        Ok(())
    }
}

/// Request client settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL that relative request paths are joined onto
    pub base_url: String,
    /// Timeout for one request/response exchange
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Additional attempts after a transport failure
    pub max_retries: u32,
    /// Fixed delay between attempts
    #[serde(with = "humantime_serde")]
    pub retry_delay: Duration,
    /// Also retry POST/PATCH without an idempotency key
    pub retry_non_idempotent: bool,
    /// Headers sent with every request
    pub default_headers: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout: timeouts::request::timeout(),
            max_retries: timeouts::request::MAX_RETRIES,
            retry_delay: timeouts::request::retry_delay(),
            retry_non_idempotent: false,
            default_headers: HashMap::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn validate(&self) -> FeedResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(FeedError::config_with_context(
                "base_url must not be empty",
                "Validating client configuration",
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(FeedError::config_with_context(
                "request_timeout must be greater than zero",
                "Validating client configuration",
            ));
        }
        Ok(())
    }
}

/// Conditional cache settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Maximum number of entries
    pub capacity: usize,
    #[serde(with = "humantime_serde")]
    pub default_ttl: Duration,
    #[serde(with = "humantime_serde")]
    pub sweep_interval: Duration,
    /// Hits with less lifetime than this left are revalidated with the origin
    #[serde(with = "humantime_serde")]
    pub revalidate_window: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: timeouts::cache::CAPACITY,
            default_ttl: timeouts::cache::ttl(),
            sweep_interval: timeouts::cache::sweep_interval(),
            revalidate_window: timeouts::cache::revalidate_window(),
        }
    }
}

impl CacheConfig {
    pub fn validate(&self) -> FeedResult<()> {
        if self.capacity == 0 {
            return Err(FeedError::config("cache capacity must be at least 1"));
        }
        if self.sweep_interval.is_zero() {
            return Err(FeedError::config("cache sweep_interval must be greater than zero"));
        }
        Ok(())
    }
}

/// Feed endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StreamConfig {
    /// Path of the book listing feed, relative to the client base URL
    pub books_path: String,
    /// Path of the search feed, relative to the client base URL
    pub search_path: String,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            books_path: "/api/books/stream".to_string(),
            search_path: "/api/search/stream".to_string(),
            connect_timeout: timeouts::stream::connect_timeout(),
        }
    }
}

/// Recommendation endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecommendationConfig {
    pub path: String,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            path: "/api/recommendations".to_string(),
        }
    }
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}
