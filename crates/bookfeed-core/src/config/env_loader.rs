//! Environment variable overrides
//!
//! Recognized variables:
//! - `BOOKFEED_BASE_URL`
//! - `BOOKFEED_REQUEST_TIMEOUT` (humantime, e.g. `10s`)
//! - `BOOKFEED_MAX_RETRIES`
//! - `BOOKFEED_CACHE_CAPACITY`
//! - `BOOKFEED_LOG_LEVEL`
//! - `BOOKFEED_TOKEN` (read by the CLI's token provider, not stored in config)

use super::model::Config;
use crate::error::{FeedError, FeedResult};
use std::env;

pub const BASE_URL: &str = "BOOKFEED_BASE_URL";
pub const REQUEST_TIMEOUT: &str = "BOOKFEED_REQUEST_TIMEOUT";
pub const MAX_RETRIES: &str = "BOOKFEED_MAX_RETRIES";
pub const CACHE_CAPACITY: &str = "BOOKFEED_CACHE_CAPACITY";
pub const LOG_LEVEL: &str = "BOOKFEED_LOG_LEVEL";
pub const TOKEN: &str = "BOOKFEED_TOKEN";

/// Apply overrides from the process environment
pub fn apply_env(config: &mut Config) -> FeedResult<()> {
    apply_overrides(config, |name| env::var(name).ok())
}

/// Apply overrides using an arbitrary variable lookup
pub fn apply_overrides<F>(config: &mut Config, lookup: F) -> FeedResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup(BASE_URL) {
        config.client.base_url = base_url;
    }

    if let Some(raw) = lookup(REQUEST_TIMEOUT) {
        config.client.request_timeout = humantime_serde::re::humantime::parse_duration(&raw)
            .map_err(|e| FeedError::config(format!("Invalid {} value '{}': {}", REQUEST_TIMEOUT, raw, e)))?;
    }

    if let Some(raw) = lookup(MAX_RETRIES) {
        config.client.max_retries = raw
            .parse()
            .map_err(|_| FeedError::config(format!("Invalid {} value '{}'", MAX_RETRIES, raw)))?;
    }

    if let Some(raw) = lookup(CACHE_CAPACITY) {
        config.cache.capacity = raw
            .parse()
            .map_err(|_| FeedError::config(format!("Invalid {} value '{}'", CACHE_CAPACITY, raw)))?;
    }

    if let Some(level) = lookup(LOG_LEVEL) {
        config.logging.level = level;
    }

    Ok(())
}
