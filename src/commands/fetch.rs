//! `bookfeed fetch`

use super::request_client;
use bookfeed_core::cache::ConditionalCache;
use bookfeed_core::client::{CachePolicy, CachedResponse, RequestOptions};
use bookfeed_core::config::Config;
use reqwest::Method;
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    pub repeat: u32,
    pub revalidate: bool,
    pub no_cache: bool,
}

impl FetchOptions {
    fn policy(&self) -> CachePolicy {
        if self.no_cache {
            CachePolicy::Bypass
        } else if self.revalidate {
            CachePolicy::Revalidate
        } else {
            CachePolicy::Default
        }
    }
}

pub async fn run(
    config: &Config,
    token: Option<String>,
    path: &str,
    options: FetchOptions,
) -> anyhow::Result<()> {
    let mut client = request_client(config, token)?.with_cache_config(&config.cache);

    let cache = config.cache.enabled.then(|| {
        let cache: Arc<ConditionalCache<CachedResponse>> =
            Arc::new(ConditionalCache::from_config(&config.cache));
        cache.start_sweeper(config.cache.sweep_interval);
        cache
    });
    if let Some(cache) = &cache {
        client = client.with_cache(Arc::clone(cache));
    }

    for round in 1..=options.repeat.max(1) {
        let request = RequestOptions::new().with_cache_policy(options.policy());
        let response = client.send_with(Method::GET, path, request).await?;

        println!(
            "#{} {} {:?} ({} attempt(s))",
            round, response.status, response.cache_status, response.attempts
        );
        println!("{}", serde_json::to_string_pretty(&response.data)?);
    }

    if let Some(cache) = cache {
        let stats = cache.statistics();
        println!(
            "cache: {} entries, {} hits, {} misses, hit rate {:.0}%",
            stats.entry_count,
            stats.hits,
            stats.misses,
            stats.hit_rate() * 100.0
        );
        cache.dispose();
    }
    Ok(())
}
