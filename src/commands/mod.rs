//! Command implementations

pub mod config;
pub mod fetch;
pub mod recommend;
pub mod stream;

use bookfeed_core::client::{RequestClient, StaticToken};
use bookfeed_core::config::Config;
use std::sync::Arc;

/// Request client for the configured origin, signed in when a token is given
pub(crate) fn request_client(config: &Config, token: Option<String>) -> anyhow::Result<RequestClient> {
    let client = RequestClient::new(config.client.clone())?;
    Ok(match token {
        Some(token) => client.with_token_provider(Arc::new(StaticToken(token))),
        None => client,
    })
}
