//! Feed transports

use crate::client::{RequestClient, TokenProvider};
use crate::config::timeouts;
use crate::error::{FeedError, FeedResult};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::Url;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Raw byte chunks of an open feed
pub type FeedByteStream = BoxStream<'static, FeedResult<Vec<u8>>>;

/// Query/filter parameters of one feed session.
///
/// Ordered, so two parameter sets compare equal regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedParameters(BTreeMap<String, String>);

impl FeedParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FeedParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Source of feed bytes.
///
/// `open` resolves once the connection is established; the returned stream
/// yields chunks until the origin closes it or an error occurs. Dropping the
/// stream closes the connection.
#[async_trait]
pub trait FeedTransport: Send + Sync {
    async fn open(&self, parameters: &FeedParameters) -> FeedResult<FeedByteStream>;
}

/// Server-sent events over a long-lived HTTP GET
#[derive(Clone)]
pub struct HttpFeedTransport {
    http: reqwest::Client,
    url: Url,
    tokens: Option<Arc<dyn TokenProvider>>,
    connect_timeout: Duration,
}

impl HttpFeedTransport {
    pub fn new(url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            url,
            tokens: None,
            connect_timeout: timeouts::stream::connect_timeout(),
        }
    }

    /// Feed at `path` on the client's origin, sharing its connection pool
    /// and token provider
    pub fn for_client(client: &RequestClient, path: &str) -> FeedResult<Self> {
        Ok(Self {
            http: client.http_client().clone(),
            url: client.resolve(path)?,
            tokens: client.token_provider(),
            connect_timeout: timeouts::stream::connect_timeout(),
        })
    }

    pub fn with_token_provider(mut self, tokens: Arc<dyn TokenProvider>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Bound on waiting for the response headers
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn request_url(&self, parameters: &FeedParameters) -> Url {
        let mut url = self.url.clone();
        if !parameters.is_empty() {
            url.query_pairs_mut().extend_pairs(parameters.iter());
        }
        url
    }
}

#[async_trait]
impl FeedTransport for HttpFeedTransport {
    #[instrument(skip(self, parameters), fields(url = %self.url))]
    async fn open(&self, parameters: &FeedParameters) -> FeedResult<FeedByteStream> {
        let url = self.request_url(parameters);

        let mut request = self
            .http
            .get(url.clone())
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache");
        if let Some(token) = self.tokens.as_ref().and_then(|t| t.bearer_token()) {
            request = request.bearer_auth(token);
        }

        let response = tokio::time::timeout(self.connect_timeout, request.send())
            .await
            .map_err(|_| {
                FeedError::timeout_with_url(self.connect_timeout.as_millis() as u64, url.as_str())
            })?
            .map_err(|e| FeedError::connection_with_url(e.to_string(), url.as_str()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let details = serde_json::from_str(&body).ok();
            return Err(FeedError::http_status(status.as_u16(), url.as_str(), details));
        }

        debug!(status = status.as_u16(), "feed connection open");

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(FeedError::from))
            .boxed())
    }
}
