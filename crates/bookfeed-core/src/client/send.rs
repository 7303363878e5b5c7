//! Request execution with conditional caching

use super::types::{
    ApiResponse, CachePolicy, CacheStatus, CachedResponse, Exchange, RequestAttempt,
    RequestClient, RequestOptions,
};
use crate::cache::{Validator, request_key};
use crate::error::{FeedError, FeedResult, UnifiedError};
use reqwest::header::{ACCEPT, IF_MODIFIED_SINCE, IF_NONE_MATCH};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

const IDEMPOTENCY_KEY: &str = "Idempotency-Key";

impl RequestClient {
    /// Perform one request/response exchange.
    ///
    /// `path` is either an absolute URL or a path relative to the configured
    /// base URL. GET requests consult the attached cache.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> FeedResult<ApiResponse> {
        let options = RequestOptions {
            body,
            ..Default::default()
        };
        self.send_with(method, path, options).await
    }

    /// Perform one exchange with explicit options.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Http`] as soon as the origin answers with an error status
    /// - [`FeedError::Timeout`] / [`FeedError::Connection`] once retries are exhausted
    /// - [`FeedError::Cancelled`] if the options' cancellation token fires
    #[instrument(skip(self, method, options), fields(method = %method))]
    pub async fn send_with(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> FeedResult<ApiResponse> {
        let mut url = self.resolve(path)?;
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(options.query.iter());
        }

        let cache = self
            .cache
            .as_ref()
            .filter(|_| method == Method::GET && options.cache != CachePolicy::Bypass);
        let key = cache.map(|_| request_key(method.as_str(), &url));

        let mut stale = None;
        if let (Some(cache), Some(key)) = (cache, key.as_deref()) {
            if let Some(lookup) = cache.get_with_metadata(key) {
                let revalidate = lookup.validator.is_some()
                    && (options.cache == CachePolicy::Revalidate
                        || lookup.remaining <= self.revalidate_window);
                if !revalidate {
                    debug!(key, remaining_ms = lookup.remaining.as_millis() as u64, "cache hit");
                    return Ok(ApiResponse {
                        status: lookup.value.status,
                        data: lookup.value.data,
                        validator: lookup.validator,
                        cache_status: CacheStatus::Hit,
                        attempts: 0,
                    });
                }
                debug!(key, "revalidating cached response");
                stale = Some(lookup);
            }
        }

        let conditional = stale.as_ref().and_then(|lookup| lookup.validator.clone());
        let retryable = self.may_retry(&method, options.idempotency_key.is_some());
        let result = self
            .execute_with_retry(&method, &url, retryable, options.cancel.as_ref(), |attempt| {
                self.perform_exchange(attempt, &options, conditional.as_ref())
            })
            .await;
        let (exchange, attempts) = match result {
            Ok(outcome) => outcome,
            // The entry has not expired yet, so an unreachable origin still
            // gets the cached payload.
            Err(error) if error.is_retryable() && stale.is_some() => {
                warn!(url = %url, error = %error, "revalidation failed, serving cached response");
                return match stale {
                    Some(lookup) => Ok(ApiResponse {
                        status: lookup.value.status,
                        data: lookup.value.data,
                        validator: lookup.validator,
                        cache_status: CacheStatus::Hit,
                        attempts: if retryable { self.config.max_retries + 1 } else { 1 },
                    }),
                    None => Err(error),
                };
            }
            Err(error) => return Err(error),
        };

        let ttl = options.ttl.unwrap_or(self.cache_ttl);
        let validator = Validator::from_headers(&exchange.headers);

        if exchange.status == StatusCode::NOT_MODIFIED {
            return match (cache, key, stale) {
                (Some(cache), Some(key), Some(lookup)) => {
                    let validator = validator.or(lookup.validator);
                    if cache.refresh(&key, ttl, validator.clone()) {
                        debug!(key = %key, "origin confirmed cached response");
                    } else {
                        debug!(key = %key, "cached response dropped during revalidation, storing again");
                        cache.set(key, lookup.value.clone(), ttl, validator.clone());
                    }
                    Ok(ApiResponse {
                        status: lookup.value.status,
                        data: lookup.value.data,
                        validator,
                        cache_status: CacheStatus::Revalidated,
                        attempts,
                    })
                }
                _ => Err(FeedError::http_status(
                    StatusCode::NOT_MODIFIED.as_u16(),
                    url.as_str(),
                    None,
                )),
            };
        }

        let status = exchange.status.as_u16();
        let data = decode_body(&exchange.body);
        let cache_status = match (cache, key) {
            (Some(cache), Some(key)) => {
                cache.set(
                    key,
                    CachedResponse {
                        status,
                        data: data.clone(),
                    },
                    ttl,
                    validator.clone(),
                );
                CacheStatus::Miss
            }
            _ => CacheStatus::Bypass,
        };

        Ok(ApiResponse {
            status,
            data,
            validator,
            cache_status,
            attempts,
        })
    }

    /// GET `path` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> FeedResult<T> {
        self.send(Method::GET, path, None).await?.json()
    }

    /// POST `body` as JSON to `path` and decode the JSON response
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> FeedResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, path, Some(body)).await?.json()
    }

    /// One network attempt: send, read the full body, classify the status
    async fn perform_exchange(
        &self,
        attempt: RequestAttempt,
        options: &RequestOptions,
        validator: Option<&Validator>,
    ) -> FeedResult<Exchange> {
        let mut request = self
            .http
            .request(attempt.method.clone(), attempt.url.clone())
            .header(ACCEPT, "application/json");

        if let Some(token) = self.bearer_token() {
            request = request.bearer_auth(token);
        }
        if let Some(key) = &options.idempotency_key {
            request = request.header(IDEMPOTENCY_KEY, key.as_str());
        }
        if let Some(validator) = validator {
            if let Some(etag) = &validator.etag {
                request = request.header(IF_NONE_MATCH, etag.as_str());
            }
            if let Some(last_modified) = &validator.last_modified {
                request = request.header(IF_MODIFIED_SINCE, last_modified.as_str());
            }
        }
        for (name, value) in &options.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.body {
            request = request.json(body);
        }

        let result = async {
            let response = request.send().await?;
            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await?.to_vec();
            Ok::<_, FeedError>(Exchange {
                status,
                headers,
                body,
            })
        }
        .await;

        match result {
            Err(error) => {
                tracing::warn!(
                    request_id = %attempt.request_id,
                    method = %attempt.method,
                    url = %attempt.url,
                    attempt = attempt.attempt_number,
                    elapsed_ms = attempt.elapsed_ms(),
                    error = %error,
                    "request failed"
                );
                Err(error)
            }
            Ok(exchange)
                if exchange.status.is_success() || exchange.status == StatusCode::NOT_MODIFIED =>
            {
                tracing::info!(
                    request_id = %attempt.request_id,
                    method = %attempt.method,
                    url = %attempt.url,
                    attempt = attempt.attempt_number,
                    status = exchange.status.as_u16(),
                    elapsed_ms = attempt.elapsed_ms(),
                    "request completed"
                );
                Ok(exchange)
            }
            Ok(exchange) => {
                let details = (!exchange.body.is_empty()).then(|| decode_body(&exchange.body));
                let error =
                    FeedError::http_status(exchange.status.as_u16(), attempt.url.as_str(), details);
                tracing::error!(
                    request_id = %attempt.request_id,
                    method = %attempt.method,
                    url = %attempt.url,
                    attempt = attempt.attempt_number,
                    status = exchange.status.as_u16(),
                    elapsed_ms = attempt.elapsed_ms(),
                    error = %error,
                    details = ?error.details(),
                    "request failed with error status"
                );
                Err(error)
            }
        }
    }
}

/// Parse a body as JSON, falling back to a string, or null when empty
fn decode_body(body: &[u8]) -> serde_json::Value {
    if body.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(body).into_owned()))
}
