//! Retry logic for request/response exchanges

use super::types::{RequestAttempt, RequestClient};
use crate::error::{FeedError, FeedResult};
use reqwest::{Method, Url};
use std::future::Future;
use std::time::Instant;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{instrument, warn};

impl RequestClient {
    /// Run `operation` with a timeout per attempt and fixed-delay retry.
    ///
    /// # Retry Strategy
    ///
    /// - Attempts: 1 + `max_retries` when `retryable`, otherwise exactly 1
    /// - Delay: `retry_delay` between attempts, no backoff or jitter
    /// - Retryable errors: timeouts and connection failures only
    ///
    /// Returns the operation's value together with the number of attempts
    /// made. Cancelling `cancel` abandons the in-flight attempt or the
    /// pending delay and yields [`FeedError::Cancelled`].
    #[instrument(
        skip(self, operation, cancel, method, url),
        fields(method = %method, url = %url, max_retries = self.config.max_retries)
    )]
    pub(crate) async fn execute_with_retry<T, F, Fut>(
        &self,
        method: &Method,
        url: &Url,
        retryable: bool,
        cancel: Option<&CancellationToken>,
        operation: F,
    ) -> FeedResult<(T, u32)>
    where
        F: Fn(RequestAttempt) -> Fut,
        Fut: Future<Output = FeedResult<T>>,
    {
        let max_retries = if retryable { self.config.max_retries } else { 0 };
        let request_id = uuid::Uuid::new_v4();
        let timeout_ms = self.config.request_timeout.as_millis() as u64;

        for attempt_index in 0..=max_retries {
            if cancel.is_some_and(|token| token.is_cancelled()) {
                return Err(FeedError::Cancelled);
            }

            let attempt = RequestAttempt {
                request_id,
                method: method.clone(),
                url: url.clone(),
                attempt_number: attempt_index + 1,
                started_at: Instant::now(),
            };

            let timed = timeout(self.config.request_timeout, operation(attempt.clone()));
            let outcome = match cancel {
                Some(token) => tokio::select! {
                    _ = token.cancelled() => {
                        tracing::info!(%request_id, attempt = attempt.attempt_number, "request cancelled");
                        return Err(FeedError::Cancelled);
                    }
                    outcome = timed => outcome,
                },
                None => timed.await,
            };

            let error = match outcome {
                Ok(Ok(value)) => {
                    if attempt_index > 0 {
                        tracing::info!(%request_id, attempt = attempt.attempt_number, "request succeeded after retry");
                    }
                    return Ok((value, attempt.attempt_number));
                }
                Ok(Err(error)) => error,
                Err(_elapsed) => {
                    let error = FeedError::timeout_with_url(timeout_ms, url.as_str());
                    tracing::warn!(
                        %request_id,
                        method = %method,
                        url = %url,
                        attempt = attempt.attempt_number,
                        elapsed_ms = attempt.elapsed_ms(),
                        error = %error,
                        "request timed out"
                    );
                    error
                }
            };

            if !self.is_retryable_error(&error) {
                return Err(error);
            }

            if attempt_index < max_retries {
                let delay = self.config.retry_delay;
                warn!(
                    %request_id,
                    attempt = attempt.attempt_number,
                    max_attempts = max_retries + 1,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "retrying after transport failure"
                );

                match cancel {
                    Some(token) => tokio::select! {
                        _ = token.cancelled() => return Err(FeedError::Cancelled),
                        _ = sleep(delay) => {}
                    },
                    None => sleep(delay).await,
                }
            } else {
                if retryable {
                    tracing::error!(%request_id, attempts = max_retries + 1, error = %error, "all retry attempts exhausted");
                }
                return Err(error);
            }
        }

        Err(FeedError::other(format!(
            "All {} attempts failed without error details",
            max_retries + 1
        )))
    }
}
