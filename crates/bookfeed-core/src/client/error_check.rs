//! Retry eligibility rules

use super::types::RequestClient;
use crate::error::{FeedError, UnifiedError};
use reqwest::Method;

impl RequestClient {
    /// Whether repeating `method` cannot apply its effect twice
    pub fn is_idempotent(method: &Method) -> bool {
        matches!(
            *method,
            Method::GET | Method::HEAD | Method::PUT | Method::DELETE | Method::OPTIONS | Method::TRACE
        )
    }

    /// Whether a request may be attempted more than once.
    ///
    /// Non-idempotent methods are only retried when they carry an
    /// idempotency key or the client is configured to retry them anyway.
    pub(super) fn may_retry(&self, method: &Method, has_idempotency_key: bool) -> bool {
        Self::is_idempotent(method) || has_idempotency_key || self.config.retry_non_idempotent
    }

    /// Check if a failed attempt should be repeated.
    ///
    /// Timeouts and connection failures are transient. An HTTP status means
    /// the origin answered and is surfaced immediately.
    pub fn is_retryable_error(&self, error: &FeedError) -> bool {
        error.is_retryable()
    }
}
