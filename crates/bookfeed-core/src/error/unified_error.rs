//! UnifiedError trait implementation for FeedError

use super::types::{FeedError, UnifiedError};

impl UnifiedError for FeedError {
    fn error_code(&self) -> &str {
        match self {
            Self::Config { .. } => "FEED_CONFIG",
            Self::Http { .. } => "FEED_HTTP",
            Self::Connection { .. } => "FEED_CONNECTION",
            Self::Timeout { .. } => "FEED_TIMEOUT",
            Self::Json { .. } => "FEED_JSON",
            Self::Stream { .. } => "FEED_STREAM",
            Self::InvalidInput { .. } => "FEED_INVALID_INPUT",
            Self::Io { .. } => "FEED_IO",
            Self::Cancelled => "FEED_CANCELLED",
            Self::Other { .. } => "FEED_OTHER",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Config { message, .. } => message,
            Self::Http { message, .. } => message,
            Self::Connection { message, .. } => message,
            Self::Timeout { .. } => "Request timeout",
            Self::Json { message, .. } => message,
            Self::Stream { message } => message,
            Self::InvalidInput { message, .. } => message,
            Self::Io { message } => message,
            Self::Cancelled => "Request was cancelled",
            Self::Other { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } => context.as_deref(),
            Self::Json { context, .. } => context.as_deref(),
            Self::Other { context, .. } => context.as_deref(),
            Self::Http { url, .. } | Self::Connection { url, .. } | Self::Timeout { url, .. } => {
                url.as_deref()
            }
            Self::InvalidInput { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Only transport-level failures are retried. An HTTP status means the
    /// origin answered, so repeating the call would not change the outcome.
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }
}
