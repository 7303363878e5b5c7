//! Constructor methods for FeedError

use super::types::FeedError;

impl FeedError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create an HTTP error from a status response
    pub fn http_status(
        status_code: u16,
        url: impl Into<String>,
        details: Option<serde_json::Value>,
    ) -> Self {
        let reason = reqwest::StatusCode::from_u16(status_code)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown status");
        let message = details
            .as_ref()
            .and_then(|d| d.get("message").and_then(|m| m.as_str()))
            .map(|m| format!("{} {}: {}", status_code, reason, m))
            .unwrap_or_else(|| format!("{} {}", status_code, reason));
        Self::Http {
            message,
            url: Some(url.into()),
            status_code: Some(status_code),
            details,
        }
    }

    /// Create a connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            url: None,
        }
    }

    /// Create a connection error for a URL
    pub fn connection_with_url(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
            url: Some(url.into()),
        }
    }

    /// Create a new timeout error
    pub fn timeout(millis: u64) -> Self {
        Self::Timeout { millis, url: None }
    }

    /// Create a timeout error for a URL
    pub fn timeout_with_url(millis: u64, url: impl Into<String>) -> Self {
        Self::Timeout {
            millis,
            url: Some(url.into()),
        }
    }

    /// Create a JSON error with message
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: None,
        }
    }

    /// Create a JSON error with context
    pub fn json_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a feed session error
    pub fn stream(message: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
        }
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error with field
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an IO error with message
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            context: None,
        }
    }

    /// HTTP status code carried by this error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// Structured details captured from the error response body
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Http { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}
