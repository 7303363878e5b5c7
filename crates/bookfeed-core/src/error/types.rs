//! Core error types and traits

use thiserror::Error;

/// Result type alias for bookfeed operations
pub type FeedResult<T> = Result<T, FeedError>;

/// Unified error trait giving every error a stable code and message.
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Check if this error is retryable
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Main error type for bookfeed
#[derive(Error, Debug, Clone)]
pub enum FeedError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// The origin answered with a non-success status
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
        /// Response body, parsed as JSON when possible
        details: Option<serde_json::Value>,
    },

    /// The connection could not be established or broke mid-exchange
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        url: Option<String>,
    },

    /// The exchange did not finish within the configured timeout
    #[error("Request timeout after {millis} ms")]
    Timeout { millis: u64, url: Option<String> },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// Feed session errors
    #[error("Stream error: {message}")]
    Stream { message: String },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io { message: String },

    /// Request was cancelled by the caller
    #[error("Request was cancelled")]
    Cancelled,

    /// Generic error with context
    #[error("Error: {message}")]
    Other {
        message: String,
        context: Option<String>,
    },
}
