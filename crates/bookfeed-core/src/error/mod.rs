//! Error types for bookfeed
//!
//! All fallible operations return [`FeedResult`]. Every variant of
//! [`FeedError`] carries enough structure for callers to tell transport
//! failures (retryable) apart from HTTP status errors (not retryable), and
//! exposes it through the [`UnifiedError`] trait.

mod constructors;
mod conversions;
mod types;
mod unified_error;

#[cfg(test)]
mod tests;

pub use types::{FeedError, FeedResult, UnifiedError};
