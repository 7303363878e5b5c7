//! Bookfeed Core Library
//!
//! Client-side plumbing for a catalog storefront: live feed consumption,
//! resilient request/response calls and a conditional response cache.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod recommendations;
pub mod stream;

// Re-export commonly used types
pub use cache::{CacheStatistics, ConditionalCache, Validator};
pub use client::{ApiResponse, CachePolicy, CacheStatus, RequestClient, RequestOptions};
pub use config::{Config, ConfigLoader};
pub use error::{FeedError, FeedResult, UnifiedError};
pub use recommendations::{Recommendation, RecommendationClient};
pub use stream::{FeedParameters, HttpFeedTransport, StreamConsumer, StreamSnapshot, StreamStatus};
