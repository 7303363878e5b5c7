//! Resilient request/response client
//!
//! Wraps `reqwest` with a per-exchange timeout, bounded fixed-delay retry for
//! transport failures, structured per-attempt logging, bearer-token injection
//! and conditional caching of GET responses.

mod auth;
mod constructor;
mod error_check;
mod retry;
mod send;
mod types;

pub use auth::{StaticToken, TokenProvider};
pub use types::{
    ApiResponse, CachePolicy, CacheStatus, CachedResponse, RequestAttempt, RequestClient,
    RequestOptions,
};
