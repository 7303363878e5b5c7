//! Conditional response cache
//!
//! A bounded, TTL-based key/value store that keeps the origin's validators
//! (`ETag`, `Last-Modified`) next to each payload so that a stale-looking
//! entry can be confirmed with a cheap conditional request instead of a full
//! re-download.
//!
//! ## Eviction
//!
//! - **Expiry**: entries past their `expires_at` are dropped lazily on read
//!   and eagerly by the periodic sweeper.
//! - **Capacity**: inserting a new key into a full cache removes the
//!   earliest-inserted key. This is FIFO, not LRU: reads do not refresh an
//!   entry's position.

mod clock;
mod storage;
mod sweeper;
mod types;


pub use clock::{Clock, ManualClock, SystemClock};
pub use storage::ConditionalCache;
pub use sweeper::MIN_SWEEP_INTERVAL;
pub use types::{CacheEntry, CacheLookup, CacheStatistics, Validator, request_key};
