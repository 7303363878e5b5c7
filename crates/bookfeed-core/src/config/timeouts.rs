//! Default timing values for network and cache operations.

use std::time::Duration;

/// Request/response exchange defaults
pub mod request {
    use super::*;

    /// Timeout applied to one request/response exchange (10 seconds)
    pub const TIMEOUT_MS: u64 = 10_000;

    /// Additional attempts after the first one fails with a transport error
    pub const MAX_RETRIES: u32 = 2;

    /// Fixed delay between attempts (1 second)
    pub const RETRY_DELAY_MS: u64 = 1_000;

    pub fn timeout() -> Duration {
        Duration::from_millis(TIMEOUT_MS)
    }

    pub fn retry_delay() -> Duration {
        Duration::from_millis(RETRY_DELAY_MS)
    }
}

/// Cache defaults
pub mod cache {
    use super::*;

    /// Maximum number of entries held before FIFO eviction
    pub const CAPACITY: usize = 100;

    /// Default time-to-live (5 minutes)
    pub const TTL_SECS: u64 = 300;

    /// Interval between expiry sweeps (5 minutes)
    pub const SWEEP_INTERVAL_SECS: u64 = 300;

    /// Remaining lifetime below which a hit is revalidated (30 seconds)
    pub const REVALIDATE_WINDOW_SECS: u64 = 30;

    pub fn ttl() -> Duration {
        Duration::from_secs(TTL_SECS)
    }

    pub fn sweep_interval() -> Duration {
        Duration::from_secs(SWEEP_INTERVAL_SECS)
    }

    pub fn revalidate_window() -> Duration {
        Duration::from_secs(REVALIDATE_WINDOW_SECS)
    }
}

/// Feed connection defaults
pub mod stream {
    use super::*;

    /// Time allowed for the feed connection to open (10 seconds)
    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    pub fn connect_timeout() -> Duration {
        Duration::from_secs(CONNECT_TIMEOUT_SECS)
    }
}
