//! Periodic expiry sweep

use super::storage::ConditionalCache;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Shortest period the sweeper accepts
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

impl<V: Clone + Send + Sync + 'static> ConditionalCache<V> {
    /// Start sweeping expired entries every `interval`.
    ///
    /// The sweeper runs until [`dispose`](Self::dispose) is called or the
    /// cache is dropped. Starting it again replaces the previous sweeper.
    /// Must be called from within a tokio runtime. Intervals shorter than
    /// [`MIN_SWEEP_INTERVAL`] are raised to it.
    pub fn start_sweeper(self: &Arc<Self>, interval: Duration) {
        let interval = if interval < MIN_SWEEP_INTERVAL {
            tracing::warn!(
                requested_ms = interval.as_millis() as u64,
                "sweep interval too short, using 1ms"
            );
            MIN_SWEEP_INTERVAL
        } else {
            interval
        };
        let token = CancellationToken::new();
        if let Some(previous) = self.sweeper.lock().replace(token.clone()) {
            previous.cancel();
        }

        let cache: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // first tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let Some(cache) = cache.upgrade() else { break };
                        cache.sweep();
                    }
                }
            }
            tracing::debug!("cache sweeper stopped");
        });
    }

    /// Stop the sweeper and drop every entry
    pub fn dispose(&self) {
        if let Some(token) = self.sweeper.lock().take() {
            token.cancel();
        }
        self.clear();
    }
}

impl<V> Drop for ConditionalCache<V> {
    fn drop(&mut self) {
        if let Some(token) = self.sweeper.get_mut().take() {
            token.cancel();
        }
    }
}
