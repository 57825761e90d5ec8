//! Fixed-delay request throttle.
//!
//! Not a token bucket: the limiter pauses for the full interval before every
//! request regardless of how long ago the previous one went out.

use std::time::Duration;

use multiomics_common::keywords::MIN_QUERY_INTERVAL;
use tracing::trace;

#[derive(Debug, Clone)]
pub struct RateLimiter {
    interval: Duration,
    waits: u64,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self { interval, waits: 0 }
    }

    /// Number of pauses issued so far.
    pub fn waits(&self) -> u64 {
        self.waits
    }

    /// Pause before the next request.
    pub async fn wait(&mut self) {
        self.waits += 1;
        trace!(interval_ms = self.interval.as_millis() as u64, "throttling");
        tokio::time::sleep(self.interval).await;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(MIN_QUERY_INTERVAL)
    }
}
