//! Retry policy for failed esearch queries.

use std::time::Duration;

/// Legacy pause between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// `None` retries forever.
    pub max_retries: Option<u32>,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn unbounded(delay: Duration) -> Self {
        Self { max_retries: None, delay }
    }

    pub fn bounded(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries: Some(max_retries), delay }
    }

    /// Config convention: 0 means unbounded.
    pub fn from_config(max_retries: u32, delay: Duration) -> Self {
        if max_retries == 0 {
            Self::unbounded(delay)
        } else {
            Self::bounded(max_retries, delay)
        }
    }

    /// Whether another attempt is allowed after `failures` failed ones.
    pub fn should_retry(&self, failures: u32) -> bool {
        match self.max_retries {
            None => true,
            Some(max) => failures <= max,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded(DEFAULT_RETRY_DELAY)
    }
}
