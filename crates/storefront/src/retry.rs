//! Linear back-off for failed listing fetches.
//!
//! A generation makes one initial attempt plus up to
//! [`RetryPolicy::max_retries`] automatic retries. Retry `n` (1-based) waits
//! `n * base_delay` first, so the defaults wait 1 s and then 2 s.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Automatic retries after the initial attempt.
    pub max_retries: u32,
    /// Delay unit; retry `n` waits `n` units.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(retry)
    }

    /// Total attempts a generation may make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// The full delay schedule, in order.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> + '_ {
        (1..=self.max_retries).map(|n| self.delay_for(n))
    }
}
