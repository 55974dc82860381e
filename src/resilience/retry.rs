//! Retry policy for outbound weather requests.
//!
//! A request is retried on the configured transient statuses (429 and the
//! 5xx gateway family by default) and on transport failures, waiting
//! `backoff_factor * 2^(n-1)` before the n-th retry.

use std::time::Duration;

use crate::resilience::backoff::Backoff;

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];
pub const DEFAULT_BACKOFF_FACTOR: Duration = Duration::from_secs(1);

const MAX_DELAY: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Re-attempts after the first try; the total attempt count is `max_retries + 1`.
    pub max_retries: u32,
    pub retryable_statuses: Vec<u16>,
    pub backoff_factor: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retryable_statuses: DEFAULT_RETRYABLE_STATUSES.to_vec(),
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, backoff_factor: Duration) -> Self {
        Self {
            max_retries,
            backoff_factor,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Fresh delay sequence for one logical request.
    pub fn backoff(&self) -> Backoff {
        Backoff::new(self.backoff_factor, MAX_DELAY.max(self.backoff_factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_transient_set() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        for status in [429, 500, 502, 503, 504] {
            assert!(policy.is_retryable_status(status), "{status}");
        }
        for status in [200, 400, 401, 404, 501] {
            assert!(!policy.is_retryable_status(status), "{status}");
        }
    }

    #[test]
    fn default_backoff_waits_one_two_four_seconds() {
        let mut backoff = RetryPolicy::default().backoff();
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
        assert_eq!(backoff.next_delay(), Duration::from_secs(2));
        assert_eq!(backoff.next_delay(), Duration::from_secs(4));
    }

    #[test]
    fn disabled_policy_never_retries() {
        let policy = RetryPolicy::disabled();
        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.backoff().next_delay(), Duration::ZERO);
    }
}
