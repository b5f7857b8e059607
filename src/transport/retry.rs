//! Bounded retry with exponential backoff for transient failures.
//!
//! Only [`HttpTransport`](super::HttpTransport) consults this policy;
//! the resource and query layers issue each operation exactly once.
//! Server errors (5xx) and connection-level failures are retryable;
//! client errors (4xx) are never retried automatically.

use std::time::Duration;

use crate::error::ApiError;

/// Retry configuration for a transport.
///
/// The delay between attempts grows exponentially and is capped at
/// `max_delay`. `max_attempts` counts the initial attempt, so a value of
/// 1 disables retry entirely.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first (default: 3).
    pub max_attempts: u32,
    /// Delay before the first retry (default: 100ms).
    pub initial_delay: Duration,
    /// Upper bound on any single delay (default: 5s).
    pub max_delay: Duration,
    /// Exponential growth factor (default: 2.0).
    pub backoff_multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Policy that issues each request exactly once.
    #[must_use]
    pub fn disabled() -> Self {
        Self { max_attempts: 1, ..Self::default() }
    }

    /// Default policy with a custom attempt count.
    #[must_use]
    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self { max_attempts, ..Self::default() }
    }

    /// Delay to sleep after the given zero-based attempt.
    pub(crate) fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "delays are small positive millisecond counts"
        )]
        let delay_ms = (self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(exponent)) as u64;
        Duration::from_millis(delay_ms).min(self.max_delay)
    }
}

/// Whether a failed operation is worth retrying.
///
/// Retryable: transport timeouts, connection failures, and 5xx API
/// responses. Everything else — create rejections, lookup misses,
/// precondition violations, 4xx responses — reflects state or input that
/// a retry would not change.
#[must_use]
pub fn is_retryable(error: &ApiError) -> bool {
    match error {
        ApiError::Http { status, .. } => *status >= 500,
        ApiError::Transport(e) => e.is_timeout() || e.is_connect(),
        _ => false,
    }
}
