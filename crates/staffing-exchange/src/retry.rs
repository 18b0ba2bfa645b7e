//! Bounded retry with fixed backoff.

use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::Result;

/// Default number of attempts per operation.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// How often, and how patiently, a store operation is retried.
///
/// Only errors for which [`ExchangeError::is_retryable`] holds are retried;
/// everything else is returned after the first attempt.
///
/// [`ExchangeError::is_retryable`]: crate::ExchangeError::is_retryable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause between attempts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// A policy that makes a single attempt.
    #[must_use]
    pub const fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Runs `operation` until it succeeds, fails permanently, or the attempts
    /// are used up. The closure receives the one-based attempt number.
    pub fn run<T>(&self, target: &str, mut operation: impl FnMut(u32) -> Result<T>) -> Result<T> {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match operation(attempt) {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    warn!(
                        target_file = target,
                        attempt,
                        max_attempts,
                        error = %err,
                        "transient failure, retrying"
                    );
                    if !self.backoff.is_zero() {
                        thread::sleep(self.backoff);
                    }
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
