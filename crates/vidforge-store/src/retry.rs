//! Save retry with exponential backoff.
//!
//! Saves go through flock + rename, which are synchronous syscalls, so the
//! retry loop is synchronous as well. The document is small; the worker's
//! only other work is a minutes-long generation call.

use std::thread;
use std::time::Duration;

use tracing::warn;

use crate::error::{StoreError, StoreResult};

/// Retry policy for transient save failures.
#[derive(Debug, Clone)]
pub struct SaveRetry {
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Base delay, doubled each attempt
    pub base_delay: Duration,
    /// Cap on the per-attempt delay
    pub max_delay: Duration,
}

impl Default for SaveRetry {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl SaveRetry {
    /// Set the maximum number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base delay.
    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay before the given retry attempt (1-based).
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self.base_delay.saturating_mul(2u32.saturating_pow(attempt - 1));
        delay.min(self.max_delay)
    }

    /// Run `operation` until it succeeds, a non-retryable error occurs, or
    /// retries are exhausted. Exhaustion escalates to
    /// [`StoreError::RetryExhausted`].
    pub(crate) fn run<T>(
        &self,
        what: &str,
        mut operation: impl FnMut() -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut attempt = 0u32;

        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = self.delay_for_attempt(attempt);
                    warn!(
                        "{} attempt {} failed, retrying in {:?}: {}",
                        what, attempt, delay, e
                    );
                    thread::sleep(delay);
                }
                Err(e) if e.is_retryable() => {
                    return Err(StoreError::RetryExhausted {
                        attempts: attempt + 1,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }
}
