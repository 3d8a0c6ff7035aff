//! Bounded retry with exponential backoff.
//!
//! Only errors that report themselves as retryable are retried. The sleep
//! is blocking: bootstrap runs before any runtime or worker thread exists.
//!
//! A [`Deadline`] bounds the whole sequence: no attempt starts after it has
//! passed, and no backoff sleep is allowed to cross it.

use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::error::{Result, VaultError};

/// Time budget shared by every remote call in one run.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}

impl Deadline {
    /// No limit.
    pub fn none() -> Self {
        Self {
            started: Instant::now(),
            limit: None,
        }
    }

    /// Expires `limit` from now.
    pub fn after(limit: Duration) -> Self {
        Self {
            started: Instant::now(),
            limit: Some(limit),
        }
    }

    /// Time since the deadline was created.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left, or `None` when unlimited.
    pub fn remaining(&self) -> Option<Duration> {
        self.limit.map(|limit| limit.saturating_sub(self.elapsed()))
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.remaining(), Some(left) if left.is_zero())
    }

    /// `timeout` shortened so a request cannot outlive the deadline.
    pub fn cap(&self, timeout: Duration) -> Duration {
        match self.remaining() {
            Some(left) => left.min(timeout),
            None => timeout,
        }
    }

    /// Fail with `VaultError::Timeout` once the deadline has passed.
    pub fn check(&self, target: &str) -> Result<()> {
        if self.is_expired() {
            return Err(VaultError::Timeout {
                target: target.to_string(),
                elapsed: self.elapsed(),
            }
            .into());
        }
        Ok(())
    }
}

/// How many times, and how patiently, a remote call is retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub backoff_factor: f64,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: crate::core::constants::DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(crate::core::constants::DEFAULT_BASE_DELAY_MS),
            max_delay: Duration::from_millis(crate::core::constants::DEFAULT_MAX_DELAY_MS),
            backoff_factor: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (zero-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponential =
            self.base_delay.as_secs_f64() * self.backoff_factor.powi(attempt as i32);
        let capped = exponential.min(self.max_delay.as_secs_f64());

        let delay = if self.jitter {
            capped * (0.5 + fastrand::f64() * 0.5)
        } else {
            capped
        };

        Duration::from_secs_f64(delay)
    }
}

/// Run `op` until it succeeds, fails permanently, attempts run out, or the
/// deadline leaves no room for another try.
///
/// `label` names the operation in log output and timeout errors. When the
/// next backoff would cross the deadline the last error is returned as is.
pub fn retry<T, F>(policy: &RetryPolicy, label: &str, deadline: Deadline, mut op: F) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let mut attempt = 0;

    loop {
        deadline.check(label)?;

        match op() {
            Ok(value) => return Ok(value),
            Err(err) => {
                attempt += 1;

                if !err.is_retryable() || attempt >= policy.max_attempts {
                    return Err(err);
                }

                let delay = policy.delay(attempt - 1);
                if matches!(deadline.remaining(), Some(left) if left <= delay) {
                    debug!(operation = label, error = %err, attempt, "no time left to retry");
                    return Err(err);
                }

                warn!(
                    operation = label,
                    error = %err,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "retrying after error"
                );
                std::thread::sleep(delay);
            }
        }
    }
}
