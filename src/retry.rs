//! Bounded polling with a fixed delay between attempts.

use crate::constants::{CONFIRM_ATTEMPTS, CONFIRM_DELAY};
use crate::error::Result;
use log::debug;
use std::thread;
use std::time::Duration;

/// Result of a poll that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// The check succeeded on attempt `attempts`.
    Confirmed { attempts: u32 },
    /// Every attempt answered "not yet".
    Exhausted { attempts: u32 },
}

/// Fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(CONFIRM_ATTEMPTS, CONFIRM_DELAY)
    }
}

impl RetryPolicy {
    /// Creates a policy. At least one attempt is always made.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self { max_attempts: max_attempts.max(1), delay }
    }

    /// A policy without any delay between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Calls `check` with the 1-based attempt number until it returns
    /// `Ok(true)` or the attempts run out. Sleeps between attempts only, never
    /// after the last one.
    ///
    /// # Errors
    /// The first error returned by `check` ends the poll and is propagated.
    pub fn poll<F>(&self, mut check: F) -> Result<PollOutcome>
    where
        F: FnMut(u32) -> Result<bool>,
    {
        for attempt in 1..=self.max_attempts {
            if check(attempt)? {
                return Ok(PollOutcome::Confirmed { attempts: attempt });
            }
            if attempt < self.max_attempts && !self.delay.is_zero() {
                debug!(
                    "Attempt {}/{} not confirmed, waiting {:?}",
                    attempt, self.max_attempts, self.delay
                );
                thread::sleep(self.delay);
            }
        }
        Ok(PollOutcome::Exhausted { attempts: self.max_attempts })
    }
}
