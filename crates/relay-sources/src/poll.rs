//! Bounded polling for long-running upstream jobs.
//!
//! Upscaling, image generation and app builds are asynchronous on the
//! upstream side: the integration submits a job and then checks its status
//! until it is ready. [`poll_until`] runs that loop with an explicit attempt
//! budget and fails with [`SourceError::PollExhausted`] when it runs out.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, SourceError};

/// Delay growth between status checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Same delay before every check.
    Fixed,
    /// Delay multiplied by `factor` after each check, capped at `max`.
    Exponential { factor: f64, max: Duration },
}

/// How often and how long to poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    /// Number of status checks before giving up.
    pub max_attempts: u32,
    /// Wait before the first check.
    pub initial_delay: Duration,
    /// Wait between subsequent checks.
    pub delay: Duration,
    pub backoff: Backoff,
}

impl PollPolicy {
    /// Fixed delay between checks, first check immediately.
    pub fn fixed(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            delay,
            backoff: Backoff::Fixed,
        }
    }

    pub fn exponential(max_attempts: u32, delay: Duration, factor: f64, max: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::ZERO,
            delay,
            backoff: Backoff::Exponential { factor, max },
        }
    }

    /// Waits before the first check as well.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Delay before check number `attempt` (1-based).
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return self.initial_delay;
        }
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential { factor, max } => {
                let exp = factor.powi(attempt.saturating_sub(2) as i32);
                Duration::from_secs_f64(self.delay.as_secs_f64() * exp).min(max)
            },
        }
    }

    /// Worst-case time spent sleeping.
    pub fn total_wait(&self) -> Duration {
        (1..=self.max_attempts).map(|n| self.delay_before(n)).sum()
    }
}

/// Result of one status check.
#[derive(Debug, Clone, PartialEq)]
pub enum Attempt<T> {
    Ready(T),
    Pending,
}

/// Calls `check` until it returns [`Attempt::Ready`], an error, or the
/// attempt budget is spent.
///
/// `check` receives the 1-based attempt number. Errors returned by `check`
/// end polling immediately.
pub async fn poll_until<T, F, Fut>(policy: &PollPolicy, mut check: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Attempt<T>>>,
{
    for attempt in 1..=policy.max_attempts {
        let wait = policy.delay_before(attempt);
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }

        match check(attempt).await? {
            Attempt::Ready(value) => {
                debug!(attempt, "Job completed");
                return Ok(value);
            },
            Attempt::Pending => {
                debug!(attempt, max = policy.max_attempts, "Job still pending");
            },
        }
    }

    Err(SourceError::PollExhausted {
        attempts: policy.max_attempts,
    })
}
