// SPDX-License-Identifier: MIT

//! Adaptive retry scheduling for checks with a time constraint
//!
//! A failed attempt is retried while time is left. The delay between
//! attempts starts short, doubles after every failure and is capped by a
//! third of the remaining time, so polling is fast right after the start
//! and close to the deadline. Time spent evaluating counts towards the
//! delay.

use super::evaluator::Attempt;
use super::expression::Verdict;
use crate::nlcheck::config::PollingConfig;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Anything carrying a verdict can be polled
pub trait Outcome {
    fn verdict(&self) -> Verdict;
}

impl Outcome for Attempt {
    fn verdict(&self) -> Verdict {
        self.verdict
    }
}

impl Outcome for Verdict {
    fn verdict(&self) -> Verdict {
        *self
    }
}

/// Final attempt of a polling run
#[derive(Debug, Clone)]
pub struct PollOutcome<T> {
    pub outcome: T,
    pub elapsed: Duration,
    /// A timeout was given and no time was left when polling stopped
    pub timed_out: bool,
    pub attempts: u32,
}

/// Runs an attempt until it passes or the timeout elapses
#[derive(Debug, Clone)]
pub struct RetryScheduler {
    max_delay: f64,
    min_fraction: f64,
    min_divisor: f64,
}

impl RetryScheduler {
    pub fn new(config: &PollingConfig) -> Self {
        Self {
            max_delay: config.max_delay,
            min_fraction: config.min_fraction,
            min_divisor: config.min_divisor,
        }
    }

    /// Shortest delay for a timeout, in seconds
    pub fn min_delay(&self, timeout: f64) -> f64 {
        (self.max_delay / self.min_divisor).min(timeout * self.min_fraction)
    }

    /// Delay after a failed attempt, given the previous delay
    pub fn next_delay(&self, current: f64, time_left: f64, min_delay: f64) -> f64 {
        (time_left / 3.0)
            .min(current * 2.0)
            .min(self.max_delay)
            .max(min_delay)
    }

    /// Run `attempt` until it passes or `timeout` seconds have elapsed.
    ///
    /// Without a timeout (zero) the attempt runs exactly once. Errors from
    /// an attempt end polling immediately.
    pub async fn run<T, E, F, Fut>(&self, timeout: f64, mut attempt: F) -> Result<PollOutcome<T>, E>
    where
        T: Outcome,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let start = Instant::now();
        let min_delay = self.min_delay(timeout);
        let mut delay = min_delay;
        let mut attempts = 0;

        loop {
            let attempt_start = Instant::now();
            let outcome = attempt().await?;
            attempts += 1;
            let evaluation = attempt_start.elapsed().as_secs_f64();

            let time_left = round_millis(timeout - start.elapsed().as_secs_f64());
            // A tie still counts as remaining
            let time_remaining = timeout != 0.0 && time_left >= 0.0;

            if outcome.verdict().is_passed() || !time_remaining {
                let elapsed = start.elapsed();
                log::debug!(
                    "Polling done after {} attempt(s) in {:.3}s",
                    attempts,
                    elapsed.as_secs_f64()
                );
                return Ok(PollOutcome {
                    outcome,
                    elapsed,
                    timed_out: timeout != 0.0 && !time_remaining,
                    attempts,
                });
            }

            delay = self.next_delay(delay, time_left, min_delay);
            let pause = Duration::try_from_secs_f64((delay - evaluation).max(0.0)).unwrap_or_default();
            log::trace!(
                "Attempt {} failed, {:.3}s left, retrying in {:.3}s",
                attempts,
                time_left,
                pause.as_secs_f64()
            );
            tokio::time::sleep(pause).await;
        }
    }
}

impl Default for RetryScheduler {
    fn default() -> Self {
        Self::new(&PollingConfig::default())
    }
}

fn round_millis(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}
