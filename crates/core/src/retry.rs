// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry/backoff (§4.2). Generalizes the donor's ad hoc
//! `refresh_with_retries` doubling loop into a reusable policy shared by
//! every read operation in [`crate::api`] and by stream recovery in
//! [`crate::recovery`].

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;

use crate::error::ArgoError;

/// Backoff configuration for one class of operation.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Jitter fraction in `[0, 1]`; actual sleep is `base * (1 ± jitter*rand)`.
    pub jitter: f64,
}

impl RetryPolicy {
    /// Default profile for API read operations (§4.2).
    pub fn api_default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            jitter: 0.25,
        }
    }

    /// Default profile for stream recovery (§4.5).
    pub fn stream_default() -> Self {
        Self {
            max_attempts: 10,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            jitter: 0.25,
        }
    }

    /// Delay before attempt `n` (1-indexed: the sleep taken after attempt
    /// `n` fails, before attempt `n+1`).
    pub fn delay_for_attempt(&self, n: u32) -> Duration {
        let base_secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(n as i32 - 1);
        let capped = base_secs.min(self.max_delay.as_secs_f64());
        let jitter_roll: f64 = rand::rng().random_range(-1.0..=1.0);
        let jittered = capped * (1.0 + self.jitter * jitter_roll);
        Duration::from_secs_f64(jittered.max(0.0))
    }

    /// Upper bound on cumulative sleep across all retries, used by tests
    /// asserting §8's `cumulative sleep ≤ (maxAttempts−1)·maxDelay·(1+jitter)`.
    pub fn max_cumulative_sleep(&self) -> Duration {
        let attempts = self.max_attempts.saturating_sub(1) as f64;
        Duration::from_secs_f64(self.max_delay.as_secs_f64() * attempts * (1.0 + self.jitter))
    }
}

/// Outcome of a retried operation.
#[derive(Debug)]
pub enum RetryOutcome<T> {
    Succeeded { value: T, attempts: u32 },
    Cancelled { attempts: u32 },
    ExhaustedOrFatal { error: ArgoError, attempts: u32 },
}

/// Run `op` under `policy`, stopping on success, on a non-retryable error
/// kind (`shouldRetry` — §4.2 mandates `false` for AUTH/PERMISSION/CONFIG),
/// on attempt exhaustion, or on cancellation.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
) -> RetryOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ArgoError>>,
{
    let mut attempt = 1;
    loop {
        if cancel.is_cancelled() {
            return RetryOutcome::Cancelled { attempts: attempt - 1 };
        }

        match op().await {
            Ok(value) => return RetryOutcome::Succeeded { value, attempts: attempt },
            Err(error) => {
                let should_retry = error.kind.is_retryable_category() && attempt < policy.max_attempts;
                if !should_retry {
                    return RetryOutcome::ExhaustedOrFatal { error, attempts: attempt };
                }
                let delay = policy.delay_for_attempt(attempt);
                tokio::select! {
                    _ = cancel.cancelled() => return RetryOutcome::Cancelled { attempts: attempt },
                    _ = tokio::time::sleep(delay) => {}
                }
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
