// src/retry.rs

use crate::probe::{probe_guarded, HealthProbe};
use log::debug;
use std::time::Duration;

/// Capped exponential backoff for health probes.
///
/// | Attempt | Delay before next (defaults) |
/// |---------|------------------------------|
/// | 1       | 1000ms                       |
/// | 2       | 2000ms                       |
/// | 3       | 4000ms                       |
/// | 4+      | 8000ms (cap)                 |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    /// Per-attempt probe timeout.
    pub timeout: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Wait between attempt `attempt` (1-based) and the next one:
    /// `min(base_delay * 2^(attempt - 1), max_delay)`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1);
        let factor = 2u32.checked_pow(exponent).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }

    /// Sum of every backoff wait a run that never succeeds goes through.
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_retries).map(|i| self.delay_after(i)).sum()
    }
}

/// Probes sequentially until one reports ready or `max_retries` attempts are
/// spent. Each attempt, including its own timeout, finishes before the next
/// backoff starts.
///
/// Cancel by dropping the future (or aborting the task that polls it); no
/// timer outlives it.
pub async fn run_with_retry(probe: &dyn HealthProbe, policy: &RetryPolicy) -> bool {
    for attempt in 1..=policy.max_retries {
        let result = probe_guarded(probe, policy.timeout).await;
        if result.ready {
            debug!("probe attempt {}/{} ready ({})", attempt, policy.max_retries, result.status);
            return true;
        }

        if attempt < policy.max_retries {
            let delay = policy.delay_after(attempt);
            debug!(
                "probe attempt {}/{} not ready, retrying in {}ms",
                attempt,
                policy.max_retries,
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
        }
    }

    debug!("probe retries exhausted after {} attempts", policy.max_retries);
    false
}
