// src/probe.rs

use crate::models::ProbeResult;
use async_trait::async_trait;
use futures::FutureExt;
use log::{debug, warn};
use std::{panic::AssertUnwindSafe, time::Duration};

/// One bounded liveness check against the backend.
///
/// Implementations never fail: refused connections, timeouts, non-2xx
/// responses and unreadable bodies all come back as
/// [`ProbeResult::not_ready`]. Retrying is the caller's business.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn probe(&self, timeout: Duration) -> ProbeResult;
}

/// Runs one probe bounded by `timeout`. A panicking or overrunning
/// implementation counts as not-ready.
pub async fn probe_guarded(probe: &dyn HealthProbe, timeout: Duration) -> ProbeResult {
    let guarded = AssertUnwindSafe(probe.probe(timeout)).catch_unwind();
    match tokio::time::timeout(timeout, guarded).await {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => {
            warn!("health probe panicked, treating as not ready");
            ProbeResult::not_ready()
        }
        Err(_) => {
            debug!("health probe exceeded {}ms, treating as not ready", timeout.as_millis());
            ProbeResult::not_ready()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedProbe;
    use std::future::pending;
    use tokio::time::Instant;

    struct StalledProbe;

    #[async_trait]
    impl HealthProbe for StalledProbe {
        async fn probe(&self, _timeout: Duration) -> ProbeResult {
            pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_check_is_cut_off_at_timeout() {
        let started = Instant::now();
        let result = probe_guarded(&StalledProbe, Duration::from_millis(3_000)).await;

        assert_eq!(result, ProbeResult::not_ready());
        assert_eq!(started.elapsed(), Duration::from_millis(3_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_within_timeout_is_kept() {
        let probe = ScriptedProbe::with_latency(&[true], false, Duration::from_millis(200));
        let result = probe_guarded(probe.as_ref(), Duration::from_millis(3_000)).await;

        assert!(result.ready);
    }
}
