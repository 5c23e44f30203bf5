//! Bounded readiness polling for freshly created resources.
//!
//! A vault is addressable the moment the management call returns, but its DNS
//! entry can take a little while to propagate. The poller gates on a
//! lightweight read-only probe, retrying the transient connectivity class a
//! fixed number of times with a fixed delay.

use crate::{Result, SampleError};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Default delay between probe attempts.
pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_secs(10);

/// Default attempt budget; `max_retries - 1` probes actually execute.
pub const DEFAULT_MAX_RETRIES: u32 = 4;

/// Polls a probe until it succeeds or the attempt budget is exhausted.
///
/// The wait happens *before* every probe, including the first. Probing
/// immediately after creation tends to populate negative DNS caches that
/// outlive the propagation delay, so the pre-wait is deliberate and must not
/// be optimized away.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use vault_samples::ReadinessPoller;
///
/// # async fn probe() -> vault_samples::Result<()> { Ok(()) }
/// # async fn demo() -> vault_samples::Result<()> {
/// let poller = ReadinessPoller::new().with_retry_wait(Duration::from_secs(5));
/// poller.wait_until_ready(probe).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReadinessPoller {
    retry_wait: Duration,
    max_retries: u32,
}

impl Default for ReadinessPoller {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadinessPoller {
    /// Creates a poller with the default wait and attempt budget.
    pub fn new() -> Self {
        Self {
            retry_wait: DEFAULT_RETRY_WAIT,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Sets the fixed delay observed before every probe.
    pub fn with_retry_wait(mut self, wait: Duration) -> Self {
        self.retry_wait = wait;
        self
    }

    /// Sets the attempt budget. A budget of `n` performs `n - 1` probes.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Blocks until the probe succeeds, returning its value.
    ///
    /// Only [`SampleError::Connection`] failures are retried; any other error
    /// propagates immediately. When the budget is exhausted the last observed
    /// connectivity error is re-surfaced, never swallowed.
    ///
    /// # Errors
    ///
    /// - [`SampleError::NoPollAttempts`] if `max_retries <= 1`, which would
    ///   otherwise exhaust the loop without ever recording an error. This is
    ///   treated as a misconfiguration, not a silent no-op.
    /// - The probe's own error, either immediately (non-transient) or after
    ///   the final attempt (transient).
    pub async fn wait_until_ready<F, Fut, T>(&self, mut probe: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if self.max_retries <= 1 {
            return Err(SampleError::NoPollAttempts(self.max_retries));
        }

        let mut last_error = None;
        for attempt in 1..self.max_retries {
            // wait first: probing too early poisons negative DNS caches
            tokio::time::sleep(self.retry_wait).await;

            match probe().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_connectivity() => {
                    warn!(
                        attempt,
                        budget = self.max_retries - 1,
                        error = %e,
                        "resource not reachable yet"
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        // the loop body ran at least once, so a last error is always recorded
        Err(last_error.unwrap_or(SampleError::NoPollAttempts(self.max_retries)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_poller() -> ReadinessPoller {
        ReadinessPoller::new().with_retry_wait(Duration::from_secs(10))
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let probes = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result = fast_poller()
            .wait_until_ready(|| {
                let n = probes.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 2 {
                        Err(SampleError::Connection("dns not propagated".to_string()))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(probes.load(Ordering::SeqCst), 2);
        // one sleep per probe, including the successful one
        assert_eq!(start.elapsed(), Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_surfaces_last_error() {
        let probes = AtomicU32::new(0);

        let result = fast_poller()
            .wait_until_ready(|| {
                let n = probes.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Err::<(), _>(SampleError::Connection(format!("attempt {n}"))) }
            })
            .await;

        // budget of 4 means exactly 3 probes, and the final error survives
        assert_eq!(probes.load(Ordering::SeqCst), 3);
        match result {
            Err(SampleError::Connection(msg)) => assert_eq!(msg, "attempt 3"),
            other => panic!("expected the last connection error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_transient_error_propagates_immediately() {
        let probes = AtomicU32::new(0);

        let result = fast_poller()
            .wait_until_ready(|| {
                probes.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(SampleError::Authentication("forbidden".to_string())) }
            })
            .await;

        assert_eq!(probes.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(SampleError::Authentication(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_attempt_budget_is_a_misconfiguration() {
        let start = tokio::time::Instant::now();

        let result = fast_poller()
            .with_max_retries(1)
            .wait_until_ready(|| async { Ok(()) })
            .await;

        assert!(matches!(result, Err(SampleError::NoPollAttempts(1))));
        // fails up front, without sleeping or probing
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_immediate_success_still_waits_once() {
        let start = tokio::time::Instant::now();

        let result = fast_poller().wait_until_ready(|| async { Ok("ready") }).await;

        assert_eq!(result.unwrap(), "ready");
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }
}
