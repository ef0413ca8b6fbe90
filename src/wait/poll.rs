//! Predicate polling
//!
//! Polling never fails on its own: it reports [`WaitOutcome::TimedOut`] and
//! lets the caller decide whether that is fatal.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::browser::PageHandle;
use crate::core::{CloudSenseError, Result};

/// Lightning loading indicators
pub const SPINNER_SELECTOR: &str = ".slds-spinner, lightning-spinner";

/// Default interval between predicate evaluations
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Default spinner wait
pub const DEFAULT_SPINNER_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a polling wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The predicate held
    Ready { elapsed: Duration },
    /// The deadline passed first
    TimedOut { elapsed: Duration },
}

impl WaitOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, WaitOutcome::Ready { .. })
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            WaitOutcome::Ready { elapsed } | WaitOutcome::TimedOut { elapsed } => *elapsed,
        }
    }

    /// Treat a timeout as an error
    pub fn into_result(self, what: impl Into<String>) -> Result<Duration> {
        match self {
            WaitOutcome::Ready { elapsed } => Ok(elapsed),
            WaitOutcome::TimedOut { elapsed } => Err(CloudSenseError::WaitTimedOut {
                what: what.into(),
                elapsed,
            }),
        }
    }
}

/// Timeout and interval for a polling wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl PollOptions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::new(DEFAULT_SPINNER_TIMEOUT)
    }
}

impl From<Duration> for PollOptions {
    fn from(timeout: Duration) -> Self {
        Self::new(timeout)
    }
}

/// Evaluate `predicate` every `interval` until it returns `Ok(true)` or
/// `timeout` elapses.
///
/// A predicate error counts as "not yet". Each evaluation is cut off at the
/// deadline, so this returns no later than `timeout` plus scheduling slack.
pub async fn poll_until<F, Fut>(options: PollOptions, mut predicate: F) -> WaitOutcome
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let start = Instant::now();
    let deadline = start + options.timeout;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match tokio::time::timeout(remaining, predicate()).await {
            Ok(Ok(true)) => {
                return WaitOutcome::Ready {
                    elapsed: start.elapsed(),
                }
            }
            Ok(Ok(false)) => {}
            Ok(Err(e)) => debug!(error = %e, "predicate failed, treating as not ready"),
            Err(_) => debug!("predicate evaluation hit the deadline"),
        }

        let now = Instant::now();
        if now >= deadline {
            return WaitOutcome::TimedOut {
                elapsed: start.elapsed(),
            };
        }
        tokio::time::sleep(options.interval.min(deadline - now)).await;
    }
}

/// Wait until no Lightning spinner is on the page
pub async fn wait_for_no_spinners(
    page: &dyn PageHandle,
    options: impl Into<PollOptions>,
) -> WaitOutcome {
    let options = options.into();
    let outcome = poll_until(options, move || async move {
        page.count(SPINNER_SELECTOR).await.map(|n| n == 0)
    })
    .await;

    if !outcome.is_ready() {
        warn!(timeout = ?options.timeout, "spinners still present, continuing");
    }
    outcome
}

/// Wait until `selector` is visible
pub async fn wait_for_visible(
    page: &dyn PageHandle,
    selector: &str,
    options: impl Into<PollOptions>,
) -> WaitOutcome {
    let options = options.into();
    let outcome = poll_until(options, move || page.is_visible(selector)).await;

    if !outcome.is_ready() {
        warn!(selector, timeout = ?options.timeout, "element did not become visible");
    }
    outcome
}

/// Wait until any of `selectors` is visible.
///
/// Selectors are tried in order on every tick; a failing check counts as
/// hidden.
pub async fn wait_for_any_visible(
    page: &dyn PageHandle,
    selectors: &[String],
    options: impl Into<PollOptions>,
) -> WaitOutcome {
    let options = options.into();
    let outcome = poll_until(options, move || async move {
        for selector in selectors {
            if page.is_visible(selector).await.unwrap_or(false) {
                return Ok(true);
            }
        }
        Ok::<_, CloudSenseError>(false)
    })
    .await;

    if !outcome.is_ready() {
        warn!(?selectors, timeout = ?options.timeout, "none of the selectors became visible");
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn opts(timeout_ms: u64, interval_ms: u64) -> PollOptions {
        PollOptions::new(Duration::from_millis(timeout_ms))
            .with_interval(Duration::from_millis(interval_ms))
    }

    #[tokio::test]
    async fn test_ready_immediately() {
        let outcome = poll_until(opts(0, 10), || async { Ok(true) }).await;
        assert!(outcome.is_ready());
    }

    #[tokio::test]
    async fn test_ready_after_some_polls() {
        let calls = AtomicU32::new(0);
        let outcome = poll_until(opts(2_000, 5), || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok(n >= 3) }
        })
        .await;

        assert!(outcome.is_ready());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_timeout_is_reported_not_raised() {
        let started = std::time::Instant::now();
        let outcome = poll_until(opts(50, 10), || async { Ok(false) }).await;

        assert!(matches!(outcome, WaitOutcome::TimedOut { .. }));
        assert!(outcome.elapsed() >= Duration::from_millis(50));
        assert!(started.elapsed() < Duration::from_millis(1_000));
    }

    #[tokio::test]
    async fn test_errors_count_as_not_ready() {
        let calls = AtomicU32::new(0);
        let outcome = poll_until(opts(2_000, 5), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(CloudSenseError::browser("page detached"))
                } else {
                    Ok(true)
                }
            }
        })
        .await;
        assert!(outcome.is_ready());
    }

    #[tokio::test]
    async fn test_hung_predicate_is_cut_off() {
        let started = std::time::Instant::now();
        let outcome = poll_until(opts(50, 10), || async {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(true)
        })
        .await;

        assert!(!outcome.is_ready());
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_into_result() {
        let ready = WaitOutcome::Ready {
            elapsed: Duration::from_millis(5),
        };
        assert_eq!(ready.into_result("spinners").unwrap(), Duration::from_millis(5));

        let timed_out = WaitOutcome::TimedOut {
            elapsed: Duration::from_secs(10),
        };
        let err = timed_out.into_result("spinners").unwrap_err();
        assert!(err.to_string().contains("spinners"));
    }
}
