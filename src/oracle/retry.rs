//! Bounded retry with linear backoff

use crate::error::{ClassifyError, ClassifyResult};
use std::future::Future;
use std::time::Duration;

/// Default number of attempts before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default delay unit; attempt `n` waits `n * base_delay`
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(50);

/// Outcome of a single failed attempt
#[derive(Debug)]
pub enum AttemptError {
    /// Worth retrying (connection reset, premature EOF)
    Transient(String),
    /// Give up immediately
    Fatal(ClassifyError),
}

impl From<ClassifyError> for AttemptError {
    fn from(error: ClassifyError) -> Self {
        AttemptError::Fatal(error)
    }
}

/// Retry discipline for oracle calls
///
/// The loop is iterative and strictly bounded by `max_attempts`. Dropping the
/// future returned by [`RetryPolicy::run`] cancels both the in-flight attempt
/// and any pending backoff sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts,
            base_delay,
        }
    }

    /// Backoff after failed attempt number `attempt` (1-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Run `operation` until it succeeds, fails fatally or the attempt budget
    /// is spent. The closure receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> ClassifyResult<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(AttemptError::Fatal(error)) => return Err(error),
                Err(AttemptError::Transient(reason)) => {
                    if attempt >= max_attempts {
                        tracing::warn!("Giving up after {} attempts: {}", attempt, reason);
                        return Err(ClassifyError::RetriesExhausted {
                            attempts: attempt,
                            last: reason,
                        });
                    }
                    let delay = self.delay_for(attempt);
                    tracing::debug!(
                        "Transient oracle failure on attempt {}/{} ({}), retrying in {:?}",
                        attempt,
                        max_attempts,
                        reason,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_linear_delay() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(50));
        assert_eq!(policy.delay_for(4), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();

        let value = policy
            .run(|attempt| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 3 {
                        Err(AttemptError::Transient("connection reset by peer".to_string()))
                    } else {
                        Ok(attempt)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy::default();
        let started = tokio::time::Instant::now();

        let err = policy
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(AttemptError::Transient("unexpected EOF".to_string())) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClassifyError::RetriesExhausted { attempts: 10, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 10);
        // 50ms * (1 + 2 + ... + 9)
        assert!(started.elapsed() >= Duration::from_millis(2250));
    }

    #[tokio::test]
    async fn test_fatal_is_not_retried() {
        let calls = AtomicU32::new(0);
        let err = RetryPolicy::default()
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(AttemptError::Fatal(ClassifyError::Protocol("garbage".to_string()))) }
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ClassifyError::Protocol(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_future_stops_retrying() {
        let calls = Arc::new(AtomicU32::new(0));
        let policy = RetryPolicy::new(1_000, Duration::from_secs(1));

        let counted = Arc::clone(&calls);
        let outcome = tokio::time::timeout(
            Duration::from_millis(2500),
            policy.run(move |_| {
                counted.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(AttemptError::Transient("connection reset".to_string())) }
            }),
        )
        .await;

        assert!(outcome.is_err());
        let seen = calls.load(Ordering::SeqCst);
        // attempts at t=0s, 1s and 3s; the deadline at 2.5s cancels the sleep in between
        assert_eq!(seen, 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), seen);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_tries_once() {
        let calls = AtomicU32::new(0);
        let err = RetryPolicy::new(0, Duration::ZERO)
            .run(|_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>(AttemptError::Transient("EOF".to_string())) }
            })
            .await
            .unwrap_err();
        assert!(err.is_retries_exhausted());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
