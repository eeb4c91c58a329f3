// Retry with exponential backoff.
// Wraps any fallible async operation; knows nothing about caching.

use std::future::Future;
use std::time::Duration;

use tracing::{info, warn};

use crate::error::Result;

/// Source of delays, injectable so backoff can be tested without waiting.
#[allow(async_fn_in_trait)]
pub trait Sleep {
    async fn sleep(&self, duration: Duration);
}

/// Real-time sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleep;

impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// How many attempts to make and how long to wait between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Time unit scaled by `2^attempt` between attempts.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Wait after failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Run `op` until it succeeds or `policy.max_attempts` attempts have failed.
///
/// Returns the last error once attempts are exhausted. No wait follows the
/// final attempt.
pub async fn with_backoff<T, F, Fut, S>(
    policy: &RetryPolicy,
    sleeper: &S,
    label: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
    S: Sleep,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!(
                    resource = %label,
                    attempt,
                    max_attempts,
                    error = %err,
                    "Fetch attempt failed"
                );
                if attempt >= max_attempts {
                    warn!(resource = %label, "Giving up after {} attempts", max_attempts);
                    return Err(err);
                }
                let wait = policy.backoff(attempt);
                info!(resource = %label, "Retrying in {:?}", wait);
                sleeper.sleep(wait).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testing::RecordingSleep;
    use std::cell::Cell;

    fn flaky(failures: u32, calls: &Cell<u32>) -> Result<&'static str> {
        calls.set(calls.get() + 1);
        if calls.get() <= failures {
            Err(Error::Other("connection reset".to_string()))
        } else {
            Ok("ok")
        }
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(2));
        assert_eq!(policy.backoff(2), Duration::from_secs(4));
        assert_eq!(policy.backoff(3), Duration::from_secs(8));
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let sleeper = RecordingSleep::default();
        let calls = &Cell::new(0);

        let result = with_backoff(&RetryPolicy::default(), &sleeper, "bulbasaur", move || async move {
            flaky(2, calls)
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.get(), 3);
        assert_eq!(
            sleeper.sleeps(),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[tokio::test]
    async fn test_fails_after_max_attempts() {
        let sleeper = RecordingSleep::default();
        let calls = &Cell::new(0);

        let result = with_backoff(&RetryPolicy::default(), &sleeper, "bulbasaur", move || async move {
            flaky(3, calls)
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.get(), 3);
        assert_eq!(sleeper.sleeps().len(), 2);
    }

    #[tokio::test]
    async fn test_no_wait_on_first_success() {
        let sleeper = RecordingSleep::default();
        let calls = &Cell::new(0);

        let result = with_backoff(&RetryPolicy::default(), &sleeper, "mew", move || async move {
            flaky(0, calls)
        })
        .await;

        assert!(result.is_ok());
        assert!(sleeper.sleeps().is_empty());
    }
}
