//! Retry with exponential backoff.
//!
//! One policy shared by every gatherer: up to 3 attempts, 2s initial delay
//! doubling per retry, capped at 30s. Delays are real wall-clock sleeps;
//! there is no cancellation once a retry loop starts.

use std::future::Future;
use std::time::Duration;

use tracing::{error, warn};

use super::error::FetchError;

/// Backoff parameters for retried external calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub initial_delay: Duration,

    /// Ceiling on the doubled delay.
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Run `op` under the retry policy.
///
/// Retries only errors [`FetchError::is_retryable`] says to retry: HTTP
/// 429/500/502/503/504, timeouts and connection failures. Rate limiting
/// follows the same doubling schedule but is logged distinctly. After the
/// final attempt the last error is returned; converting it into a
/// structured failure result is the caller's job.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    what: &str,
    mut op: F,
) -> Result<T, FetchError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut delay = policy.initial_delay;
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < policy.max_attempts && err.is_retryable() => {
                if err.is_rate_limited() {
                    warn!("{what}: rate limited (429), waiting {delay:?} before retry");
                } else {
                    warn!("{what}: attempt {attempt} failed ({err}), retrying in {delay:?}");
                }
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(policy.max_delay);
                attempt += 1;
            }
            Err(err) => {
                error!("{what}: giving up after {attempt} attempt(s): {err}");
                return Err(err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn succeeds_after_two_server_errors() {
        let calls = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result = retry_with_backoff(&RetryPolicy::default(), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(FetchError::Status(503))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 2s before the second attempt, 4s before the third, no delay
        // after success.
        assert_eq!(start.elapsed(), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn rate_limiting_uses_the_same_schedule() {
        let calls = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result = retry_with_backoff(&RetryPolicy::default(), "test", || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 1 {
                    Err(FetchError::Status(429))
                } else {
                    Ok("ok")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(start.elapsed(), Duration::from_secs(2));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_attempts_and_returns_last_error() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = retry_with_backoff(&RetryPolicy::default(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::Timeout) }
        })
        .await;

        assert!(matches!(result, Err(FetchError::Timeout)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_error_fails_immediately() {
        let calls = AtomicU32::new(0);

        let result: Result<(), _> = retry_with_backoff(&RetryPolicy::default(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::Status(404)) }
        })
        .await;

        assert!(matches!(result, Err(FetchError::Status(404))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_delay: Duration::from_secs(20),
            max_delay: Duration::from_secs(30),
        };
        let calls = AtomicU32::new(0);
        let start = tokio::time::Instant::now();

        let result: Result<(), _> = retry_with_backoff(&policy, "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::Status(500)) }
        })
        .await;

        assert!(result.is_err());
        // 20 + 30 + 30 + 30: doubling would give 40 on the second retry
        // but the cap holds it at 30.
        assert_eq!(start.elapsed(), Duration::from_secs(110));
    }
}
