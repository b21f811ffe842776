//! Bounded retry for store calls
//!
//! Transient failures are retried a fixed number of times with a capped
//! Fibonacci backoff. Permanent failures, not-found included, return on the
//! first attempt. Every attempt is bounded by the per-attempt timeout and by
//! the caller's deadline, whichever is sooner.

use crate::backoff::FibonacciBackoff;
use crate::error::StoreError;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

/// Retry budget for store calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// First (and second) backoff
    pub min_backoff: Duration,
    /// Backoff cap
    pub max_backoff: Duration,
    /// Time budget of a single attempt
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_backoff: Duration::from_millis(50),
            max_backoff: Duration::from_millis(400),
            attempt_timeout: Duration::from_secs(5),
        }
    }
}

/// Run `op` until it succeeds, fails permanently, or the budget runs out
///
/// `operation` names the call in logs and timeout errors. When the next
/// backoff would end past `deadline`, the last error is returned instead of
/// sleeping.
pub async fn retry<T, F, Fut>(
    policy: &RetryPolicy,
    deadline: Option<Instant>,
    operation: &str,
    mut op: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut backoff = FibonacciBackoff::new(policy.min_backoff, policy.max_backoff);
    let mut attempt = 1;

    loop {
        let budget = match deadline {
            Some(deadline) => policy
                .attempt_timeout
                .min(deadline.saturating_duration_since(Instant::now())),
            None => policy.attempt_timeout,
        };

        let err = match tokio::time::timeout(budget, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) => e,
            Err(_elapsed) => StoreError::Timeout {
                operation: operation.to_string(),
                after: budget,
            },
        };

        if !err.is_transient() || attempt >= max_attempts {
            return Err(err);
        }

        let delay = backoff.next_backoff();
        if let Some(deadline) = deadline {
            if Instant::now() + delay >= deadline {
                warn!("{} failed and deadline leaves no room to retry: {}", operation, err);
                return Err(err);
            }
        }

        warn!(
            "{} failed (attempt {}/{}), retrying in {:?}: {}",
            operation, attempt, max_attempts, delay, err
        );
        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            min_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            attempt_timeout: Duration::from_secs(1),
        }
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result = retry(&fast_policy(3), None, "list NetworkPools", || {
            let counter = Arc::clone(&counter);
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(StoreError::Unavailable("connection refused".to_string()))
                } else {
                    Ok(7)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), _> = retry(&fast_policy(3), None, "list Releases", || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(StoreError::Unavailable("connection refused".to_string()))
            }
        })
        .await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result: Result<(), _> = retry(&fast_policy(3), None, "get Cluster", || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(StoreError::NotFound("Cluster org-acme/demo".to_string()))
            }
        })
        .await;

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_slow_attempt_times_out() {
        let policy = RetryPolicy {
            max_attempts: 1,
            attempt_timeout: Duration::from_millis(10),
            ..fast_policy(1)
        };

        let result: Result<(), _> = retry(&policy, None, "list NetworkPools", || async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, StoreError::Timeout { .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_deadline_stops_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let policy = RetryPolicy {
            max_attempts: 10,
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(1),
            attempt_timeout: Duration::from_secs(1),
        };
        let deadline = Instant::now() + Duration::from_millis(100);

        let result: Result<(), _> = retry(&policy, Some(deadline), "list Releases", || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err(StoreError::Unavailable("connection refused".to_string()))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
