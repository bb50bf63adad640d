//! Retry executor.
//!
//! Executes a single asynchronous operation with bounded retries,
//! exponential backoff, and optional jitter, per the attached
//! [`RetryPolicy`]. The executor owns no shared state; quota recording
//! and fallback decisions live with the orchestrator.

use std::future::Future;

use jobharvest_core::{ProviderError, RetryPolicy};
use tracing::{debug, warn};

/// Stateless executor for retryable operations.
pub struct RetryExecutor;

impl RetryExecutor {
    /// Runs `operation` up to `policy.max_attempts + 1` times.
    ///
    /// After a failing attempt the executor short-circuits when the
    /// attempt cap is reached or the policy's predicate declines the
    /// error; otherwise it sleeps for the backoff delay and retries.
    ///
    /// # Errors
    ///
    /// On exhaustion the *last* observed error is returned unmodified
    /// so callers can inspect provider-specific details.
    pub async fn execute<T, F, Fut>(
        policy: &RetryPolicy,
        mut operation: F,
    ) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        // attempt is 0-indexed; retries are 1-indexed for delays.
        for attempt in 0..=policy.max_attempts {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(attempt = attempt + 1, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if attempt >= policy.max_attempts {
                        warn!(
                            attempts = attempt + 1,
                            error = %error,
                            "Retries exhausted"
                        );
                        return Err(error);
                    }
                    if !policy.predicate.should_retry(&error) {
                        debug!(error = %error, "Error not retryable, giving up");
                        return Err(error);
                    }

                    let retry = attempt + 1;
                    let delay = policy.jittered_delay_for_attempt(retry);
                    debug!(
                        retry,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        unreachable!("retry loop always returns")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts)
            .with_initial_delay_ms(1)
            .with_max_delay_ms(2)
            .with_jitter(false)
    }

    fn retryable() -> ProviderError {
        ProviderError::Http {
            status: 503,
            message: "unavailable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_success_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = RetryExecutor::execute(&fast_policy(3), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(7) }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhaustion_invokes_exactly_max_plus_one() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = RetryExecutor::execute(&fast_policy(2), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(retryable()) }
        })
        .await;

        let error = result.unwrap_err();
        assert_eq!(error.status(), Some(503));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_short_circuits() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = RetryExecutor::execute(&fast_policy(5), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err(ProviderError::Http {
                    status: 400,
                    message: "bad request".to_string(),
                })
            }
        })
        .await;

        assert_eq!(result.unwrap_err().status(), Some(400));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<&str, _> = RetryExecutor::execute(&fast_policy(3), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(ProviderError::Network("reset by peer".to_string()))
                } else {
                    Ok("recovered")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "recovered");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_retries_single_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, _> = RetryExecutor::execute(&fast_policy(0), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(retryable()) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
