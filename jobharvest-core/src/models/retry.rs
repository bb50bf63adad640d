//! Retry policy types.
//!
//! A [`RetryPolicy`] is immutable configuration attached to a call
//! site. The predicate is declarative (a network-error flag plus a set
//! of retryable HTTP status codes) so retry behavior stays data-driven
//! and serializable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

use crate::error::ProviderError;

// ============================================================================
// Retry Predicate
// ============================================================================

/// Declarative classification of retryable provider errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPredicate {
    /// Retry transport-layer failures (no response received).
    pub network_errors: bool,
    /// Retry these HTTP status codes.
    pub status_codes: BTreeSet<u16>,
}

impl RetryPredicate {
    /// Returns true if the given error should be retried.
    pub fn should_retry(&self, error: &ProviderError) -> bool {
        if self.network_errors && error.is_network() {
            return true;
        }
        match error.status() {
            Some(status) => self.status_codes.contains(&status),
            None => false,
        }
    }
}

impl Default for RetryPredicate {
    /// Network errors plus 429 and the transient 5xx family.
    fn default() -> Self {
        Self {
            network_errors: true,
            status_codes: [429, 500, 502, 503, 504].into_iter().collect(),
        }
    }
}

// ============================================================================
// Retry Policy
// ============================================================================

/// Bounded-retry configuration with exponential backoff.
///
/// `max_attempts` counts *retries*: the operation is attempted at most
/// `max_attempts + 1` times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Number of retries after the first attempt.
    pub max_attempts: u32,
    /// Delay before the first retry, in milliseconds. Must be > 0.
    pub initial_delay_ms: u64,
    /// Upper bound on any computed delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier applied per retry. Must be > 1.
    pub backoff_factor: f64,
    /// Perturb each delay by ±20% to avoid synchronized retry storms.
    pub jitter: bool,
    /// Which errors are worth retrying.
    #[serde(default)]
    pub predicate: RetryPredicate,
}

impl RetryPolicy {
    /// Creates a policy with the given retry count and default timing.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }

    /// Disables retries entirely.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 0,
            ..Self::default()
        }
    }

    /// Sets the initial delay.
    pub fn with_initial_delay_ms(mut self, ms: u64) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    /// Sets the delay cap.
    pub fn with_max_delay_ms(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    /// Sets the backoff factor.
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor;
        self
    }

    /// Enables or disables jitter.
    pub fn with_jitter(mut self, enabled: bool) -> Self {
        self.jitter = enabled;
        self
    }

    /// Base delay before retry `attempt` (1-indexed), without jitter:
    /// `min(max_delay, initial_delay * backoff_factor^(attempt-1))`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let scaled = self.initial_delay_ms as f64 * self.backoff_factor.powi(exponent);
        let capped = scaled.min(self.max_delay_ms as f64).max(0.0);
        Duration::from_millis(capped as u64)
    }

    /// Delay before retry `attempt`, with jitter applied when enabled.
    pub fn jittered_delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.delay_for_attempt(attempt);
        if !self.jitter {
            return base;
        }
        let factor = rand_jitter_factor();
        let ms = (base.as_millis() as f64 * factor).max(0.0);
        Duration::from_millis(ms as u64)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1_000,
            max_delay_ms: 30_000,
            backoff_factor: 2.0,
            jitter: true,
            predicate: RetryPredicate::default(),
        }
    }
}

/// Uniform jitter factor in [0.8, 1.2].
fn rand_jitter_factor() -> f64 {
    use rand::Rng;
    rand::thread_rng().gen_range(0.8..=1.2)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_sequence_capped() {
        let policy = RetryPolicy::new(5)
            .with_initial_delay_ms(10)
            .with_backoff_factor(2.0)
            .with_max_delay_ms(30)
            .with_jitter(false);

        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(10));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(20));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_millis(30));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(30));
    }

    #[test]
    fn test_jitter_stays_within_bounds() {
        let policy = RetryPolicy::new(3)
            .with_initial_delay_ms(100)
            .with_backoff_factor(2.0)
            .with_max_delay_ms(1_000)
            .with_jitter(true);

        for _ in 0..50 {
            let delay = policy.jittered_delay_for_attempt(1).as_millis() as f64;
            assert!((80.0..=120.0).contains(&delay), "delay {delay} out of bounds");
        }
    }

    #[test]
    fn test_default_predicate_matches_transients() {
        let predicate = RetryPredicate::default();

        assert!(predicate.should_retry(&ProviderError::Network("reset".to_string())));
        for status in [429, 500, 502, 503, 504] {
            let err = ProviderError::Http {
                status,
                message: String::new(),
            };
            assert!(predicate.should_retry(&err), "status {status} should retry");
        }
    }

    #[test]
    fn test_default_predicate_rejects_permanent() {
        let predicate = RetryPredicate::default();

        let bad_request = ProviderError::Http {
            status: 400,
            message: "bad request".to_string(),
        };
        assert!(!predicate.should_retry(&bad_request));
        assert!(!predicate.should_retry(&ProviderError::InvalidResponse("garbage".to_string())));
        assert!(!predicate.should_retry(&ProviderError::Other("misconfigured".to_string())));
    }

    #[test]
    fn test_policy_serializes() {
        let policy = RetryPolicy::default();
        let json = serde_json::to_string(&policy).unwrap();
        let back: RetryPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_attempts, policy.max_attempts);
        assert_eq!(back.predicate, policy.predicate);
    }
}
