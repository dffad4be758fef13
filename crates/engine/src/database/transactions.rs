//! Retry configuration for client-side CAS loops
//!
//! The engine itself never retries: an ABORT is returned to the caller with
//! the current state of every failed precondition. Callers that loop on
//! conflict describe how long to keep going with a [`RetryConfig`].

use std::time::Duration;

/// Configuration for CAS retry behavior
///
/// The default retries forever without delay, which is what a contended
/// counter needs to make progress without lost updates.
///
/// # Example
/// ```
/// use gotthard_engine::RetryConfig;
///
/// let config = RetryConfig::new()
///     .with_max_attempts(5)
///     .with_base_delay_ms(1)
///     .with_max_delay_ms(20);
/// assert!(config.is_exhausted(5));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first (None = unbounded)
    pub max_attempts: Option<u32>,
    /// Base delay between attempts in milliseconds (exponential backoff, 0 = none)
    pub base_delay_ms: u64,
    /// Maximum delay between attempts in milliseconds
    pub max_delay_ms: u64,
}

impl RetryConfig {
    /// Create a RetryConfig with default values (unbounded, no delay)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a RetryConfig that gives up after the first conflict
    pub fn no_retry() -> Self {
        Self::default().with_max_attempts(1)
    }

    /// Cap the number of attempts
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts.max(1));
        self
    }

    /// Set base delay for exponential backoff
    pub fn with_base_delay_ms(mut self, base_delay_ms: u64) -> Self {
        self.base_delay_ms = base_delay_ms;
        self
    }

    /// Set maximum delay between attempts
    pub fn with_max_delay_ms(mut self, max_delay_ms: u64) -> Self {
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// True once `attempts` attempts have been made and no more are allowed
    pub fn is_exhausted(&self, attempts: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempts >= max)
    }

    /// Calculate delay after a given failed attempt (exponential backoff)
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        // Cap the shift to prevent overflow (1 << 63 is the max for u64)
        let shift = attempt.min(63);
        let multiplier = 1u64 << shift;
        let delay_ms = self.base_delay_ms.saturating_mul(multiplier);
        Duration::from_millis(delay_ms.min(self.max_delay_ms))
    }
}
