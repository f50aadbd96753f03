//! Retry with exponential backoff for transient provider failures.
//!
//! Only [`WeatherError::Provider`] is retried. `NotFound` and
//! `MalformedPayload` are returned on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::WeatherError;

pub const DEFAULT_MAX_RETRIES: u32 = 2;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each following one.
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// No waiting between attempts.
    pub fn immediate(max_retries: u32) -> Self {
        Self::new(max_retries, 0, 0)
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay.as_millis() as u64))
    }
}

/// Run `operation` until it succeeds, fails permanently, or the policy is exhausted.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, label: &str, mut operation: F) -> Result<T, WeatherError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, WeatherError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    tracing::info!("{label} succeeded after {attempt} retries");
                }
                return Ok(value);
            }
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                let delay = policy.delay_for_attempt(attempt);
                attempt += 1;
                tracing::warn!(
                    "{label} failed (attempt {attempt} of {}): {err}; retrying in {delay:?}",
                    policy.max_retries + 1
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => {
                if err.is_transient() {
                    tracing::error!("{label} failed after {} attempts: {err}", attempt + 1);
                } else {
                    tracing::debug!("{label} failed permanently: {err}");
                }
                return Err(err);
            }
        }
    }
}
