//! Timeout and retry policy applied to every outbound collaborator call

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::DomainError;

/// Retry configuration for provider calls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay before first retry
    pub initial_delay_ms: u64,
    /// Maximum delay between retries
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_delay_ms: 100,
            max_delay_ms: 2000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// No retries at all
    pub fn disabled() -> Self {
        Self::new(0)
    }

    pub fn with_initial_delay(mut self, ms: u64) -> Self {
        self.initial_delay_ms = ms;
        self
    }

    /// Calculate delay for a given attempt number (0-indexed)
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_millis(self.initial_delay_ms.min(self.max_delay_ms));
        }

        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(attempt as i32);
        let delay_ms = delay.min(self.max_delay_ms as f64) as u64;

        Duration::from_millis(delay_ms)
    }
}

/// Per-call timeout plus bounded retry
#[derive(Debug, Clone)]
pub struct CallPolicy {
    timeout: Duration,
    retry: RetryConfig,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(30), RetryConfig::default())
    }
}

impl CallPolicy {
    pub fn new(timeout: Duration, retry: RetryConfig) -> Self {
        Self { timeout, retry }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `call` until it succeeds, fails permanently, or retries are exhausted.
    ///
    /// Each attempt is bounded by the policy timeout; an elapsed attempt becomes
    /// `DomainError::Timeout` and counts as transient.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, DomainError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let mut attempt = 0;

        loop {
            let outcome = match tokio::time::timeout(self.timeout, call()).await {
                Ok(result) => result,
                Err(_) => Err(DomainError::timeout(
                    operation,
                    self.timeout.as_millis() as u64,
                )),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.retry.max_retries => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    debug!(
                        operation,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying call"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
