//! CRAG configuration types

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::action::{CragAction, classify};
use crate::domain::DomainError;
use crate::domain::call_policy::{CallPolicy, RetryConfig};

/// Configuration for the corrective-retrieval engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CragConfig {
    /// Any document scoring above this makes the run `correct`
    #[serde(default = "default_upper_threshold")]
    pub upper_threshold: f32,
    /// All documents scoring below this makes the run `incorrect`
    #[serde(default = "default_lower_threshold")]
    pub lower_threshold: f32,
    /// Strips must score strictly above this to survive refinement
    #[serde(default)]
    pub strip_threshold: f32,
    /// Documents requested from the retriever
    #[serde(default = "default_k")]
    pub retriever_k: usize,
    /// Results requested from the web searcher
    #[serde(default = "default_k")]
    pub search_k: usize,
    /// Concurrent scoring calls within one step
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Timeout for a single outbound call
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_upper_threshold() -> f32 {
    0.5
}

fn default_lower_threshold() -> f32 {
    -0.5
}

fn default_k() -> usize {
    5
}

fn default_max_concurrency() -> usize {
    4
}

fn default_call_timeout_ms() -> u64 {
    30_000
}

impl Default for CragConfig {
    fn default() -> Self {
        Self {
            upper_threshold: default_upper_threshold(),
            lower_threshold: default_lower_threshold(),
            strip_threshold: 0.0,
            retriever_k: default_k(),
            search_k: default_k(),
            max_concurrency: default_max_concurrency(),
            call_timeout_ms: default_call_timeout_ms(),
            retry: RetryConfig::default(),
        }
    }
}

impl CragConfig {
    /// Create a new CRAG configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both classification thresholds
    pub fn with_thresholds(mut self, upper: f32, lower: f32) -> Self {
        self.upper_threshold = upper;
        self.lower_threshold = lower;
        self
    }

    pub fn with_strip_threshold(mut self, threshold: f32) -> Self {
        self.strip_threshold = threshold;
        self
    }

    pub fn with_retriever_k(mut self, k: usize) -> Self {
        self.retriever_k = k;
        self
    }

    pub fn with_search_k(mut self, k: usize) -> Self {
        self.search_k = k;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_call_timeout_ms(mut self, ms: u64) -> Self {
        self.call_timeout_ms = ms;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Classify per-document scores with the configured thresholds
    pub fn classify(&self, scores: &[f32]) -> CragAction {
        classify(scores, self.upper_threshold, self.lower_threshold)
    }

    /// Build the timeout/retry policy for outbound calls
    pub fn call_policy(&self) -> CallPolicy {
        CallPolicy::new(Duration::from_millis(self.call_timeout_ms), self.retry.clone())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), DomainError> {
        for (name, value) in [
            ("upper_threshold", self.upper_threshold),
            ("lower_threshold", self.lower_threshold),
            ("strip_threshold", self.strip_threshold),
        ] {
            if !value.is_finite() {
                return Err(DomainError::configuration(format!(
                    "crag.{} must be a finite number",
                    name
                )));
            }
        }

        if self.upper_threshold < self.lower_threshold {
            return Err(DomainError::configuration(format!(
                "crag.upper_threshold ({}) must not be below crag.lower_threshold ({})",
                self.upper_threshold, self.lower_threshold
            )));
        }

        if self.max_concurrency == 0 {
            return Err(DomainError::configuration(
                "crag.max_concurrency must be at least 1",
            ));
        }

        if self.call_timeout_ms == 0 {
            return Err(DomainError::configuration(
                "crag.call_timeout_ms must be at least 1",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CragConfig::default();

        assert_eq!(config.upper_threshold, 0.5);
        assert_eq!(config.lower_threshold, -0.5);
        assert_eq!(config.strip_threshold, 0.0);
        assert_eq!(config.retriever_k, 5);
        assert_eq!(config.search_k, 5);
        assert_eq!(config.max_concurrency, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_classify_uses_configured_thresholds() {
        let config = CragConfig::new().with_thresholds(0.9, -0.9);

        assert_eq!(config.classify(&[0.8]), CragAction::Ambiguous);
        assert_eq!(config.classify(&[0.95]), CragAction::Correct);
        assert_eq!(config.classify(&[-0.95]), CragAction::Incorrect);
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let config = CragConfig::new().with_thresholds(-0.5, 0.5);
        assert!(matches!(
            config.validate(),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_threshold() {
        let config = CragConfig::new().with_thresholds(f32::NAN, -0.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let config = CragConfig::new().with_max_concurrency(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_with_partial_fields() {
        let json = r#"{"upper_threshold": 0.7, "retriever_k": 3}"#;
        let config: CragConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.upper_threshold, 0.7);
        assert_eq!(config.lower_threshold, -0.5);
        assert_eq!(config.retriever_k, 3);
        assert_eq!(config.retry.max_retries, 2);
    }

    #[test]
    fn test_call_policy_uses_timeout() {
        let config = CragConfig::new().with_call_timeout_ms(1500);
        assert_eq!(config.call_policy().timeout(), Duration::from_millis(1500));
    }
}
