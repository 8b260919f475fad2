use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Timeout: {operation} did not complete within {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A caller broke an interface contract (mismatched inputs, illegal transition)
    #[error("Contract violation: {message}")]
    Contract { message: String },

    #[error("Run cancelled")]
    Cancelled,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether another attempt at the same call could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Provider { .. } | Self::Timeout { .. } | Self::Validation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Document 'doc-1' not found");
        assert_eq!(error.to_string(), "Not found: Document 'doc-1' not found");
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("Invalid input");
        assert_eq!(error.to_string(), "Validation error: Invalid input");
    }

    #[test]
    fn test_timeout_error() {
        let error = DomainError::timeout("web_search", 1500);
        assert_eq!(
            error.to_string(),
            "Timeout: web_search did not complete within 1500ms"
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(DomainError::provider("openai", "503").is_transient());
        assert!(DomainError::timeout("scoring", 10).is_transient());
        assert!(DomainError::validation("score out of range").is_transient());

        assert!(!DomainError::contract("length mismatch").is_transient());
        assert!(!DomainError::configuration("missing key").is_transient());
        assert!(!DomainError::Cancelled.is_transient());
    }
}
