//! Error types for the rule-control API.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleApiError {
    /// Network connectivity error (DNS, connection refused, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded deadline.
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// Control plane answered with a non-2xx status.
    #[error("Rule API error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Response body did not carry a rule status.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client could not be built from configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RuleApiError {
    pub(crate) fn from_reqwest(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            RuleApiError::Timeout(timeout_ms)
        } else if e.is_decode() {
            RuleApiError::InvalidResponse(e.to_string())
        } else {
            RuleApiError::Network(e.to_string())
        }
    }
}
