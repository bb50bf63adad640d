//! Core error types for `JobHarvest`.

use thiserror::Error;

/// Core error type for `JobHarvest` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Provider not found or not configured.
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid data from a provider response.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

/// Error returned by a single provider invocation.
///
/// The shape is deliberately classifiable: the retry predicate decides
/// whether to retry based on the variant and the carried HTTP status,
/// without inspecting provider-specific details.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport-layer failure: connection refused, DNS, timeout.
    /// No HTTP response was received at all.
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or status text.
        message: String,
    },

    /// The provider answered but the payload could not be understood.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Anything else (misconfiguration, malformed request, ...).
    #[error("{0}")]
    Other(String),
}

impl ProviderError {
    /// Returns true for transport-layer failures without a response.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns the HTTP status code, if the provider answered with one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_classification() {
        let net = ProviderError::Network("connection refused".to_string());
        assert!(net.is_network());
        assert_eq!(net.status(), None);

        let http = ProviderError::Http {
            status: 429,
            message: "Too Many Requests".to_string(),
        };
        assert!(!http.is_network());
        assert_eq!(http.status(), Some(429));
    }
}
