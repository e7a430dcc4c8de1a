//! Error types for the recommender seams

use thiserror::Error;

/// Failures from a single video provider call.
///
/// None of these are fatal to a recommendation request; the orchestrator
/// treats every variant as "zero results for this query".
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Video provider is not configured (missing API key)")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider quota exhausted or rate limited ({status}): {body}")]
    Quota { status: u16, body: String },

    #[error("Provider API error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed provider response: {0}")]
    Decode(String),
}

impl ProviderError {
    /// Network, timeout, quota and server-side failures may succeed on a later request
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::NotConfigured => false,
            ProviderError::Http(_) | ProviderError::Quota { .. } => true,
            ProviderError::Status { status, .. } => *status >= 500,
            ProviderError::Decode(_) => false,
        }
    }
}

/// Configuration loading and validation failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ProviderError::Quota { status: 403, body: String::new() }.is_transient());
        assert!(ProviderError::Status { status: 503, body: String::new() }.is_transient());
        assert!(!ProviderError::Status { status: 400, body: String::new() }.is_transient());
        assert!(!ProviderError::NotConfigured.is_transient());
    }
}
