//! Error types for completion providers

use thiserror::Error;

/// Errors that can occur when talking to a completion service
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    /// Credential absent or rejected (never includes key details)
    #[error("Authentication failed")]
    Auth,

    /// Throttled by the service; retry-after seconds when the service said
    #[error("Rate limited by the completion service")]
    RateLimited(Option<u64>),

    /// Request exceeded the configured timeout
    #[error("Completion request timed out")]
    Timeout,

    /// Network or protocol fault below the API layer
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("Completion service error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Locally malformed generation parameters, rejected before dispatch
    #[error("Invalid generation parameters: {0}")]
    InvalidParams(String),

    /// The service answered with a body we cannot interpret
    #[error("Invalid response from completion service: {0}")]
    InvalidResponse(String),

    /// Client misconfiguration
    #[error("Provider configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}
