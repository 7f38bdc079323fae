//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider returned an error response
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable, not responding, or timed out
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Provider has no credentials configured
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// Provider reply could not be understood
    #[error("Parse error: {0}")]
    Parse(String),

    /// Provider returned an empty reply
    #[error("Empty completion from {0}")]
    EmptyCompletion(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl AgentError {
    /// Check if error is transient on the provider side
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AgentError::ProviderUnavailable(_) | AgentError::RateLimited(_)
        )
    }

    /// Map an HTTP status from a provider API onto the error taxonomy
    pub fn from_status(provider: &str, status: u16, body: &str) -> Self {
        let detail = format!("{provider} status {status}: {body}");
        match status {
            401 | 403 => AgentError::Auth(detail),
            429 => AgentError::RateLimited(detail),
            500..=599 => AgentError::ProviderUnavailable(detail),
            _ => AgentError::Provider(detail),
        }
    }
}
