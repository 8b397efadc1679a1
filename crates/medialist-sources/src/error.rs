use std::time::Duration;
use thiserror::Error;

/// Failures talking to an external metadata provider
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request to {provider} failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("could not decode {provider} response: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} did not answer within {timeout:?}")]
    Timeout {
        provider: String,
        timeout: Duration,
    },

    #[error("metadata provider is not configured: {0}")]
    NotConfigured(String),
}

impl ProviderError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Timeout { .. })
    }
}
