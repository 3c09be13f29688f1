//! Errors raised by the metadata providers.
//!
//! None of these reach the ranking code: `MetadataCache` turns every one of
//! them into a sentinel record or a missing trailer.

use thiserror::Error;

/// Errors that can occur when calling an external metadata provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport failure, timeout, or a body that is not the expected JSON
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status code
    #[error("{provider} returned status {status}")]
    Status { provider: &'static str, status: u16 },

    /// The provider explicitly reported that it has no such title
    #[error("{provider} has no entry for '{title}': {reason}")]
    NotFound {
        provider: &'static str,
        title: String,
        reason: String,
    },

    /// No API key was configured for the provider
    #[error("No API key configured for {provider}")]
    MissingApiKey { provider: &'static str },

    /// The response parsed but did not contain what we need
    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse {
        provider: &'static str,
        reason: String,
    },
}

/// Convenience type alias for provider results
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
