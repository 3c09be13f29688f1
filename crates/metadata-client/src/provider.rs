//! Provider contracts and shared connection settings.

use crate::error::ProviderResult;
use crate::types::{MetadataRecord, TrailerRef};
use std::time::Duration;

/// Timeout applied to every provider request
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Source of per-title display metadata (poster, plot, rating, ...)
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the full record for `title`
    async fn fetch_details(&self, title: &str) -> ProviderResult<MetadataRecord>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Source of trailer videos
#[async_trait::async_trait]
pub trait TrailerProvider: Send + Sync {
    /// Search for the official trailer of `title`. `Ok(None)` means no result.
    async fn search_trailer(&self, title: &str) -> ProviderResult<Option<TrailerRef>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Connection settings for one HTTP provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Without a key every request fails (and the cache serves sentinels)
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(crate) fn http_client(&self) -> ProviderResult<reqwest::Client> {
        Ok(reqwest::Client::builder().timeout(self.timeout).build()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_api_key_is_none() {
        let config = ProviderConfig::new("https://example.com", Some("  ".to_string()));
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_with_timeout() {
        let config = ProviderConfig::new("https://example.com", Some("key".to_string()))
            .with_timeout(Duration::from_secs(1));
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.timeout, Duration::from_secs(1));
    }
}
