//! YouTube trailer-search provider.
//!
//! API Flow:
//! `GET {base_url}/search?part=snippet&q=<title> official trailer&type=video&maxResults=1&key=..`
//! The first result's `id.videoId` is the trailer.

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{ProviderConfig, TrailerProvider};
use crate::types::TrailerRef;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::{debug, instrument};

pub const YOUTUBE_DEFAULT_URL: &str = "https://www.googleapis.com/youtube/v3";

const PROVIDER: &str = "YouTube";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

impl SearchResponse {
    fn first_trailer(self) -> Option<TrailerRef> {
        self.items
            .into_iter()
            .next()
            .and_then(|item| item.id.video_id)
            .filter(|id| !id.is_empty())
            .map(TrailerRef::new)
    }
}

/// Search query sent for a title
pub fn trailer_query(title: &str) -> String {
    format!("{} official trailer", title)
}

/// Trailer search against the YouTube Data API
#[derive(Clone)]
pub struct YouTubeProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl YouTubeProvider {
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        Ok(Self {
            http_client: config.http_client()?,
            api_key: config.api_key,
            api_url: config.base_url,
        })
    }
}

#[async_trait::async_trait]
impl TrailerProvider for YouTubeProvider {
    #[instrument(skip(self))]
    async fn search_trailer(&self, title: &str) -> ProviderResult<Option<TrailerRef>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey { provider: PROVIDER })?;

        let url = format!("{}/search", self.api_url.trim_end_matches('/'));
        let query = trailer_query(title);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("q", query.as_str()),
                ("key", api_key),
                ("maxResults", "1"),
                ("type", "video"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let body: SearchResponse = response.json().await?;
        let trailer = body.first_trailer();
        debug!("Trailer search for '{}' found: {:?}", title, trailer);
        Ok(trailer)
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}
