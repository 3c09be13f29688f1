//! OMDb details provider.
//!
//! API Flow:
//! `GET {base_url}?apikey=..&t=<title>&plot=full` returns one JSON object
//! with capitalized field names. A lookup miss is still HTTP 200 but carries
//! `"Response": "False"` and an `Error` message.

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{MetadataProvider, ProviderConfig};
use crate::types::{MetadataRecord, NOT_AVAILABLE, PLACEHOLDER_POSTER};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::{debug, instrument};

pub const OMDB_DEFAULT_URL: &str = "https://www.omdbapi.com/";

const PROVIDER: &str = "OMDb";

/// Raw OMDb lookup response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbResponse {
    response: String,
    error: Option<String>,
    poster: Option<String>,
    plot: Option<String>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<String>,
    director: Option<String>,
    year: Option<String>,
    runtime: Option<String>,
    actors: Option<String>,
    genre: Option<String>,
}

impl OmdbResponse {
    /// Convert to a record; a `"False"` response is a not-found error.
    fn into_record(self, title: &str) -> ProviderResult<MetadataRecord> {
        if !self.response.eq_ignore_ascii_case("true") {
            return Err(ProviderError::NotFound {
                provider: PROVIDER,
                title: title.to_string(),
                reason: self.error.unwrap_or_else(|| "no reason given".to_string()),
            });
        }

        let field = |value: Option<String>| {
            value
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string())
        };
        let poster = match self.poster {
            Some(poster) if !poster.trim().is_empty() && poster != NOT_AVAILABLE => poster,
            _ => PLACEHOLDER_POSTER.to_string(),
        };

        Ok(MetadataRecord {
            poster,
            plot: field(self.plot),
            rating: field(self.imdb_rating),
            director: field(self.director),
            year: field(self.year),
            runtime: field(self.runtime),
            actors: field(self.actors),
            genre: field(self.genre),
        })
    }
}

/// Title lookups against the OMDb API
#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl OmdbProvider {
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        Ok(Self {
            http_client: config.http_client()?,
            api_key: config.api_key,
            api_url: config.base_url,
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbProvider {
    #[instrument(skip(self))]
    async fn fetch_details(&self, title: &str) -> ProviderResult<MetadataRecord> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey { provider: PROVIDER })?;

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("apikey", api_key), ("t", title), ("plot", "full")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                provider: PROVIDER,
                status: response.status().as_u16(),
            });
        }

        let body: OmdbResponse = response.json().await?;
        let record = body.into_record(title)?;
        debug!("Fetched details for '{}'", title);
        Ok(record)
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> OmdbResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_full_response() {
        let record = parse(
            r#"{
                "Title": "Inception", "Year": "2010", "Runtime": "148 min",
                "Genre": "Action, Adventure, Sci-Fi", "Director": "Christopher Nolan",
                "Actors": "Leonardo DiCaprio, Joseph Gordon-Levitt",
                "Plot": "A thief who steals corporate secrets...",
                "Poster": "https://m.media-amazon.com/images/M/inception.jpg",
                "imdbRating": "8.8", "Response": "True"
            }"#,
        )
        .into_record("Inception")
        .unwrap();

        assert_eq!(record.year, "2010");
        assert_eq!(record.rating, "8.8");
        assert_eq!(record.director, "Christopher Nolan");
        assert!(record.has_poster());
    }

    #[test]
    fn test_missing_fields_become_not_available() {
        let record = parse(r#"{"Response": "True", "Poster": "N/A", "Year": "1999"}"#)
            .into_record("Obscure")
            .unwrap();

        assert_eq!(record.poster, PLACEHOLDER_POSTER);
        assert_eq!(record.year, "1999");
        assert_eq!(record.plot, NOT_AVAILABLE);
        assert_eq!(record.actors, NOT_AVAILABLE);
        assert!(!record.has_poster());
    }

    #[test]
    fn test_false_response_is_not_found() {
        let err = parse(r#"{"Response": "False", "Error": "Movie not found!"}"#)
            .into_record("Nope")
            .unwrap_err();

        assert!(matches!(err, ProviderError::NotFound { ref reason, .. } if reason == "Movie not found!"));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_request() {
        let provider = OmdbProvider::new(ProviderConfig::new("http://127.0.0.1:9", None)).unwrap();
        let err = provider.fetch_details("Inception").await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey { .. }));
    }
}
