//! Metadata client for the external enrichment providers.
//!
//! This crate fetches display data for catalog titles. It handles:
//! - The provider contracts (`MetadataProvider`, `TrailerProvider`)
//! - HTTP implementations against OMDb and the YouTube Data API
//! - A 24 hour TTL cache that turns every provider failure into a
//!   placeholder, so callers never see an error
//!
//! ## Example Usage
//! ```ignore
//! use metadata_client::{MetadataCache, OmdbProvider, ProviderConfig, YouTubeProvider};
//! use std::sync::Arc;
//!
//! let omdb = OmdbProvider::new(ProviderConfig::new(OMDB_DEFAULT_URL, Some(key)))?;
//! let youtube = YouTubeProvider::new(ProviderConfig::new(YOUTUBE_DEFAULT_URL, Some(key)))?;
//! let cache = MetadataCache::new(Arc::new(omdb), Arc::new(youtube));
//!
//! if cache.is_valid_poster("Inception").await {
//!     println!("{}", cache.get("Inception").await.poster);
//! }
//! ```

pub mod error;
pub mod types;
pub mod provider;
pub mod omdb;
pub mod youtube;
pub mod cache;

pub use error::{ProviderError, ProviderResult};
pub use types::{MetadataRecord, TrailerRef, NOT_AVAILABLE, PLACEHOLDER_POSTER};
pub use provider::{MetadataProvider, ProviderConfig, TrailerProvider, DEFAULT_TIMEOUT};
pub use omdb::{OmdbProvider, OMDB_DEFAULT_URL};
pub use youtube::{YouTubeProvider, YOUTUBE_DEFAULT_URL};
pub use cache::{MetadataCache, DEFAULT_TTL};
