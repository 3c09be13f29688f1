//! Enrichment data fetched per title.

use serde::{Deserialize, Serialize};

/// Value used for every field the provider could not supply
pub const NOT_AVAILABLE: &str = "N/A";

/// Poster shown when there is no real one
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/500x750?text=No+Poster";

/// Display metadata for one title.
///
/// Either a full provider response or the complete sentinel from
/// `MetadataRecord::unavailable`, never a mix of both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub poster: String,
    pub plot: String,
    pub rating: String,
    pub director: String,
    pub year: String,
    pub runtime: String,
    pub actors: String,
    pub genre: String,
}

impl MetadataRecord {
    /// The sentinel record substituted when a fetch fails
    pub fn unavailable() -> Self {
        Self {
            poster: PLACEHOLDER_POSTER.to_string(),
            plot: NOT_AVAILABLE.to_string(),
            rating: NOT_AVAILABLE.to_string(),
            director: NOT_AVAILABLE.to_string(),
            year: NOT_AVAILABLE.to_string(),
            runtime: NOT_AVAILABLE.to_string(),
            actors: NOT_AVAILABLE.to_string(),
            genre: NOT_AVAILABLE.to_string(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        *self == Self::unavailable()
    }

    /// True when `poster` points at a real image
    pub fn has_poster(&self) -> bool {
        let poster = self.poster.trim();
        !poster.is_empty() && poster != NOT_AVAILABLE && poster != PLACEHOLDER_POSTER
    }
}

impl Default for MetadataRecord {
    fn default() -> Self {
        Self::unavailable()
    }
}

/// A trailer video found for a title
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrailerRef {
    pub video_id: String,
}

impl TrailerRef {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
        }
    }

    /// Link to watch the trailer
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}
