//! Errors surfaced by ranking queries.
//!
//! These are user-input errors the caller is expected to present (a "did
//! you mean" list, a mood picker). Provider failures never show up here,
//! and an empty result is a success.

use similarity::ParseMoodError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RankingError {
    /// The query title is not in the catalog
    #[error("Movie '{title}' not found in catalog")]
    NotFound {
        title: String,
        /// Catalog titles containing the query, for "did you mean"
        suggestions: Vec<String>,
    },

    /// The mood key is not one of the known moods
    #[error(transparent)]
    UnknownMood(#[from] ParseMoodError),

    /// A filter in the pipeline failed
    #[error(transparent)]
    Pipeline(#[from] anyhow::Error),
}

impl RankingError {
    pub fn suggestions(&self) -> &[String] {
        match self {
            RankingError::NotFound { suggestions, .. } => suggestions,
            _ => &[],
        }
    }
}
