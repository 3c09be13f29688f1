//! Filter to keep only movies in the selected genres.
//!
//! An item passes if it carries at least one of the selected genre names.
//! With no genres selected the filter lets everything through.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::Corpus;
use similarity::{Candidate, QueryContext};
use std::collections::HashSet;
use std::sync::Arc;

/// Keeps candidates sharing at least one genre with the selection.
pub struct GenreMatchFilter {
    corpus: Arc<Corpus>,
    genres: HashSet<String>,
}

impl GenreMatchFilter {
    /// Create a new GenreMatchFilter.
    ///
    /// # Arguments
    /// * `corpus` - Shared catalog for genre lookups
    /// * `genres` - Selected genre names (exact, case-sensitive)
    pub fn new<I, S>(corpus: Arc<Corpus>, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            corpus,
            genres: genres.into_iter().map(Into::into).collect(),
        }
    }
}

impl Filter for GenreMatchFilter {
    fn name(&self) -> &str {
        "GenreMatchFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _context: &QueryContext,
    ) -> Result<Vec<Candidate>> {
        if self.genres.is_empty() {
            return Ok(candidates);
        }

        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| {
                if let Some(item) = self.corpus.get(candidate.index) {
                    item.genre_names.iter().any(|genre| self.genres.contains(genre))
                } else {
                    false // Exclude if item not found
                }
            })
            .collect();
        Ok(filtered)
    }
}
