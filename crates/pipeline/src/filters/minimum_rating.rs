//! Filter to ensure minimum quality threshold.
//!
//! Removes movies whose vote average is below the requested minimum.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::Corpus;
use similarity::{Candidate, QueryContext};
use std::sync::Arc;

/// Removes candidates rated below `min_rating`.
///
/// The bound is inclusive: an item rated exactly `min_rating` passes.
pub struct MinimumRatingFilter {
    corpus: Arc<Corpus>,
    min_rating: f32,
}

impl MinimumRatingFilter {
    /// Create a new MinimumRatingFilter.
    ///
    /// # Arguments
    /// * `corpus` - Shared catalog for rating lookups
    /// * `min_rating` - Minimum vote average (0.0 - 10.0, typically 6.0)
    pub fn new(corpus: Arc<Corpus>, min_rating: f32) -> Self {
        Self { corpus, min_rating }
    }
}

impl Filter for MinimumRatingFilter {
    fn name(&self) -> &str {
        "MinimumRatingFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        _context: &QueryContext,
    ) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| {
                if let Some(item) = self.corpus.get(candidate.index) {
                    item.vote_average >= self.min_rating
                } else {
                    false
                }
            })
            .collect();

        Ok(filtered)
    }
}
