//! Filter to remove movies the user has already liked.
//!
//! Personalized results are only useful if they are new to the user.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::Corpus;
use similarity::{Candidate, QueryContext};
use std::sync::Arc;

/// Removes candidates whose title is in `QueryContext.liked_titles`.
pub struct AlreadyLikedFilter {
    corpus: Arc<Corpus>,
}

impl AlreadyLikedFilter {
    pub fn new(corpus: Arc<Corpus>) -> Self {
        Self { corpus }
    }
}

impl Filter for AlreadyLikedFilter {
    fn name(&self) -> &str {
        "AlreadyLikedFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &QueryContext,
    ) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| match self.corpus.get(candidate.index) {
                Some(item) => !context.liked_titles.contains(&item.title),
                None => false,
            })
            .collect();
        Ok(filtered)
    }
}
