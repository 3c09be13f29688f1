//! Shared types for candidate generation and filtering.

use data_loader::ItemIndex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// Which query produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateSource {
    /// Row of the similarity matrix for a query item
    Content,
    /// Mean similarity over the liked items
    Taste,
    /// Genre match for a mood, scored by vote average
    Mood,
}

/// A catalog item proposed for recommendation, before filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub index: ItemIndex,
    pub score: f32,
    pub source: CandidateSource,
}

impl Candidate {
    pub fn new(index: ItemIndex, source: CandidateSource, score: f32) -> Self {
        Self {
            index,
            score,
            source,
        }
    }
}

/// Per-request state handed to the filters.
///
/// Built fresh for every query; nothing here outlives the request.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    /// Titles the user already liked (sorted)
    pub liked_titles: BTreeSet<String>,
    /// Items that must never be returned for this request
    pub excluded: HashSet<ItemIndex>,
}

impl QueryContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_liked<I, S>(mut self, titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.liked_titles.extend(titles.into_iter().map(Into::into));
        self
    }

    pub fn with_excluded(mut self, index: ItemIndex) -> Self {
        self.excluded.insert(index);
        self
    }
}

/// Sort candidates by score, highest first.
///
/// The sort is stable, so equal scores keep corpus order.
pub(crate) fn sort_by_score_desc(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
