//! Content Source - Similarity-matrix Candidates
//!
//! Two ways of reading the similarity matrix:
//! - `similar_to`: one row, for "more like this item"
//! - `taste_centroid`: the mean of the liked items' rows, for "more like
//!   what you like"
//!
//! Both return every eligible item sorted by score, highest first, with
//! ties in corpus order. Filtering and truncation happen downstream.

use crate::index::SimilarityIndex;
use crate::types::{sort_by_score_desc, Candidate, CandidateSource};
use data_loader::ItemIndex;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Content source reads candidates straight from the similarity matrix
#[derive(Clone)]
pub struct ContentSource {
    /// Shared, read-only; no lock needed
    index: Arc<SimilarityIndex>,
}

impl ContentSource {
    pub fn new(index: Arc<SimilarityIndex>) -> Self {
        Self { index }
    }

    /// Candidates similar to the item at `query`, excluding the item itself.
    ///
    /// Returns an empty list if `query` is out of range.
    #[instrument(skip(self))]
    pub fn similar_to(&self, query: ItemIndex) -> Vec<Candidate> {
        let Some(row) = self.index.matrix.row(query) else {
            return Vec::new();
        };

        let mut candidates: Vec<Candidate> = row
            .iter()
            .enumerate()
            .filter(|&(index, _)| index != query)
            .map(|(index, &score)| Candidate::new(index, CandidateSource::Content, score))
            .collect();

        sort_by_score_desc(&mut candidates);
        debug!("Generated {} content candidates", candidates.len());
        candidates
    }

    /// Candidates scored by their mean similarity to the `liked` items.
    ///
    /// Every item is scored, liked ones included; dropping them is the
    /// filter pipeline's job. Empty input gives an empty list.
    #[instrument(skip(self, liked), fields(liked = liked.len()))]
    pub fn taste_centroid(&self, liked: &[ItemIndex]) -> Vec<Candidate> {
        let mean = self.index.matrix.mean_of_rows(liked);

        let mut candidates: Vec<Candidate> = mean
            .into_iter()
            .enumerate()
            .map(|(index, score)| Candidate::new(index, CandidateSource::Taste, score))
            .collect();

        sort_by_score_desc(&mut candidates);
        debug!("Generated {} taste candidates", candidates.len());
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{CatalogItem, Corpus};

    fn create_test_index() -> Arc<SimilarityIndex> {
        let item = |title: &str, overview: &str| {
            CatalogItem::new(title, overview, vec!["Drama".to_string()], 7.0)
        };
        let corpus = Corpus::from_items(vec![
            item("Pirates", "pirates sail the seas hunting treasure"),
            item("Treasure Island", "a boy hunts pirate treasure on an island"),
            item("Robots", "robots rebel against their makers"),
            item("Sea Pirates", "pirates battle at sea for treasure"),
        ]);
        Arc::new(SimilarityIndex::build(&corpus))
    }

    #[test]
    fn test_similar_to_excludes_query() {
        let source = ContentSource::new(create_test_index());
        let candidates = source.similar_to(0);

        assert_eq!(candidates.len(), 3);
        assert!(candidates.iter().all(|c| c.index != 0));
        assert!(candidates.iter().all(|c| c.source == CandidateSource::Content));
    }

    #[test]
    fn test_similar_to_sorted_descending() {
        let source = ContentSource::new(create_test_index());
        let candidates = source.similar_to(0);

        assert!(candidates.windows(2).all(|w| w[0].score >= w[1].score));
        // "Sea Pirates" shares pirates + treasure; "Robots" shares nothing but the genre
        assert_eq!(candidates[0].index, 3);
        assert_eq!(candidates.last().map(|c| c.index), Some(2));
    }

    #[test]
    fn test_similar_to_out_of_range() {
        let source = ContentSource::new(create_test_index());
        assert!(source.similar_to(99).is_empty());
    }

    #[test]
    fn test_taste_centroid_scores_mean_similarity() {
        let index = create_test_index();
        let source = ContentSource::new(Arc::clone(&index));
        let candidates = source.taste_centroid(&[0, 3]);

        assert_eq!(candidates.len(), 4);
        assert!(candidates.windows(2).all(|w| w[0].score >= w[1].score));

        let robots = candidates.iter().find(|c| c.index == 2).unwrap();
        let expected = (index.matrix.get(0, 2).unwrap() + index.matrix.get(3, 2).unwrap()) / 2.0;
        assert!((robots.score - expected).abs() < 1e-6);
    }

    #[test]
    fn test_taste_centroid_empty() {
        let source = ContentSource::new(create_test_index());
        assert!(source.taste_centroid(&[]).is_empty());
    }
}
