//! Startup build of the vector space and similarity matrix.

use crate::matrix::SimilarityMatrix;
use crate::vectorizer::{TfidfVectorizer, VectorSpace};
use data_loader::Corpus;
use std::time::Instant;
use tracing::info;

/// Everything derived from the corpus content, built once and read only
#[derive(Debug, Clone, Default)]
pub struct SimilarityIndex {
    pub space: VectorSpace,
    pub matrix: SimilarityMatrix,
}

impl SimilarityIndex {
    /// Vectorize every item's content text and compute the similarity matrix.
    ///
    /// Rows of the matrix follow corpus order.
    pub fn build(corpus: &Corpus) -> Self {
        let start = Instant::now();
        let texts: Vec<&str> = corpus
            .items()
            .iter()
            .map(|item| item.content_text.as_str())
            .collect();

        let (space, vectors) = TfidfVectorizer::fit(&texts);
        info!(
            "Vectorized {} items over {} terms in {:.2?}",
            vectors.len(),
            space.dimensions(),
            start.elapsed()
        );

        let matrix_start = Instant::now();
        let matrix = SimilarityMatrix::compute(&vectors);
        info!(
            "Similarity matrix {}x{} ({:.1} MB) built in {:.2?}",
            matrix.len(),
            matrix.len(),
            matrix.memory_bytes() as f64 / (1024.0 * 1024.0),
            matrix_start.elapsed()
        );

        Self { space, matrix }
    }

    /// Number of indexed items
    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }
}
