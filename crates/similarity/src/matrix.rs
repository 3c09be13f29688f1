//! Dense pairwise cosine-similarity matrix.
//!
//! `M[i][j]` is the dot product of the normalized content vectors of items
//! `i` and `j`. The matrix is built once and only read afterwards.
//!
//! ## Memory
//! The table is dense: `n * n` `f32` values, so `4 * n^2` bytes. 5 000 items
//! take 100 MB; 20 000 items already take 1.6 GB. Corpora beyond that need a
//! sparse top-k table instead.

use crate::vectorizer::ContentVector;
use data_loader::ItemIndex;
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Square, symmetric similarity table in row-major order
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f32>,
}

impl SimilarityMatrix {
    /// Compute all pairwise similarities.
    ///
    /// Rows are computed in parallel through an inverted index
    /// (term -> postings), so each row only touches items that share a term.
    /// Every pair sums its shared terms in ascending term order, which keeps
    /// `M[i][j]` and `M[j][i]` bit-for-bit identical.
    #[instrument(skip(vectors), fields(items = vectors.len()))]
    pub fn compute(vectors: &[ContentVector]) -> Self {
        let n = vectors.len();

        let dims = vectors
            .iter()
            .filter_map(|v| v.entries().last().map(|&(term, _)| term + 1))
            .max()
            .unwrap_or(0);
        let mut postings: Vec<Vec<(ItemIndex, f32)>> = vec![Vec::new(); dims];
        for (item, vector) in vectors.iter().enumerate() {
            for &(term, weight) in vector.entries() {
                postings[term].push((item, weight));
            }
        }

        let mut values = vec![0.0f32; n * n];
        values
            .par_chunks_mut(n.max(1))
            .take(n)
            .enumerate()
            .for_each(|(i, row)| {
                for &(term, weight) in vectors[i].entries() {
                    for &(j, other) in &postings[term] {
                        row[j] += weight * other;
                    }
                }
                // Self-similarity is 1.0 by definition, even for empty vectors
                row[i] = 1.0;
            });

        debug!("Computed {}x{} similarity matrix", n, n);
        Self { n, values }
    }

    /// Number of items (rows == columns)
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Similarity between items `i` and `j`
    pub fn get(&self, i: ItemIndex, j: ItemIndex) -> Option<f32> {
        if i < self.n && j < self.n {
            Some(self.values[i * self.n + j])
        } else {
            None
        }
    }

    /// Full row for item `i`
    pub fn row(&self, i: ItemIndex) -> Option<&[f32]> {
        if i < self.n {
            Some(&self.values[i * self.n..(i + 1) * self.n])
        } else {
            None
        }
    }

    /// Column-wise mean over the given rows.
    ///
    /// This is the "centroid of taste": for every item, its average
    /// similarity to the given items. Out-of-range indices are skipped;
    /// returns an empty vector when no row is usable.
    pub fn mean_of_rows(&self, rows: &[ItemIndex]) -> Vec<f32> {
        let rows: Vec<&[f32]> = rows.iter().filter_map(|&i| self.row(i)).collect();
        if rows.is_empty() {
            return Vec::new();
        }

        let mut sums = vec![0.0f32; self.n];
        for row in &rows {
            for (sum, value) in sums.iter_mut().zip(row.iter()) {
                *sum += value;
            }
        }
        let count = rows.len() as f32;
        sums.iter_mut().for_each(|s| *s /= count);
        sums
    }

    /// Bytes held by the table
    pub fn memory_bytes(&self) -> usize {
        self.values.len() * std::mem::size_of::<f32>()
    }
}
