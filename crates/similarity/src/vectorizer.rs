//! TF-IDF Content Vectorizer
//!
//! Turns every item's content text into a sparse, L2-normalized TF-IDF
//! vector over the corpus vocabulary.
//!
//! ## Algorithm
//! 1. Tokenize: lowercase, split on anything that is not alphanumeric or `_`,
//!    keep tokens of two or more characters, drop English stop words
//! 2. Vocabulary: every distinct token, indexed in alphabetical order
//! 3. Weight: `tf * idf` with raw counts for `tf` and the smoothed
//!    `idf = ln((1 + n) / (1 + df)) + 1`
//! 4. Normalize each vector to unit length
//!
//! The fit is deterministic for identical input order. There is no
//! incremental update: a changed corpus needs a full refit.

use crate::stop_words::is_stop_word;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, instrument};

/// Index of a term in the fitted vocabulary
pub type TermIndex = usize;

/// Sparse weighted-term vector, entries sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentVector {
    entries: Vec<(TermIndex, f32)>,
}

impl ContentVector {
    /// Build from `(term, weight)` pairs; sorts and L2-normalizes.
    fn from_weights(mut entries: Vec<(TermIndex, f32)>) -> Self {
        entries.sort_unstable_by_key(|&(term, _)| term);
        let norm = entries.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm > 0.0 {
            for (_, w) in entries.iter_mut() {
                *w /= norm;
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &[(TermIndex, f32)] {
        &self.entries
    }

    /// Number of non-zero terms
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product of two sparse vectors (cosine similarity when both are normalized)
    pub fn dot(&self, other: &ContentVector) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.entries.len() && j < other.entries.len() {
            let (ta, wa) = self.entries[i];
            let (tb, wb) = other.entries[j];
            match ta.cmp(&tb) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

/// Fitted vocabulary and IDF weights
#[derive(Debug, Clone, Default)]
pub struct VectorSpace {
    vocabulary: HashMap<String, TermIndex>,
    /// Terms in index order (alphabetical)
    terms: Vec<String>,
    idf: Vec<f32>,
}

impl VectorSpace {
    /// Vocabulary size
    pub fn dimensions(&self) -> usize {
        self.terms.len()
    }

    pub fn term_index(&self, term: &str) -> Option<TermIndex> {
        self.vocabulary.get(term).copied()
    }

    pub fn term(&self, index: TermIndex) -> Option<&str> {
        self.terms.get(index).map(|t| t.as_str())
    }

    pub fn idf(&self, index: TermIndex) -> Option<f32> {
        self.idf.get(index).copied()
    }

    /// Embed arbitrary text in the fitted space. Unknown terms are ignored.
    pub fn transform(&self, text: &str) -> ContentVector {
        let mut counts: BTreeMap<TermIndex, f32> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(term) = self.term_index(&token) {
                *counts.entry(term).or_insert(0.0) += 1.0;
            }
        }

        let weights = counts
            .into_iter()
            .map(|(term, tf)| (term, tf * self.idf[term]))
            .collect();
        ContentVector::from_weights(weights)
    }
}

/// TF-IDF vectorizer with the English stop-word list
#[derive(Debug, Clone, Copy, Default)]
pub struct TfidfVectorizer;

impl TfidfVectorizer {
    /// Fit the vocabulary on `texts` and return one vector per text, in order.
    #[instrument(skip(texts), fields(documents = texts.len()))]
    pub fn fit<S: AsRef<str> + Sync>(texts: &[S]) -> (VectorSpace, Vec<ContentVector>) {
        let tokenized: Vec<Vec<String>> = texts
            .par_iter()
            .map(|text| tokenize(text.as_ref()))
            .collect();

        // Alphabetical vocabulary keeps term indices independent of hashing
        let terms: Vec<String> = tokenized
            .iter()
            .flatten()
            .cloned()
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect();
        let vocabulary: HashMap<String, TermIndex> = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx))
            .collect();

        // Raw term counts per document
        let counts: Vec<BTreeMap<TermIndex, f32>> = tokenized
            .par_iter()
            .map(|tokens| {
                let mut tf = BTreeMap::new();
                for token in tokens {
                    *tf.entry(vocabulary[token.as_str()]).or_insert(0.0) += 1.0;
                }
                tf
            })
            .collect();

        let mut doc_freq = vec![0u32; terms.len()];
        for tf in &counts {
            for &term in tf.keys() {
                doc_freq[term] += 1;
            }
        }

        let n = texts.len() as f32;
        let idf: Vec<f32> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        let vectors: Vec<ContentVector> = counts
            .into_par_iter()
            .map(|tf| {
                let weights = tf
                    .into_iter()
                    .map(|(term, count)| (term, count * idf[term]))
                    .collect();
                ContentVector::from_weights(weights)
            })
            .collect();

        debug!("Fitted vocabulary of {} terms", terms.len());

        (
            VectorSpace {
                vocabulary,
                terms,
                idf,
            },
            vectors,
        )
    }
}

/// Lowercase, split on non-word characters, drop short tokens and stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !is_stop_word(token))
        .map(str::to_string)
        .collect()
}
