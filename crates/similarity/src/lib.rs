//! # Similarity Crate
//!
//! This crate turns the catalog's content text into vectors, compares every
//! pair of items, and generates ranked candidate lists from the result.
//!
//! ## Components
//!
//! ### Content Vectorizer
//! TF-IDF over the overview and genre names of every item:
//! - Standard English stop-word list
//! - Smoothed IDF, L2-normalized vectors
//!
//! ### Similarity Matrix
//! Dense `n x n` cosine-similarity table, built once at startup.
//!
//! ### Candidate Sources
//! - **ContentSource**: one matrix row ("more like this") or the mean of the
//!   liked rows ("more like what you like")
//! - **MoodSource**: items in a mood's genres, ranked by vote average
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::{ContentSource, MoodSource, Mood, SimilarityIndex};
//! use data_loader::Corpus;
//! use std::sync::Arc;
//!
//! let corpus = Arc::new(Corpus::load_from_csv(path)?);
//! let index = Arc::new(SimilarityIndex::build(&corpus));
//!
//! let content = ContentSource::new(index.clone());
//! let similar = content.similar_to(corpus.index_of("Avatar").unwrap());
//!
//! let mood = MoodSource::new(corpus.clone());
//! let happy = mood.candidates(Mood::Happy);
//! ```

// Public modules
pub mod types;
pub mod stop_words;
pub mod vectorizer;
pub mod matrix;
pub mod index;
pub mod content;
pub mod mood;

// Re-export commonly used types
pub use types::{Candidate, CandidateSource, QueryContext};
pub use vectorizer::{ContentVector, TfidfVectorizer, VectorSpace};
pub use matrix::SimilarityMatrix;
pub use index::SimilarityIndex;
pub use content::ContentSource;
pub use mood::{Mood, MoodSource, ParseMoodError};
