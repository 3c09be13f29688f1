//! Server crate for the ReelRecs recommendation engine.
//!
//! This crate ties the catalog, the similarity index, the filter pipeline
//! and the metadata cache together behind the three ranking queries, and
//! owns the user's persisted liked set.

pub mod engine;
pub mod error;
pub mod liked;

pub use engine::{
    MovieRecommendation, RankingOptions, RecommendationEngine, DEFAULT_TOP_N, SUGGESTION_LIMIT,
};
pub use error::RankingError;
pub use liked::LikedSet;
