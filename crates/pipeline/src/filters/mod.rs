//! Filter implementations for the candidate pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod already_liked;
pub mod excluded_items;
pub mod genre_match;
pub mod minimum_rating;

// Re-export for convenience
pub use already_liked::AlreadyLikedFilter;
pub use excluded_items::ExcludedItemsFilter;
pub use genre_match::GenreMatchFilter;
pub use minimum_rating::MinimumRatingFilter;
