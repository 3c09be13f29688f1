//! Pipeline for filtering ranked movie candidates.
//!
//! This crate provides:
//! - Filter trait and implementations for candidate filtering
//! - FilterPipeline for composing filters
//!
//! ## Architecture
//! Candidates arrive already sorted by score. Every filter only removes
//! entries, so the order that survives the pipeline is still the ranking
//! order and the caller can truncate straight away.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::FilterPipeline;
//! use pipeline::filters::*;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(ExcludedItemsFilter)
//!     .add_filter(MinimumRatingFilter::new(corpus.clone(), 6.0))
//!     .add_filter(GenreMatchFilter::new(corpus.clone(), ["Comedy"]));
//!
//! let filtered = pipeline.apply(candidates, &context)?;
//! ```

pub mod traits;
pub mod filters;
pub mod filter_pipeline;

// Re-export main types
pub use traits::Filter;
pub use filter_pipeline::FilterPipeline;
