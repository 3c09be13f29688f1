//! Filter to drop items the request explicitly excludes.
//!
//! The query item of a "more like this" request is excluded this way.

use crate::traits::Filter;
use anyhow::Result;
use similarity::{Candidate, QueryContext};

/// Removes candidates listed in `QueryContext.excluded`.
pub struct ExcludedItemsFilter;

impl Filter for ExcludedItemsFilter {
    fn name(&self) -> &str {
        "ExcludedItemsFilter"
    }

    fn apply(
        &self,
        candidates: Vec<Candidate>,
        context: &QueryContext,
    ) -> Result<Vec<Candidate>> {
        if context.excluded.is_empty() {
            return Ok(candidates);
        }
        Ok(candidates
            .into_iter()
            .filter(|candidate| !context.excluded.contains(&candidate.index))
            .collect())
    }
}
