//! # Recommendation Engine
//!
//! This module answers the three ranking queries:
//! 1. `similar_to_item`: more like one catalog item
//! 2. `personalized`: more like everything the user liked
//! 3. `mood_filtered`: best rated items in a mood's genres
//!
//! Every query runs the same stages:
//! 1. Get ranked candidates from a source (already sorted, ties in corpus order)
//! 2. Apply the filter pipeline
//! 3. Walk the survivors through the poster gate until `top_n` are accepted
//!
//! The poster gate is the only stage that can hit the network (through the
//! metadata cache), so it runs last and stops as soon as enough items pass.
//! Results are never padded: if fewer items survive, fewer are returned.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tracing::{debug, info, instrument};

use data_loader::{Corpus, ItemIndex};
use metadata_client::{MetadataCache, MetadataRecord, TrailerRef};
use pipeline::filters::{
    AlreadyLikedFilter, ExcludedItemsFilter, GenreMatchFilter, MinimumRatingFilter,
};
use pipeline::FilterPipeline;
use similarity::{
    Candidate, CandidateSource, ContentSource, Mood, MoodSource, QueryContext, SimilarityIndex,
};

use crate::error::RankingError;

/// Number of results when the caller has no preference
pub const DEFAULT_TOP_N: usize = 5;

/// Maximum "did you mean" suggestions on an unknown title
pub const SUGGESTION_LIMIT: usize = 5;

/// Final recommendation returned to the user
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecommendation {
    pub index: ItemIndex,
    pub title: String,
    pub genres: Vec<String>,
    pub vote_average: f32,
    /// Similarity, mean similarity, or vote average depending on `source`
    pub score: f32,
    pub source: CandidateSource,
}

/// Behavior switches for the ranking queries
#[derive(Debug, Clone, Copy, Default)]
pub struct RankingOptions {
    /// Apply the poster gate to mood results too.
    ///
    /// Off by default: mood results are ranked by rating alone.
    pub mood_requires_poster: bool,
}

/// Answers ranking queries over a fixed catalog
#[derive(Clone)]
pub struct RecommendationEngine {
    corpus: Arc<Corpus>,
    content: ContentSource,
    mood: MoodSource,
    metadata: Arc<MetadataCache>,
    options: RankingOptions,
}

impl RecommendationEngine {
    /// Create an engine over an already built corpus and similarity index
    pub fn new(
        corpus: Arc<Corpus>,
        index: Arc<SimilarityIndex>,
        metadata: Arc<MetadataCache>,
        options: RankingOptions,
    ) -> Self {
        let content = ContentSource::new(index);
        let mood = MoodSource::new(corpus.clone());
        Self {
            corpus,
            content,
            mood,
            metadata,
            options,
        }
    }

    pub fn corpus(&self) -> &Arc<Corpus> {
        &self.corpus
    }

    pub fn options(&self) -> RankingOptions {
        self.options
    }

    /// Items most similar to `title`.
    ///
    /// # Errors
    /// `RankingError::NotFound` (with suggestions) if `title` is not in the catalog.
    #[instrument(skip(self, genre_filter), fields(genres = genre_filter.len()))]
    pub async fn similar_to_item(
        &self,
        title: &str,
        min_rating: f32,
        genre_filter: &[String],
        top_n: usize,
    ) -> Result<Vec<MovieRecommendation>, RankingError> {
        let start_time = Instant::now();
        let query = self
            .corpus
            .index_of(title)
            .ok_or_else(|| self.not_found(title))?;
        if top_n == 0 {
            return Ok(Vec::new());
        }

        let context = QueryContext::new().with_excluded(query);
        let candidates = self.content.similar_to(query);
        debug!("Generated {} content candidates", candidates.len());

        let pipeline = FilterPipeline::new()
            .add_filter(ExcludedItemsFilter)
            .add_filter(MinimumRatingFilter::new(self.corpus.clone(), min_rating))
            .add_filter_if(
                !genre_filter.is_empty(),
                GenreMatchFilter::new(self.corpus.clone(), genre_filter.iter().cloned()),
            );
        let filtered = self.apply_filters(&pipeline, candidates, &context)?;

        let recommendations = self.select_with_posters(filtered, top_n).await;
        info!(
            "Selected {} items similar to '{}' in {:.2?}",
            recommendations.len(),
            title,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Items closest to the centroid of the liked titles.
    ///
    /// Liked titles missing from the catalog are skipped. An empty liked set,
    /// or one where nothing resolves, gives an empty result.
    #[instrument(skip(self, liked), fields(liked = liked.len()))]
    pub async fn personalized(
        &self,
        liked: &BTreeSet<String>,
        top_n: usize,
    ) -> Result<Vec<MovieRecommendation>, RankingError> {
        let start_time = Instant::now();
        if liked.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let liked_indices: Vec<ItemIndex> = liked
            .iter()
            .filter_map(|title| self.corpus.index_of(title))
            .collect();
        if liked_indices.len() < liked.len() {
            debug!(
                "Skipped {} liked titles not in the catalog",
                liked.len() - liked_indices.len()
            );
        }
        if liked_indices.is_empty() {
            return Ok(Vec::new());
        }

        let context = QueryContext::new().with_liked(liked.iter().cloned());
        let candidates = self.content.taste_centroid(&liked_indices);

        let pipeline =
            FilterPipeline::new().add_filter(AlreadyLikedFilter::new(self.corpus.clone()));
        let filtered = self.apply_filters(&pipeline, candidates, &context)?;

        let recommendations = self.select_with_posters(filtered, top_n).await;
        info!(
            "Selected {} personalized items from {} liked in {:.2?}",
            recommendations.len(),
            liked_indices.len(),
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Best rated items in the genres mapped to `mood`
    #[instrument(skip(self))]
    pub async fn mood_filtered(
        &self,
        mood: Mood,
        min_rating: f32,
        top_n: usize,
    ) -> Result<Vec<MovieRecommendation>, RankingError> {
        if top_n == 0 {
            return Ok(Vec::new());
        }

        let candidates = self.mood.candidates(mood);
        let pipeline = FilterPipeline::new()
            .add_filter(MinimumRatingFilter::new(self.corpus.clone(), min_rating));
        let mut filtered = self.apply_filters(&pipeline, candidates, &QueryContext::new())?;

        let recommendations = if self.options.mood_requires_poster {
            self.select_with_posters(filtered, top_n).await
        } else {
            filtered.truncate(top_n);
            filtered
                .iter()
                .filter_map(|candidate| self.to_recommendation(candidate))
                .collect()
        };
        info!("Selected {} items for mood {}", recommendations.len(), mood);
        Ok(recommendations)
    }

    /// `mood_filtered` with the mood given by name
    ///
    /// # Errors
    /// `RankingError::UnknownMood` if `mood` is not a known mood name.
    pub async fn mood_filtered_by_name(
        &self,
        mood: &str,
        min_rating: f32,
        top_n: usize,
    ) -> Result<Vec<MovieRecommendation>, RankingError> {
        let mood: Mood = mood.parse()?;
        self.mood_filtered(mood, min_rating, top_n).await
    }

    /// Metadata and trailer for one title, fetched concurrently
    pub async fn details(&self, title: &str) -> (MetadataRecord, Option<TrailerRef>) {
        tokio::join!(self.metadata.get(title), self.metadata.get_trailer(title))
    }

    /// Build the NotFound error with substring suggestions
    fn not_found(&self, title: &str) -> RankingError {
        RankingError::NotFound {
            title: title.to_string(),
            suggestions: self
                .corpus
                .suggest(title, SUGGESTION_LIMIT)
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Apply the filter pipeline to candidates
    fn apply_filters(
        &self,
        pipeline: &FilterPipeline,
        candidates: Vec<Candidate>,
        context: &QueryContext,
    ) -> Result<Vec<Candidate>, RankingError> {
        let input = candidates.len();
        let filtered = pipeline
            .apply(candidates, context)
            .context("Failed to apply filters")?;
        debug!(
            "Filtering complete, {} of {} candidates remain",
            filtered.len(),
            input
        );
        Ok(filtered)
    }

    /// Accept candidates in order until `top_n` have a real poster
    async fn select_with_posters(
        &self,
        candidates: Vec<Candidate>,
        top_n: usize,
    ) -> Vec<MovieRecommendation> {
        let mut selected = Vec::with_capacity(top_n);
        let mut rejected = 0usize;

        for candidate in &candidates {
            if selected.len() == top_n {
                break;
            }
            let Some(recommendation) = self.to_recommendation(candidate) else {
                continue;
            };
            if self.metadata.is_valid_poster(&recommendation.title).await {
                selected.push(recommendation);
            } else {
                rejected += 1;
            }
        }

        if rejected > 0 {
            debug!("Poster gate rejected {} candidates", rejected);
        }
        selected
    }

    /// Attach catalog data to a candidate
    fn to_recommendation(&self, candidate: &Candidate) -> Option<MovieRecommendation> {
        let item = self.corpus.get(candidate.index)?;
        Some(MovieRecommendation {
            index: candidate.index,
            title: item.title.clone(),
            genres: item.genre_names.clone(),
            vote_average: item.vote_average,
            score: candidate.score,
            source: candidate.source,
        })
    }
}
