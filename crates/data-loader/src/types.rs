//! Core domain types for the movie catalog.
//!
//! The catalog is loaded once and never mutated afterwards. Items are
//! addressed by their position in corpus order (`ItemIndex`), which is also
//! the row/column index used by the similarity matrix.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Position of an item in corpus order
pub type ItemIndex = usize;

// =============================================================================
// Catalog Item
// =============================================================================

/// A single movie in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique key within the corpus
    pub title: String,
    pub overview: String,
    /// Genre names in provider order
    pub genre_names: Vec<String>,
    /// Average vote from 0.0 to 10.0
    pub vote_average: f32,
    /// `overview` followed by the space-joined genre names
    pub content_text: String,
}

impl CatalogItem {
    /// Create an item and derive its content text
    pub fn new(
        title: impl Into<String>,
        overview: impl Into<String>,
        genre_names: Vec<String>,
        vote_average: f32,
    ) -> Self {
        let overview = overview.into();
        let content_text = format!("{} {}", overview, genre_names.join(" "));
        Self {
            title: title.into(),
            overview,
            genre_names,
            vote_average,
            content_text,
        }
    }

    /// True if the item carries at least one of the given genre names
    pub fn has_any_genre<S: AsRef<str>>(&self, genres: &[S]) -> bool {
        self.genre_names
            .iter()
            .any(|name| genres.iter().any(|g| g.as_ref() == name))
    }

    /// Genres joined for display ("Action Adventure")
    pub fn genres_display(&self) -> String {
        self.genre_names.join(" ")
    }
}

// =============================================================================
// Corpus - The In-Memory Catalog
// =============================================================================

/// Ordered, immutable catalog plus lookup indices.
///
/// Built once at startup and shared behind an `Arc`; every accessor borrows.
#[derive(Debug, Default)]
pub struct Corpus {
    pub(crate) items: Vec<CatalogItem>,
    /// Title -> position in `items`
    pub(crate) title_index: HashMap<String, ItemIndex>,
    /// Genre name -> positions (ascending), keyed in sorted order
    pub(crate) genre_index: BTreeMap<String, Vec<ItemIndex>>,
}

impl Corpus {
    /// Number of items in the corpus
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an item by position
    pub fn get(&self, index: ItemIndex) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    /// Position of the item with exactly this title
    pub fn index_of(&self, title: &str) -> Option<ItemIndex> {
        self.title_index.get(title).copied()
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.title_index.contains_key(title)
    }

    /// All items in corpus order
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    /// Every title, sorted alphabetically
    pub fn sorted_titles(&self) -> Vec<&str> {
        let mut titles: Vec<&str> = self.items.iter().map(|i| i.title.as_str()).collect();
        titles.sort_unstable();
        titles
    }

    /// Every distinct genre name, sorted
    pub fn all_genres(&self) -> Vec<&str> {
        self.genre_index.keys().map(|g| g.as_str()).collect()
    }

    /// Positions of items sharing at least one of `genres`, in corpus order
    pub fn indices_with_any_genre<S: AsRef<str>>(&self, genres: &[S]) -> Vec<ItemIndex> {
        let mut indices: Vec<ItemIndex> = genres
            .iter()
            .filter_map(|g| self.genre_index.get(g.as_ref()))
            .flatten()
            .copied()
            .collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// Titles containing `query` (case-insensitive), in corpus order.
    ///
    /// Used to offer "did you mean" choices when an exact title lookup fails.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<&str> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.items
            .iter()
            .filter(|item| item.title.to_lowercase().contains(&needle))
            .map(|item| item.title.as_str())
            .take(limit)
            .collect()
    }
}
