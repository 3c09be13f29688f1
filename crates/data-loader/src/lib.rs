//! # Data Loader Crate
//!
//! This crate loads the TMDB movies table into an immutable in-memory corpus
//! and persists the user's liked titles.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (CatalogItem, Corpus)
//! - **parser**: Parse the CSV table and its serialized genre lists
//! - **index**: Build the corpus and its title/genre indices
//! - **liked_store**: Newline-delimited liked-set persistence
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Corpus;
//! use std::path::Path;
//!
//! let corpus = Corpus::load_from_csv(Path::new("tmdb_5000_movies.csv"))?;
//! let idx = corpus.index_of("Avatar").unwrap();
//! println!("{} -> {}", corpus.get(idx).unwrap().title, corpus.get(idx).unwrap().content_text);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod liked_store;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use liked_store::{FileLikedStore, LikedStore};
pub use types::{CatalogItem, Corpus, ItemIndex};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_corpus_creation() {
        let corpus = Corpus::default();
        assert_eq!(corpus.len(), 0);
        assert!(corpus.is_empty());
        assert!(corpus.all_genres().is_empty());
    }

    #[test]
    fn test_content_text_derivation() {
        let item = CatalogItem::new(
            "Toy Story",
            "Toys come to life.",
            vec!["Animation".to_string(), "Comedy".to_string(), "Family".to_string()],
            7.7,
        );

        assert_eq!(item.content_text, "Toys come to life. Animation Comedy Family");
        assert_eq!(item.genres_display(), "Animation Comedy Family");
    }

    #[test]
    fn test_has_any_genre() {
        let item = CatalogItem::new("Heat", "Heist.", vec!["Action".to_string(), "Crime".to_string()], 7.7);

        assert!(item.has_any_genre(&["Crime"]));
        assert!(item.has_any_genre(&["Drama", "Action"]));
        assert!(!item.has_any_genre(&["Drama"]));
        assert!(!item.has_any_genre::<&str>(&[]));
    }

    #[test]
    fn test_empty_queries() {
        let corpus = Corpus::default();

        assert!(corpus.get(0).is_none());
        assert!(corpus.index_of("Avatar").is_none());
        assert!(corpus.indices_with_any_genre(&["Action"]).is_empty());
        assert!(corpus.suggest("ava", 5).is_empty());
    }
}
