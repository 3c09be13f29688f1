//! Corpus building and indexing logic.
//!
//! - Parse the catalog table
//! - Enforce the unique-title key
//! - Build the title and genre indices
//! - Validate value ranges

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

impl Corpus {
    /// Load the catalog from a CSV file.
    ///
    /// This is the main entry point for loading data. Any error is fatal:
    /// the caller cannot serve recommendations without a corpus.
    pub fn load_from_csv(path: &Path) -> Result<Self> {
        info!("Loading catalog from {:?}", path);
        let start = Instant::now();

        let items = parser::parse_catalog(path)?;
        if items.is_empty() {
            return Err(DataLoadError::EmptyCorpus {
                file: path.display().to_string(),
            });
        }

        let corpus = Self::from_items(items);
        corpus.validate()?;

        info!(
            "Corpus built with {} items and {} genres in {:.2?}",
            corpus.len(),
            corpus.genre_index.len(),
            start.elapsed()
        );
        Ok(corpus)
    }

    /// Build a corpus from items already in memory.
    ///
    /// Later items whose title was already seen are dropped so the title
    /// stays a unique key.
    pub fn from_items(items: Vec<CatalogItem>) -> Self {
        let mut corpus = Corpus {
            items: Vec::with_capacity(items.len()),
            title_index: HashMap::with_capacity(items.len()),
            genre_index: BTreeMap::new(),
        };

        let mut duplicates = 0usize;
        for item in items {
            if corpus.title_index.contains_key(&item.title) {
                duplicates += 1;
                continue;
            }
            corpus.title_index.insert(item.title.clone(), corpus.items.len());
            corpus.items.push(item);
        }
        if duplicates > 0 {
            warn!("Dropped {} rows with duplicate titles", duplicates);
        }

        corpus.build_genre_index();
        corpus
    }

    /// Map each genre name to the positions of the items carrying it
    fn build_genre_index(&mut self) {
        for (index, item) in self.items.iter().enumerate() {
            for genre in &item.genre_names {
                let entry = self.genre_index.entry(genre.clone()).or_default();
                // An item listing the same genre twice is indexed once
                if entry.last() != Some(&index) {
                    entry.push(index);
                }
            }
        }
    }

    /// Validate data integrity
    ///
    /// Vote averages must be finite and within 0.0 - 10.0.
    pub fn validate(&self) -> Result<()> {
        for item in &self.items {
            if !item.vote_average.is_finite() || !(0.0..=10.0).contains(&item.vote_average) {
                return Err(DataLoadError::InvalidValue {
                    field: format!("vote_average of '{}'", item.title),
                    value: item.vote_average.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn item(title: &str, genres: &[&str], rating: f32) -> CatalogItem {
        CatalogItem::new(
            title,
            format!("{} overview", title),
            genres.iter().map(|g| g.to_string()).collect(),
            rating,
        )
    }

    #[test]
    fn test_from_items_builds_indices() {
        let corpus = Corpus::from_items(vec![
            item("Up", &["Animation", "Comedy"], 7.7),
            item("Heat", &["Action", "Crime"], 7.7),
            item("Big", &["Comedy"], 6.9),
        ]);

        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.index_of("Heat"), Some(1));
        assert_eq!(corpus.all_genres(), vec!["Action", "Animation", "Comedy", "Crime"]);
        assert_eq!(corpus.indices_with_any_genre(&["Comedy", "Crime"]), vec![0, 1, 2]);
        assert_eq!(corpus.indices_with_any_genre(&["Comedy"]), vec![0, 2]);
    }

    #[test]
    fn test_from_items_keeps_first_duplicate() {
        let corpus = Corpus::from_items(vec![
            item("The Host", &["Horror"], 6.7),
            item("Up", &["Animation"], 7.7),
            item("The Host", &["Science Fiction"], 5.8),
        ]);

        assert_eq!(corpus.len(), 2);
        let host = corpus.get(corpus.index_of("The Host").unwrap()).unwrap();
        assert_eq!(host.genre_names, vec!["Horror"]);
    }

    #[test]
    fn test_validate_rejects_out_of_range_rating() {
        let corpus = Corpus::from_items(vec![item("Broken", &["Drama"], 11.0)]);
        assert!(matches!(
            corpus.validate(),
            Err(DataLoadError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_suggest_substring_matches() {
        let corpus = Corpus::from_items(vec![
            item("The Dark Knight", &["Action"], 8.2),
            item("Dark Shadows", &["Comedy"], 5.7),
            item("Up", &["Animation"], 7.7),
        ]);

        assert_eq!(corpus.suggest("dark", 5), vec!["The Dark Knight", "Dark Shadows"]);
        assert_eq!(corpus.suggest("dark", 1), vec!["The Dark Knight"]);
        assert!(corpus.suggest("   ", 5).is_empty());
    }

    #[test]
    fn test_load_from_csv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "budget,genres,id,overview,title,vote_average").unwrap();
        writeln!(
            file,
            r#"100,"[{{""id"": 28, ""name"": ""Action""}}]",1,"A heist in the city.",Heat,7.7"#
        )
        .unwrap();
        // Missing overview -> dropped
        writeln!(file, r#"200,"[]",2,,Nothing,5.0"#).unwrap();
        writeln!(
            file,
            r#"300,"[{{""id"": 16, ""name"": ""Animation""}}, {{""id"": 35, ""name"": ""Comedy""}}]",3,"A house flies away.",Up,7.7"#
        )
        .unwrap();

        let corpus = Corpus::load_from_csv(file.path()).unwrap();
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.index_of("Up"), Some(1));
        let up = corpus.get(1).unwrap();
        assert_eq!(up.genre_names, vec!["Animation", "Comedy"]);
        assert_eq!(up.content_text, "A house flies away. Animation Comedy");
        assert!(corpus.index_of("Nothing").is_none());
    }

    #[test]
    fn test_load_from_csv_drops_short_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "genres,overview,title,vote_average").unwrap();
        writeln!(file, r#""[]",A house flies away.,Up,7.7"#).unwrap();
        // No vote_average cell at all
        writeln!(file, r#""[]",A heist in the city.,Heat"#).unwrap();

        let corpus = Corpus::load_from_csv(file.path()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.index_of("Up"), Some(0));
        assert!(corpus.index_of("Heat").is_none());
    }

    #[test]
    fn test_load_from_csv_bad_genres_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "genres,overview,title,vote_average").unwrap();
        writeln!(file, "Action|Comedy,Some plot.,Broken,6.0").unwrap();

        let err = Corpus::load_from_csv(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::ParseError { line: 2, .. }));
    }

    #[test]
    fn test_load_from_csv_missing_file() {
        let err = Corpus::load_from_csv(Path::new("does/not/exist.csv")).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_from_csv_all_rows_incomplete() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "genres,overview,title,vote_average").unwrap();
        writeln!(file, "[],,Empty,6.0").unwrap();

        let err = Corpus::load_from_csv(file.path()).unwrap_err();
        assert!(matches!(err, DataLoadError::EmptyCorpus { .. }));
    }
}
