//! Parser for the TMDB movies table.
//!
//! The table is a CSV file with (at least) these columns:
//! - `title`: movie title
//! - `overview`: free-text plot summary
//! - `genres`: serialized list of objects, e.g. `[{"id": 28, "name": "Action"}]`
//! - `vote_average`: numeric rating from 0 to 10
//!
//! Rows with an empty required field are dropped. Anything else that fails to
//! parse aborts the load.

use crate::error::{DataLoadError, Result};
use crate::types::CatalogItem;
use csv::StringRecord;
use rayon::prelude::*;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Columns every row must provide
pub const REQUIRED_COLUMNS: [&str; 4] = ["title", "overview", "genres", "vote_average"];

/// One entry of the serialized genre list
#[derive(Debug, Deserialize)]
struct GenreEntry {
    name: String,
}

/// Header positions of the required columns
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    title: usize,
    overview: usize,
    genres: usize,
    vote_average: usize,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord, file: &str) -> Result<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    file: file.to_string(),
                    column: column.to_string(),
                })
        };

        Ok(Self {
            title: find(REQUIRED_COLUMNS[0])?,
            overview: find(REQUIRED_COLUMNS[1])?,
            genres: find(REQUIRED_COLUMNS[2])?,
            vote_average: find(REQUIRED_COLUMNS[3])?,
        })
    }
}

/// Parse the catalog table into items, in file order.
pub fn parse_catalog(path: &Path) -> Result<Vec<CatalogItem>> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    // Short rows must reach parse_row so they are dropped, not rejected
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let layout = ColumnLayout::from_headers(reader.headers()?, &file)?;

    let records: Vec<StringRecord> = reader
        .records()
        .collect::<std::result::Result<_, csv::Error>>()?;
    let total = records.len();

    // Rows are independent, so parse them in parallel; collect keeps file order
    let parsed: Vec<Option<CatalogItem>> = records
        .par_iter()
        .enumerate()
        .map(|(idx, record)| {
            // Line 1 is the header
            let line_no = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);
            parse_row(record, layout, &file, line_no)
        })
        .collect::<Result<_>>()?;

    let items: Vec<CatalogItem> = parsed.into_iter().flatten().collect();
    let dropped = total - items.len();
    if dropped > 0 {
        debug!("Dropped {} incomplete rows from {}", dropped, file);
    }
    info!("Parsed {} catalog rows from {}", items.len(), file);

    Ok(items)
}

/// Parse one row. `Ok(None)` means the row is incomplete and should be dropped.
fn parse_row(
    record: &StringRecord,
    layout: ColumnLayout,
    file: &str,
    line_no: usize,
) -> Result<Option<CatalogItem>> {
    let field = |idx: usize| record.get(idx).map(str::trim).filter(|s| !s.is_empty());

    let (Some(title), Some(overview), Some(genres), Some(vote_average)) = (
        field(layout.title),
        field(layout.overview),
        field(layout.genres),
        field(layout.vote_average),
    ) else {
        return Ok(None);
    };

    let vote_average: f32 = vote_average.parse().map_err(|e| DataLoadError::ParseError {
        file: file.to_string(),
        line: line_no,
        reason: format!("Invalid vote_average '{}': {}", vote_average, e),
    })?;

    let genre_names = parse_genres(genres).map_err(|reason| DataLoadError::ParseError {
        file: file.to_string(),
        line: line_no,
        reason,
    })?;

    Ok(Some(CatalogItem::new(title, overview, genre_names, vote_average)))
}

/// Parse the serialized genre list into names, keeping provider order.
///
/// Example: `[{"id": 28, "name": "Action"}, {"id": 12, "name": "Adventure"}]`
/// -> `["Action", "Adventure"]`
fn parse_genres(raw: &str) -> std::result::Result<Vec<String>, String> {
    let entries: Vec<GenreEntry> =
        serde_json::from_str(raw).map_err(|e| format!("Invalid genre list: {}", e))?;
    Ok(entries.into_iter().map(|g| g.name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_genres() {
        let genres =
            parse_genres(r#"[{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}]"#)
                .unwrap();
        assert_eq!(genres, vec!["Action", "Science Fiction"]);
    }

    #[test]
    fn test_parse_genres_empty_list() {
        assert!(parse_genres("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_genres_rejects_garbage() {
        assert!(parse_genres("Action|Comedy").is_err());
        assert!(parse_genres(r#"[{"id": 28}]"#).is_err());
    }

    #[test]
    fn test_column_layout_missing_column() {
        let headers = StringRecord::from(vec!["title", "overview", "genres"]);
        let err = ColumnLayout::from_headers(&headers, "movies.csv").unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { ref column, .. } if column == "vote_average"));
    }

    #[test]
    fn test_parse_row_drops_incomplete() {
        let headers = StringRecord::from(vec!["title", "overview", "genres", "vote_average"]);
        let layout = ColumnLayout::from_headers(&headers, "movies.csv").unwrap();

        let record = StringRecord::from(vec!["Avatar", "", "[]", "7.2"]);
        assert!(parse_row(&record, layout, "movies.csv", 2).unwrap().is_none());

        let record = StringRecord::from(vec!["Avatar", "Blue people.", r#"[{"name": "Action"}]"#, "7.2"]);
        let item = parse_row(&record, layout, "movies.csv", 3).unwrap().unwrap();
        assert_eq!(item.title, "Avatar");
        assert_eq!(item.content_text, "Blue people. Action");
    }
}
