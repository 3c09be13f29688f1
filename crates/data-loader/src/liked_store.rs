//! Persistence for the liked-set.
//!
//! The on-disk format is a plain text file with one title per line. Every
//! save writes a sibling temp file and renames it over the old one, so a
//! failed save leaves the previous list in place.

use crate::error::Result;
use std::collections::BTreeSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Storage backend for the liked titles.
///
/// Titles are stored one per line and trimmed on load, so a title must not
/// contain line breaks or surrounding whitespace.
///
/// `Send + Sync` so a store can sit behind a shared liked-set manager.
pub trait LikedStore: Send + Sync {
    /// Load every persisted title
    fn load(&self) -> Result<BTreeSet<String>>;

    /// Replace the persisted titles with `titles`
    fn save(&self, titles: &BTreeSet<String>) -> Result<()>;
}

/// Newline-delimited file store
#[derive(Debug, Clone)]
pub struct FileLikedStore {
    path: PathBuf,
}

impl FileLikedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LikedStore for FileLikedStore {
    fn load(&self) -> Result<BTreeSet<String>> {
        // No file yet means nothing has been liked
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }

        let content = fs::read_to_string(&self.path)?;
        let titles: BTreeSet<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        debug!("Loaded {} liked titles from {:?}", titles.len(), self.path);
        Ok(titles)
    }

    fn save(&self, titles: &BTreeSet<String>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            for title in titles {
                writeln!(writer, "{}", title)?;
            }
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!("Saved {} liked titles to {:?}", titles.len(), self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = FileLikedStore::new(dir.path().join("liked_movies.txt"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let store = FileLikedStore::new(dir.path().join("liked_movies.txt"));

        let titles: BTreeSet<String> = ["Up", "Heat", "Avatar"].iter().map(|s| s.to_string()).collect();
        store.save(&titles).unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert_eq!(content, "Avatar\nHeat\nUp\n");
        assert_eq!(store.load().unwrap(), titles);
    }

    #[test]
    fn test_load_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("liked_movies.txt");
        fs::write(&path, "Up\n\n  Heat  \n").unwrap();

        let titles = FileLikedStore::new(&path).load().unwrap();
        assert_eq!(titles.len(), 2);
        assert!(titles.contains("Heat"));
    }

    #[test]
    fn test_save_rewrites_in_full() {
        let dir = tempdir().unwrap();
        let store = FileLikedStore::new(dir.path().join("liked_movies.txt"));

        let first: BTreeSet<String> = ["Up", "Heat"].iter().map(|s| s.to_string()).collect();
        store.save(&first).unwrap();
        let second: BTreeSet<String> = ["Up"].iter().map(|s| s.to_string()).collect();
        store.save(&second).unwrap();

        assert_eq!(store.load().unwrap(), second);
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let store = FileLikedStore::new(dir.path().join("liked_movies.txt"));

        let titles: BTreeSet<String> = ["Up", "Heat"].iter().map(|s| s.to_string()).collect();
        store.save(&titles).unwrap();
        store.save(&titles).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["liked_movies.txt"]);
    }

    #[test]
    fn test_failed_save_keeps_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("liked_movies.txt");
        let store = FileLikedStore::new(&path);

        let first: BTreeSet<String> = ["Up", "Heat"].iter().map(|s| s.to_string()).collect();
        store.save(&first).unwrap();

        // A store pointed at an occupied directory cannot replace it
        let blocked = dir.path().join("blocked");
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep.txt"), "x").unwrap();
        let blocked_store = FileLikedStore::new(&blocked);
        let second: BTreeSet<String> = ["Avatar"].iter().map(|s| s.to_string()).collect();
        assert!(blocked_store.save(&second).is_err());

        // Nothing was truncated and no temp file was left behind
        assert!(blocked.is_dir());
        assert_eq!(fs::read_to_string(blocked.join("keep.txt")).unwrap(), "x");
        assert_eq!(store.load().unwrap(), first);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let store = FileLikedStore::new(dir.path().join("nope").join("liked_movies.txt"));

        let titles: BTreeSet<String> = ["Up"].iter().map(|s| s.to_string()).collect();
        assert!(store.save(&titles).is_err());
        assert!(!store.path().exists());
    }
}
