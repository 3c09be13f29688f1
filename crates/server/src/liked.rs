//! Liked-Set Manager
//!
//! In-memory set of liked titles backed by a `LikedStore`. Every change is
//! written through to the store before the call returns, so memory and
//! storage never disagree: if the write fails the change is undone and the
//! error is returned.

use data_loader::{DataLoadError, LikedStore, Result};
use std::collections::BTreeSet;
use tracing::{debug, info};

pub struct LikedSet {
    titles: BTreeSet<String>,
    store: Box<dyn LikedStore>,
}

impl LikedSet {
    /// Load the persisted titles from `store`
    pub fn load(store: impl LikedStore + 'static) -> Result<Self> {
        let titles = store.load()?;
        info!("Loaded {} liked titles", titles.len());
        Ok(Self {
            titles,
            store: Box::new(store),
        })
    }

    /// Add `title`. Returns `Ok(false)` if it was already liked.
    ///
    /// Titles with line breaks or surrounding whitespace are rejected, since
    /// the store could not read them back unchanged.
    pub fn like(&mut self, title: &str) -> Result<bool> {
        if title.is_empty() || title.trim() != title || title.contains(['\n', '\r']) {
            return Err(DataLoadError::InvalidValue {
                field: "liked title".to_string(),
                value: format!("{:?}", title),
            });
        }
        if !self.titles.insert(title.to_string()) {
            return Ok(false);
        }
        if let Err(e) = self.store.save(&self.titles) {
            self.titles.remove(title);
            return Err(e);
        }
        debug!("Liked '{}'", title);
        Ok(true)
    }

    /// Remove `title`. Returns `Ok(false)` if it was not liked.
    pub fn unlike(&mut self, title: &str) -> Result<bool> {
        if !self.titles.remove(title) {
            return Ok(false);
        }
        if let Err(e) = self.store.save(&self.titles) {
            self.titles.insert(title.to_string());
            return Err(e);
        }
        debug!("Unliked '{}'", title);
        Ok(true)
    }

    /// Every liked title, sorted
    pub fn all(&self) -> Vec<String> {
        self.titles.iter().cloned().collect()
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    pub fn titles(&self) -> &BTreeSet<String> {
        &self.titles
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }
}
