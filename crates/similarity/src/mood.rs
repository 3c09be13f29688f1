//! Mood Source - Genre-driven Discovery
//!
//! Generates candidates for a mood instead of a query item:
//! every item carrying at least one of the mood's genres, ranked by vote
//! average. There is no item to compare against, so similarity plays no
//! part here.

use crate::types::{sort_by_score_desc, Candidate, CandidateSource};
use data_loader::Corpus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, instrument};

/// The fixed set of moods a user can pick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Sad,
    Romantic,
    Excited,
    Relaxed,
    Thriller,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Romantic,
        Mood::Excited,
        Mood::Relaxed,
        Mood::Thriller,
    ];

    /// Genre names mapped to this mood (never empty)
    pub fn genres(self) -> &'static [&'static str] {
        match self {
            Mood::Happy => &["Comedy", "Family", "Animation"],
            Mood::Sad => &["Drama"],
            Mood::Romantic => &["Romance"],
            Mood::Excited => &["Action", "Adventure"],
            Mood::Relaxed => &["Fantasy", "Music"],
            Mood::Thriller => &["Thriller", "Crime", "Mystery"],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Romantic => "Romantic",
            Mood::Excited => "Excited",
            Mood::Relaxed => "Relaxed",
            Mood::Thriller => "Thriller",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a mood key is not one of the known moods
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown mood '{0}' (expected one of: Happy, Sad, Romantic, Excited, Relaxed, Thriller)")]
pub struct ParseMoodError(pub String);

impl FromStr for Mood {
    type Err = ParseMoodError;

    /// Case-insensitive match on the mood name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Mood::ALL
            .into_iter()
            .find(|mood| mood.name().eq_ignore_ascii_case(key))
            .ok_or_else(|| ParseMoodError(s.to_string()))
    }
}

/// Mood source ranks genre matches by vote average
#[derive(Clone)]
pub struct MoodSource {
    corpus: Arc<Corpus>,
}

impl MoodSource {
    pub fn new(corpus: Arc<Corpus>) -> Self {
        Self { corpus }
    }

    /// Every item sharing a genre with `mood`, best rated first.
    ///
    /// Scores are vote averages; equal ratings keep corpus order.
    #[instrument(skip(self), fields(mood = %mood))]
    pub fn candidates(&self, mood: Mood) -> Vec<Candidate> {
        let mut candidates: Vec<Candidate> = self
            .corpus
            .indices_with_any_genre(mood.genres())
            .into_iter()
            .filter_map(|index| {
                let item = self.corpus.get(index)?;
                Some(Candidate::new(index, CandidateSource::Mood, item.vote_average))
            })
            .collect();

        sort_by_score_desc(&mut candidates);
        debug!("Generated {} mood candidates", candidates.len());
        candidates
    }
}
