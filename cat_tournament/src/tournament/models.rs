//! Tournament data models: candidates, matches and pair keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::errors::{EngineError, EngineResult};

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// Current wall-clock time as a [`Timestamp`].
pub fn now_millis() -> Timestamp {
    Utc::now().timestamp_millis()
}

/// Opaque candidate identifier.
///
/// The name catalog hands out both numeric and UUID-style ids, so the id is
/// stored as text and deserializes from either a JSON string or integer.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct CandidateId(String);

impl CandidateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for CandidateId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for CandidateId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for CandidateId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// Candidate record as supplied by the calling application.
///
/// Rating and tallies are optional; missing values fall back to the engine
/// defaults when the record is converted into a [`Candidate`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInput {
    pub id: CandidateId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wins: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub losses: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

impl CandidateInput {
    pub fn new(id: impl Into<CandidateId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rating: None,
            wins: None,
            losses: None,
            categories: Vec::new(),
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_record(mut self, wins: u32, losses: u32) -> Self {
        self.wins = Some(wins);
        self.losses = Some(losses);
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }
}

/// A name entity eligible for pairwise comparison within one tournament.
///
/// Rating and win/loss tallies can only change through a
/// [`RatingModel`](super::rating::RatingModel).
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    rating: f64,
    wins: u32,
    losses: u32,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Candidate {
    /// Create a candidate with a clean record.
    pub fn new(id: impl Into<CandidateId>, name: impl Into<String>, rating: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            rating,
            wins: 0,
            losses: 0,
            categories: Vec::new(),
        }
    }

    /// Convert a boundary record, filling in `default_rating` when absent.
    pub fn from_input(input: CandidateInput, default_rating: f64) -> Self {
        Self {
            id: input.id,
            name: input.name.trim().to_string(),
            rating: input.rating.unwrap_or(default_rating),
            wins: input.wins.unwrap_or(0),
            losses: input.losses.unwrap_or(0),
            categories: input.categories,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn rating(&self) -> f64 {
        self.rating
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn matches_played(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }

    /// Fraction of matches won, 0.0 when the candidate has not played.
    pub fn win_rate(&self) -> f64 {
        match self.matches_played() {
            0 => 0.0,
            played => f64::from(self.wins) / f64::from(played),
        }
    }

    pub(crate) fn record_win(&mut self, new_rating: f64) {
        self.rating = new_rating;
        self.wins = self.wins.saturating_add(1);
    }

    pub(crate) fn record_loss(&mut self, new_rating: f64) {
        self.rating = new_rating;
        self.losses = self.losses.saturating_add(1);
    }
}

/// Unordered pair of candidate ids; `(a, b)` and `(b, a)` produce the same key.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PairKey(CandidateId, CandidateId);

impl PairKey {
    pub fn new(a: &CandidateId, b: &CandidateId) -> Self {
        if a <= b {
            Self(a.clone(), b.clone())
        } else {
            Self(b.clone(), a.clone())
        }
    }

    pub fn first(&self) -> &CandidateId {
        &self.0
    }

    pub fn second(&self) -> &CandidateId {
        &self.1
    }
}

/// One pairwise comparison, pending while `winner` is `None`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub candidate_a: CandidateId,
    pub candidate_b: CandidateId,
    pub winner: Option<CandidateId>,
    pub timestamp: Timestamp,
}

impl Match {
    pub fn pending(candidate_a: CandidateId, candidate_b: CandidateId, timestamp: Timestamp) -> Self {
        Self {
            candidate_a,
            candidate_b,
            winner: None,
            timestamp,
        }
    }

    pub fn resolved(
        candidate_a: CandidateId,
        candidate_b: CandidateId,
        winner: CandidateId,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            candidate_a,
            candidate_b,
            winner: Some(winner),
            timestamp,
        }
    }

    /// Resolve a pending match in favour of `winner`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidVote`] when `winner` is not one of the
    /// two paired candidates.
    pub fn resolve(mut self, winner: &CandidateId) -> EngineResult<Self> {
        if !self.involves(winner) {
            return Err(EngineError::InvalidVote {
                winner: winner.clone(),
                candidate_a: self.candidate_a,
                candidate_b: self.candidate_b,
            });
        }
        self.winner = Some(winner.clone());
        Ok(self)
    }

    pub fn is_resolved(&self) -> bool {
        self.winner.is_some()
    }

    pub fn involves(&self, id: &CandidateId) -> bool {
        &self.candidate_a == id || &self.candidate_b == id
    }

    pub fn pair_key(&self) -> PairKey {
        PairKey::new(&self.candidate_a, &self.candidate_b)
    }

    pub fn opponent_of(&self, id: &CandidateId) -> Option<&CandidateId> {
        if &self.candidate_a == id {
            Some(&self.candidate_b)
        } else if &self.candidate_b == id {
            Some(&self.candidate_a)
        } else {
            None
        }
    }

    pub fn loser(&self) -> Option<&CandidateId> {
        self.winner.as_ref().and_then(|winner| self.opponent_of(winner))
    }

    pub fn resolved_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}
