//! Append-only log of resolved matches.
//!
//! Queries are plain linear scans; pools are a few dozen names at most.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::errors::{DataIntegrityError, IntegrityResult};
use super::models::{Candidate, CandidateId, Match, PairKey};

/// Ordered record of every resolved match in one tournament.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct VoteHistory {
    matches: Vec<Match>,
}

impl VoteHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from persisted matches, checking each one as if it were
    /// appended in order.
    pub fn from_matches(matches: Vec<Match>) -> IntegrityResult<Self> {
        let mut history = Self::new();
        for entry in matches {
            history.check_entry(&entry)?;
            history.matches.push(entry);
        }
        Ok(history)
    }

    /// Return a new history with `entry` appended.
    ///
    /// # Errors
    ///
    /// Fails when the match is unresolved, pairs a candidate with itself,
    /// names a winner outside the pair, or is timestamped before the last
    /// entry. Equal timestamps are accepted.
    pub fn append(&self, entry: Match) -> IntegrityResult<Self> {
        self.check_entry(&entry)?;
        let mut matches = Vec::with_capacity(self.matches.len() + 1);
        matches.extend_from_slice(&self.matches);
        matches.push(entry);
        Ok(Self { matches })
    }

    fn check_entry(&self, entry: &Match) -> IntegrityResult<()> {
        check_structure(entry, self.matches.last())
    }

    /// Check every entry against `pool` and against the entry before it.
    ///
    /// Histories deserialized from storage bypass [`VoteHistory::append`], so
    /// this repeats its checks as well as confirming every id is in the pool.
    pub fn validate_against(&self, pool: &[Candidate]) -> IntegrityResult<()> {
        let known: HashSet<&CandidateId> = pool.iter().map(|candidate| &candidate.id).collect();
        let mut previous = None;
        for entry in &self.matches {
            check_structure(entry, previous)?;
            for id in [&entry.candidate_a, &entry.candidate_b] {
                if !known.contains(id) {
                    return Err(DataIntegrityError::UnknownCandidate(id.clone()));
                }
            }
            previous = Some(entry);
        }
        Ok(())
    }

    /// Check that no pair meets more than `limit` times.
    ///
    /// Completion counts matches, so a history that repeats a pair beyond the
    /// limit could otherwise finish with some pairs never having met.
    pub fn validate_meetings(&self, limit: Option<usize>) -> IntegrityResult<()> {
        let Some(limit) = limit else {
            return Ok(());
        };

        let mut counts: BTreeMap<PairKey, usize> = BTreeMap::new();
        for entry in &self.matches {
            let count = counts.entry(entry.pair_key()).or_insert(0);
            if *count >= limit {
                return Err(DataIntegrityError::PairAlreadyPlayed {
                    candidate_a: entry.candidate_a.clone(),
                    candidate_b: entry.candidate_b.clone(),
                    meetings: *count,
                });
            }
            *count += 1;
        }
        Ok(())
    }

    /// Whether the two candidates have met, in either order.
    pub fn has_played(&self, a: &CandidateId, b: &CandidateId) -> bool {
        self.matches
            .iter()
            .any(|entry| entry.involves(a) && entry.involves(b) && a != b)
    }

    /// Number of times the two candidates have met, in either order.
    pub fn play_count(&self, a: &CandidateId, b: &CandidateId) -> usize {
        if a == b {
            return 0;
        }
        self.matches
            .iter()
            .filter(|entry| entry.involves(a) && entry.involves(b))
            .count()
    }

    /// Meeting counts for every pair that has played at least once.
    pub fn pair_counts(&self) -> BTreeMap<PairKey, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.matches {
            *counts.entry(entry.pair_key()).or_insert(0) += 1;
        }
        counts
    }

    pub fn completed_count(&self) -> usize {
        self.matches.iter().filter(|entry| entry.is_resolved()).count()
    }

    pub fn matches_for<'a>(&'a self, id: &'a CandidateId) -> impl Iterator<Item = &'a Match> + 'a {
        self.matches.iter().filter(move |entry| entry.involves(id))
    }

    pub fn last(&self) -> Option<&Match> {
        self.matches.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }

    pub fn as_slice(&self) -> &[Match] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

fn check_structure(entry: &Match, previous: Option<&Match>) -> IntegrityResult<()> {
    if entry.candidate_a == entry.candidate_b {
        return Err(DataIntegrityError::SelfMatch(entry.candidate_a.clone()));
    }

    let Some(winner) = &entry.winner else {
        return Err(DataIntegrityError::UnresolvedMatch {
            candidate_a: entry.candidate_a.clone(),
            candidate_b: entry.candidate_b.clone(),
        });
    };

    if !entry.involves(winner) {
        return Err(DataIntegrityError::WinnerNotInMatch {
            winner: winner.clone(),
            candidate_a: entry.candidate_a.clone(),
            candidate_b: entry.candidate_b.clone(),
        });
    }

    if let Some(previous) = previous
        && entry.timestamp < previous.timestamp
    {
        return Err(DataIntegrityError::TimestampRegression {
            previous: previous.timestamp,
            next: entry.timestamp,
        });
    }

    Ok(())
}

impl<'a> IntoIterator for &'a VoteHistory {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(a: &str, b: &str, winner: &str, ts: i64) -> Match {
        Match::resolved(a.into(), b.into(), winner.into(), ts)
    }

    #[test]
    fn test_append_leaves_original_untouched() {
        let empty = VoteHistory::new();
        let one = empty.append(vote("a", "b", "a", 10)).unwrap();
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
        assert_eq!(one.completed_count(), 1);
    }

    #[test]
    fn test_append_rejects_pending_match() {
        let err = VoteHistory::new()
            .append(Match::pending("a".into(), "b".into(), 0))
            .unwrap_err();
        assert!(matches!(err, DataIntegrityError::UnresolvedMatch { .. }));
    }

    #[test]
    fn test_append_rejects_self_match() {
        let err = VoteHistory::new().append(vote("a", "a", "a", 0)).unwrap_err();
        assert_eq!(err, DataIntegrityError::SelfMatch("a".into()));
    }

    #[test]
    fn test_append_rejects_foreign_winner() {
        let err = VoteHistory::new().append(vote("a", "b", "c", 0)).unwrap_err();
        assert!(matches!(err, DataIntegrityError::WinnerNotInMatch { .. }));
    }

    #[test]
    fn test_timestamps_may_tie_but_not_regress() {
        let history = VoteHistory::new().append(vote("a", "b", "a", 100)).unwrap();
        let tied = history.append(vote("a", "c", "c", 100)).unwrap();
        assert_eq!(tied.len(), 2);

        let err = tied.append(vote("b", "c", "b", 99)).unwrap_err();
        assert_eq!(
            err,
            DataIntegrityError::TimestampRegression {
                previous: 100,
                next: 99
            }
        );
    }

    #[test]
    fn test_has_played_is_symmetric() {
        let history = VoteHistory::from_matches(vec![vote("a", "b", "b", 1)]).unwrap();
        let (a, b, c): (CandidateId, CandidateId, CandidateId) = ("a".into(), "b".into(), "c".into());
        assert!(history.has_played(&a, &b));
        assert!(history.has_played(&b, &a));
        assert!(!history.has_played(&a, &c));
        assert!(!history.has_played(&a, &a));
    }

    #[test]
    fn test_play_and_pair_counts() {
        let history = VoteHistory::from_matches(vec![
            vote("a", "b", "a", 1),
            vote("b", "a", "b", 2),
            vote("a", "c", "a", 3),
        ])
        .unwrap();
        assert_eq!(history.play_count(&"a".into(), &"b".into()), 2);
        assert_eq!(history.play_count(&"c".into(), &"a".into()), 1);

        let counts = history.pair_counts();
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&PairKey::new(&"b".into(), &"a".into())], 2);
        assert_eq!(history.matches_for(&"c".into()).count(), 1);
    }

    #[test]
    fn test_validate_against_unknown_candidate() {
        let history = VoteHistory::from_matches(vec![vote("a", "ghost", "a", 1)]).unwrap();
        let pool = vec![Candidate::new("a", "A", 1500.0)];
        assert_eq!(
            history.validate_against(&pool).unwrap_err(),
            DataIntegrityError::UnknownCandidate("ghost".into())
        );
    }

    #[test]
    fn test_validate_against_catches_tampered_entries() {
        let json = r#"[
            {"candidateA": "a", "candidateB": "b", "winner": "a", "timestamp": 5},
            {"candidateA": "a", "candidateB": "b", "winner": null, "timestamp": 6}
        ]"#;
        let history: VoteHistory = serde_json::from_str(json).unwrap();
        let pool = vec![Candidate::new("a", "A", 1500.0), Candidate::new("b", "B", 1500.0)];
        assert!(matches!(
            history.validate_against(&pool).unwrap_err(),
            DataIntegrityError::UnresolvedMatch { .. }
        ));
    }

    #[test]
    fn test_validate_meetings_limits_each_pair() {
        let history = VoteHistory::from_matches(vec![
            vote("a", "b", "a", 1),
            vote("a", "c", "c", 2),
            vote("b", "a", "b", 3),
        ])
        .unwrap();

        assert!(history.validate_meetings(None).is_ok());
        assert!(history.validate_meetings(Some(2)).is_ok());
        assert_eq!(
            history.validate_meetings(Some(1)).unwrap_err(),
            DataIntegrityError::PairAlreadyPlayed {
                candidate_a: "b".into(),
                candidate_b: "a".into(),
                meetings: 1,
            }
        );
    }

    #[test]
    fn test_from_matches_rejects_out_of_order_entries() {
        let err = VoteHistory::from_matches(vec![vote("a", "b", "a", 5), vote("a", "c", "a", 4)])
            .unwrap_err();
        assert!(matches!(err, DataIntegrityError::TimestampRegression { .. }));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let history = VoteHistory::from_matches(vec![vote("1", "2", "2", 7)]).unwrap();
        let json = serde_json::to_value(&history).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["winner"], "2");
    }
}
