//! Pair selection for the next vote.

use log::debug;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::completion::is_complete;
use super::config::EngineConfig;
use super::errors::EngineResult;
use super::history::VoteHistory;
use super::models::{Candidate, PairKey};
use super::pool::validate_pool;

/// Pick the next two candidates to compare.
///
/// Pairs that have met the fewest times are eligible; under the default
/// round-robin-once policy that means pairs which have never met, and `None`
/// once they are exhausted. With repeat rounds enabled the pair from the most
/// recent vote is skipped whenever another eligible pair exists.
///
/// Selection among eligible pairs is random but seeded from
/// `config.pairing_seed` and the history length, so identical inputs always
/// produce the identical pair, including which side is shown first.
///
/// # Errors
///
/// Returns a data integrity error for duplicate ids, blank names, history
/// entries that reference candidates outside `pool`, or pairs that met more
/// often than the configuration allows.
pub fn next_pair(
    pool: &[Candidate],
    history: &VoteHistory,
    config: &EngineConfig,
) -> EngineResult<Option<(Candidate, Candidate)>> {
    if pool.len() < 2 {
        return Ok(None);
    }

    validate_pool(pool)?;
    history.validate_against(pool)?;
    history.validate_meetings(config.meeting_limit())?;

    if is_complete(pool, history, config) {
        return Ok(None);
    }

    let counts = history.pair_counts();
    let mut pairs = Vec::with_capacity(pool.len() * (pool.len() - 1) / 2);
    for (i, first) in pool.iter().enumerate() {
        for (j, second) in pool.iter().enumerate().skip(i + 1) {
            let played = counts
                .get(&PairKey::new(&first.id, &second.id))
                .copied()
                .unwrap_or(0);
            pairs.push((i, j, played));
        }
    }

    let Some(fewest) = pairs.iter().map(|&(_, _, played)| played).min() else {
        return Ok(None);
    };

    if fewest > 0 && !config.allow_repeat_rounds {
        debug!("Round-robin exhausted after {} matches", history.len());
        return Ok(None);
    }

    let mut eligible: Vec<(usize, usize)> = pairs
        .into_iter()
        .filter(|&(_, _, played)| played == fewest)
        .map(|(i, j, _)| (i, j))
        .collect();

    if eligible.len() > 1
        && let Some(last) = history.last()
    {
        let last_key = last.pair_key();
        eligible.retain(|&(i, j)| PairKey::new(&pool[i].id, &pool[j].id) != last_key);
    }

    let mut rng = StdRng::seed_from_u64(mix_seed(config.pairing_seed, history.len()));
    let (i, j) = eligible[rng.random_range(0..eligible.len())];
    let (left, right) = if rng.random_bool(0.5) { (j, i) } else { (i, j) };

    debug!(
        "Next pair: {} vs {} ({} eligible, met {} times)",
        pool[left].id,
        pool[right].id,
        eligible.len(),
        fewest
    );

    Ok(Some((pool[left].clone(), pool[right].clone())))
}

fn mix_seed(seed: u64, completed: usize) -> u64 {
    seed ^ (completed as u64).wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::errors::{DataIntegrityError, EngineError};
    use crate::tournament::models::{CandidateId, Match};
    use std::collections::HashSet;

    fn pool(names: &[&str]) -> Vec<Candidate> {
        names
            .iter()
            .map(|name| Candidate::new(*name, name.to_uppercase(), 1500.0))
            .collect()
    }

    fn play(history: &VoteHistory, pair: &(Candidate, Candidate)) -> VoteHistory {
        let ts = history.len() as i64;
        history
            .append(Match::resolved(pair.0.id.clone(), pair.1.id.clone(), pair.0.id.clone(), ts))
            .unwrap()
    }

    #[test]
    fn test_small_pools_yield_nothing() {
        let config = EngineConfig::default();
        assert!(next_pair(&[], &VoteHistory::new(), &config).unwrap().is_none());
        assert!(next_pair(&pool(&["a"]), &VoteHistory::new(), &config).unwrap().is_none());
    }

    #[test]
    fn test_same_inputs_same_pair() {
        let config = EngineConfig::default().with_pairing_seed(7);
        let candidates = pool(&["a", "b", "c", "d", "e"]);
        let history = VoteHistory::new();
        let first = next_pair(&candidates, &history, &config).unwrap().unwrap();
        let second = next_pair(&candidates, &history, &config).unwrap().unwrap();
        assert_eq!(first, second);
        assert_ne!(first.0.id, first.1.id);
    }

    #[test]
    fn test_never_repeats_within_round_robin() {
        let config = EngineConfig::default().with_pairing_seed(99);
        let candidates = pool(&["a", "b", "c", "d", "e", "f"]);
        let mut history = VoteHistory::new();
        let mut seen = HashSet::new();

        while let Some(pair) = next_pair(&candidates, &history, &config).unwrap() {
            assert!(!history.has_played(&pair.0.id, &pair.1.id));
            assert!(seen.insert(PairKey::new(&pair.0.id, &pair.1.id)));
            history = play(&history, &pair);
        }

        assert_eq!(history.len(), 15);
    }

    #[test]
    fn test_repeat_rounds_continue_and_avoid_immediate_repeat() {
        let config = EngineConfig::default().with_repeat_rounds(Some(3));
        let candidates = pool(&["a", "b", "c"]);
        let mut history = VoteHistory::new();

        while let Some(pair) = next_pair(&candidates, &history, &config).unwrap() {
            if let Some(last) = history.last() {
                assert_ne!(last.pair_key(), PairKey::new(&pair.0.id, &pair.1.id));
            }
            history = play(&history, &pair);
        }

        assert_eq!(history.len(), 9);
        for count in history.pair_counts().values() {
            assert_eq!(*count, 3);
        }
    }

    #[test]
    fn test_two_candidates_may_repeat_when_no_alternative() {
        let config = EngineConfig::default().with_repeat_rounds(Some(2));
        let candidates = pool(&["a", "b"]);
        let first = next_pair(&candidates, &VoteHistory::new(), &config).unwrap().unwrap();
        let history = play(&VoteHistory::new(), &first);
        assert!(next_pair(&candidates, &history, &config).unwrap().is_some());
    }

    #[test]
    fn test_different_seeds_can_differ() {
        let candidates = pool(&["a", "b", "c", "d", "e", "f", "g", "h"]);
        let history = VoteHistory::new();
        let picks: HashSet<PairKey> = (0..16)
            .map(|seed| {
                let config = EngineConfig::default().with_pairing_seed(seed);
                let (a, b) = next_pair(&candidates, &history, &config).unwrap().unwrap();
                PairKey::new(&a.id, &b.id)
            })
            .collect();
        assert!(picks.len() > 1);
    }

    #[test]
    fn test_duplicate_ids_are_integrity_errors() {
        let mut candidates = pool(&["a", "b"]);
        candidates.push(Candidate::new("a", "Impostor", 1500.0));
        let err = next_pair(&candidates, &VoteHistory::new(), &EngineConfig::default()).unwrap_err();
        assert_eq!(
            err,
            EngineError::DataIntegrity(DataIntegrityError::DuplicateCandidate("a".into()))
        );
    }

    #[test]
    fn test_history_with_unknown_id_is_integrity_error() {
        let candidates = pool(&["a", "b"]);
        let history = VoteHistory::new()
            .append(Match::resolved("a".into(), CandidateId::from("x"), "a".into(), 0))
            .unwrap();
        let err = next_pair(&candidates, &history, &EngineConfig::default()).unwrap_err();
        assert_eq!(
            err,
            EngineError::DataIntegrity(DataIntegrityError::UnknownCandidate("x".into()))
        );
    }
}
