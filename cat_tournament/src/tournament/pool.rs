//! Candidate pool construction and validation.

use std::collections::HashSet;

use super::config::EngineConfig;
use super::errors::{DataIntegrityError, EngineResult, IntegrityResult};
use super::models::{Candidate, CandidateId, CandidateInput};

/// Build a validated pool from boundary records.
///
/// Names are trimmed, missing ratings take `config.default_rating` and missing
/// tallies start at zero. Pool order is preserved; the scheduler relies on it.
pub fn build_pool(inputs: Vec<CandidateInput>, config: &EngineConfig) -> EngineResult<Vec<Candidate>> {
    let pool: Vec<Candidate> = inputs
        .into_iter()
        .map(|input| Candidate::from_input(input, config.default_rating))
        .collect();
    validate_pool(&pool)?;
    Ok(pool)
}

/// Check ids are unique, names non-empty and ratings finite.
pub fn validate_pool(pool: &[Candidate]) -> IntegrityResult<()> {
    let mut seen = HashSet::with_capacity(pool.len());
    for candidate in pool {
        if !seen.insert(&candidate.id) {
            return Err(DataIntegrityError::DuplicateCandidate(candidate.id.clone()));
        }
        if candidate.name.trim().is_empty() {
            return Err(DataIntegrityError::EmptyName(candidate.id.clone()));
        }
        if !candidate.rating().is_finite() {
            return Err(DataIntegrityError::NonFiniteRating(candidate.id.clone()));
        }
    }
    Ok(())
}

pub fn find<'a>(pool: &'a [Candidate], id: &CandidateId) -> Option<&'a Candidate> {
    pool.iter().find(|candidate| &candidate.id == id)
}

/// Look up a candidate, treating a miss as an integrity failure.
pub fn require<'a>(pool: &'a [Candidate], id: &CandidateId) -> IntegrityResult<&'a Candidate> {
    find(pool, id).ok_or_else(|| DataIntegrityError::UnknownCandidate(id.clone()))
}

/// Return a copy of `pool` with `updated` candidates swapped in by id.
pub(crate) fn merge(pool: &[Candidate], updated: &[&Candidate]) -> Vec<Candidate> {
    pool.iter()
        .map(|candidate| {
            updated
                .iter()
                .find(|replacement| replacement.id == candidate.id)
                .map_or_else(|| candidate.clone(), |replacement| (*replacement).clone())
        })
        .collect()
}
