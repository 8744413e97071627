//! Completion detection and progress projections.
//!
//! Everything here is recomputed from pool size and history; nothing is cached.

use serde::{Deserialize, Serialize};

use super::config::EngineConfig;
use super::history::VoteHistory;
use super::models::Candidate;

/// Matches in one single round-robin over `pool_len` candidates.
pub fn total_possible_matches(pool_len: usize) -> usize {
    pool_len * pool_len.saturating_sub(1) / 2
}

/// Matches left in the current round-robin, never negative.
pub fn remaining_matches(pool_len: usize, completed: usize) -> usize {
    total_possible_matches(pool_len).saturating_sub(completed)
}

/// Whether the scheduler should stop producing pairs.
///
/// Pools under two candidates are complete immediately. A round-robin-once
/// tournament completes when every pair has been resolved; with repeat rounds
/// it completes only after `max_rounds` full rounds, or never if unset.
/// Stopping early is the caller's decision and is not modelled here.
pub fn is_complete(pool: &[Candidate], history: &VoteHistory, config: &EngineConfig) -> bool {
    let total = total_possible_matches(pool.len());
    if total == 0 {
        return true;
    }

    let completed = history.completed_count();
    if !config.allow_repeat_rounds {
        return completed >= total;
    }

    match config.max_rounds {
        Some(rounds) => completed >= total.saturating_mul(rounds as usize),
        None => false,
    }
}

/// Snapshot of how far the current round-robin has progressed.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub completed: usize,
    pub total_possible: usize,
    pub remaining: usize,
    /// Percentage complete, one decimal place, capped at 100
    pub percentage: f64,
}

pub fn progress(pool_len: usize, history: &VoteHistory) -> Progress {
    let completed = history.completed_count();
    let total_possible = total_possible_matches(pool_len);
    let percentage = if total_possible == 0 {
        0.0
    } else {
        let raw = completed as f64 / total_possible as f64 * 100.0;
        ((raw * 10.0).round() / 10.0).min(100.0)
    };

    Progress {
        completed,
        total_possible,
        remaining: remaining_matches(pool_len, completed),
        percentage,
    }
}
