//! Statistics report data model.
//!
//! A report is a derived value: recompute it from pool and history whenever
//! it is needed and never store it as the source of truth.

use serde::{Deserialize, Serialize};

use super::insights::Insight;
use crate::tournament::CandidateId;

/// Full read-side projection of a tournament.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub total_participants: usize,
    pub completed_matches: usize,
    pub total_possible_matches: usize,
    pub remaining_matches: usize,
    /// Percent of the round-robin completed, one decimal place
    pub completion_rate: f64,
    pub ratings: RatingSummary,
    /// Candidates ordered best first
    pub standings: Vec<CandidateStanding>,
    pub tiers: Vec<TierCount>,
    pub cadence: VotingCadence,
    pub participants: ParticipantBreakdown,
    pub categories: Vec<CategoryBreakdown>,
    /// Resolved votes per UTC hour of day
    pub votes_by_hour: [usize; 24],
    pub busiest_hour: Option<u32>,
    pub longest_streak: Option<WinStreak>,
    pub insights: Vec<Insight>,
}

/// Pool-wide rating figures, rounded to whole points for display.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average: i64,
    pub min: i64,
    pub max: i64,
    pub spread: i64,
}

/// One row of the leaderboard.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStanding {
    /// 1-indexed position
    pub rank: usize,
    pub id: CandidateId,
    pub name: String,
    pub rating: i64,
    pub wins: u32,
    pub losses: u32,
    pub matches_played: u32,
    /// Percent of matches won, one decimal place
    pub win_rate: f64,
    pub tier: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierCount {
    pub name: String,
    pub min_rating: f64,
    pub count: usize,
    pub percentage: f64,
}

/// Time between consecutive resolved votes, in milliseconds.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingCadence {
    pub samples: usize,
    pub average_ms: f64,
    pub median_ms: f64,
    pub fastest_ms: i64,
    pub slowest_ms: i64,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantBreakdown {
    /// Played at least one match
    pub active: usize,
    /// Not yet played
    pub idle: usize,
    /// Won every match played
    pub undefeated: usize,
    /// Lost every match played
    pub winless: usize,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: String,
    pub candidates: usize,
    pub average_rating: i64,
    pub total_wins: u32,
    pub total_losses: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinStreak {
    pub candidate_id: CandidateId,
    pub name: String,
    pub length: usize,
}
