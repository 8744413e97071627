//! Tournament state transitions.
//!
//! [`TournamentState`] is a plain value. Each operation takes the current
//! state by reference and returns a new one, so the caller owns exactly one
//! copy and a rejected vote leaves that copy untouched.

use log::{debug, info, warn};
use serde::Serialize;

use super::completion::{self, Progress};
use super::config::EngineConfig;
use super::errors::{DataIntegrityError, EngineError, EngineResult};
use super::history::VoteHistory;
use super::models::{Candidate, CandidateId, CandidateInput, Match, Timestamp};
use super::pool;
use super::rating::{EloRating, RatingModel};
use super::scheduler;
use crate::stats::{StatisticsConfig, StatisticsReport, summarize};

/// Pool, history and the completion flag derived from them.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentState {
    pool: Vec<Candidate>,
    history: VoteHistory,
    is_complete: bool,
}

impl TournamentState {
    pub fn pool(&self) -> &[Candidate] {
        &self.pool
    }

    pub fn history(&self) -> &VoteHistory {
        &self.history
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn candidate(&self, id: &CandidateId) -> Option<&Candidate> {
        pool::find(&self.pool, id)
    }

    pub fn progress(&self) -> Progress {
        completion::progress(self.pool.len(), &self.history)
    }

    /// Split into owned pool and history, e.g. for persistence.
    pub fn into_parts(self) -> (Vec<Candidate>, VoteHistory) {
        (self.pool, self.history)
    }
}

/// Result of one recorded vote.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub resolved: Match,
    pub winner: Candidate,
    pub loser: Candidate,
    pub winner_delta: f64,
    pub loser_delta: f64,
    pub is_complete: bool,
}

/// Drives a tournament: pairing, rating, history and completion in order.
#[derive(Clone, Debug)]
pub struct TournamentEngine<R = EloRating> {
    config: EngineConfig,
    rating: R,
}

impl TournamentEngine<EloRating> {
    /// Create an engine using Elo with the configured K-factor.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let rating = EloRating::new(config.k_factor);
        Self::with_rating_model(config, rating)
    }
}

impl<R: RatingModel> TournamentEngine<R> {
    /// Create an engine around a custom rating scheme.
    pub fn with_rating_model(config: EngineConfig, rating: R) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config, rating })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rating_model(&self) -> &R {
        &self.rating
    }

    /// Start a fresh tournament from boundary records.
    pub fn start(&self, inputs: Vec<CandidateInput>) -> EngineResult<TournamentState> {
        let pool = pool::build_pool(inputs, &self.config)?;
        info!("Starting tournament with {} candidates", pool.len());
        Ok(self.assemble(pool, VoteHistory::new()))
    }

    /// Resume from a persisted pool and history.
    ///
    /// Tallies are taken as given; use [`TournamentEngine::replay`] to rebuild
    /// them from the initial pool instead.
    pub fn resume(&self, pool: Vec<Candidate>, history: VoteHistory) -> EngineResult<TournamentState> {
        pool::validate_pool(&pool)?;
        history.validate_against(&pool)?;
        history.validate_meetings(self.config.meeting_limit())?;
        Ok(self.assemble(pool, history))
    }

    /// Rebuild ratings and tallies by re-applying `history` to a fresh pool.
    pub fn replay(&self, inputs: Vec<CandidateInput>, history: VoteHistory) -> EngineResult<TournamentState> {
        let mut pool = pool::build_pool(inputs, &self.config)?;
        history.validate_against(&pool)?;
        history.validate_meetings(self.config.meeting_limit())?;

        for entry in &history {
            let winner = entry
                .winner
                .as_ref()
                .ok_or_else(|| DataIntegrityError::UnresolvedMatch {
                    candidate_a: entry.candidate_a.clone(),
                    candidate_b: entry.candidate_b.clone(),
                })?;
            let a = pool::require(&pool, &entry.candidate_a)?;
            let b = pool::require(&pool, &entry.candidate_b)?;
            let (updated_a, updated_b) = self.rating.apply_result(a, b, winner)?;
            pool = pool::merge(&pool, &[&updated_a, &updated_b]);
        }

        debug!("Replayed {} matches", history.len());
        Ok(self.assemble(pool, history))
    }

    /// Suggest the next pair to vote on, or `None` once complete.
    pub fn next_pair(&self, state: &TournamentState) -> EngineResult<Option<(Candidate, Candidate)>> {
        if state.is_complete {
            return Ok(None);
        }
        scheduler::next_pair(&state.pool, &state.history, &self.config)
    }

    /// Record a vote and return the successor state.
    ///
    /// Rating update, history append and completion check run in that order.
    ///
    /// # Errors
    ///
    /// * [`EngineError::TournamentComplete`] if `state` is already complete
    /// * [`EngineError::InvalidVote`] if `winner` is not `candidate_a` or `candidate_b`
    /// * [`EngineError::DataIntegrity`] for unknown ids, self matches, a pair
    ///   that has already met as often as the configuration allows, or a
    ///   timestamp earlier than the last vote
    pub fn record_vote(
        &self,
        state: &TournamentState,
        candidate_a: &CandidateId,
        candidate_b: &CandidateId,
        winner: &CandidateId,
        timestamp: Timestamp,
    ) -> EngineResult<(TournamentState, VoteOutcome)> {
        if state.is_complete {
            return Err(EngineError::TournamentComplete);
        }

        let a = pool::require(&state.pool, candidate_a)?;
        let b = pool::require(&state.pool, candidate_b)?;

        if let Some(limit) = self.config.meeting_limit() {
            let meetings = state.history.play_count(candidate_a, candidate_b);
            if meetings >= limit {
                warn!("Rejected vote on {candidate_a} vs {candidate_b}: met {meetings} time(s)");
                return Err(DataIntegrityError::PairAlreadyPlayed {
                    candidate_a: candidate_a.clone(),
                    candidate_b: candidate_b.clone(),
                    meetings,
                }
                .into());
            }
        }

        let (updated_a, updated_b) = self.rating.apply_result(a, b, winner)?;

        let resolved = Match::resolved(
            candidate_a.clone(),
            candidate_b.clone(),
            winner.clone(),
            timestamp,
        );
        let history = state.history.append(resolved.clone())?;
        let pool = pool::merge(&state.pool, &[&updated_a, &updated_b]);
        let next = self.assemble(pool, history);

        let (winner_before, loser_before, winner_after, loser_after) = if winner == candidate_a {
            (a, b, updated_a, updated_b)
        } else {
            (b, a, updated_b, updated_a)
        };

        let outcome = VoteOutcome {
            resolved,
            winner_delta: winner_after.rating() - winner_before.rating(),
            loser_delta: loser_after.rating() - loser_before.rating(),
            winner: winner_after,
            loser: loser_after,
            is_complete: next.is_complete,
        };

        if next.is_complete {
            info!(
                "Tournament complete after {} matches",
                next.history.completed_count()
            );
        }

        Ok((next, outcome))
    }

    /// Compute the statistics report for `state`.
    pub fn summarize(&self, state: &TournamentState, config: &StatisticsConfig) -> StatisticsReport {
        summarize(&state.pool, &state.history, config)
    }

    fn assemble(&self, pool: Vec<Candidate>, history: VoteHistory) -> TournamentState {
        let is_complete = completion::is_complete(&pool, &history, &self.config);
        TournamentState {
            pool,
            history,
            is_complete,
        }
    }
}
