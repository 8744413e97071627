//! Simulated voters.
//!
//! A voter picks between the two offered names with the probability the
//! rating model assigns to each side, then "thinks" for a random interval
//! before the next vote. With a fixed seed the whole run is reproducible.

use cat_tournament::tournament::Timestamp;
use cat_tournament::{EngineResult, RatingModel, TournamentEngine, TournamentState};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Voter timing configuration
#[derive(Debug, Clone)]
pub struct VoterConfig {
    /// Shortest pause between votes in milliseconds
    pub min_think_ms: i64,
    /// Longest pause between votes in milliseconds
    pub max_think_ms: i64,
}

impl Default for VoterConfig {
    fn default() -> Self {
        Self {
            min_think_ms: 800,
            max_think_ms: 9_000,
        }
    }
}

/// Seeded stand-in for a person clicking through pairs
pub struct SimulatedVoter {
    rng: StdRng,
    config: VoterConfig,
}

impl SimulatedVoter {
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, VoterConfig::default())
    }

    pub fn with_config(seed: u64, config: VoterConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
        }
    }

    /// Whether the left-hand candidate wins, given its win probability
    pub fn prefers_left(&mut self, left_win_probability: f64) -> bool {
        self.rng.random_bool(left_win_probability.clamp(0.0, 1.0))
    }

    pub fn think_time(&mut self) -> i64 {
        let (low, high) = (self.config.min_think_ms, self.config.max_think_ms);
        if high <= low {
            return low.max(0);
        }
        self.rng.random_range(low..=high)
    }
}

/// Outcome of a simulated run
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub state: TournamentState,
    pub votes: usize,
    /// Votes won by the lower-rated side
    pub upsets: usize,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
}

/// Vote until the tournament completes or `limit` votes have been cast.
pub fn run<R: RatingModel>(
    engine: &TournamentEngine<R>,
    mut state: TournamentState,
    voter: &mut SimulatedVoter,
    limit: Option<usize>,
    started_at: Timestamp,
) -> EngineResult<SimulationRun> {
    let mut clock = started_at;
    let mut votes = 0;
    let mut upsets = 0;

    while limit.is_none_or(|limit| votes < limit) {
        let Some((left, right)) = engine.next_pair(&state)? else {
            break;
        };

        let p_left = engine
            .rating_model()
            .expected_score(left.rating(), right.rating());
        let (winner, loser) = if voter.prefers_left(p_left) {
            (&left, &right)
        } else {
            (&right, &left)
        };
        if winner.rating() < loser.rating() {
            upsets += 1;
        }

        clock += voter.think_time();
        let (next, outcome) = engine.record_vote(&state, &left.id, &right.id, &winner.id, clock)?;
        debug!(
            "{} beat {} ({:+.1} / {:+.1})",
            outcome.winner.name, outcome.loser.name, outcome.winner_delta, outcome.loser_delta
        );

        state = next;
        votes += 1;
    }

    info!("Simulated {votes} votes ({upsets} upsets)");
    Ok(SimulationRun {
        state,
        votes,
        upsets,
        started_at,
        finished_at: clock,
    })
}
