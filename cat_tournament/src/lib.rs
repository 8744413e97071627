//! # Cat Tournament
//!
//! Pairwise voting engine for picking a favourite cat name.
//!
//! Users are shown two candidate names at a time and pick the one they like
//! more. The library schedules which pairs to show, updates Elo ratings from
//! each vote, keeps an append-only history and decides when the round-robin
//! is finished. A statistics report can be derived at any point.
//!
//! ## Core Modules
//!
//! - [`tournament`]: Candidates, pairing, rating, history and completion
//! - [`stats`]: Standings, distributions and insights derived from a tournament
//!
//! All state is held in plain values: every operation takes the current
//! [`TournamentState`] and returns a new one.
//!
//! ## Example
//!
//! ```
//! use cat_tournament::{CandidateInput, EngineConfig, StatisticsConfig, TournamentEngine};
//!
//! let engine = TournamentEngine::new(EngineConfig::default())?;
//! let state = engine.start(vec![
//!     CandidateInput::new("1", "Mochi"),
//!     CandidateInput::new("2", "Biscuit"),
//! ])?;
//!
//! let (left, right) = engine.next_pair(&state)?.expect("two candidates form a pair");
//! let (state, outcome) = engine.record_vote(&state, &left.id, &right.id, &right.id, 0)?;
//!
//! assert!(outcome.is_complete);
//! let report = engine.summarize(&state, &StatisticsConfig::default());
//! assert_eq!(report.standings[0].id, right.id);
//! # Ok::<(), cat_tournament::EngineError>(())
//! ```

/// Tournament engine: pool, scheduler, rating, history and completion.
pub mod tournament;
pub use tournament::{
    Candidate, CandidateId, CandidateInput, DataIntegrityError, EloRating, EngineConfig,
    EngineError, EngineResult, Match, RatingModel, TournamentEngine, TournamentState, VoteHistory,
    VoteOutcome,
};

/// Statistics derived from a tournament.
pub mod stats;
pub use stats::{Insight, RatingTier, StatisticsConfig, StatisticsReport};
