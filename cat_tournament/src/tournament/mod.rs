//! Tournament matching and rating engine.
//!
//! This module provides:
//! - Candidate pool construction and validation
//! - Deterministic pair scheduling (round-robin, optionally repeated)
//! - Elo rating updates behind the [`RatingModel`] trait
//! - An append-only vote history
//! - Completion detection
//!
//! ## Example
//!
//! ```
//! use cat_tournament::tournament::{CandidateInput, EngineConfig, TournamentEngine};
//!
//! let engine = TournamentEngine::new(EngineConfig::default())?;
//! let mut state = engine.start(vec![
//!     CandidateInput::new("1", "Mochi"),
//!     CandidateInput::new("2", "Biscuit"),
//!     CandidateInput::new("3", "Pickle"),
//! ])?;
//!
//! let mut clock = 0;
//! while let Some((left, right)) = engine.next_pair(&state)? {
//!     clock += 1_000;
//!     // Pretend the user always prefers the left-hand name.
//!     let (next, _outcome) = engine.record_vote(&state, &left.id, &right.id, &left.id, clock)?;
//!     state = next;
//! }
//!
//! assert!(state.is_complete());
//! assert_eq!(state.history().completed_count(), 3);
//! # Ok::<(), cat_tournament::tournament::EngineError>(())
//! ```

pub mod completion;
pub mod config;
pub mod engine;
pub mod errors;
pub mod history;
pub mod models;
pub mod pool;
pub mod rating;
pub mod scheduler;

pub use completion::{Progress, is_complete, progress, remaining_matches, total_possible_matches};
pub use config::{DEFAULT_K_FACTOR, DEFAULT_RATING, EngineConfig};
pub use engine::{TournamentEngine, TournamentState, VoteOutcome};
pub use errors::{DataIntegrityError, EngineError, EngineResult, IntegrityResult};
pub use history::VoteHistory;
pub use models::{Candidate, CandidateId, CandidateInput, Match, PairKey, Timestamp, now_millis};
pub use pool::{build_pool, validate_pool};
pub use rating::{EloRating, RatingModel};
pub use scheduler::next_pair;
