//! Tournament engine error types.

use thiserror::Error;

use super::models::{CandidateId, Timestamp};

/// Malformed pool or history data.
///
/// These are never corrected silently; the operation that found them fails.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DataIntegrityError {
    #[error("duplicate candidate id {0}")]
    DuplicateCandidate(CandidateId),

    #[error("candidate {0} has an empty name")]
    EmptyName(CandidateId),

    #[error("candidate {0} has a non-finite rating")]
    NonFiniteRating(CandidateId),

    #[error("unknown candidate id {0}")]
    UnknownCandidate(CandidateId),

    #[error("candidate {0} cannot be matched against itself")]
    SelfMatch(CandidateId),

    #[error("match {candidate_a} vs {candidate_b} has no winner")]
    UnresolvedMatch {
        candidate_a: CandidateId,
        candidate_b: CandidateId,
    },

    #[error("winner {winner} did not play in match {candidate_a} vs {candidate_b}")]
    WinnerNotInMatch {
        winner: CandidateId,
        candidate_a: CandidateId,
        candidate_b: CandidateId,
    },

    #[error("{candidate_a} and {candidate_b} have already met {meetings} time(s)")]
    PairAlreadyPlayed {
        candidate_a: CandidateId,
        candidate_b: CandidateId,
        meetings: usize,
    },

    #[error("timestamp {next} precedes the last recorded vote at {previous}")]
    TimestampRegression { previous: Timestamp, next: Timestamp },
}

/// Top-level engine errors
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Data integrity error: {0}")]
    DataIntegrity(#[from] DataIntegrityError),

    #[error("Invalid vote: {winner} is neither {candidate_a} nor {candidate_b}")]
    InvalidVote {
        winner: CandidateId,
        candidate_a: CandidateId,
        candidate_b: CandidateId,
    },

    #[error("Tournament is already complete")]
    TournamentComplete,

    #[error("Invalid configuration for {field}: {reason}")]
    Configuration { field: &'static str, reason: String },
}

impl EngineError {
    /// Whether the caller can simply re-prompt the user and try again.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, EngineError::InvalidVote { .. })
    }

    /// A message suitable for showing to the person voting.
    ///
    /// Integrity and configuration failures are reported generically; their
    /// details belong in logs, not in front of users.
    pub fn client_message(&self) -> String {
        match self {
            EngineError::DataIntegrity(DataIntegrityError::PairAlreadyPlayed { .. }) => {
                "These two names have already been compared".to_string()
            }
            EngineError::DataIntegrity(_) => "Tournament data is inconsistent".to_string(),
            EngineError::InvalidVote { .. } => "Please pick one of the two names shown".to_string(),
            EngineError::TournamentComplete => "This tournament has already finished".to_string(),
            EngineError::Configuration { .. } => "Tournament settings are invalid".to_string(),
        }
    }
}

pub type IntegrityResult<T> = Result<T, DataIntegrityError>;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
