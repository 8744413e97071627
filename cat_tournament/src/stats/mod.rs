//! Read-side statistics for a tournament.
//!
//! This module provides:
//! - Standings with win rates and rating tiers
//! - Rating distribution and progress figures
//! - Voting cadence and activity by hour of day
//! - Participant and category breakdowns
//! - Heuristic insights with tunable thresholds
//!
//! Everything here is a pure projection of a pool and its [`VoteHistory`];
//! nothing is cached or written back.
//!
//! ## Example
//!
//! ```
//! use cat_tournament::stats::{StatisticsConfig, summarize};
//! use cat_tournament::tournament::{Candidate, VoteHistory};
//!
//! let pool = vec![
//!     Candidate::new("1", "Mochi", 1500.0),
//!     Candidate::new("2", "Biscuit", 1500.0),
//! ];
//! let report = summarize(&pool, &VoteHistory::new(), &StatisticsConfig::default());
//!
//! assert_eq!(report.total_possible_matches, 1);
//! assert_eq!(report.standings[0].name, "Biscuit");
//! ```
//!
//! [`VoteHistory`]: crate::tournament::VoteHistory

pub mod aggregator;
pub mod config;
pub mod insights;
pub mod report;

pub use aggregator::summarize;
pub use config::{InsightThresholds, RatingTier, StatisticsConfig};
pub use insights::{Insight, derive_insights};
pub use report::{
    CandidateStanding, CategoryBreakdown, ParticipantBreakdown, RatingSummary, StatisticsReport,
    TierCount, VotingCadence, WinStreak,
};
