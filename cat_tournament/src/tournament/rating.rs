//! Elo rating updates.

use log::{debug, warn};

use super::errors::{DataIntegrityError, EngineError, EngineResult};
use super::models::{Candidate, CandidateId};

/// A pairwise rating scheme.
///
/// Implementations supply the expectancy curve and the winner's adjustment;
/// the loser always moves by the negated amount, so rating is redistributed
/// between the two sides and never created.
pub trait RatingModel {
    /// Probability that a candidate rated `rating` beats one rated `opponent`.
    fn expected_score(&self, rating: f64, opponent: f64) -> f64;

    /// Rating change for a candidate rated `rating` after a match against
    /// `opponent`, where `actual` is 1.0 for a win and 0.0 for a loss.
    fn rating_change(&self, rating: f64, opponent: f64, actual: f64) -> f64;

    /// Apply one resolved vote to both candidates.
    ///
    /// Returns updated copies in the same `(a, b)` order. Inputs are never
    /// modified, so a rejected vote leaves nothing to roll back.
    ///
    /// # Errors
    ///
    /// * [`EngineError::InvalidVote`] if `winner` is neither candidate
    /// * [`DataIntegrityError::SelfMatch`] if both sides share an id
    fn apply_result(
        &self,
        a: &Candidate,
        b: &Candidate,
        winner: &CandidateId,
    ) -> EngineResult<(Candidate, Candidate)> {
        if a.id == b.id {
            return Err(DataIntegrityError::SelfMatch(a.id.clone()).into());
        }

        let a_won = if winner == &a.id {
            true
        } else if winner == &b.id {
            false
        } else {
            warn!("Rejected vote for {} in match {} vs {}", winner, a.id, b.id);
            return Err(EngineError::InvalidVote {
                winner: winner.clone(),
                candidate_a: a.id.clone(),
                candidate_b: b.id.clone(),
            });
        };

        let actual = if a_won { 1.0 } else { 0.0 };
        let delta = self.rating_change(a.rating(), b.rating(), actual);

        let mut updated_a = a.clone();
        let mut updated_b = b.clone();
        if a_won {
            updated_a.record_win(a.rating() + delta);
            updated_b.record_loss(b.rating() - delta);
        } else {
            updated_a.record_loss(a.rating() + delta);
            updated_b.record_win(b.rating() - delta);
        }

        debug!(
            "{} {:+.2} -> {:.2}, {} {:+.2} -> {:.2}",
            a.id,
            delta,
            updated_a.rating(),
            b.id,
            -delta,
            updated_b.rating()
        );

        Ok((updated_a, updated_b))
    }
}

/// Standard logistic Elo with a fixed K-factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EloRating {
    k_factor: f64,
}

impl EloRating {
    pub fn new(k_factor: f64) -> Self {
        Self { k_factor }
    }

    pub fn k_factor(&self) -> f64 {
        self.k_factor
    }
}

impl Default for EloRating {
    fn default() -> Self {
        Self::new(super::config::DEFAULT_K_FACTOR)
    }
}

impl RatingModel for EloRating {
    fn expected_score(&self, rating: f64, opponent: f64) -> f64 {
        1.0 / (1.0 + 10.0_f64.powf((opponent - rating) / 400.0))
    }

    fn rating_change(&self, rating: f64, opponent: f64, actual: f64) -> f64 {
        self.k_factor * (actual - self.expected_score(rating, opponent))
    }
}
