//! Statistics configuration: rating tiers and insight thresholds.

use serde::{Deserialize, Serialize};

use crate::tournament::{EngineError, EngineResult};

/// Named rating band.
///
/// A candidate belongs to the first tier (in descending order) whose
/// `min_rating` it reaches; anything below every threshold lands in the last
/// tier.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingTier {
    pub name: String,
    pub min_rating: f64,
}

impl RatingTier {
    pub fn new(name: impl Into<String>, min_rating: f64) -> Self {
        Self {
            name: name.into(),
            min_rating,
        }
    }
}

/// Thresholds for the heuristic insights attached to a report.
///
/// These are product policy, not engine invariants, and can be tuned freely.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsightThresholds {
    /// Pools larger than this count as large (default: 8)
    pub large_pool_size: usize,
    /// Leader win rate, in percent, that counts as dominant (default: 80)
    pub dominant_win_rate: f64,
    /// Rating gap between the top two at or below which the race is close (default: 25)
    pub close_race_gap: i64,
    /// Median milliseconds between votes below which voting counts as quick (default: 3000)
    pub quick_vote_median_ms: f64,
    /// Consecutive wins that count as a hot streak (default: 3)
    pub hot_streak_length: usize,
    /// Completed matches required before match-based insights appear (default: 3)
    pub min_matches: usize,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            large_pool_size: 8,
            dominant_win_rate: 80.0,
            close_race_gap: 25,
            quick_vote_median_ms: 3_000.0,
            hot_streak_length: 3,
            min_matches: 3,
        }
    }
}

/// Statistics configuration
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatisticsConfig {
    /// Rating tiers, highest threshold first
    pub tiers: Vec<RatingTier>,
    pub insights: InsightThresholds,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self {
            tiers: vec![
                RatingTier::new("Top Cat", 1700.0),
                RatingTier::new("Contender", 1550.0),
                RatingTier::new("Steady", 1450.0),
                RatingTier::new("Underdog", 1300.0),
                RatingTier::new("Long Shot", f64::MIN),
            ],
            insights: InsightThresholds::default(),
        }
    }
}

impl StatisticsConfig {
    /// Validate tier layout
    pub fn validate(&self) -> EngineResult<()> {
        if self.tiers.is_empty() {
            return Err(EngineError::Configuration {
                field: "tiers",
                reason: "At least one tier is required".to_string(),
            });
        }

        if let Some(tier) = self.tiers.iter().find(|tier| tier.name.trim().is_empty()) {
            return Err(EngineError::Configuration {
                field: "tiers",
                reason: format!("Tier at {} has an empty name", tier.min_rating),
            });
        }

        if self.tiers.iter().any(|tier| tier.min_rating.is_nan()) {
            return Err(EngineError::Configuration {
                field: "tiers",
                reason: "Tier thresholds must be numbers".to_string(),
            });
        }

        if self
            .tiers
            .windows(2)
            .any(|pair| pair[0].min_rating <= pair[1].min_rating)
        {
            return Err(EngineError::Configuration {
                field: "tiers",
                reason: "Tier thresholds must be strictly descending".to_string(),
            });
        }

        Ok(())
    }

    /// Index of the tier `rating` falls into.
    ///
    /// `None` only when no tiers are configured.
    pub fn tier_index(&self, rating: f64) -> Option<usize> {
        if self.tiers.is_empty() {
            return None;
        }
        Some(
            self.tiers
                .iter()
                .position(|tier| rating >= tier.min_rating)
                .unwrap_or(self.tiers.len() - 1),
        )
    }
}
