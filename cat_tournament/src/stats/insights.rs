//! Heuristic observations derived from a finished report.

use serde::{Deserialize, Serialize};

use super::config::InsightThresholds;
use super::report::StatisticsReport;
use crate::tournament::CandidateId;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Insight {
    /// More candidates than the configured threshold
    LargePool { participants: usize },
    /// Leader wins at least the configured share of its matches
    DominantFavorite {
        candidate_id: CandidateId,
        name: String,
        win_rate: f64,
    },
    /// Top two are within the configured rating gap
    CloseRace {
        leader: String,
        runner_up: String,
        gap: i64,
    },
    /// Median time between votes is under the configured threshold
    QuickVoting { median_ms: f64 },
    HotStreak {
        candidate_id: CandidateId,
        name: String,
        length: usize,
    },
}

/// Evaluate every heuristic against `report`.
///
/// Match-based insights stay silent until `min_matches` votes are in.
pub fn derive_insights(report: &StatisticsReport, thresholds: &InsightThresholds) -> Vec<Insight> {
    let mut insights = Vec::new();

    if report.total_participants > thresholds.large_pool_size {
        insights.push(Insight::LargePool {
            participants: report.total_participants,
        });
    }

    if report.completed_matches < thresholds.min_matches || report.completed_matches == 0 {
        return insights;
    }

    if let Some(leader) = report.standings.first()
        && leader.matches_played > 0
        && leader.win_rate >= thresholds.dominant_win_rate
    {
        insights.push(Insight::DominantFavorite {
            candidate_id: leader.id.clone(),
            name: leader.name.clone(),
            win_rate: leader.win_rate,
        });
    }

    if let [leader, runner_up, ..] = report.standings.as_slice() {
        let gap = leader.rating - runner_up.rating;
        if gap <= thresholds.close_race_gap {
            insights.push(Insight::CloseRace {
                leader: leader.name.clone(),
                runner_up: runner_up.name.clone(),
                gap,
            });
        }
    }

    if report.cadence.samples > 0 && report.cadence.median_ms < thresholds.quick_vote_median_ms {
        insights.push(Insight::QuickVoting {
            median_ms: report.cadence.median_ms,
        });
    }

    if let Some(streak) = &report.longest_streak
        && streak.length >= thresholds.hot_streak_length
    {
        insights.push(Insight::HotStreak {
            candidate_id: streak.candidate_id.clone(),
            name: streak.name.clone(),
            length: streak.length,
        });
    }

    insights
}
