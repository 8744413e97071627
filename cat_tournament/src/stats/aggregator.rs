//! Builds a [`StatisticsReport`] from a pool and its vote history.

use chrono::Timelike;
use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::config::StatisticsConfig;
use super::insights::derive_insights;
use super::report::{
    CandidateStanding, CategoryBreakdown, ParticipantBreakdown, RatingSummary, StatisticsReport,
    TierCount, VotingCadence, WinStreak,
};
use crate::tournament::{Candidate, VoteHistory, progress};

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round1(part as f64 / whole as f64 * 100.0)
    }
}

/// Compute the full report.
///
/// Pure and total: an empty pool or history produces a zeroed report rather
/// than an error, and nothing in the inputs is modified.
pub fn summarize(pool: &[Candidate], history: &VoteHistory, config: &StatisticsConfig) -> StatisticsReport {
    let progress = progress(pool.len(), history);
    let (votes_by_hour, busiest_hour) = votes_by_hour(history);

    let mut report = StatisticsReport {
        total_participants: pool.len(),
        completed_matches: progress.completed,
        total_possible_matches: progress.total_possible,
        remaining_matches: progress.remaining,
        completion_rate: progress.percentage,
        ratings: rating_summary(pool),
        standings: standings(pool, config),
        tiers: tier_counts(pool, config),
        cadence: voting_cadence(history),
        participants: participant_breakdown(pool),
        categories: category_breakdown(pool),
        votes_by_hour,
        busiest_hour,
        longest_streak: longest_streak(pool, history),
        insights: Vec::new(),
    };
    report.insights = derive_insights(&report, &config.insights);

    debug!(
        "Summarized {} candidates over {} matches ({} insights)",
        report.total_participants,
        report.completed_matches,
        report.insights.len()
    );
    report
}

fn rating_summary(pool: &[Candidate]) -> RatingSummary {
    if pool.is_empty() {
        return RatingSummary::default();
    }

    let ratings = pool.iter().map(Candidate::rating);
    let min = ratings.clone().fold(f64::INFINITY, f64::min);
    let max = ratings.clone().fold(f64::NEG_INFINITY, f64::max);
    let average = ratings.sum::<f64>() / pool.len() as f64;

    RatingSummary {
        average: average.round() as i64,
        min: min.round() as i64,
        max: max.round() as i64,
        spread: (max - min).round() as i64,
    }
}

/// Best first: rating, then wins, then name.
fn compare_standing(a: &Candidate, b: &Candidate) -> Ordering {
    b.rating()
        .total_cmp(&a.rating())
        .then_with(|| b.wins().cmp(&a.wins()))
        .then_with(|| a.name.cmp(&b.name))
}

fn standings(pool: &[Candidate], config: &StatisticsConfig) -> Vec<CandidateStanding> {
    let mut ordered: Vec<&Candidate> = pool.iter().collect();
    ordered.sort_by(|a, b| compare_standing(a, b));

    ordered
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| CandidateStanding {
            rank: index + 1,
            id: candidate.id.clone(),
            name: candidate.name.clone(),
            rating: candidate.rating().round() as i64,
            wins: candidate.wins(),
            losses: candidate.losses(),
            matches_played: candidate.matches_played(),
            win_rate: round1(candidate.win_rate() * 100.0),
            tier: config
                .tier_index(candidate.rating())
                .map(|index| config.tiers[index].name.clone()),
        })
        .collect()
}

fn tier_counts(pool: &[Candidate], config: &StatisticsConfig) -> Vec<TierCount> {
    let mut counts = vec![0usize; config.tiers.len()];
    for candidate in pool {
        if let Some(index) = config.tier_index(candidate.rating()) {
            counts[index] += 1;
        }
    }

    config
        .tiers
        .iter()
        .zip(counts)
        .map(|(tier, count)| TierCount {
            name: tier.name.clone(),
            min_rating: tier.min_rating,
            count,
            percentage: percent(count, pool.len()),
        })
        .collect()
}

fn voting_cadence(history: &VoteHistory) -> VotingCadence {
    let mut gaps: Vec<i64> = history
        .as_slice()
        .windows(2)
        .map(|pair| pair[1].timestamp.saturating_sub(pair[0].timestamp))
        .collect();

    if gaps.is_empty() {
        return VotingCadence::default();
    }

    gaps.sort_unstable();
    let samples = gaps.len();
    let average = gaps.iter().map(|gap| *gap as f64).sum::<f64>() / samples as f64;
    let middle = samples / 2;
    let median = if samples % 2 == 0 {
        (gaps[middle - 1] as f64 + gaps[middle] as f64) / 2.0
    } else {
        gaps[middle] as f64
    };

    VotingCadence {
        samples,
        average_ms: round1(average),
        median_ms: round1(median),
        fastest_ms: gaps[0],
        slowest_ms: gaps[samples - 1],
    }
}

fn participant_breakdown(pool: &[Candidate]) -> ParticipantBreakdown {
    let mut breakdown = ParticipantBreakdown::default();
    for candidate in pool {
        if candidate.matches_played() == 0 {
            breakdown.idle += 1;
            continue;
        }
        breakdown.active += 1;
        if candidate.losses() == 0 {
            breakdown.undefeated += 1;
        }
        if candidate.wins() == 0 {
            breakdown.winless += 1;
        }
    }
    breakdown
}

#[derive(Default)]
struct CategoryTotals {
    candidates: usize,
    rating_sum: f64,
    wins: u32,
    losses: u32,
}

fn category_breakdown(pool: &[Candidate]) -> Vec<CategoryBreakdown> {
    let mut totals: BTreeMap<&str, CategoryTotals> = BTreeMap::new();
    for candidate in pool {
        let mut seen: Vec<&str> = Vec::with_capacity(candidate.categories.len());
        for category in &candidate.categories {
            let label = category.trim();
            if label.is_empty() || seen.contains(&label) {
                continue;
            }
            seen.push(label);

            let entry = totals.entry(label).or_default();
            entry.candidates += 1;
            entry.rating_sum += candidate.rating();
            entry.wins = entry.wins.saturating_add(candidate.wins());
            entry.losses = entry.losses.saturating_add(candidate.losses());
        }
    }

    let mut rows: Vec<(f64, CategoryBreakdown)> = totals
        .into_iter()
        .map(|(label, totals)| {
            let average = totals.rating_sum / totals.candidates as f64;
            (
                average,
                CategoryBreakdown {
                    category: label.to_string(),
                    candidates: totals.candidates,
                    average_rating: average.round() as i64,
                    total_wins: totals.wins,
                    total_losses: totals.losses,
                },
            )
        })
        .collect();

    // BTreeMap order already breaks ties by label; the sort is stable.
    rows.sort_by(|(a, _), (b, _)| b.total_cmp(a));
    rows.into_iter().map(|(_, row)| row).collect()
}

fn votes_by_hour(history: &VoteHistory) -> ([usize; 24], Option<u32>) {
    let mut buckets = [0usize; 24];
    for entry in history {
        if let Some(at) = entry.resolved_at() {
            buckets[at.hour() as usize] += 1;
        }
    }

    let mut busiest: Option<u32> = None;
    for (hour, count) in buckets.iter().enumerate() {
        if *count == 0 {
            continue;
        }
        match busiest {
            Some(best) if buckets[best as usize] >= *count => {}
            _ => busiest = Some(hour as u32),
        }
    }

    (buckets, busiest)
}

/// Longest run of consecutive wins by one candidate across its own matches.
///
/// Ties go to the candidate listed first in the pool.
fn longest_streak(pool: &[Candidate], history: &VoteHistory) -> Option<WinStreak> {
    let mut best: Option<WinStreak> = None;

    for candidate in pool {
        let mut current = 0usize;
        let mut longest = 0usize;
        for entry in history.matches_for(&candidate.id) {
            if entry.winner.as_ref() == Some(&candidate.id) {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 0;
            }
        }

        let beats_best = best.as_ref().is_none_or(|streak| longest > streak.length);
        if longest > 0 && beats_best {
            best = Some(WinStreak {
                candidate_id: candidate.id.clone(),
                name: candidate.name.clone(),
                length: longest,
            });
        }
    }

    best
}
