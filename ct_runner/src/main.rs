//! Offline cat-name tournament runner.
//!
//! Loads a candidate pool (and optionally a saved vote history), lets a
//! seeded simulated voter play out the remaining matches and prints the
//! statistics report as JSON.

mod config;
mod simulate;

use std::fs;
use std::path::Path;

use anyhow::{Context, Error};
use cat_tournament::tournament::now_millis;
use cat_tournament::{CandidateInput, EngineConfig, StatisticsConfig, TournamentEngine, VoteHistory};
use chrono::DateTime;
use log::{info, warn};
use pico_args::Arguments;
use serde_json::json;

use config::RunnerConfig;
use simulate::SimulatedVoter;

const HELP: &str = "\
Simulate a cat-name tournament and print its statistics

USAGE:
  ct_runner --pool FILE [OPTIONS]

OPTIONS:
  --pool       FILE        JSON array of candidates (id, name, rating?, wins?, losses?, categories?)
  --history    FILE        JSON array of resolved matches to replay first
  --seed       N           Seed for simulated voters  [default: env TOURNAMENT_PAIRING_SEED or 0]
  --votes      N           Stop after N simulated votes  [default: until complete]

FLAGS:
  --pretty                 Pretty-print the JSON report
  -h, --help               Print help information

ENVIRONMENT:
  TOURNAMENT_DEFAULT_RATING       Rating for candidates without one  [default: 1500]
  TOURNAMENT_K_FACTOR             Elo K-factor  [default: 32]
  TOURNAMENT_ALLOW_REPEAT_ROUNDS  Keep pairing after the round-robin  [default: false]
  TOURNAMENT_MAX_ROUNDS           Rounds before a repeating tournament completes
  TOURNAMENT_PAIRING_SEED         Seed for pair selection  [default: 0]
  RUST_LOG                        Log filter (e.g. info, cat_tournament=debug)
";

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    env_logger::builder().format_target(false).init();

    let config = RunnerConfig::from_args(pargs, EngineConfig::from_env())?;
    let engine = TournamentEngine::new(config.engine.clone())?;

    let inputs: Vec<CandidateInput> = read_json(&config.pool_path)?;
    info!("Loaded {} candidates from {}", inputs.len(), config.pool_path.display());

    let history = match &config.history_path {
        Some(path) => {
            let history: VoteHistory = read_json(path)?;
            info!("Replaying {} matches from {}", history.len(), path.display());
            history
        }
        None => VoteHistory::new(),
    };

    let state = engine.replay(inputs, history)?;
    if state.is_complete() {
        warn!("Tournament is already complete; nothing to simulate");
    }

    let started_at = state
        .history()
        .last()
        .map_or_else(now_millis, |last| last.timestamp);
    let mut voter = SimulatedVoter::new(config.seed);
    let run = simulate::run(&engine, state, &mut voter, config.votes, started_at)?;

    if let (Some(start), Some(end)) = (
        DateTime::from_timestamp_millis(run.started_at),
        DateTime::from_timestamp_millis(run.finished_at),
    ) {
        info!(
            "Simulated voting from {} to {}",
            start.to_rfc3339(),
            end.to_rfc3339()
        );
    }

    let report = engine.summarize(&run.state, &StatisticsConfig::default());
    let output = json!({
        "simulatedVotes": run.votes,
        "upsets": run.upsets,
        "isComplete": run.state.is_complete(),
        "report": report,
    });

    let rendered = if config.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(())
}
