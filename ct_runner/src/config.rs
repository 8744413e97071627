//! Runner configuration management.
//!
//! Combines command-line arguments with the `TOURNAMENT_*` environment
//! variables read by [`EngineConfig::from_env`].

use cat_tournament::{EngineConfig, EngineError};
use pico_args::Arguments;
use std::ffi::OsString;
use std::path::PathBuf;

/// Complete runner configuration
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// JSON array of candidate records
    pub pool_path: PathBuf,
    /// Optional JSON array of already resolved matches
    pub history_path: Option<PathBuf>,
    /// Seed for simulated voter choices
    pub seed: u64,
    /// Stop after this many simulated votes (default: until complete)
    pub votes: Option<usize>,
    /// Pretty-print the JSON report
    pub pretty: bool,
    /// Engine settings
    pub engine: EngineConfig,
}

impl RunnerConfig {
    /// Parse CLI arguments on top of an already loaded engine configuration
    ///
    /// # Errors
    ///
    /// Returns error if `--pool` is missing, a value fails to parse, an
    /// unknown argument is left over, or the engine settings are invalid
    pub fn from_args(mut pargs: Arguments, engine: EngineConfig) -> Result<Self, ConfigError> {
        let pool_path: PathBuf =
            pargs
                .opt_value_from_str("--pool")?
                .ok_or_else(|| ConfigError::MissingRequired {
                    var: "--pool".to_string(),
                    hint: "Pass a JSON file with the candidate list".to_string(),
                })?;

        let config = RunnerConfig {
            pool_path,
            history_path: pargs.opt_value_from_str("--history")?,
            seed: pargs.opt_value_from_str("--seed")?.unwrap_or(engine.pairing_seed),
            votes: pargs.opt_value_from_str("--votes")?,
            pretty: pargs.contains("--pretty"),
            engine,
        };

        let remaining = pargs.finish();
        if !remaining.is_empty() {
            return Err(ConfigError::UnexpectedArguments(remaining));
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;

        if self.votes == Some(0) {
            return Err(ConfigError::Invalid {
                var: "--votes".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        // Unbounded repeat rounds never complete on their own
        if self.engine.allow_repeat_rounds && self.engine.max_rounds.is_none() && self.votes.is_none() {
            return Err(ConfigError::Invalid {
                var: "--votes".to_string(),
                reason: "Required when repeat rounds are enabled without TOURNAMENT_MAX_ROUNDS"
                    .to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required argument: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error("Unexpected arguments: {0:?}")]
    UnexpectedArguments(Vec<OsString>),

    #[error(transparent)]
    Args(#[from] pico_args::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
