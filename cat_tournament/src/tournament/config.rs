//! Engine configuration.
//!
//! Every rating and scheduling policy knob lives here so alternate schemes can
//! be tested without touching the engine code.

use log::warn;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::errors::{EngineError, EngineResult};

/// Rating assigned to candidates that arrive without one
pub const DEFAULT_RATING: f64 = 1500.0;

/// Maximum per-match rating adjustment
pub const DEFAULT_K_FACTOR: f64 = 32.0;

/// Engine configuration
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Starting rating for unrated candidates (default: 1500)
    pub default_rating: f64,

    /// Elo K-factor (default: 32)
    pub k_factor: f64,

    /// Keep scheduling after every pair has met once (default: false)
    pub allow_repeat_rounds: bool,

    /// Rounds after which a repeat-round tournament completes.
    ///
    /// Ignored unless `allow_repeat_rounds` is set. `None` leaves stopping to
    /// the caller.
    pub max_rounds: Option<u32>,

    /// Seed for pair selection
    pub pairing_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_rating: DEFAULT_RATING,
            k_factor: DEFAULT_K_FACTOR,
            allow_repeat_rounds: false,
            max_rounds: None,
            pairing_seed: 0,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables
    ///
    /// Recognized variables:
    /// - `TOURNAMENT_DEFAULT_RATING` (default: 1500)
    /// - `TOURNAMENT_K_FACTOR` (default: 32)
    /// - `TOURNAMENT_ALLOW_REPEAT_ROUNDS` (default: false)
    /// - `TOURNAMENT_MAX_ROUNDS` (default: unset)
    /// - `TOURNAMENT_PAIRING_SEED` (default: 0)
    ///
    /// Unparseable values fall back to the default and are logged.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`EngineConfig::from_env`], reading values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            default_rating: parse_or(&lookup, "TOURNAMENT_DEFAULT_RATING", defaults.default_rating),
            k_factor: parse_or(&lookup, "TOURNAMENT_K_FACTOR", defaults.k_factor),
            allow_repeat_rounds: parse_or(
                &lookup,
                "TOURNAMENT_ALLOW_REPEAT_ROUNDS",
                defaults.allow_repeat_rounds,
            ),
            max_rounds: lookup("TOURNAMENT_MAX_ROUNDS").and_then(|raw| match raw.trim().parse() {
                Ok(rounds) => Some(rounds),
                Err(_) => {
                    warn!("Ignoring invalid TOURNAMENT_MAX_ROUNDS value {raw:?}");
                    None
                }
            }),
            pairing_seed: parse_or(&lookup, "TOURNAMENT_PAIRING_SEED", defaults.pairing_seed),
        }
    }

    pub fn with_k_factor(mut self, k_factor: f64) -> Self {
        self.k_factor = k_factor;
        self
    }

    pub fn with_default_rating(mut self, default_rating: f64) -> Self {
        self.default_rating = default_rating;
        self
    }

    pub fn with_repeat_rounds(mut self, max_rounds: Option<u32>) -> Self {
        self.allow_repeat_rounds = true;
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_pairing_seed(mut self, seed: u64) -> Self {
        self.pairing_seed = seed;
        self
    }

    /// Most times a single pair may meet, or `None` when unbounded.
    ///
    /// One meeting under round-robin-once, `max_rounds` with repeat rounds.
    pub fn meeting_limit(&self) -> Option<usize> {
        if !self.allow_repeat_rounds {
            return Some(1);
        }
        self.max_rounds.map(|rounds| rounds as usize)
    }

    /// Validate configuration
    pub fn validate(&self) -> EngineResult<()> {
        if !self.default_rating.is_finite() {
            return Err(EngineError::Configuration {
                field: "default_rating",
                reason: "Must be a finite number".to_string(),
            });
        }

        if !self.k_factor.is_finite() || self.k_factor <= 0.0 {
            return Err(EngineError::Configuration {
                field: "k_factor",
                reason: format!("Must be a positive finite number, got {}", self.k_factor),
            });
        }

        if self.max_rounds == Some(0) {
            return Err(EngineError::Configuration {
                field: "max_rounds",
                reason: "Must be at least 1 when set".to_string(),
            });
        }

        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {key} value {raw:?}");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.default_rating, 1500.0);
        assert_eq!(config.k_factor, 32.0);
        assert!(!config.allow_repeat_rounds);
        assert_eq!(config.max_rounds, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_reads_all_keys() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("TOURNAMENT_DEFAULT_RATING", "1200"),
            ("TOURNAMENT_K_FACTOR", "16.5"),
            ("TOURNAMENT_ALLOW_REPEAT_ROUNDS", "true"),
            ("TOURNAMENT_MAX_ROUNDS", "3"),
            ("TOURNAMENT_PAIRING_SEED", "42"),
        ]));
        assert_eq!(config.default_rating, 1200.0);
        assert_eq!(config.k_factor, 16.5);
        assert!(config.allow_repeat_rounds);
        assert_eq!(config.max_rounds, Some(3));
        assert_eq!(config.pairing_seed, 42);
    }

    #[test]
    fn test_from_lookup_falls_back_on_garbage() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            ("TOURNAMENT_K_FACTOR", "lots"),
            ("TOURNAMENT_MAX_ROUNDS", "-1"),
        ]));
        assert_eq!(config.k_factor, DEFAULT_K_FACTOR);
        assert_eq!(config.max_rounds, None);
    }

    #[test]
    fn test_validate_rejects_bad_k_factor() {
        for k in [0.0, -4.0, f64::NAN, f64::INFINITY] {
            let err = EngineConfig::default().with_k_factor(k).validate().unwrap_err();
            assert!(matches!(err, EngineError::Configuration { field: "k_factor", .. }));
        }
    }

    #[test]
    fn test_meeting_limit() {
        assert_eq!(EngineConfig::default().meeting_limit(), Some(1));
        assert_eq!(EngineConfig::default().with_repeat_rounds(Some(3)).meeting_limit(), Some(3));
        assert_eq!(EngineConfig::default().with_repeat_rounds(None).meeting_limit(), None);

        let ignored_rounds = EngineConfig {
            max_rounds: Some(4),
            ..Default::default()
        };
        assert_eq!(ignored_rounds.meeting_limit(), Some(1));
    }

    #[test]
    fn test_validate_rejects_zero_rounds() {
        let config = EngineConfig::default().with_repeat_rounds(Some(0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: EngineConfig = serde_json::from_str(r#"{"kFactor": 24}"#).unwrap();
        assert_eq!(config.k_factor, 24.0);
        assert_eq!(config.default_rating, DEFAULT_RATING);
    }
}
