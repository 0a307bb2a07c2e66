//! Runtime Configuration

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::RuntimeError;
use crate::game::tick::SimConfig;
use crate::TICK_RATE;

/// Environment variable: ticks per second.
pub const ENV_TICK_RATE: &str = "ZOMBIE_GYM_TICK_RATE";
/// Environment variable: RNG seed.
pub const ENV_SEED: &str = "ZOMBIE_GYM_SEED";
/// Environment variable: narrative timeout in milliseconds.
pub const ENV_NARRATIVE_TIMEOUT_MS: &str = "ZOMBIE_GYM_NARRATIVE_TIMEOUT_MS";
/// Environment variable: stop after this many ticks.
pub const ENV_MAX_TICKS: &str = "ZOMBIE_GYM_MAX_TICKS";

/// Runner configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Ticks per second
    pub tick_rate: u32,
    /// RNG seed. None derives one from the session ID.
    pub seed: Option<u64>,
    /// Narrative requests slower than this fall back
    pub narrative_timeout: Duration,
    /// Stop after this many ticks. None runs until game over or shutdown.
    pub max_ticks: Option<u64>,
    /// Simulation tuning
    pub sim: SimConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            seed: None,
            narrative_timeout: Duration::from_secs(4),
            max_ticks: None,
            sim: SimConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Create config from environment variables. Unset variables keep defaults.
    pub fn from_env() -> Result<Self, RuntimeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RuntimeError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(rate) = parse_var::<u32, _>(&lookup, ENV_TICK_RATE)? {
            if rate == 0 {
                return Err(RuntimeError::InvalidConfig {
                    key: ENV_TICK_RATE.to_string(),
                    value: rate.to_string(),
                });
            }
            config.tick_rate = rate;
        }
        if let Some(seed) = parse_var(&lookup, ENV_SEED)? {
            config.seed = Some(seed);
        }
        if let Some(ms) = parse_var(&lookup, ENV_NARRATIVE_TIMEOUT_MS)? {
            config.narrative_timeout = Duration::from_millis(ms);
        }
        if let Some(max) = parse_var(&lookup, ENV_MAX_TICKS)? {
            config.max_ticks = Some(max);
        }

        Ok(config)
    }

    /// Wall-clock length of one tick.
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, RuntimeError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| RuntimeError::InvalidConfig {
                key: key.to_string(),
                value: raw,
            }),
    }
}
