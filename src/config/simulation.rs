//! Simulation configuration

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What historical replay does with a record it cannot apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayPolicy {
    /// Stop at the first invalid record and report it
    #[default]
    Abort,
    /// Log and record the failure, then continue with the next record
    SkipInvalid,
}

impl FromStr for ReplayPolicy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "abort" => Ok(ReplayPolicy::Abort),
            "skip_invalid" | "skip" => Ok(ReplayPolicy::SkipInvalid),
            _ => Err(ForecastError::InvalidConfiguration {
                message: format!("Unknown replay policy: {}", value),
            }
            .into()),
        }
    }
}

/// Monte Carlo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of simulated seasons
    pub trials: u64,
    /// Base seed; trial `i` draws from stream `i` of this seed
    pub seed: u64,
    /// Fan trials out over the rayon thread pool
    pub parallel: bool,
    pub replay_policy: ReplayPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            trials: 10_000,
            seed: 42,
            parallel: true,
            replay_policy: ReplayPolicy::Abort,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(ForecastError::InvalidConfiguration {
                message: "Trial count must be greater than 0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_config_default() {
        let config = SimulationConfig::default();
        assert_eq!(config.trials, 10_000);
        assert!(config.parallel);
        assert_eq!(config.replay_policy, ReplayPolicy::Abort);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_trials_rejected() {
        let config = SimulationConfig {
            trials: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_replay_policy_parsing() {
        assert_eq!("abort".parse::<ReplayPolicy>().unwrap(), ReplayPolicy::Abort);
        assert_eq!(
            "SKIP_INVALID".parse::<ReplayPolicy>().unwrap(),
            ReplayPolicy::SkipInvalid
        );
        assert!("retry".parse::<ReplayPolicy>().is_err());
    }
}
