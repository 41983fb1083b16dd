//! Main application configuration
//!
//! This module defines the top-level configuration for the forecasting
//! engine, including TOML file loading, environment variable overrides and
//! validation.

use crate::config::rating::RatingConfig;
use crate::config::simulation::SimulationConfig;
use crate::error::ForecastError;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub service: ServiceSettings,
    pub rating: RatingConfig,
    pub simulation: SimulationConfig,
}

/// Service-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Name used in log output
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "season-forecast".to_string(),
            log_level: "info".to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        ForecastError::InvalidConfiguration {
            message: format!("Invalid {} value: {}", key, value),
        }
        .into()
    })
}

impl ForecastConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| env::var(key).ok())?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; missing sections keep defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| {
            anyhow!(ForecastError::InvalidConfiguration {
                message: e.to_string(),
            })
        })?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the process environment in `from_env`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Some(log_level) = lookup("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Rating model
        if let Some(value) = lookup("FORECAST_INITIAL_RATING") {
            self.rating.initial_rating = parse_var("FORECAST_INITIAL_RATING", &value)?;
        }
        if let Some(value) = lookup("FORECAST_LOGISTIC_SCALE") {
            self.rating.logistic_scale = parse_var("FORECAST_LOGISTIC_SCALE", &value)?;
        }
        if let Some(value) = lookup("FORECAST_HOME_ADVANTAGE") {
            self.rating.home_advantage.standard = parse_var("FORECAST_HOME_ADVANTAGE", &value)?;
        }
        if let Some(value) = lookup("FORECAST_REDUCED_HOME_ADVANTAGE") {
            self.rating.home_advantage.reduced =
                parse_var("FORECAST_REDUCED_HOME_ADVANTAGE", &value)?;
        }

        // Simulation
        if let Some(value) = lookup("FORECAST_TRIALS") {
            self.simulation.trials = parse_var("FORECAST_TRIALS", &value)?;
        }
        if let Some(value) = lookup("FORECAST_SEED") {
            self.simulation.seed = parse_var("FORECAST_SEED", &value)?;
        }
        if let Some(value) = lookup("FORECAST_PARALLEL") {
            self.simulation.parallel = parse_var("FORECAST_PARALLEL", &value)?;
        }
        if let Some(value) = lookup("FORECAST_REPLAY_POLICY") {
            self.simulation.replay_policy = value.parse()?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &ForecastConfig) -> Result<()> {
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => {
            return Err(ForecastError::InvalidConfiguration {
                message: format!("Invalid log level: {}", config.service.log_level),
            }
            .into())
        }
    }

    config.rating.validate()?;
    config.simulation.validate()?;

    Ok(())
}
