//! Rating model configuration
//!
//! Constants of the logistic outcome curve, the home-advantage magnitudes and
//! the points-exchange rule. Every value can be overridden from TOML.

use crate::error::{ForecastError, Result};
use crate::utils::is_positive_finite;
use serde::{Deserialize, Serialize};

/// Rating model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating every team starts from before any result is applied
    pub initial_rating: f64,
    /// Logistic steepness `S` in `1 / (1 + 10^(-diff / S))`.
    /// Calibrated for the 80-point baseline; 400 is the chess-style scale.
    pub logistic_scale: f64,
    pub home_advantage: HomeAdvantageConfig,
    pub exchange: ExchangeConfig,
}

/// Home advantage magnitudes in rating points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeAdvantageConfig {
    pub standard: f64,
    /// Used when both teams belong to the same group
    pub reduced: f64,
}

/// Constants of the points-exchange update rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Adjusted-rating lead at which a win by the favourite changes nothing
    pub upset_threshold: f64,
    /// Winning margin (in score points) that counts as a big win
    pub big_win_margin: u32,
    pub rate: f64,
    pub cap: f64,
    pub big_win_rate: f64,
    pub big_win_cap: f64,
    pub draw_rate: f64,
    pub draw_cap: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            initial_rating: 80.0,
            logistic_scale: 10.0,
            home_advantage: HomeAdvantageConfig::default(),
            exchange: ExchangeConfig::default(),
        }
    }
}

impl Default for HomeAdvantageConfig {
    fn default() -> Self {
        Self {
            standard: 3.0,
            reduced: 2.0,
        }
    }
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            upset_threshold: 10.0,
            big_win_margin: 16,
            rate: 0.10,
            cap: 2.0,
            big_win_rate: 0.15,
            big_win_cap: 3.0,
            draw_rate: 0.10,
            draw_cap: 1.0,
        }
    }
}

fn invalid(message: impl Into<String>) -> anyhow::Error {
    ForecastError::InvalidConfiguration {
        message: message.into(),
    }
    .into()
}

impl HomeAdvantageConfig {
    /// Magnitude for a match, reduced when both teams share a group
    pub fn magnitude(&self, same_group: bool) -> f64 {
        if same_group {
            self.reduced
        } else {
            self.standard
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.standard.is_finite() || self.standard < 0.0 {
            return Err(invalid("Standard home advantage must be non-negative"));
        }
        if !self.reduced.is_finite() || self.reduced < 0.0 {
            return Err(invalid("Reduced home advantage must be non-negative"));
        }
        if self.reduced > self.standard {
            return Err(invalid(
                "Reduced home advantage cannot exceed the standard home advantage",
            ));
        }
        Ok(())
    }
}

impl ExchangeConfig {
    pub fn validate(&self) -> Result<()> {
        if !is_positive_finite(self.upset_threshold) {
            return Err(invalid("Upset threshold must be positive"));
        }
        if self.big_win_margin == 0 {
            return Err(invalid("Big win margin must be greater than 0"));
        }
        for (name, value) in [
            ("rate", self.rate),
            ("cap", self.cap),
            ("big_win_rate", self.big_win_rate),
            ("big_win_cap", self.big_win_cap),
            ("draw_rate", self.draw_rate),
            ("draw_cap", self.draw_cap),
        ] {
            if !is_positive_finite(value) {
                return Err(invalid(format!("Exchange {} must be positive", name)));
            }
        }
        Ok(())
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.initial_rating.is_finite() {
            return Err(invalid("Initial rating must be finite"));
        }
        if !is_positive_finite(self.logistic_scale) {
            return Err(invalid("Logistic scale must be positive"));
        }
        self.home_advantage.validate()?;
        self.exchange.validate()?;
        Ok(())
    }
}
