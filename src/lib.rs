//! Season Forecast - team ratings and Monte Carlo season projection
//!
//! This crate replays historical match results into team ratings, predicts
//! win probabilities for upcoming fixtures and estimates championship odds by
//! simulating the rest of the season many times.

pub mod config;
pub mod error;
pub mod forecast;
pub mod league;
pub mod rating;
pub mod simulation;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{ForecastError, Result};
pub use types::*;

// Re-export key components
pub use forecast::{Forecaster, LeagueForecast};
pub use rating::{OutcomeModel, PointsExchangeRule, RatingStore, RatingUpdateRule};
pub use simulation::{AggregateResult, MonteCarloAggregator, SeasonSimulator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
