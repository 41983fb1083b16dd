//! Configuration management for the forecasting engine
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values.

pub mod app;
pub mod rating;
pub mod simulation;

// Re-export commonly used types
pub use app::{validate_config, ForecastConfig, ServiceSettings};
pub use rating::{ExchangeConfig, HomeAdvantageConfig, RatingConfig};
pub use simulation::{ReplayPolicy, SimulationConfig};
