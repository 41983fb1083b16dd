//! Monte Carlo season simulation
//!
//! Single-season simulation, per-trial random sources and the aggregator that
//! turns many simulated seasons into championship probabilities.

pub mod aggregate;
pub mod rng;
pub mod season;

// Re-export commonly used types
pub use aggregate::{AggregateResult, MonteCarloAggregator, TeamTally};
pub use rng::{RngFactory, SeededRngFactory};
pub use season::{SeasonOutcome, SeasonSimulator};
