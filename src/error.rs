//! Error types for the forecasting engine
//!
//! Library functions return the anyhow-backed [`Result`] alias; the typed
//! [`ForecastError`] is the cause callers can recover with `downcast_ref`.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for rating and simulation failures
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ForecastError {
    #[error("Unknown team: {team}")]
    UnknownTeam { team: String },

    #[error("Invalid match record: {reason}")]
    InvalidMatchRecord { reason: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Simulation interrupted: {message}")]
    SimulationInterrupted { message: String },
}
