//! Team rating model
//!
//! Rating storage, home advantage resolution, the logistic outcome model,
//! the points-exchange update rule and historical replay.

pub mod advantage;
pub mod exchange;
pub mod outcome;
pub mod replay;
pub mod rule;
pub mod storage;

// Re-export commonly used types
pub use advantage::{GroupedTeams, HomeAdvantage, NoGroups, SameGroup, TeamGroups};
pub use exchange::PointsExchangeRule;
pub use outcome::OutcomeModel;
pub use replay::{sort_chronologically, HistoricalReplay, ReplayFailure, ReplayReport};
pub use rule::{ExchangeKind, RatingExchange, RatingUpdateRule};
pub use storage::{RatingEntry, RatingStore};
