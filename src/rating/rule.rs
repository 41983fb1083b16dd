//! Rating update rule trait
//!
//! A rule turns one completed match into a two-team rating exchange and
//! writes it into a [`RatingStore`].

use crate::rating::storage::RatingStore;
use crate::types::{MatchRecord, Side, TeamId};
use serde::{Deserialize, Serialize};

/// How a match was scored by the update rule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExchangeKind {
    Win { winner: Side, big_margin: bool },
    /// The favourite won by the book; nothing changes hands
    ProtectedWin { winner: Side },
    Draw,
}

/// Rating change applied for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingExchange {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub delta_a: f64,
    pub delta_b: f64,
    pub kind: ExchangeKind,
}

impl RatingExchange {
    pub fn is_unchanged(&self) -> bool {
        self.delta_a == 0.0 && self.delta_b == 0.0
    }

    pub fn delta(&self, side: Side) -> f64 {
        match side {
            Side::TeamA => self.delta_a,
            Side::TeamB => self.delta_b,
        }
    }
}

/// Trait for applying completed match results to a rating store
pub trait RatingUpdateRule: Send + Sync {
    /// Validate `record`, compute the exchange from pre-match ratings and
    /// apply it. On error the store is left untouched.
    fn apply_result(
        &self,
        store: &mut RatingStore,
        record: &MatchRecord,
    ) -> crate::error::Result<RatingExchange>;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;
}
