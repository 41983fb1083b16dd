//! Common types used throughout the forecasting engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unique identifier for teams
pub type TeamId = String;

/// Which participant of a fixture plays at home
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeSide {
    #[default]
    TeamA,
    TeamB,
    Neutral,
}

/// One of the two participants of a fixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    TeamA,
    TeamB,
}

impl std::fmt::Display for HomeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HomeSide::TeamA => write!(f, "team_a"),
            HomeSide::TeamB => write!(f, "team_b"),
            HomeSide::Neutral => write!(f, "neutral"),
        }
    }
}

/// A scheduled match whose result is not known yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub team_a: TeamId,
    pub team_b: TeamId,
    #[serde(default)]
    pub home: HomeSide,
    /// Whether both teams come from the same group (federation, country).
    /// When absent the caller-supplied predicate decides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub same_group: Option<bool>,
    /// Explicit home advantage magnitude; overrides group resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_advantage: Option<f64>,
}

impl Fixture {
    /// Fixture with `team_a` at home
    pub fn home(team_a: impl Into<TeamId>, team_b: impl Into<TeamId>) -> Self {
        Self {
            team_a: team_a.into(),
            team_b: team_b.into(),
            home: HomeSide::TeamA,
            same_group: None,
            home_advantage: None,
        }
    }

    /// Fixture played at a neutral venue
    pub fn neutral(team_a: impl Into<TeamId>, team_b: impl Into<TeamId>) -> Self {
        Self {
            home: HomeSide::Neutral,
            ..Self::home(team_a, team_b)
        }
    }

    pub fn with_same_group(mut self, same_group: bool) -> Self {
        self.same_group = Some(same_group);
        self
    }

    pub fn with_home_advantage(mut self, magnitude: f64) -> Self {
        self.home_advantage = Some(magnitude);
        self
    }

    /// Attach a final score, turning the fixture into a completed match
    pub fn with_score(self, score_a: u32, score_b: u32) -> MatchRecord {
        MatchRecord {
            fixture: self,
            score_a: Some(score_a),
            score_b: Some(score_b),
            played_on: None,
        }
    }
}

/// A completed match used for replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(flatten)]
    pub fixture: Fixture,
    #[serde(default)]
    pub score_a: Option<u32>,
    #[serde(default)]
    pub score_b: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub played_on: Option<NaiveDate>,
}

impl MatchRecord {
    pub fn played_on(mut self, date: NaiveDate) -> Self {
        self.played_on = Some(date);
        self
    }
}

/// Result of one fixture as drawn by the season simulator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedResult {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub winner: Side,
    /// Probability of `team_a` winning at the time of the draw
    pub team_a_win_probability: f64,
}

impl SimulatedResult {
    pub fn winning_team(&self) -> &TeamId {
        match self.winner {
            Side::TeamA => &self.team_a,
            Side::TeamB => &self.team_b,
        }
    }
}

/// Win probability for an upcoming fixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureProbability {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub home: HomeSide,
    pub team_a_win: f64,
}

impl FixtureProbability {
    pub fn team_b_win(&self) -> f64 {
        1.0 - self.team_a_win
    }
}
