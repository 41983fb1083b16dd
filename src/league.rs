//! League definition
//!
//! Minimal TOML input for the command-line driver: the teams, their groups,
//! completed results in chronological order and the remaining fixtures.
//!
//! ```toml
//! teams = ["blues", "brumbies"]
//!
//! [groups]
//! blues = "NZL"
//! brumbies = "AUS"
//!
//! [[history]]
//! team_a = "blues"
//! team_b = "brumbies"
//! home = "team_a"
//! score_a = 24
//! score_b = 20
//! played_on = "2024-03-01"
//!
//! [[fixtures]]
//! team_a = "brumbies"
//! team_b = "blues"
//! ```

use crate::error::{ForecastError, Result};
use crate::rating::advantage::TeamGroups;
use crate::rating::replay::sort_chronologically;
use crate::rating::storage::RatingStore;
use crate::types::{Fixture, MatchRecord, TeamId};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueDefinition {
    /// Teams to rate; every team in `history` is added automatically
    pub teams: Vec<TeamId>,
    /// Team → group label used for the reduced home advantage
    pub groups: BTreeMap<TeamId, String>,
    pub history: Vec<MatchRecord>,
    pub fixtures: Vec<Fixture>,
}

impl LeagueDefinition {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read league file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to load league file {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| {
            ForecastError::InvalidMatchRecord {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Rating store with every declared team and every team that appears in
    /// the history at `initial_rating`. Fixture-only teams are not added.
    pub fn initial_store(&self, initial_rating: f64) -> RatingStore {
        let mut store = RatingStore::with_teams(initial_rating, self.teams.iter().cloned());
        for record in &self.history {
            store.register(record.fixture.team_a.clone());
            store.register(record.fixture.team_b.clone());
        }
        store
    }

    /// History in replay order: sorted by date when every record carries
    /// one, file order otherwise
    pub fn chronological_history(&self) -> Vec<MatchRecord> {
        let mut history = self.history.clone();
        if history.iter().all(|record| record.played_on.is_some()) {
            sort_chronologically(&mut history);
        }
        history
    }

    pub fn team_groups(&self) -> TeamGroups {
        TeamGroups::new(self.groups.clone())
    }
}
