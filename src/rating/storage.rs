//! Rating storage
//!
//! [`RatingStore`] is a plain value: replay mutates it in place and every
//! simulation trial works on its own clone. It is backed by a `BTreeMap` so
//! iteration follows team identifier order.

use crate::error::{ForecastError, Result};
use crate::types::TeamId;
use crate::utils::standings_order;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Storage entry for a team's rating with metadata
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingEntry {
    pub rating: f64,
    pub matches_played: u32,
}

impl RatingEntry {
    pub fn new(initial_rating: f64) -> Self {
        Self {
            rating: initial_rating,
            matches_played: 0,
        }
    }
}

/// Team → rating mapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingStore {
    initial_rating: f64,
    entries: BTreeMap<TeamId, RatingEntry>,
}

impl RatingStore {
    /// Create an empty store; registered teams start at `initial_rating`
    pub fn new(initial_rating: f64) -> Self {
        Self {
            initial_rating,
            entries: BTreeMap::new(),
        }
    }

    /// Create a store with every given team at the baseline
    pub fn with_teams<I, T>(initial_rating: f64, teams: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TeamId>,
    {
        let mut store = Self::new(initial_rating);
        for team in teams {
            store.register(team);
        }
        store
    }

    pub fn initial_rating(&self) -> f64 {
        self.initial_rating
    }

    /// Register a team at the baseline rating. Returns false if it was
    /// already present; its rating is left untouched in that case.
    pub fn register(&mut self, team: impl Into<TeamId>) -> bool {
        let team = team.into();
        if self.entries.contains_key(&team) {
            return false;
        }
        self.entries.insert(team, RatingEntry::new(self.initial_rating));
        true
    }

    /// Set a team's rating directly, registering it if needed
    pub fn set_rating(&mut self, team: impl Into<TeamId>, rating: f64) {
        let initial = self.initial_rating;
        self.entries
            .entry(team.into())
            .or_insert_with(|| RatingEntry::new(initial))
            .rating = rating;
    }

    pub fn contains(&self, team: &str) -> bool {
        self.entries.contains_key(team)
    }

    pub fn entry(&self, team: &str) -> Result<&RatingEntry> {
        self.entries.get(team).ok_or_else(|| {
            ForecastError::UnknownTeam {
                team: team.to_string(),
            }
            .into()
        })
    }

    pub fn rating(&self, team: &str) -> Result<f64> {
        Ok(self.entry(team)?.rating)
    }

    /// Apply a two-team exchange. Both teams are checked before either
    /// entry is written, and both count the match as played.
    pub fn apply_exchange(
        &mut self,
        team_a: &str,
        delta_a: f64,
        team_b: &str,
        delta_b: f64,
    ) -> Result<()> {
        self.entry(team_a)?;
        self.entry(team_b)?;

        for (team, delta) in [(team_a, delta_a), (team_b, delta_b)] {
            if let Some(entry) = self.entries.get_mut(team) {
                entry.rating += delta;
                entry.matches_played += 1;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Teams in identifier order
    pub fn teams(&self) -> impl Iterator<Item = &TeamId> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TeamId, &RatingEntry)> {
        self.entries.iter()
    }

    /// Plain team → rating mapping
    pub fn snapshot(&self) -> BTreeMap<TeamId, f64> {
        self.entries
            .iter()
            .map(|(team, entry)| (team.clone(), entry.rating))
            .collect()
    }

    /// Teams sorted by rating (descending), ties by team identifier
    pub fn ranked(&self) -> Vec<(TeamId, f64)> {
        let mut table: Vec<(TeamId, f64)> = self
            .entries
            .iter()
            .map(|(team, entry)| (team.clone(), entry.rating))
            .collect();
        table.sort_by(|a, b| standings_order((a.0.as_str(), a.1), (b.0.as_str(), b.1)));
        table
    }

    /// Highest-rated team under the standings tie-break
    pub fn leader(&self) -> Option<(&TeamId, f64)> {
        self.entries
            .iter()
            .map(|(team, entry)| (team, entry.rating))
            .min_by(|a, b| standings_order((a.0.as_str(), a.1), (b.0.as_str(), b.1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> RatingStore {
        let mut store = RatingStore::with_teams(80.0, ["crusaders", "blues", "brumbies"]);
        store.set_rating("blues", 84.0);
        store
    }

    #[test]
    fn test_store_creation() {
        let store = create_test_store();
        assert_eq!(store.len(), 3);
        assert_eq!(store.rating("crusaders").unwrap(), 80.0);
        assert_eq!(store.rating("blues").unwrap(), 84.0);
        assert_eq!(store.entry("brumbies").unwrap().matches_played, 0);
    }

    #[test]
    fn test_register_keeps_existing_rating() {
        let mut store = create_test_store();
        assert!(!store.register("blues"));
        assert_eq!(store.rating("blues").unwrap(), 84.0);

        assert!(store.register("chiefs"));
        assert_eq!(store.rating("chiefs").unwrap(), 80.0);
    }

    #[test]
    fn test_unknown_team_is_an_error() {
        let store = create_test_store();
        let err = store.rating("hurricanes").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ForecastError>(),
            Some(&ForecastError::UnknownTeam {
                team: "hurricanes".to_string()
            })
        );
    }

    #[test]
    fn test_apply_exchange() {
        let mut store = create_test_store();
        store.apply_exchange("crusaders", 1.5, "blues", -1.5).unwrap();

        assert_eq!(store.rating("crusaders").unwrap(), 81.5);
        assert_eq!(store.rating("blues").unwrap(), 82.5);
        assert_eq!(store.entry("crusaders").unwrap().matches_played, 1);
        assert_eq!(store.entry("blues").unwrap().matches_played, 1);
    }

    #[test]
    fn test_apply_exchange_unknown_team_writes_nothing() {
        let mut store = create_test_store();
        let before = store.clone();

        assert!(store
            .apply_exchange("crusaders", 1.0, "hurricanes", -1.0)
            .is_err());
        assert_eq!(store, before);
    }

    #[test]
    fn test_ranked_tie_break() {
        let mut store = RatingStore::with_teams(80.0, ["waratahs", "chiefs", "reds"]);
        store.set_rating("reds", 90.0);

        let ranked = store.ranked();
        assert_eq!(ranked[0], ("reds".to_string(), 90.0));
        // Equal ratings fall back to identifier order
        assert_eq!(ranked[1].0, "chiefs");
        assert_eq!(ranked[2].0, "waratahs");
    }

    #[test]
    fn test_leader() {
        let store = RatingStore::with_teams(80.0, ["b", "a"]);
        assert_eq!(store.leader(), Some((&"a".to_string(), 80.0)));

        assert!(RatingStore::new(80.0).leader().is_none());
    }

    #[test]
    fn test_snapshot_and_clone_are_independent() {
        let store = create_test_store();
        let mut copy = store.clone();
        copy.apply_exchange("crusaders", 2.0, "brumbies", -2.0).unwrap();

        assert_eq!(store.rating("crusaders").unwrap(), 80.0);
        assert_eq!(copy.snapshot()["crusaders"], 82.0);
    }
}
