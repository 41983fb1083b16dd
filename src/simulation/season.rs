//! Single-season simulation
//!
//! Plays the remaining fixtures in slice order. Each fixture gets a binary
//! result drawn from the outcome model, recorded as a 1-0 score so the rule
//! applies its narrow-margin rate, and the ratings evolve before the next
//! fixture is drawn.

use crate::error::{ForecastError, Result};
use crate::rating::outcome::OutcomeModel;
use crate::rating::rule::RatingUpdateRule;
use crate::rating::storage::RatingStore;
use crate::types::{Fixture, MatchRecord, Side, SimulatedResult, TeamId};
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::Arc;

/// One completed simulated season
#[derive(Debug, Clone)]
pub struct SeasonOutcome {
    pub ratings: RatingStore,
    pub results: Vec<SimulatedResult>,
}

impl SeasonOutcome {
    /// Team finishing with the highest rating; ties go to the smallest
    /// team identifier
    pub fn champion(&self) -> Option<&TeamId> {
        self.ratings.leader().map(|(team, _)| team)
    }

    /// Simulated wins per team, including teams that won nothing
    pub fn wins(&self) -> BTreeMap<TeamId, u32> {
        let mut wins: BTreeMap<TeamId, u32> =
            self.ratings.teams().map(|team| (team.clone(), 0)).collect();
        for result in &self.results {
            if let Some(count) = wins.get_mut(result.winning_team()) {
                *count += 1;
            }
        }
        wins
    }
}

/// Simulates the rest of a season from a ratings snapshot
#[derive(Clone)]
pub struct SeasonSimulator {
    model: OutcomeModel,
    rule: Arc<dyn RatingUpdateRule>,
}

impl std::fmt::Debug for SeasonSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeasonSimulator")
            .field("model", &self.model)
            .field("rule", &self.rule.name())
            .finish()
    }
}

impl SeasonSimulator {
    pub fn new(model: OutcomeModel, rule: Arc<dyn RatingUpdateRule>) -> Self {
        Self { model, rule }
    }

    pub fn model(&self) -> &OutcomeModel {
        &self.model
    }

    pub fn rule(&self) -> &dyn RatingUpdateRule {
        self.rule.as_ref()
    }

    /// Check fixtures against a store without simulating anything
    pub fn validate_fixtures(&self, store: &RatingStore, fixtures: &[Fixture]) -> Result<()> {
        for fixture in fixtures {
            if fixture.team_a == fixture.team_b {
                return Err(ForecastError::InvalidMatchRecord {
                    reason: format!("Fixture lists {} against itself", fixture.team_a),
                }
                .into());
            }
            store.entry(&fixture.team_a)?;
            store.entry(&fixture.team_b)?;
            self.model.advantage().magnitude(fixture)?;
        }
        Ok(())
    }

    /// Play every fixture once on `store` and return the final state
    pub fn simulate_season<R: Rng + ?Sized>(
        &self,
        mut store: RatingStore,
        fixtures: &[Fixture],
        rng: &mut R,
    ) -> Result<SeasonOutcome> {
        let mut results = Vec::with_capacity(fixtures.len());

        for fixture in fixtures {
            let probability = self.model.fixture_probability(&store, fixture)?;
            let winner = if rng.gen_bool(probability) {
                Side::TeamA
            } else {
                Side::TeamB
            };

            let (score_a, score_b) = match winner {
                Side::TeamA => (1, 0),
                Side::TeamB => (0, 1),
            };
            let record = MatchRecord {
                fixture: fixture.clone(),
                score_a: Some(score_a),
                score_b: Some(score_b),
                played_on: None,
            };
            self.rule.apply_result(&mut store, &record)?;

            results.push(SimulatedResult {
                team_a: fixture.team_a.clone(),
                team_b: fixture.team_b.clone(),
                winner,
                team_a_win_probability: probability,
            });
        }

        Ok(SeasonOutcome {
            ratings: store,
            results,
        })
    }
}
