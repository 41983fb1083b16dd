//! Logistic win-probability model
//!
//! `p = 1 / (1 + 10^(-diff / S))` with `diff = rating_home - rating_away +
//! home_advantage`. The rating gap is clamped to `±MAX_EXPONENT * S` first, so
//! the probability stays strictly inside (0, 1) for any pair of ratings.

use crate::config::RatingConfig;
use crate::error::{ForecastError, Result};
use crate::rating::advantage::HomeAdvantage;
use crate::rating::storage::RatingStore;
use crate::types::{Fixture, FixtureProbability};
use crate::utils::is_positive_finite;

/// Largest power of ten the curve is evaluated at
pub const MAX_EXPONENT: f64 = 12.0;

/// Converts ratings into win probabilities
#[derive(Debug, Clone)]
pub struct OutcomeModel {
    scale: f64,
    advantage: HomeAdvantage,
}

impl OutcomeModel {
    pub fn new(scale: f64, advantage: HomeAdvantage) -> Result<Self> {
        if !is_positive_finite(scale) {
            return Err(ForecastError::InvalidConfiguration {
                message: format!("Logistic scale must be positive, got {}", scale),
            }
            .into());
        }
        Ok(Self { scale, advantage })
    }

    pub fn from_config(config: &RatingConfig, advantage: HomeAdvantage) -> Result<Self> {
        Self::new(config.logistic_scale, advantage)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn advantage(&self) -> &HomeAdvantage {
        &self.advantage
    }

    /// Probability that the first side wins
    pub fn win_probability(&self, rating_home: f64, rating_away: f64, home_advantage: f64) -> f64 {
        let bound = MAX_EXPONENT * self.scale;
        let diff = (rating_home - rating_away + home_advantage).clamp(-bound, bound);
        1.0 / (1.0 + 10f64.powf(-diff / self.scale))
    }

    /// Probability that `team_a` wins `fixture` given the current ratings
    pub fn fixture_probability(&self, store: &RatingStore, fixture: &Fixture) -> Result<f64> {
        let rating_a = store.rating(&fixture.team_a)?;
        let rating_b = store.rating(&fixture.team_b)?;
        let advantage = self.advantage.for_team_a(fixture)?;
        Ok(self.win_probability(rating_a, rating_b, advantage))
    }

    /// Win probabilities for a list of upcoming fixtures, all against the
    /// same ratings (no rating evolution between fixtures)
    pub fn fixture_probabilities(
        &self,
        store: &RatingStore,
        fixtures: &[Fixture],
    ) -> Result<Vec<FixtureProbability>> {
        fixtures
            .iter()
            .map(|fixture| {
                Ok(FixtureProbability {
                    team_a: fixture.team_a.clone(),
                    team_b: fixture.team_b.clone(),
                    home: fixture.home,
                    team_a_win: self.fixture_probability(store, fixture)?,
                })
            })
            .collect()
    }
}
