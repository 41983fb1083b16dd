//! End-to-end forecast
//!
//! Wires the components together from a [`ForecastConfig`]: replay the
//! history, list fixture probabilities against the current ratings, then run
//! the Monte Carlo aggregation.

use crate::config::{validate_config, ForecastConfig};
use crate::error::{ForecastError, Result};
use crate::league::LeagueDefinition;
use crate::rating::advantage::{HomeAdvantage, SameGroup};
use crate::rating::exchange::PointsExchangeRule;
use crate::rating::outcome::OutcomeModel;
use crate::rating::replay::{HistoricalReplay, ReplayReport};
use crate::rating::storage::RatingStore;
use crate::simulation::aggregate::{AggregateResult, MonteCarloAggregator};
use crate::simulation::rng::SeededRngFactory;
use crate::simulation::season::SeasonSimulator;
use crate::types::{Fixture, FixtureProbability, MatchRecord, TeamId};
use serde::{Deserialize, Serialize};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

/// Everything a forecast run produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueForecast {
    pub replay: ReplayReport,
    /// Current ratings after replay, best first
    pub standings: Vec<(TeamId, f64)>,
    pub fixture_probabilities: Vec<FixtureProbability>,
    pub championship: AggregateResult,
}

/// Configured forecasting pipeline
#[derive(Debug, Clone)]
pub struct Forecaster {
    config: ForecastConfig,
    rule: Arc<PointsExchangeRule>,
    aggregator: MonteCarloAggregator,
}

impl Forecaster {
    pub fn new(config: ForecastConfig, groups: Arc<dyn SameGroup>) -> Result<Self> {
        validate_config(&config)?;

        let advantage = HomeAdvantage::new(config.rating.home_advantage, groups);
        let model = OutcomeModel::from_config(&config.rating, advantage.clone())?;
        let rule = Arc::new(PointsExchangeRule::from_config(&config.rating, advantage)?);
        let simulator = SeasonSimulator::new(model, rule.clone());
        let aggregator = MonteCarloAggregator::from_config(simulator, &config.simulation);

        Ok(Self {
            config,
            rule,
            aggregator,
        })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    pub fn aggregator(&self) -> &MonteCarloAggregator {
        &self.aggregator
    }

    /// Bring `store` up to date with `history`
    pub fn replay(&self, store: &mut RatingStore, history: &[MatchRecord]) -> Result<ReplayReport> {
        HistoricalReplay::new(self.rule.as_ref(), self.config.simulation.replay_policy)
            .replay(store, history)
    }

    /// Replay, predict and simulate
    pub fn run(
        &self,
        mut store: RatingStore,
        history: &[MatchRecord],
        fixtures: &[Fixture],
    ) -> Result<LeagueForecast> {
        let never = AtomicBool::new(false);
        self.run_until(&mut store, history, fixtures, &never)
    }

    /// Like [`run`](Self::run) with a cooperative stop flag for the
    /// simulation phase
    pub fn run_until(
        &self,
        store: &mut RatingStore,
        history: &[MatchRecord],
        fixtures: &[Fixture],
        stop: &AtomicBool,
    ) -> Result<LeagueForecast> {
        let replay = self.replay(store, history)?;

        let model = self.aggregator.simulator().model();
        let fixture_probabilities = model.fixture_probabilities(store, fixtures)?;

        let simulation = &self.config.simulation;
        let championship = self.aggregator.aggregate_until(
            store,
            fixtures,
            simulation.trials,
            &SeededRngFactory::new(simulation.seed),
            stop,
        )?;

        info!(
            teams = store.len(),
            fixtures = fixtures.len(),
            trials = championship.completed_trials,
            "Forecast complete"
        );

        Ok(LeagueForecast {
            replay,
            standings: store.ranked(),
            fixture_probabilities,
            championship,
        })
    }

    /// Run a forecast for a league definition. Fully dated histories are
    /// replayed in date order.
    pub fn run_league(&self, league: &LeagueDefinition) -> Result<LeagueForecast> {
        let store = league.initial_store(self.config.rating.initial_rating);
        self.run(store, &league.chronological_history(), &league.fixtures)
    }

    /// Check a league without simulating it: replay the history on a scratch
    /// store under the configured policy, then validate every fixture against
    /// the resulting ratings
    pub fn validate_league(&self, league: &LeagueDefinition) -> Result<ReplayReport> {
        let mut store = league.initial_store(self.config.rating.initial_rating);
        if store.is_empty() {
            return Err(ForecastError::InvalidConfiguration {
                message: "League defines no teams".to_string(),
            }
            .into());
        }
        let report = self.replay(&mut store, &league.chronological_history())?;
        self.aggregator
            .simulator()
            .validate_fixtures(&store, &league.fixtures)?;
        Ok(report)
    }
}
