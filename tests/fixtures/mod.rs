//! Test fixtures and builders for integration testing

use season_forecast::config::{ExchangeConfig, HomeAdvantageConfig};
use season_forecast::rating::{HomeAdvantage, OutcomeModel, PointsExchangeRule, SameGroup};
use season_forecast::simulation::{MonteCarloAggregator, SeasonSimulator};
use season_forecast::{Fixture, RatingStore};
use std::sync::Arc;

/// Logistic scale used throughout the integration tests
pub const SCALE: f64 = 10.0;

pub fn zero_advantage() -> HomeAdvantage {
    HomeAdvantage::none()
}

pub fn grouped_advantage(groups: Arc<dyn SameGroup>) -> HomeAdvantage {
    HomeAdvantage::new(HomeAdvantageConfig::default(), groups)
}

pub fn create_rule(advantage: HomeAdvantage) -> PointsExchangeRule {
    PointsExchangeRule::new(ExchangeConfig::default(), advantage).unwrap()
}

pub fn create_model(advantage: HomeAdvantage) -> OutcomeModel {
    OutcomeModel::new(SCALE, advantage).unwrap()
}

pub fn create_aggregator(advantage: HomeAdvantage, parallel: bool) -> MonteCarloAggregator {
    let simulator = SeasonSimulator::new(
        create_model(advantage.clone()),
        Arc::new(create_rule(advantage)),
    );
    MonteCarloAggregator::new(simulator).with_parallel(parallel)
}

/// Six-team conference with two teams per country
pub fn conference_store() -> RatingStore {
    let mut store = RatingStore::with_teams(
        80.0,
        [
            "AUS_team1",
            "AUS_team2",
            "NZL_team1",
            "NZL_team2",
            "RSA_team1",
            "RSA_team2",
        ],
    );
    store.set_rating("NZL_team1", 88.0);
    store.set_rating("RSA_team2", 74.0);
    store
}

/// Double round robin over the conference store, home team first
pub fn round_robin(store: &RatingStore) -> Vec<Fixture> {
    let teams: Vec<String> = store.teams().cloned().collect();
    let mut fixtures = Vec::new();
    for home in &teams {
        for away in &teams {
            if home != away {
                fixtures.push(Fixture::home(home.clone(), away.clone()));
            }
        }
    }
    fixtures
}
