//! Performance benchmarks for rating updates and season simulation

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use season_forecast::config::{ExchangeConfig, HomeAdvantageConfig};
use season_forecast::rating::{
    HomeAdvantage, OutcomeModel, PointsExchangeRule, RatingUpdateRule, TeamGroups,
};
use season_forecast::simulation::{
    MonteCarloAggregator, RngFactory, SeasonSimulator, SeededRngFactory,
};
use season_forecast::{Fixture, RatingStore};
use std::sync::Arc;

const COUNTRIES: [&str; 5] = ["AUS", "NZL", "RSA", "ARG", "JPN"];

fn create_bench_league() -> (RatingStore, TeamGroups, Vec<Fixture>) {
    let mut store = RatingStore::new(80.0);
    let mut groups = TeamGroups::default();

    for (i, country) in COUNTRIES.iter().enumerate() {
        for j in 0..3 {
            let team = format!("{}_team{}", country, j + 1);
            store.set_rating(team.clone(), 74.0 + (i * 3 + j) as f64);
            groups.insert(team, *country);
        }
    }

    let teams: Vec<String> = store.teams().cloned().collect();
    let mut fixtures = Vec::new();
    for home in &teams {
        for away in &teams {
            if home != away {
                fixtures.push(Fixture::home(home.clone(), away.clone()));
            }
        }
    }

    (store, groups, fixtures)
}

fn create_simulator(groups: TeamGroups) -> SeasonSimulator {
    let advantage = HomeAdvantage::new(HomeAdvantageConfig::default(), Arc::new(groups));
    let model = OutcomeModel::new(10.0, advantage.clone()).unwrap();
    let rule = PointsExchangeRule::new(ExchangeConfig::default(), advantage).unwrap();
    SeasonSimulator::new(model, Arc::new(rule))
}

fn bench_apply_result(c: &mut Criterion) {
    let rule = PointsExchangeRule::new(ExchangeConfig::default(), HomeAdvantage::default()).unwrap();
    let record = Fixture::home("home", "away").with_score(24, 20);

    c.bench_function("apply_result", |b| {
        b.iter(|| {
            let mut store = RatingStore::with_teams(80.0, ["home", "away"]);
            black_box(rule.apply_result(&mut store, &record))
        })
    });
}

fn bench_simulate_season(c: &mut Criterion) {
    let (store, groups, fixtures) = create_bench_league();
    let simulator = create_simulator(groups);
    let factory = SeededRngFactory::new(7);

    c.bench_function("simulate_season_15_teams", |b| {
        b.iter(|| {
            let mut rng = factory.rng_for_trial(0);
            black_box(simulator.simulate_season(store.clone(), &fixtures, &mut rng))
        })
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let (store, groups, fixtures) = create_bench_league();
    let simulator = create_simulator(groups);
    let factory = SeededRngFactory::new(7);

    let mut group = c.benchmark_group("aggregate_1000_trials");
    group.sample_size(10);

    for parallel in [false, true] {
        let aggregator = MonteCarloAggregator::new(simulator.clone()).with_parallel(parallel);
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| black_box(aggregator.aggregate(&store, &fixtures, 1_000, &factory)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_apply_result,
    bench_simulate_season,
    bench_aggregate
);
criterion_main!(benches);
