//! Monte Carlo aggregation
//!
//! Runs many independent seasons from the same ratings snapshot and tallies
//! how often each team finishes on top. Trials share nothing but the
//! read-only base store and fixture list, so they fan out over rayon without
//! locking. Each trial is folded into position-indexed counters as soon as
//! it finishes, so memory does not grow with the trial count. Per-trial
//! random streams plus in-order merging make a parallel run produce exactly
//! the same result as a sequential one.

use crate::config::SimulationConfig;
use crate::error::{ForecastError, Result};
use crate::rating::storage::RatingStore;
use crate::simulation::rng::RngFactory;
use crate::simulation::season::{SeasonOutcome, SeasonSimulator};
use crate::types::{Fixture, Side, TeamId};
use crate::utils::standings_order;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Per-team statistics across all completed trials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTally {
    /// Trials in which the team finished with the highest rating
    pub win_count: u64,
    /// `win_count / completed_trials`
    pub probability: f64,
    /// `finish_counts[k]` = trials in which the team finished in position `k + 1`
    pub finish_counts: Vec<u64>,
    pub mean_final_rating: f64,
    pub mean_simulated_wins: f64,
}

/// Championship distribution over a Monte Carlo run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub requested_trials: u64,
    pub completed_trials: u64,
    pub stopped_early: bool,
    pub teams: BTreeMap<TeamId, TeamTally>,
}

impl AggregateResult {
    pub fn probability(&self, team: &str) -> Option<f64> {
        self.teams.get(team).map(|tally| tally.probability)
    }

    /// Team → championship probability
    pub fn probabilities(&self) -> BTreeMap<TeamId, f64> {
        self.teams
            .iter()
            .map(|(team, tally)| (team.clone(), tally.probability))
            .collect()
    }

    pub fn total_probability(&self) -> f64 {
        self.teams.values().map(|tally| tally.probability).sum()
    }

    /// Teams by championship probability, ties by team identifier
    pub fn ranked(&self) -> Vec<(TeamId, f64)> {
        let mut table: Vec<(TeamId, f64)> = self.probabilities().into_iter().collect();
        table.sort_by(|a, b| standings_order((a.0.as_str(), a.1), (b.0.as_str(), b.1)));
        table
    }
}

/// Trials folded together, in order, before their tally is merged
const TRIALS_PER_CHUNK: u64 = 256;
/// Chunks evaluated between merges into the run total
const CHUNKS_PER_WAVE: u64 = 64;

/// Counters for a contiguous range of trials, indexed by team position in
/// the base store
#[derive(Debug, Clone, PartialEq)]
struct RunningTally {
    completed: u64,
    win_counts: Vec<u64>,
    /// `finish_counts[team][k]` = trials the team finished in position `k + 1`
    finish_counts: Vec<Vec<u64>>,
    rating_sums: Vec<f64>,
    win_sums: Vec<u64>,
}

impl RunningTally {
    fn new(team_count: usize) -> Self {
        Self {
            completed: 0,
            win_counts: vec![0; team_count],
            finish_counts: vec![vec![0; team_count]; team_count],
            rating_sums: vec![0.0; team_count],
            win_sums: vec![0; team_count],
        }
    }

    /// Fold one season into the counters. `teams` is the base store's team
    /// order; the simulation never registers teams, so `outcome.ratings`
    /// iterates in the same order.
    fn record(
        &mut self,
        teams: &[TeamId],
        slots: &[Option<(usize, usize)>],
        outcome: &SeasonOutcome,
    ) {
        let ratings: Vec<f64> = outcome
            .ratings
            .iter()
            .map(|(_, entry)| entry.rating)
            .collect();
        let mut order: Vec<usize> = (0..ratings.len()).collect();
        order.sort_by(|&x, &y| {
            standings_order((teams[x].as_str(), ratings[x]), (teams[y].as_str(), ratings[y]))
        });

        self.completed += 1;
        if let Some(&champion) = order.first() {
            self.win_counts[champion] += 1;
        }
        for (position, &team) in order.iter().enumerate() {
            self.finish_counts[team][position] += 1;
            self.rating_sums[team] += ratings[team];
        }
        for (result, slot) in outcome.results.iter().zip(slots.iter().copied()) {
            if let Some((team_a, team_b)) = slot {
                let winner = match result.winner {
                    Side::TeamA => team_a,
                    Side::TeamB => team_b,
                };
                self.win_sums[winner] += 1;
            }
        }
    }

    /// Add the counters of a later range of trials
    fn merge(&mut self, later: RunningTally) {
        self.completed += later.completed;
        for (total, count) in self.win_counts.iter_mut().zip(later.win_counts) {
            *total += count;
        }
        for (total, counts) in self.finish_counts.iter_mut().zip(later.finish_counts) {
            for (slot, count) in total.iter_mut().zip(counts) {
                *slot += count;
            }
        }
        for (total, sum) in self.rating_sums.iter_mut().zip(later.rating_sums) {
            *total += sum;
        }
        for (total, sum) in self.win_sums.iter_mut().zip(later.win_sums) {
            *total += sum;
        }
    }

    fn into_result(self, teams: Vec<TeamId>, requested_trials: u64) -> Result<AggregateResult> {
        if self.completed == 0 {
            return Err(ForecastError::SimulationInterrupted {
                message: format!("stopped before any of {} trials completed", requested_trials),
            }
            .into());
        }

        let trials = self.completed as f64;
        let teams = teams
            .into_iter()
            .zip(self.win_counts)
            .zip(self.finish_counts)
            .zip(self.rating_sums.into_iter().zip(self.win_sums))
            .map(|(((team, win_count), finish_counts), (rating_sum, win_sum))| {
                let tally = TeamTally {
                    win_count,
                    probability: win_count as f64 / trials,
                    finish_counts,
                    mean_final_rating: rating_sum / trials,
                    mean_simulated_wins: win_sum as f64 / trials,
                };
                (team, tally)
            })
            .collect();

        Ok(AggregateResult {
            requested_trials,
            completed_trials: self.completed,
            stopped_early: self.completed < requested_trials,
            teams,
        })
    }
}

/// Team positions of each fixture's participants
fn fixture_slots(teams: &[TeamId], fixtures: &[Fixture]) -> Vec<Option<(usize, usize)>> {
    fixtures
        .iter()
        .map(|fixture| {
            let team_a = teams.binary_search(&fixture.team_a).ok()?;
            let team_b = teams.binary_search(&fixture.team_b).ok()?;
            Some((team_a, team_b))
        })
        .collect()
}

/// Runs the season simulator repeatedly and aggregates the outcomes
#[derive(Debug, Clone)]
pub struct MonteCarloAggregator {
    simulator: SeasonSimulator,
    parallel: bool,
}

impl MonteCarloAggregator {
    pub fn new(simulator: SeasonSimulator) -> Self {
        Self {
            simulator,
            parallel: false,
        }
    }

    pub fn from_config(simulator: SeasonSimulator, config: &SimulationConfig) -> Self {
        Self::new(simulator).with_parallel(config.parallel)
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn simulator(&self) -> &SeasonSimulator {
        &self.simulator
    }

    /// Run `trials` seasons and return the championship distribution
    pub fn aggregate<F: RngFactory>(
        &self,
        base: &RatingStore,
        fixtures: &[Fixture],
        trials: u64,
        rng_factory: &F,
    ) -> Result<AggregateResult> {
        let never = AtomicBool::new(false);
        self.aggregate_until(base, fixtures, trials, rng_factory, &never)
    }

    /// Like [`aggregate`](Self::aggregate), but checks `stop` before each
    /// trial. Trials already running finish; if at least one completed the
    /// result is a valid distribution over the completed trials.
    pub fn aggregate_until<F: RngFactory>(
        &self,
        base: &RatingStore,
        fixtures: &[Fixture],
        trials: u64,
        rng_factory: &F,
        stop: &AtomicBool,
    ) -> Result<AggregateResult> {
        if trials == 0 {
            return Err(ForecastError::InvalidConfiguration {
                message: "Trial count must be greater than 0".to_string(),
            }
            .into());
        }
        if base.is_empty() {
            return Err(ForecastError::InvalidConfiguration {
                message: "Cannot simulate a league without teams".to_string(),
            }
            .into());
        }
        self.simulator.validate_fixtures(base, fixtures)?;

        let started = Instant::now();
        info!(
            trials,
            fixtures = fixtures.len(),
            teams = base.len(),
            parallel = self.parallel,
            "Starting Monte Carlo run"
        );

        let teams: Vec<TeamId> = base.teams().cloned().collect();
        let slots = fixture_slots(&teams, fixtures);

        let run_chunk = |chunk: u64| -> Result<RunningTally> {
            let mut tally = RunningTally::new(teams.len());
            let first = chunk * TRIALS_PER_CHUNK;
            let last = (first + TRIALS_PER_CHUNK).min(trials);
            for trial in first..last {
                if stop.load(Ordering::Relaxed) {
                    break;
                }
                let mut rng = rng_factory.rng_for_trial(trial);
                let outcome = self
                    .simulator
                    .simulate_season(base.clone(), fixtures, &mut rng)?;
                tally.record(&teams, &slots, &outcome);
            }
            Ok(tally)
        };

        // Chunks always merge in index order, so the floating-point sums are
        // the same whether the chunks ran sequentially or on the pool
        let chunk_count = trials.div_ceil(TRIALS_PER_CHUNK);
        let mut total = RunningTally::new(teams.len());
        let mut next_chunk = 0;
        while next_chunk < chunk_count && !stop.load(Ordering::Relaxed) {
            let wave_end = (next_chunk + CHUNKS_PER_WAVE).min(chunk_count);
            let wave: Vec<RunningTally> = if self.parallel {
                (next_chunk..wave_end)
                    .into_par_iter()
                    .map(&run_chunk)
                    .collect::<Result<Vec<_>>>()?
            } else {
                (next_chunk..wave_end)
                    .map(&run_chunk)
                    .collect::<Result<Vec<_>>>()?
            };
            for tally in wave {
                total.merge(tally);
            }
            debug!(completed = total.completed, "Merged trial wave");
            next_chunk = wave_end;
        }

        let result = total.into_result(teams, trials)?;

        if result.stopped_early {
            warn!(
                completed = result.completed_trials,
                requested = trials,
                "Monte Carlo run stopped early"
            );
        }
        info!(
            completed = result.completed_trials,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Monte Carlo run complete"
        );
        Ok(result)
    }
}
