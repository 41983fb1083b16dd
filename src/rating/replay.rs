//! Historical replay
//!
//! Applies completed results to a [`RatingStore`] strictly in the order given.
//! Ratings are path-dependent, so the caller owns the chronology;
//! [`sort_chronologically`] helps when records carry dates.

use crate::config::ReplayPolicy;
use crate::error::Result;
use crate::rating::rule::RatingUpdateRule;
use crate::rating::storage::RatingStore;
use crate::types::{MatchRecord, TeamId};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// A record that could not be applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayFailure {
    /// Position of the record in the replayed slice
    pub index: usize,
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub reason: String,
}

/// Outcome of a replay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub applied: usize,
    pub skipped: Vec<ReplayFailure>,
}

impl ReplayReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Feeds past results through a rating update rule
pub struct HistoricalReplay<'a> {
    rule: &'a dyn RatingUpdateRule,
    policy: ReplayPolicy,
}

impl<'a> HistoricalReplay<'a> {
    pub fn new(rule: &'a dyn RatingUpdateRule, policy: ReplayPolicy) -> Self {
        Self { rule, policy }
    }

    pub fn policy(&self) -> ReplayPolicy {
        self.policy
    }

    /// Apply every record in order. With [`ReplayPolicy::Abort`] the first
    /// failure is returned and the store keeps the ratings of all records
    /// before it.
    pub fn replay(&self, store: &mut RatingStore, records: &[MatchRecord]) -> Result<ReplayReport> {
        let mut report = ReplayReport::default();

        for (index, record) in records.iter().enumerate() {
            match self.rule.apply_result(store, record) {
                Ok(exchange) => {
                    report.applied += 1;
                    debug!(
                        index,
                        team_a = %exchange.team_a,
                        team_b = %exchange.team_b,
                        delta_a = exchange.delta_a,
                        "replayed match"
                    );
                }
                Err(e) => match self.policy {
                    ReplayPolicy::Abort => {
                        return Err(e).with_context(|| {
                            format!(
                                "Replay aborted at record {} ({} vs {})",
                                index, record.fixture.team_a, record.fixture.team_b
                            )
                        });
                    }
                    ReplayPolicy::SkipInvalid => {
                        warn!("Skipping historical record {}: {}", index, e);
                        report.skipped.push(ReplayFailure {
                            index,
                            team_a: record.fixture.team_a.clone(),
                            team_b: record.fixture.team_b.clone(),
                            reason: e.to_string(),
                        });
                    }
                },
            }
        }

        info!(
            rule = self.rule.name(),
            applied = report.applied,
            skipped = report.skipped.len(),
            "Historical replay complete"
        );
        Ok(report)
    }
}

/// Stable sort by match date. Undated records come first; records on the
/// same date keep their relative order.
pub fn sort_chronologically(records: &mut [MatchRecord]) {
    records.sort_by_key(|record| record.played_on);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExchangeConfig;
    use crate::error::ForecastError;
    use crate::rating::advantage::HomeAdvantage;
    use crate::rating::exchange::PointsExchangeRule;
    use crate::types::Fixture;
    use chrono::NaiveDate;

    fn create_rule() -> PointsExchangeRule {
        PointsExchangeRule::new(ExchangeConfig::default(), HomeAdvantage::default()).unwrap()
    }

    fn create_store() -> RatingStore {
        RatingStore::with_teams(80.0, ["a", "b", "c", "d"])
    }

    fn records_with_bad_middle() -> Vec<MatchRecord> {
        vec![
            Fixture::neutral("a", "b").with_score(20, 10),
            Fixture::neutral("c", "zz").with_score(20, 10),
            Fixture::neutral("c", "d").with_score(20, 10),
        ]
    }

    #[test]
    fn test_replay_applies_in_order() {
        let rule = create_rule();
        let mut store = create_store();
        let records = vec![
            Fixture::neutral("a", "b").with_score(20, 10),
            Fixture::neutral("b", "c").with_score(20, 10),
        ];

        let report = HistoricalReplay::new(&rule, ReplayPolicy::Abort)
            .replay(&mut store, &records)
            .unwrap();

        assert_eq!(report.applied, 2);
        assert!(report.is_clean());
        assert!((store.rating("a").unwrap() - 81.0).abs() < 1e-9);
        assert!((store.rating("b").unwrap() - 80.1).abs() < 1e-9);
        assert!((store.rating("c").unwrap() - 78.9).abs() < 1e-9);
    }

    #[test]
    fn test_abort_policy_keeps_prior_ratings() {
        let rule = create_rule();
        let mut store = create_store();

        let err = HistoricalReplay::new(&rule, ReplayPolicy::Abort)
            .replay(&mut store, &records_with_bad_middle())
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ForecastError>(),
            Some(ForecastError::UnknownTeam { .. })
        ));
        assert!(err.to_string().contains("record 1"));
        // First record applied, third never reached
        assert!((store.rating("a").unwrap() - 81.0).abs() < 1e-9);
        assert_eq!(store.rating("c").unwrap(), 80.0);
    }

    #[test]
    fn test_skip_policy_continues() {
        let rule = create_rule();
        let mut store = create_store();

        let report = HistoricalReplay::new(&rule, ReplayPolicy::SkipInvalid)
            .replay(&mut store, &records_with_bad_middle())
            .unwrap();

        assert_eq!(report.applied, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 1);
        assert_eq!(report.skipped[0].team_b, "zz");
        assert!(report.skipped[0].reason.contains("zz"));
        assert!((store.rating("c").unwrap() - 81.0).abs() < 1e-9);
    }

    #[test]
    fn test_order_matters() {
        let rule = create_rule();
        let forward = vec![
            Fixture::neutral("a", "b").with_score(20, 10),
            Fixture::neutral("b", "c").with_score(20, 10),
        ];
        let reversed: Vec<MatchRecord> = forward.iter().rev().cloned().collect();

        let replay = HistoricalReplay::new(&rule, ReplayPolicy::Abort);
        let mut first = create_store();
        let mut second = create_store();
        replay.replay(&mut first, &forward).unwrap();
        replay.replay(&mut second, &reversed).unwrap();

        assert_ne!(first.snapshot(), second.snapshot());
        assert!((second.rating("a").unwrap() - 81.1).abs() < 1e-9);
        assert!((second.rating("b").unwrap() - 79.9).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_matches_commute() {
        let rule = create_rule();
        let forward = vec![
            Fixture::home("a", "b").with_score(20, 10),
            Fixture::home("c", "d").with_score(3, 30),
        ];
        let reversed: Vec<MatchRecord> = forward.iter().rev().cloned().collect();

        let replay = HistoricalReplay::new(&rule, ReplayPolicy::Abort);
        let mut first = create_store();
        let mut second = create_store();
        replay.replay(&mut first, &forward).unwrap();
        replay.replay(&mut second, &reversed).unwrap();

        assert_eq!(first.snapshot(), second.snapshot());
    }

    #[test]
    fn test_sort_chronologically_is_stable() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let mut records = vec![
            Fixture::neutral("a", "b").with_score(1, 0).played_on(day(9)),
            Fixture::neutral("c", "d").with_score(1, 0).played_on(day(2)),
            Fixture::neutral("a", "c").with_score(1, 0),
            Fixture::neutral("b", "d").with_score(1, 0).played_on(day(2)),
        ];

        sort_chronologically(&mut records);

        let order: Vec<(&str, &str)> = records
            .iter()
            .map(|r| (r.fixture.team_a.as_str(), r.fixture.team_b.as_str()))
            .collect();
        assert_eq!(order, vec![("a", "c"), ("c", "d"), ("b", "d"), ("a", "b")]);
    }
}
