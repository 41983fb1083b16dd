//! Home advantage resolution
//!
//! The magnitude for a fixture comes from, in order: the fixture's explicit
//! `home_advantage`, its `same_group` flag, or the caller-supplied
//! [`SameGroup`] predicate. Neutral venues get no advantage.

use crate::config::HomeAdvantageConfig;
use crate::error::{ForecastError, Result};
use crate::types::{Fixture, HomeSide, TeamId};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

/// Predicate deciding whether two teams share a home group (federation, country)
pub trait SameGroup: Send + Sync {
    fn same_group(&self, team_a: &str, team_b: &str) -> bool;
}

impl<F> SameGroup for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn same_group(&self, team_a: &str, team_b: &str) -> bool {
        self(team_a, team_b)
    }
}

/// No two teams share a group
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGroups;

impl SameGroup for NoGroups {
    fn same_group(&self, _team_a: &str, _team_b: &str) -> bool {
        false
    }
}

/// Team → group label; teams without a label share no group
#[derive(Debug, Clone, Default)]
pub struct TeamGroups {
    groups: BTreeMap<TeamId, String>,
}

impl TeamGroups {
    pub fn new(groups: BTreeMap<TeamId, String>) -> Self {
        Self { groups }
    }

    pub fn insert(&mut self, team: impl Into<TeamId>, group: impl Into<String>) {
        self.groups.insert(team.into(), group.into());
    }

    pub fn group_of(&self, team: &str) -> Option<&str> {
        self.groups.get(team).map(String::as_str)
    }
}

impl SameGroup for TeamGroups {
    fn same_group(&self, team_a: &str, team_b: &str) -> bool {
        match (self.group_of(team_a), self.group_of(team_b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// A flat set of teams that all count as one group: the pair is "same
/// group" when both members are in the set.
#[derive(Debug, Clone, Default)]
pub struct GroupedTeams {
    members: BTreeSet<TeamId>,
}

impl<T: Into<TeamId>> FromIterator<T> for GroupedTeams {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            members: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl SameGroup for GroupedTeams {
    fn same_group(&self, team_a: &str, team_b: &str) -> bool {
        self.members.contains(team_a) && self.members.contains(team_b)
    }
}

/// Resolves home advantage magnitudes for fixtures
#[derive(Clone)]
pub struct HomeAdvantage {
    config: HomeAdvantageConfig,
    groups: Arc<dyn SameGroup>,
}

impl fmt::Debug for HomeAdvantage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HomeAdvantage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for HomeAdvantage {
    fn default() -> Self {
        Self::uniform(HomeAdvantageConfig::default())
    }
}

impl HomeAdvantage {
    pub fn new(config: HomeAdvantageConfig, groups: Arc<dyn SameGroup>) -> Self {
        Self { config, groups }
    }

    /// Standard magnitude for every fixture unless the fixture says otherwise
    pub fn uniform(config: HomeAdvantageConfig) -> Self {
        Self::new(config, Arc::new(NoGroups))
    }

    /// No advantage anywhere, e.g. for tournaments at a single venue
    pub fn none() -> Self {
        Self::uniform(HomeAdvantageConfig {
            standard: 0.0,
            reduced: 0.0,
        })
    }

    pub fn config(&self) -> &HomeAdvantageConfig {
        &self.config
    }

    /// Unsigned magnitude credited to the home side of `fixture`
    pub fn magnitude(&self, fixture: &Fixture) -> Result<f64> {
        if fixture.home == HomeSide::Neutral {
            return Ok(0.0);
        }
        if let Some(explicit) = fixture.home_advantage {
            if !explicit.is_finite() || explicit < 0.0 {
                return Err(ForecastError::InvalidMatchRecord {
                    reason: format!(
                        "Home advantage for {} vs {} must be a non-negative number, got {}",
                        fixture.team_a, fixture.team_b, explicit
                    ),
                }
                .into());
            }
            return Ok(explicit);
        }
        let same_group = fixture
            .same_group
            .unwrap_or_else(|| self.groups.same_group(&fixture.team_a, &fixture.team_b));
        Ok(self.config.magnitude(same_group))
    }

    /// Advantage from `team_a`'s point of view: positive when `team_a` is at
    /// home, negative when `team_b` is, zero at a neutral venue
    pub fn for_team_a(&self, fixture: &Fixture) -> Result<f64> {
        let magnitude = self.magnitude(fixture)?;
        Ok(match fixture.home {
            HomeSide::TeamA => magnitude,
            HomeSide::TeamB => -magnitude,
            HomeSide::Neutral => 0.0,
        })
    }
}
