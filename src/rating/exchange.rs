//! Points-exchange rating rule
//!
//! Closed-form update in the style of international rugby rankings:
//!
//! * the home side's rating is inflated by the resolved home advantage;
//! * a winner whose adjusted rating was at least `upset_threshold` ahead
//!   gains nothing (upset protection);
//! * otherwise the winner takes `(upset_threshold + gap_against_winner) * rate`
//!   from the loser, capped, with a larger rate and cap for big margins;
//! * a draw credits both teams the same `|D| * draw_rate`, capped, so it is
//!   not zero-sum but never changes the gap between them.

use crate::config::{ExchangeConfig, RatingConfig};
use crate::error::{ForecastError, Result};
use crate::rating::advantage::HomeAdvantage;
use crate::rating::rule::{ExchangeKind, RatingExchange, RatingUpdateRule};
use crate::rating::storage::RatingStore;
use crate::types::{HomeSide, MatchRecord, Side};
use tracing::trace;

/// Points-exchange rule
#[derive(Debug, Clone)]
pub struct PointsExchangeRule {
    config: ExchangeConfig,
    advantage: HomeAdvantage,
}

impl PointsExchangeRule {
    pub fn new(config: ExchangeConfig, advantage: HomeAdvantage) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, advantage })
    }

    pub fn from_config(config: &RatingConfig, advantage: HomeAdvantage) -> Result<Self> {
        Self::new(config.exchange, advantage)
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Rating deltas `(delta_a, delta_b, kind)` for a result, given the
    /// home-adjusted pre-match ratings
    pub fn exchange_for(
        &self,
        adjusted_a: f64,
        adjusted_b: f64,
        score_a: u32,
        score_b: u32,
    ) -> (f64, f64, ExchangeKind) {
        let winner = match score_a.cmp(&score_b) {
            std::cmp::Ordering::Greater => Side::TeamA,
            std::cmp::Ordering::Less => Side::TeamB,
            std::cmp::Ordering::Equal => {
                // Both sides move by the same amount, so a draw never
                // separates the two ratings
                let shift = ((adjusted_a - adjusted_b).abs() * self.config.draw_rate)
                    .min(self.config.draw_cap);
                return (shift, shift, ExchangeKind::Draw);
            }
        };

        let (adjusted_winner, adjusted_loser) = match winner {
            Side::TeamA => (adjusted_a, adjusted_b),
            Side::TeamB => (adjusted_b, adjusted_a),
        };

        if adjusted_winner - adjusted_loser >= self.config.upset_threshold {
            return (0.0, 0.0, ExchangeKind::ProtectedWin { winner });
        }

        let big_margin = score_a.abs_diff(score_b) >= self.config.big_win_margin;
        let (rate, cap) = if big_margin {
            (self.config.big_win_rate, self.config.big_win_cap)
        } else {
            (self.config.rate, self.config.cap)
        };
        let points = ((self.config.upset_threshold + (adjusted_loser - adjusted_winner)) * rate)
            .clamp(0.0, cap);

        let delta_a = match winner {
            Side::TeamA => points,
            Side::TeamB => -points,
        };
        (delta_a, -delta_a, ExchangeKind::Win { winner, big_margin })
    }
}

impl RatingUpdateRule for PointsExchangeRule {
    fn apply_result(&self, store: &mut RatingStore, record: &MatchRecord) -> Result<RatingExchange> {
        let fixture = &record.fixture;
        if fixture.team_a == fixture.team_b {
            return Err(ForecastError::InvalidMatchRecord {
                reason: format!("{} cannot play itself", fixture.team_a),
            }
            .into());
        }
        let (score_a, score_b) = match (record.score_a, record.score_b) {
            (Some(a), Some(b)) => (a, b),
            _ => {
                return Err(ForecastError::InvalidMatchRecord {
                    reason: format!(
                        "Missing score for {} vs {}",
                        fixture.team_a, fixture.team_b
                    ),
                }
                .into())
            }
        };

        // Read both ratings before writing either
        let rating_a = store.rating(&fixture.team_a)?;
        let rating_b = store.rating(&fixture.team_b)?;
        let magnitude = self.advantage.magnitude(fixture)?;
        let (adjusted_a, adjusted_b) = match fixture.home {
            HomeSide::TeamA => (rating_a + magnitude, rating_b),
            HomeSide::TeamB => (rating_a, rating_b + magnitude),
            HomeSide::Neutral => (rating_a, rating_b),
        };

        let (delta_a, delta_b, kind) = self.exchange_for(adjusted_a, adjusted_b, score_a, score_b);
        store.apply_exchange(&fixture.team_a, delta_a, &fixture.team_b, delta_b)?;

        trace!(
            team_a = %fixture.team_a,
            team_b = %fixture.team_b,
            score_a,
            score_b,
            delta_a,
            "applied match result"
        );

        Ok(RatingExchange {
            team_a: fixture.team_a.clone(),
            team_b: fixture.team_b.clone(),
            delta_a,
            delta_b,
            kind,
        })
    }

    fn name(&self) -> &'static str {
        "points_exchange"
    }
}
