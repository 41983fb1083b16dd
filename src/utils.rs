//! Utility functions for the forecasting engine

use std::cmp::Ordering;

/// Ordering used for every "rank teams" operation: higher rating first,
/// equal ratings fall back to the team identifier in ascending order.
pub fn standings_order(a: (&str, f64), b: (&str, f64)) -> Ordering {
    b.1.partial_cmp(&a.1)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.0.cmp(b.0))
}

/// Check that a value is a finite, strictly positive number
pub fn is_positive_finite(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
