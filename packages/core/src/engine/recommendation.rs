//! Four-way trip classification

use crate::engine::types::Recommendation;

/// Ratio of the minimum hourly rate at which a ride counts as excellent.
pub const EXCELLENT_RATE_FACTOR: f64 = 1.5;

/// Classify a trip. Rules are checked in order and the first match wins,
/// so a non-positive profit is always a `Reject`.
pub fn get_recommendation(
    effective_hourly_rate: f64,
    min_hourly_rate: f64,
    net_profit: f64,
) -> Recommendation {
    if net_profit <= 0.0 {
        Recommendation::Reject
    } else if effective_hourly_rate >= min_hourly_rate * EXCELLENT_RATE_FACTOR {
        Recommendation::Excellent
    } else if effective_hourly_rate >= min_hourly_rate {
        Recommendation::Fair
    } else {
        Recommendation::Poor
    }
}
