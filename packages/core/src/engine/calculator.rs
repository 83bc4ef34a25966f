//! Net profit and hourly rate calculation

use crate::engine::{
    error::EngineError,
    recommendation::get_recommendation,
    types::{DerivedMetrics, Evaluation, TripOfferInput},
};

/// Validate `input` and compute its metrics and recommendation.
///
/// No calculation is attempted when a precondition fails.
pub fn evaluate(input: &TripOfferInput) -> Result<Evaluation, EngineError> {
    validate_input(input)?;

    let metrics = compute_metrics(input);
    check_metrics_finite(&metrics)?;

    let recommendation = get_recommendation(
        metrics.effective_hourly_rate,
        input.min_hourly_rate,
        metrics.net_profit,
    );

    tracing::debug!(
        net_profit = metrics.net_profit,
        hourly_rate = metrics.effective_hourly_rate,
        recommendation = recommendation.tag(),
        "Trip offer evaluated"
    );

    Ok(Evaluation {
        metrics,
        recommendation,
    })
}

/// Check the engine's preconditions, reporting the first failing field.
pub fn validate_input(input: &TripOfferInput) -> Result<(), EngineError> {
    let fields = [
        ("offerAmount", input.offer_amount),
        ("distanceKm", input.distance_km),
        ("durationMinutes", input.duration_minutes),
        ("trafficMultiplier", input.traffic_multiplier),
        ("operatingCostPerKm", input.operating_cost_per_km),
        ("minHourlyRate", input.min_hourly_rate),
        ("platformFeePercent", input.platform_fee_percent),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(EngineError::invalid_input(field, "must be a finite number"));
        }
    }

    for (field, value) in [
        ("offerAmount", input.offer_amount),
        ("distanceKm", input.distance_km),
        ("durationMinutes", input.duration_minutes),
    ] {
        if value <= 0.0 {
            return Err(EngineError::invalid_input(field, "must be > 0"));
        }
    }

    if input.traffic_multiplier < 1.0 {
        return Err(EngineError::invalid_input("trafficMultiplier", "must be >= 1"));
    }

    for (field, value) in [
        ("operatingCostPerKm", input.operating_cost_per_km),
        ("minHourlyRate", input.min_hourly_rate),
    ] {
        if value < 0.0 {
            return Err(EngineError::invalid_input(field, "must be >= 0"));
        }
    }

    if !(0.0..=100.0).contains(&input.platform_fee_percent) {
        return Err(EngineError::invalid_input(
            "platformFeePercent",
            "must be within [0, 100]",
        ));
    }

    Ok(())
}

/// Reject finite inputs whose magnitudes overflow the formula, naming
/// the input that drives the first non-finite figure.
fn check_metrics_finite(metrics: &DerivedMetrics) -> Result<(), EngineError> {
    let figures = [
        ("offerAmount", "platformFeeAmount", metrics.platform_fee_amount),
        ("offerAmount", "earningsAfterFee", metrics.earnings_after_fee),
        ("operatingCostPerKm", "totalOperatingCost", metrics.total_operating_cost),
        ("durationMinutes", "adjustedDurationMinutes", metrics.adjusted_duration_minutes),
        ("offerAmount", "netProfit", metrics.net_profit),
        ("durationMinutes", "effectiveHourlyRate", metrics.effective_hourly_rate),
        ("distanceKm", "profitPerKm", metrics.profit_per_km),
    ];
    for (field, metric, value) in figures {
        if !value.is_finite() {
            return Err(EngineError::invalid_input(
                field,
                format!("out of range: {} is not finite", metric),
            ));
        }
    }
    Ok(())
}

/// Apply the profitability formula without validating `input`.
///
/// The fee and the operating cost are both taken from the gross offer;
/// neither is computed on top of the other.
pub fn compute_metrics(input: &TripOfferInput) -> DerivedMetrics {
    let platform_fee_amount = input.offer_amount * input.platform_fee_percent / 100.0;
    let earnings_after_fee = input.offer_amount - platform_fee_amount;
    let total_operating_cost = input.distance_km * input.operating_cost_per_km;
    let adjusted_duration_minutes = input.duration_minutes * input.traffic_multiplier;
    let net_profit = earnings_after_fee - total_operating_cost;

    let effective_hourly_rate = if adjusted_duration_minutes > 0.0 {
        (net_profit / adjusted_duration_minutes) * 60.0
    } else {
        0.0
    };

    let profit_per_km = if input.distance_km > 0.0 {
        net_profit / input.distance_km
    } else {
        0.0
    };

    DerivedMetrics {
        platform_fee_amount,
        earnings_after_fee,
        total_operating_cost,
        adjusted_duration_minutes,
        net_profit,
        effective_hourly_rate,
        profit_per_km,
    }
}
