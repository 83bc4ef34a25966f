//! Core data types for trip offer evaluation

use serde::{Deserialize, Serialize};

/// Raw numeric inputs describing one trip offer.
///
/// Values arrive already parsed; default policy (traffic, cost per km,
/// minimum rate) belongs to the caller's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripOfferInput {
    pub offer_amount: f64,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub traffic_multiplier: f64,
    pub operating_cost_per_km: f64,
    pub min_hourly_rate: f64,
    pub platform_fee_percent: f64,
}

/// Figures derived from a `TripOfferInput`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    pub platform_fee_amount: f64,
    pub earnings_after_fee: f64,
    pub total_operating_cost: f64,
    pub adjusted_duration_minutes: f64,
    pub net_profit: f64,
    pub effective_hourly_rate: f64,
    pub profit_per_km: f64,
}

/// Accept/reject verdict for a trip offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Recommendation {
    Reject,
    Poor,
    Fair,
    Excellent,
}

/// Severity class used for styling a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeverityClass {
    Poor,
    Fair,
    Good,
}

impl Recommendation {
    pub const ALL: [Recommendation; 4] = [
        Recommendation::Reject,
        Recommendation::Poor,
        Recommendation::Fair,
        Recommendation::Excellent,
    ];

    /// Meter score in `[0, 100]`.
    pub fn score(self) -> u8 {
        match self {
            Recommendation::Reject => 0,
            Recommendation::Poor => 20,
            Recommendation::Fair => 60,
            Recommendation::Excellent => 100,
        }
    }

    pub fn class(self) -> SeverityClass {
        match self {
            Recommendation::Reject | Recommendation::Poor => SeverityClass::Poor,
            Recommendation::Fair => SeverityClass::Fair,
            Recommendation::Excellent => SeverityClass::Good,
        }
    }

    /// Locale-free tag, as stored in history.
    pub fn tag(self) -> &'static str {
        match self {
            Recommendation::Reject => "REJECT",
            Recommendation::Poor => "POOR",
            Recommendation::Fair => "FAIR",
            Recommendation::Excellent => "EXCELLENT",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rec| rec.tag() == tag)
    }
}

impl SeverityClass {
    pub fn as_str(self) -> &'static str {
        match self {
            SeverityClass::Poor => "poor",
            SeverityClass::Fair => "fair",
            SeverityClass::Good => "good",
        }
    }
}

/// Result of a successful evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub metrics: DerivedMetrics,
    pub recommendation: Recommendation,
}
