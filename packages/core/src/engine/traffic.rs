use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::error::EngineError;

/// Named traffic conditions and the duration multiplier each implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLevel {
    Light,
    Moderate,
    Heavy,
    Severe,
}

impl TrafficLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            TrafficLevel::Light => 1.0,
            TrafficLevel::Moderate => 1.2,
            TrafficLevel::Heavy => 1.5,
            TrafficLevel::Severe => 2.0,
        }
    }
}

impl FromStr for TrafficLevel {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(TrafficLevel::Light),
            "moderate" => Ok(TrafficLevel::Moderate),
            "heavy" => Ok(TrafficLevel::Heavy),
            "severe" => Ok(TrafficLevel::Severe),
            other => Err(EngineError::invalid_input(
                "trafficLevel",
                format!("unknown traffic level '{}'", other),
            )),
        }
    }
}
