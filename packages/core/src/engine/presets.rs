//! Static platform commission table

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::error::EngineError;

/// Rideshare platform an offer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    InDrive,
    Uber,
    Custom,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::InDrive => "indrive",
            Platform::Uber => "uber",
            Platform::Custom => "custom",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indrive" => Ok(Platform::InDrive),
            "uber" => Ok(Platform::Uber),
            "custom" => Ok(Platform::Custom),
            other => Err(EngineError::invalid_input(
                "platform",
                format!("unknown platform '{}'", other),
            )),
        }
    }
}

/// One row of the fee table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformPreset {
    pub platform: Platform,
    /// `None` means the caller supplies the fee.
    pub fee_percent: Option<f64>,
    pub description_key: &'static str,
}

/// Platform commission presets, passed explicitly to whoever builds a
/// `TripOfferInput`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeTable {
    presets: Vec<PlatformPreset>,
}

impl Default for FeeTable {
    fn default() -> Self {
        Self::new(vec![
            PlatformPreset {
                platform: Platform::InDrive,
                fee_percent: Some(12.99),
                description_key: "indriveFeeDescription",
            },
            PlatformPreset {
                platform: Platform::Uber,
                fee_percent: Some(25.00),
                description_key: "uberFeeDescription",
            },
            PlatformPreset {
                platform: Platform::Custom,
                fee_percent: None,
                description_key: "customFeeDescription",
            },
        ])
    }
}

impl FeeTable {
    pub fn new(presets: Vec<PlatformPreset>) -> Self {
        Self { presets }
    }

    pub fn presets(&self) -> &[PlatformPreset] {
        &self.presets
    }

    pub fn get(&self, platform: Platform) -> Option<&PlatformPreset> {
        self.presets.iter().find(|p| p.platform == platform)
    }

    /// Fee percent to charge for `platform`.
    ///
    /// A caller-supplied `fee_override` always wins; without one the
    /// preset is used, and a platform with no preset fee is an error.
    pub fn resolve_fee(
        &self,
        platform: Platform,
        fee_override: Option<f64>,
    ) -> Result<f64, EngineError> {
        if let Some(fee) = fee_override {
            return Ok(fee);
        }

        self.get(platform)
            .and_then(|preset| preset.fee_percent)
            .ok_or_else(|| {
                EngineError::invalid_input(
                    "platformFeePercent",
                    format!("required for platform '{}'", platform),
                )
            })
    }
}
