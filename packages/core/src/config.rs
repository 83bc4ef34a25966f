use std::env;
use std::path::PathBuf;

use crate::engine::Platform;
use crate::render::Locale;

/// Default directory for persisted history when none is configured.
pub const DEFAULT_HISTORY_DIR: &str = ".ride-offer-calculator";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub history_dir: PathBuf,
    pub locale: Locale,
    pub defaults: OfferDefaults,
}

/// Values used for offer fields the caller leaves out.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferDefaults {
    pub traffic_multiplier: f64,
    pub operating_cost_per_km: f64,
    pub min_hourly_rate: f64,
    pub platform: Platform,
}

impl Default for OfferDefaults {
    fn default() -> Self {
        Self {
            traffic_multiplier: 1.2,
            operating_cost_per_km: 0.30,
            min_hourly_rate: 20.0,
            platform: Platform::InDrive,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_dir: PathBuf::from(DEFAULT_HISTORY_DIR),
            locale: Locale::default(),
            defaults: OfferDefaults::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source. Every variable
    /// is optional; unset ones fall back to `Config::default()`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Config::default();

        let history_dir = lookup("RIDE_HISTORY_DIR")
            .map(PathBuf::from)
            .unwrap_or(base.history_dir);

        let locale = match lookup("RIDE_LOCALE") {
            Some(raw) => raw.parse::<Locale>()?,
            None => base.locale,
        };

        let platform = match lookup("RIDE_DEFAULT_PLATFORM") {
            Some(raw) => raw
                .parse::<Platform>()
                .map_err(|_| format!("Invalid RIDE_DEFAULT_PLATFORM: {}", raw))?,
            None => base.defaults.platform,
        };

        let defaults = OfferDefaults {
            traffic_multiplier: parse_number(
                &lookup,
                "RIDE_DEFAULT_TRAFFIC_MULTIPLIER",
                base.defaults.traffic_multiplier,
            )?,
            operating_cost_per_km: parse_number(
                &lookup,
                "RIDE_DEFAULT_COST_PER_KM",
                base.defaults.operating_cost_per_km,
            )?,
            min_hourly_rate: parse_number(
                &lookup,
                "RIDE_DEFAULT_MIN_HOURLY_RATE",
                base.defaults.min_hourly_rate,
            )?,
            platform,
        };

        Ok(Self {
            history_dir,
            locale,
            defaults,
        })
    }
}

fn parse_number<F>(lookup: &F, name: &str, fallback: f64) -> Result<f64, String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(fallback),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or_else(|| format!("{} must be a non-negative number", name)),
    }
}
