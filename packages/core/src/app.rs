//! Orchestration between caller input, the engine and the history store.
//!
//! [`RideCalculator`] owns the history store, the fee table and the
//! configured defaults. It fills omitted offer fields from
//! configuration, evaluates, and records the result. History failures
//! are reported in the outcome and never hide a successful evaluation.

use crate::backend::{KeyValueBackend, PersistenceError};
use crate::config::OfferDefaults;
use crate::engine::{self, Evaluation, FeeTable, Platform, TrafficLevel, TripOfferInput};
use crate::error::AppError;
use crate::render::Locale;
use crate::store::{HistoryEntry, HistoryStore};

/// Backend key for the remembered display language.
pub const LOCALE_KEY: &str = "preferredLanguage";

/// Offer fields as supplied by the caller; `None` means "use the default".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferRequest {
    pub offer_amount: f64,
    pub distance_km: f64,
    pub duration_minutes: f64,
    pub traffic: Option<TrafficLevel>,
    pub traffic_multiplier: Option<f64>,
    pub operating_cost_per_km: Option<f64>,
    pub min_hourly_rate: Option<f64>,
    pub platform: Option<Platform>,
    pub fee_percent: Option<f64>,
}

/// Everything produced by one successful evaluation.
#[derive(Debug)]
pub struct OfferOutcome {
    pub platform: Platform,
    pub input: TripOfferInput,
    pub evaluation: Evaluation,
    /// `None` when saving was skipped.
    pub entry: Option<HistoryEntry>,
    /// Set when the evaluation could not be saved.
    pub persistence_error: Option<PersistenceError>,
}

pub struct RideCalculator<B: KeyValueBackend> {
    store: HistoryStore<B>,
    fee_table: FeeTable,
    defaults: OfferDefaults,
}

impl<B: KeyValueBackend> RideCalculator<B> {
    pub fn new(store: HistoryStore<B>, fee_table: FeeTable, defaults: OfferDefaults) -> Self {
        Self {
            store,
            fee_table,
            defaults,
        }
    }

    pub fn fee_table(&self) -> &FeeTable {
        &self.fee_table
    }

    pub fn history(&self) -> &HistoryStore<B> {
        &self.store
    }

    pub fn history_mut(&mut self) -> &mut HistoryStore<B> {
        &mut self.store
    }

    /// Turn a request into a complete engine input.
    pub fn build_input(
        &self,
        request: &OfferRequest,
    ) -> Result<(TripOfferInput, Platform), AppError> {
        let platform = request.platform.unwrap_or(self.defaults.platform);
        let platform_fee_percent = self.fee_table.resolve_fee(platform, request.fee_percent)?;

        let traffic_multiplier = request
            .traffic_multiplier
            .or(request.traffic.map(TrafficLevel::multiplier))
            .unwrap_or(self.defaults.traffic_multiplier);

        let input = TripOfferInput {
            offer_amount: request.offer_amount,
            distance_km: request.distance_km,
            duration_minutes: request.duration_minutes,
            traffic_multiplier,
            operating_cost_per_km: request
                .operating_cost_per_km
                .unwrap_or(self.defaults.operating_cost_per_km),
            min_hourly_rate: request
                .min_hourly_rate
                .unwrap_or(self.defaults.min_hourly_rate),
            platform_fee_percent,
        };

        Ok((input, platform))
    }

    /// Evaluate `request` and, when `save` is set, record it in history.
    ///
    /// Invalid input is an error; a failed save is not.
    pub fn evaluate_offer(
        &mut self,
        request: &OfferRequest,
        save: bool,
    ) -> Result<OfferOutcome, AppError> {
        let (input, platform) = self.build_input(request)?;
        let evaluation = engine::evaluate(&input)?;

        let mut outcome = OfferOutcome {
            platform,
            input,
            evaluation,
            entry: None,
            persistence_error: None,
        };

        if save {
            let entry = HistoryEntry::stamped_now(&input, &evaluation, Some(platform));
            match self.store.record(entry.clone()) {
                Ok(()) => outcome.entry = Some(entry),
                Err(err) => {
                    tracing::warn!("Calculation not saved to history: {}", err);
                    outcome.persistence_error = Some(err);
                }
            }
        }

        Ok(outcome)
    }
}

/// Pick the display language: explicit choice, then the remembered one,
/// then the configured default. An explicit choice is remembered.
pub fn resolve_locale<B: KeyValueBackend>(
    backend: &B,
    explicit: Option<Locale>,
    fallback: Locale,
) -> Locale {
    if let Some(locale) = explicit {
        if let Err(err) = backend.set(LOCALE_KEY, locale.as_str()) {
            tracing::warn!("Could not remember locale preference: {}", err);
        }
        return locale;
    }

    match backend.get(LOCALE_KEY) {
        Ok(Some(raw)) => raw.parse::<Locale>().unwrap_or(fallback),
        Ok(None) => fallback,
        Err(err) => {
            tracing::warn!("Could not read locale preference: {}", err);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::engine::{EngineError, Recommendation};

    fn calculator(backend: &MemoryBackend) -> RideCalculator<&MemoryBackend> {
        RideCalculator::new(
            HistoryStore::new(backend),
            FeeTable::default(),
            OfferDefaults::default(),
        )
    }

    fn request(offer_amount: f64, distance_km: f64, duration_minutes: f64) -> OfferRequest {
        OfferRequest {
            offer_amount,
            distance_km,
            duration_minutes,
            ..Default::default()
        }
    }

    #[test]
    fn defaults_fill_omitted_fields() {
        let backend = MemoryBackend::new();
        let calc = calculator(&backend);
        let (input, platform) = calc.build_input(&request(10.0, 5.0, 20.0)).unwrap();

        assert_eq!(platform, Platform::InDrive);
        assert_eq!(input.traffic_multiplier, 1.2);
        assert_eq!(input.operating_cost_per_km, 0.30);
        assert_eq!(input.min_hourly_rate, 20.0);
        assert_eq!(input.platform_fee_percent, 12.99);
    }

    #[test]
    fn traffic_level_and_explicit_multiplier() {
        let backend = MemoryBackend::new();
        let calc = calculator(&backend);

        let mut req = request(10.0, 5.0, 20.0);
        req.traffic = Some(TrafficLevel::Severe);
        assert_eq!(calc.build_input(&req).unwrap().0.traffic_multiplier, 2.0);

        req.traffic_multiplier = Some(1.35);
        assert_eq!(calc.build_input(&req).unwrap().0.traffic_multiplier, 1.35);
    }

    #[test]
    fn custom_platform_without_fee_is_invalid() {
        let backend = MemoryBackend::new();
        let mut calc = calculator(&backend);
        let mut req = request(10.0, 5.0, 20.0);
        req.platform = Some(Platform::Custom);

        let err = calc.evaluate_offer(&req, true).unwrap_err();
        assert!(matches!(
            err,
            AppError::Engine(EngineError::InvalidInput { field: "platformFeePercent", .. })
        ));
        assert!(calc.history().is_empty());
    }

    #[test]
    fn evaluation_is_recorded() {
        let backend = MemoryBackend::new();
        let mut calc = calculator(&backend);

        let outcome = calc.evaluate_offer(&request(10.0, 5.0, 20.0), true).unwrap();
        assert_eq!(outcome.evaluation.recommendation, Recommendation::Poor);
        assert!(outcome.persistence_error.is_none());

        let history = calc.history().list();
        assert_eq!(history.len(), 1);
        assert_eq!(Some(&history[0]), outcome.entry.as_ref());
        assert_eq!(history[0].platform.as_deref(), Some("indrive"));
    }

    #[test]
    fn invalid_input_never_reaches_history() {
        let backend = MemoryBackend::new();
        let mut calc = calculator(&backend);
        assert!(calc.evaluate_offer(&request(10.0, 0.0, 20.0), true).is_err());
        assert!(calc.history().is_empty());
    }

    #[test]
    fn failed_save_still_returns_result() {
        let backend = MemoryBackend::new();
        let mut calc = calculator(&backend);
        backend.set_failing(true);

        let outcome = calc.evaluate_offer(&request(100.0, 2.0, 10.0), true).unwrap();
        assert!(outcome.persistence_error.is_some());
        assert!(outcome.entry.is_none());
        assert!(calc.history().is_empty());
    }

    #[test]
    fn no_save_skips_history() {
        let backend = MemoryBackend::new();
        let mut calc = calculator(&backend);
        let outcome = calc.evaluate_offer(&request(10.0, 5.0, 20.0), false).unwrap();
        assert!(outcome.entry.is_none());
        assert!(calc.history().is_empty());
    }

    #[test]
    fn locale_preference_is_remembered() {
        let backend = MemoryBackend::new();
        assert_eq!(resolve_locale(&backend, None, Locale::En), Locale::En);
        assert_eq!(resolve_locale(&backend, Some(Locale::Es), Locale::En), Locale::Es);
        assert_eq!(resolve_locale(&backend, None, Locale::En), Locale::Es);
    }

    #[test]
    fn locale_preference_is_stored_as_plain_code() {
        let backend = MemoryBackend::new();
        resolve_locale(&backend, Some(Locale::Es), Locale::En);
        assert_eq!(backend.get(LOCALE_KEY).unwrap().as_deref(), Some("es"));

        backend.set(LOCALE_KEY, "en").unwrap();
        assert_eq!(resolve_locale(&backend, None, Locale::Es), Locale::En);
    }

    #[test]
    fn garbled_locale_preference_falls_back() {
        let backend = MemoryBackend::new();
        backend.set(LOCALE_KEY, "klingon").unwrap();
        assert_eq!(resolve_locale(&backend, None, Locale::Es), Locale::Es);
    }
}
