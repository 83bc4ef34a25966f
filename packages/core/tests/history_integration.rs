//! Integration tests for the calculator against on-disk history.
//!
//! Each test wires a `RideCalculator` to a `FileBackend` rooted in a
//! fresh temporary directory, the same assembly `main.rs` uses, and
//! reopens the store to check what actually reached disk.

use ride_offer_calculator::{
    app::{OfferRequest, RideCalculator},
    backend::{FileBackend, KeyValueBackend},
    config::OfferDefaults,
    engine::{FeeTable, Platform, Recommendation, TrafficLevel},
    render::{self, Locale},
    store::{HistoryStore, DEFAULT_CAPACITY, HISTORY_KEY},
};

// ---- Helpers ----------------------------------------------------------------

fn build_calculator(dir: &std::path::Path) -> RideCalculator<FileBackend> {
    RideCalculator::new(
        HistoryStore::open(FileBackend::new(dir)),
        FeeTable::default(),
        OfferDefaults::default(),
    )
}

fn offer(offer_amount: f64) -> OfferRequest {
    OfferRequest {
        offer_amount,
        distance_km: 5.0,
        duration_minutes: 20.0,
        traffic: Some(TrafficLevel::Moderate),
        ..Default::default()
    }
}

// ---- Tests ------------------------------------------------------------------

#[test]
fn evaluated_offer_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let head = {
        let mut calc = build_calculator(dir.path());
        let outcome = calc.evaluate_offer(&offer(10.0), true).unwrap();
        assert_eq!(outcome.evaluation.recommendation, Recommendation::Poor);
        outcome.entry.unwrap()
    };

    let reopened = HistoryStore::open(FileBackend::new(dir.path()));
    assert_eq!(reopened.list().first(), Some(&head));
}

#[test]
fn history_is_capped_across_processes() {
    let dir = tempfile::tempdir().unwrap();

    for i in 1..=11 {
        // A fresh calculator per offer mimics separate CLI invocations.
        let mut calc = build_calculator(dir.path());
        calc.evaluate_offer(&offer(i as f64 * 10.0), true).unwrap();
    }

    let store = HistoryStore::open(FileBackend::new(dir.path()));
    let offers: Vec<f64> = store.list().iter().map(|e| e.offer_amount).collect();
    assert_eq!(offers.len(), DEFAULT_CAPACITY);
    assert_eq!(offers[0], 110.0);
    assert!(!offers.contains(&10.0));
}

#[test]
fn clear_removes_blob_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let mut calc = build_calculator(dir.path());
    calc.evaluate_offer(&offer(50.0), true).unwrap();

    calc.history_mut().clear().unwrap();
    calc.history_mut().clear().unwrap();

    assert!(calc.history().list().is_empty());
    assert!(FileBackend::new(dir.path()).get(HISTORY_KEY).unwrap().is_none());
}

#[test]
fn corrupted_history_file_starts_empty_and_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(format!("{}.json", HISTORY_KEY)), "[{\"oops\":").unwrap();

    let mut calc = build_calculator(dir.path());
    assert!(calc.history().is_empty());

    calc.evaluate_offer(&offer(30.0), true).unwrap();
    let reopened = HistoryStore::open(FileBackend::new(dir.path()));
    assert_eq!(reopened.len(), 1);
}

#[test]
fn uber_offer_renders_in_spanish() {
    let dir = tempfile::tempdir().unwrap();
    let mut calc = build_calculator(dir.path());

    let request = OfferRequest {
        offer_amount: 100.0,
        distance_km: 2.0,
        duration_minutes: 10.0,
        traffic: Some(TrafficLevel::Light),
        operating_cost_per_km: Some(0.3),
        min_hourly_rate: Some(10.0),
        platform: Some(Platform::Uber),
        ..Default::default()
    };
    let outcome = calc.evaluate_offer(&request, true).unwrap();
    assert_eq!(outcome.input.platform_fee_percent, 25.0);
    assert_eq!(outcome.evaluation.recommendation, Recommendation::Excellent);

    let panel = render::render_result(
        Locale::Es,
        &outcome.evaluation.metrics,
        outcome.evaluation.recommendation,
        outcome.input.min_hourly_rate,
    );
    assert!(panel.contains("✅ EXCELENTE"));
    assert!(panel.contains("Comisión de la Plataforma: $25.00"));

    let history = render::render_history(Locale::Es, calc.history().entries());
    assert!(history.contains("$100.00 - 2km"));
    assert!(history.contains("✅ EXCELENTE [good]"));
}

#[test]
fn overflowing_offer_is_rejected_and_history_survives() {
    let dir = tempfile::tempdir().unwrap();
    let mut calc = build_calculator(dir.path());
    for i in 1..=3 {
        calc.evaluate_offer(&offer(i as f64 * 10.0), true).unwrap();
    }

    let extreme = OfferRequest {
        offer_amount: 10.0,
        distance_km: 1e200,
        duration_minutes: 20.0,
        operating_cost_per_km: Some(1e200),
        ..Default::default()
    };
    let err = calc.evaluate_offer(&extreme, true).unwrap_err();
    assert!(err.to_string().contains("operatingCostPerKm"));
    assert_eq!(calc.history().len(), 3);

    let reopened = HistoryStore::open(FileBackend::new(dir.path()));
    assert_eq!(reopened.list(), calc.history().list());
}
