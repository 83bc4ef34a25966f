//! Persisted history of recent trip evaluations.
//!
//! `HistoryStore` keeps the most recent calculations newest first, capped
//! at `DEFAULT_CAPACITY`. Every `record` and `clear` rewrites the whole
//! serialized list through the backend in one operation, and the
//! in-memory list only changes once that write has succeeded.
//!
//! A missing or unparseable blob on load is treated as empty history.

use std::io;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::backend::{KeyValueBackend, PersistenceError, StorageOperation};
use crate::engine::{Evaluation, Platform, Recommendation, SeverityClass, TripOfferInput};

/// Backend key the history list is stored under.
pub const HISTORY_KEY: &str = "rideCalculations";

/// Default number of entries retained.
pub const DEFAULT_CAPACITY: usize = 10;

/// Timestamp format used for history entries.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Recommendation as persisted alongside a history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecommendation {
    /// Locale-free tag such as `EXCELLENT`.
    pub text: String,
    pub class: SeverityClass,
    pub score: u8,
}

impl From<Recommendation> for StoredRecommendation {
    fn from(rec: Recommendation) -> Self {
        Self {
            text: rec.tag().to_string(),
            class: rec.class(),
            score: rec.score(),
        }
    }
}

impl StoredRecommendation {
    pub fn recommendation(&self) -> Option<Recommendation> {
        Recommendation::from_tag(&self.text)
    }
}

/// Snapshot of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub offer_amount: f64,
    /// Kilometres.
    pub distance: f64,
    /// Traffic-adjusted minutes.
    pub duration: f64,
    pub net_profit: f64,
    pub effective_hourly_rate: f64,
    pub recommendation: StoredRecommendation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_fee_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earnings_after_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub timestamp: String,
}

impl HistoryEntry {
    pub fn new(
        input: &TripOfferInput,
        evaluation: &Evaluation,
        platform: Option<Platform>,
        timestamp: impl Into<String>,
    ) -> Self {
        let metrics = &evaluation.metrics;
        Self {
            offer_amount: input.offer_amount,
            distance: input.distance_km,
            duration: metrics.adjusted_duration_minutes,
            net_profit: metrics.net_profit,
            effective_hourly_rate: metrics.effective_hourly_rate,
            recommendation: evaluation.recommendation.into(),
            app_fee_amount: Some(metrics.platform_fee_amount),
            earnings_after_fee: Some(metrics.earnings_after_fee),
            platform: platform.map(|p| p.as_str().to_string()),
            timestamp: timestamp.into(),
        }
    }

    /// `true` when every figure survives a JSON round trip. serde_json
    /// writes non-finite floats as `null`, which would not load back.
    pub fn is_finite(&self) -> bool {
        [
            self.offer_amount,
            self.distance,
            self.duration,
            self.net_profit,
            self.effective_hourly_rate,
        ]
        .into_iter()
        .chain(self.app_fee_amount)
        .chain(self.earnings_after_fee)
        .all(f64::is_finite)
    }

    /// Same as [`HistoryEntry::new`], stamped with the local time.
    pub fn stamped_now(
        input: &TripOfferInput,
        evaluation: &Evaluation,
        platform: Option<Platform>,
    ) -> Self {
        let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
        Self::new(input, evaluation, platform, timestamp)
    }
}

/// Capacity-bounded, newest-first history backed by a `KeyValueBackend`.
#[derive(Debug)]
pub struct HistoryStore<B: KeyValueBackend> {
    backend: B,
    key: String,
    entries: Vec<HistoryEntry>,
    capacity: usize,
}

impl<B: KeyValueBackend> HistoryStore<B> {
    /// Create an empty store. Call [`HistoryStore::load`] to read what the
    /// backend already holds.
    pub fn new(backend: B) -> Self {
        Self::with_capacity(backend, HISTORY_KEY, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(backend: B, key: impl Into<String>, capacity: usize) -> Self {
        Self {
            backend,
            key: key.into(),
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a store and load its persisted entries.
    pub fn open(backend: B) -> Self {
        let mut store = Self::new(backend);
        store.load();
        store
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// Never fails: absent, malformed or unreadable blobs all become an
    /// empty history.
    pub fn load(&mut self) -> Vec<HistoryEntry> {
        match self.try_load() {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("History unavailable, starting empty: {}", err);
                self.entries.clear();
                Vec::new()
            }
        }
    }

    /// Like [`HistoryStore::load`], but reports backend read failures.
    ///
    /// Malformed content is still normalized to an empty history.
    pub fn try_load(&mut self) -> Result<Vec<HistoryEntry>, PersistenceError> {
        let mut entries = match self.backend.get(&self.key)? {
            None => Vec::new(),
            Some(blob) => match serde_json::from_str::<Vec<HistoryEntry>>(&blob) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(key = %self.key, "Discarding malformed history: {}", err);
                    Vec::new()
                }
            },
        };
        entries.truncate(self.capacity);

        tracing::debug!(count = entries.len(), "History loaded");
        self.entries = entries;
        Ok(self.list())
    }

    /// Prepend `entry`, dropping the oldest entries beyond capacity.
    ///
    /// On a failed write the store keeps its previous contents. Entries
    /// with non-finite figures are refused before anything is written.
    pub fn record(&mut self, entry: HistoryEntry) -> Result<(), PersistenceError> {
        if !entry.is_finite() {
            return Err(PersistenceError::new(
                StorageOperation::Write,
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    "history entry contains non-finite figures",
                ),
            ));
        }

        let mut next = Vec::with_capacity(self.entries.len() + 1);
        next.push(entry);
        next.extend(self.entries.iter().cloned());
        next.truncate(self.capacity);

        self.persist(&next)?;
        self.entries = next;
        Ok(())
    }

    /// Remove every entry and the persisted blob.
    pub fn clear(&mut self) -> Result<(), PersistenceError> {
        self.backend.remove(&self.key)?;
        self.entries.clear();
        Ok(())
    }

    /// Copy of the current entries, newest first.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.entries.clone()
    }

    /// Borrowed view of the current entries, newest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn persist(&self, entries: &[HistoryEntry]) -> Result<(), PersistenceError> {
        let blob = serde_json::to_string(entries)
            .map_err(|err| PersistenceError::new(StorageOperation::Write, io::Error::from(err)))?;
        self.backend.set(&self.key, &blob)
    }
}
