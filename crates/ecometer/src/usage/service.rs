use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::info;

use super::bills::BillImageStore;
use super::domain::{month_label, CurrentMonth, UsageDocument, UsageEntry};
use super::export::history_csv;
use super::insights::UsageInsights;
use super::store::{StoreError, UsageStore};
use crate::scoring::{
    achievements_for, validate_amount, Achievement, ComparisonStats, EcoScoreEngine, ScoreBand,
    ScoringError,
};

/// Source of "now" for month labels and upload timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Service composing the usage store, bill images and the scoring engine.
pub struct UsageService<S, C = SystemClock> {
    store: Arc<S>,
    clock: Arc<C>,
    engine: Arc<EcoScoreEngine>,
    bills: BillImageStore,
    // serializes every store access within this process
    write_lock: Mutex<()>,
}

impl<S, C> UsageService<S, C>
where
    S: UsageStore + 'static,
    C: Clock + 'static,
{
    pub fn new(store: Arc<S>, clock: Arc<C>, engine: EcoScoreEngine, bills: BillImageStore) -> Self {
        Self {
            store,
            clock,
            engine: Arc::new(engine),
            bills,
            write_lock: Mutex::new(()),
        }
    }

    pub fn engine(&self) -> &EcoScoreEngine {
        &self.engine
    }

    /// Reads the document under the same lock as writers, so a reader never
    /// observes a save in progress.
    pub fn load(&self) -> Result<UsageDocument, UsageServiceError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.store.load()?)
    }

    pub fn save(&self, document: &UsageDocument) -> Result<(), UsageServiceError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.save(document)?;
        Ok(())
    }

    /// Records this month's reading, rescores it and persists the document.
    ///
    /// The history entry for the current month label is appended on first
    /// submission and overwritten on every later one. `current_month` keeps
    /// the latest submission and is not cleared once folded into history.
    pub fn upsert_usage_entry(
        &self,
        units: f64,
        bill: f64,
        bill_image: Option<String>,
    ) -> Result<UsageDocument, UsageServiceError> {
        validate_amount("units", units)?;
        validate_amount("bill", bill)?;
        let bill_image = bill_image
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut document = self.store.load()?;
        let now = self.clock.now();

        document.current_month = CurrentMonth {
            units,
            bill,
            date_uploaded: Some(now),
            bill_image: bill_image.clone(),
        };
        document.eco_score = self.engine.score(units, document.user.household_size)?;

        let month = month_label(now);
        let appended = document.upsert_entry(UsageEntry {
            month: month.clone(),
            units,
            bill,
            bill_image,
        });

        self.store.save(&document)?;
        info!(
            %month,
            units,
            eco_score = document.eco_score,
            appended,
            "usage entry recorded"
        );

        Ok(document)
    }

    /// Stores an uploaded bill image and returns the generated filename.
    pub fn store_bill_image(
        &self,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, UsageServiceError> {
        let filename = self.bills.save(original_name, bytes, self.clock.now())?;
        info!(%filename, size = bytes.len(), "bill image stored");
        Ok(filename)
    }

    pub fn image_path_for(&self, filename: Option<&str>) -> Option<PathBuf> {
        self.bills.image_path_for(filename)
    }

    pub fn resolve_bill_image(&self, filename: &str) -> Result<PathBuf, UsageServiceError> {
        Ok(self.bills.resolve(filename)?)
    }

    pub fn export_csv(&self) -> Result<String, UsageServiceError> {
        let document = self.load()?;
        Ok(history_csv(
            &document.usage_history,
            self.engine.config().community_average,
        )?)
    }

    /// Collects everything the home and statistics views display.
    pub fn dashboard(&self) -> Result<DashboardSnapshot, UsageServiceError> {
        let document = self.load()?;
        let effective_units = document.effective_units();
        let household_size = document.user.household_size;

        let comparison = match effective_units {
            Some(units) if units > 0.0 => Some(self.engine.comparison(units, household_size)?),
            _ => None,
        };

        let band = ScoreBand::from_score(document.eco_score);
        let suggestions = self
            .engine
            .suggestions(document.eco_score, effective_units.unwrap_or(0.0));
        let achievements = achievements_for(document.eco_score, document.months_tracked());
        let insights =
            UsageInsights::from_document(&document, self.engine.config().tariff_per_unit);

        Ok(DashboardSnapshot {
            band,
            band_label: band.label(),
            comparison,
            suggestions,
            achievements,
            insights,
            document,
        })
    }
}

/// Read-only view assembled for the front end.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub document: UsageDocument,
    pub band: ScoreBand,
    pub band_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonStats>,
    pub suggestions: Vec<String>,
    pub achievements: Vec<Achievement>,
    pub insights: UsageInsights,
}

/// Error raised by the usage service.
#[derive(Debug, thiserror::Error)]
pub enum UsageServiceError {
    #[error(transparent)]
    InvalidInput(#[from] ScoringError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to render usage export: {0}")]
    Export(#[from] csv::Error),
}
