use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::scoring::{EcoScoreEngine, FixedBonus};
use crate::usage::bills::BillImageStore;
use crate::usage::domain::UsageDocument;
use crate::usage::service::{FixedClock, UsageService};
use crate::usage::store::{StoreError, UsageStore};

pub(super) fn joined_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 8, 1).expect("valid date")
}

pub(super) fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(18, 30, 0))
        .expect("valid timestamp")
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    document: Arc<Mutex<Option<UsageDocument>>>,
    saves: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub(super) fn with_document(document: UsageDocument) -> Self {
        let store = Self::default();
        *store.document.lock().expect("lock") = Some(document);
        store
    }

    pub(super) fn persisted(&self) -> Option<UsageDocument> {
        self.document.lock().expect("lock").clone()
    }

    pub(super) fn save_count(&self) -> usize {
        *self.saves.lock().expect("lock")
    }
}

impl UsageStore for MemoryStore {
    fn load(&self) -> Result<UsageDocument, StoreError> {
        let guard = self.document.lock().expect("lock");
        Ok(guard
            .clone()
            .unwrap_or_else(|| UsageDocument::seed(joined_date())))
    }

    fn save(&self, document: &UsageDocument) -> Result<(), StoreError> {
        *self.document.lock().expect("lock") = Some(document.clone());
        *self.saves.lock().expect("lock") += 1;
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl UsageStore for UnavailableStore {
    fn load(&self) -> Result<UsageDocument, StoreError> {
        Err(StoreError::Unavailable {
            path: PathBuf::from("user_data.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "disk offline"),
        })
    }

    fn save(&self, _document: &UsageDocument) -> Result<(), StoreError> {
        Err(StoreError::Unavailable {
            path: PathBuf::from("user_data.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "disk offline"),
        })
    }
}

pub(super) struct CorruptStore;

impl UsageStore for CorruptStore {
    fn load(&self) -> Result<UsageDocument, StoreError> {
        Err(StoreError::CorruptDocument {
            path: PathBuf::from("user_data.json"),
            reason: "expected value at line 1 column 1".to_string(),
        })
    }

    fn save(&self, _document: &UsageDocument) -> Result<(), StoreError> {
        Ok(())
    }
}

pub(super) fn engine() -> EcoScoreEngine {
    EcoScoreEngine::with_bonus(Arc::new(FixedBonus(0)))
}

pub(super) fn build_service_with<S: UsageStore + 'static>(
    store: Arc<S>,
    now: NaiveDateTime,
    bills_dir: PathBuf,
) -> UsageService<S, FixedClock> {
    UsageService::new(
        store,
        Arc::new(FixedClock(now)),
        engine(),
        BillImageStore::new(bills_dir),
    )
}

pub(super) fn build_service(
    now: NaiveDateTime,
) -> (UsageService<MemoryStore, FixedClock>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = build_service_with(store.clone(), now, PathBuf::from("uploaded_bills"));
    (service, store)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
