//! End-to-end usage tracking against a real JSON file on disk, driven through
//! the public service and HTTP router.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{json, Value};
use tower::ServiceExt;

use ecometer::scoring::{EcoScoreEngine, FixedBonus};
use ecometer::usage::{
    usage_router, BillImageStore, FixedClock, JsonFileStore, StoreError, UsageDocument,
    UsageService, UsageServiceError, UsageStore,
};

fn at(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(9, 15, 0))
        .expect("valid timestamp")
}

fn service_in(
    dir: &std::path::Path,
    now: NaiveDateTime,
) -> (UsageService<JsonFileStore, FixedClock>, Arc<JsonFileStore>) {
    let store = Arc::new(JsonFileStore::new(dir.join("user_data.json")));
    let service = UsageService::new(
        store.clone(),
        Arc::new(FixedClock(now)),
        EcoScoreEngine::with_bonus(Arc::new(FixedBonus(0))),
        BillImageStore::new(dir.join("uploaded_bills")),
    );
    (service, store)
}

#[test]
fn same_month_submissions_collapse_into_one_entry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (service, store) = service_in(dir.path(), at(2025, 4, 2));

    service.upsert_usage_entry(320.0, 7520.0, None).expect("first");
    let document = service
        .upsert_usage_entry(260.0, 6110.0, Some("bill_20250402_091500.jpg".to_string()))
        .expect("second");

    let april: Vec<_> = document
        .usage_history
        .iter()
        .filter(|entry| entry.month == "Apr 2025")
        .collect();
    assert_eq!(april.len(), 1);
    assert_eq!(april[0].units, 260.0);
    assert_eq!(april[0].bill, 6110.0);
    assert_eq!(document.usage_history.len(), 4);
    assert_eq!(document.eco_score, 86);

    let reloaded = store.load().expect("reload");
    assert_eq!(reloaded, document);
}

#[test]
fn saving_a_loaded_document_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (service, store) = service_in(dir.path(), at(2025, 5, 20));
    service.upsert_usage_entry(198.5, 4664.75, None).expect("upsert");

    let loaded = store.load().expect("load");
    store.save(&loaded).expect("save");

    assert_eq!(store.load().expect("reload"), loaded);
}

#[test]
fn unreadable_document_is_surfaced_not_reset() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (service, store) = service_in(dir.path(), at(2025, 5, 20));
    std::fs::write(store.path(), b"{ \"user\": ").expect("write corrupt file");

    let err = service
        .upsert_usage_entry(250.0, 5875.0, None)
        .expect_err("corrupt document");

    assert!(matches!(
        err,
        UsageServiceError::Store(StoreError::CorruptDocument { .. })
    ));
    let on_disk = std::fs::read_to_string(store.path()).expect("file kept");
    assert_eq!(on_disk, "{ \"user\": ");
}

#[test]
fn missing_file_yields_seed_until_first_save() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (service, store) = service_in(dir.path(), at(2025, 1, 10));

    let document = service.load().expect("seed");
    assert_eq!(document.months_tracked(), 3);
    assert_eq!(document.user.name, "Hania");
    assert!(!store.path().exists());

    service.upsert_usage_entry(300.0, 7050.0, None).expect("upsert");
    let persisted: UsageDocument =
        serde_json::from_str(&std::fs::read_to_string(store.path()).expect("written"))
            .expect("valid json");
    assert_eq!(persisted.eco_score, 80);
    assert_eq!(persisted.current_month.units, 300.0);
    assert_eq!(
        persisted.current_month.date_uploaded,
        Some(at(2025, 1, 10))
    );
}

#[tokio::test]
async fn http_flow_uploads_bill_then_records_usage() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (service, _store) = service_in(dir.path(), at(2025, 6, 1));
    let router = usage_router(Arc::new(service));

    let upload = router
        .clone()
        .oneshot(
            Request::post("/api/v1/bills/June.PNG")
                .body(Body::from(vec![0x89, b'P', b'N', b'G']))
                .expect("request"),
        )
        .await
        .expect("upload route");
    assert_eq!(upload.status(), StatusCode::CREATED);
    let uploaded = read_json(upload).await;
    let filename = uploaded["filename"].as_str().expect("filename").to_string();
    assert_eq!(filename, "bill_20250601_091500.png");
    assert!(dir.path().join("uploaded_bills").join(&filename).is_file());

    let submit = router
        .clone()
        .oneshot(
            Request::post("/api/v1/usage")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "units": 150, "bill": 3525, "bill_image": filename }).to_string(),
                ))
                .expect("request"),
        )
        .await
        .expect("submit route");
    assert_eq!(submit.status(), StatusCode::OK);
    let recorded = read_json(submit).await;
    assert_eq!(recorded["eco_score"], 95);
    assert_eq!(recorded["band"], "exceptional");

    let export = router
        .oneshot(
            Request::get("/api/v1/usage/export")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("export route");
    assert_eq!(export.status(), StatusCode::OK);
    let body = axum::body::to_bytes(export.into_body(), 64 * 1024)
        .await
        .expect("body");
    let csv = String::from_utf8(body.to_vec()).expect("utf8");
    assert!(csv.contains("Jun 2025,150.0,3525.0,23.5,-50.0%"));
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&body).expect("json")
}
