use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::domain::UsageDocument;
use super::export::export_filename;
use super::service::{Clock, UsageService, UsageServiceError};
use super::store::{StoreError, UsageStore};
use crate::scoring::ScoreBand;

/// Body accepted by `POST /api/v1/usage`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageSubmission {
    pub units: f64,
    pub bill: f64,
    #[serde(default)]
    pub bill_image: Option<String>,
}

/// Response after a reading has been recorded.
#[derive(Debug, Clone, Serialize)]
pub struct UsageRecordedView {
    pub eco_score: u8,
    pub band: ScoreBand,
    pub band_label: &'static str,
    pub tip: &'static str,
    pub document: UsageDocument,
}

impl From<UsageDocument> for UsageRecordedView {
    fn from(document: UsageDocument) -> Self {
        let band = ScoreBand::from_score(document.eco_score);
        Self {
            eco_score: document.eco_score,
            band,
            band_label: band.label(),
            tip: band.tip(),
            document,
        }
    }
}

/// Router builder exposing the usage store and dashboard endpoints.
pub fn usage_router<S, C>(service: Arc<UsageService<S, C>>) -> Router
where
    S: UsageStore + 'static,
    C: Clock + 'static,
{
    usage_routes::<S, C>().with_state(service)
}

/// Same routes as [`usage_router`] before the service state is attached, so
/// binaries can register more handlers against the shared service.
pub fn usage_routes<S, C>() -> Router<Arc<UsageService<S, C>>>
where
    S: UsageStore + 'static,
    C: Clock + 'static,
{
    Router::new()
        .route(
            "/api/v1/usage",
            get(document_handler::<S, C>).post(submit_handler::<S, C>),
        )
        .route("/api/v1/usage/dashboard", get(dashboard_handler::<S, C>))
        .route("/api/v1/usage/export", get(export_handler::<S, C>))
        .route("/api/v1/bills/:filename", post(upload_bill_handler::<S, C>))
}

/// HTTP status used for each usage failure.
pub fn status_for(error: &UsageServiceError) -> StatusCode {
    match error {
        UsageServiceError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        UsageServiceError::Store(StoreError::MissingAsset { .. }) => StatusCode::NOT_FOUND,
        UsageServiceError::Store(StoreError::Unavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
        UsageServiceError::Store(StoreError::CorruptDocument { .. })
        | UsageServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// JSON error body with the status from [`status_for`].
pub fn error_response(error: UsageServiceError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        warn!(error = %error, "usage request failed");
    }
    let payload = json!({ "error": error.to_string() });
    (status, Json(payload)).into_response()
}

pub(crate) async fn document_handler<S, C>(
    State(service): State<Arc<UsageService<S, C>>>,
) -> Response
where
    S: UsageStore + 'static,
    C: Clock + 'static,
{
    match service.load() {
        Ok(document) => (StatusCode::OK, Json(document)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<S, C>(
    State(service): State<Arc<UsageService<S, C>>>,
    Json(submission): Json<UsageSubmission>,
) -> Response
where
    S: UsageStore + 'static,
    C: Clock + 'static,
{
    let UsageSubmission {
        units,
        bill,
        bill_image,
    } = submission;

    match service.upsert_usage_entry(units, bill, bill_image) {
        Ok(document) => (StatusCode::OK, Json(UsageRecordedView::from(document))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<S, C>(
    State(service): State<Arc<UsageService<S, C>>>,
) -> Response
where
    S: UsageStore + 'static,
    C: Clock + 'static,
{
    match service.dashboard() {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<S, C>(
    State(service): State<Arc<UsageService<S, C>>>,
) -> Response
where
    S: UsageStore + 'static,
    C: Clock + 'static,
{
    match service.export_csv() {
        Ok(csv) => {
            let disposition = format!(
                "attachment; filename=\"{}\"",
                export_filename(Local::now().date_naive())
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                csv,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn upload_bill_handler<S, C>(
    State(service): State<Arc<UsageService<S, C>>>,
    Path(filename): Path<String>,
    body: Bytes,
) -> Response
where
    S: UsageStore + 'static,
    C: Clock + 'static,
{
    if body.is_empty() {
        let payload = json!({ "error": "bill image upload is empty" });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
    }

    match service.store_bill_image(&filename, &body) {
        Ok(stored) => {
            (StatusCode::CREATED, Json(json!({ "filename": stored }))).into_response()
        }
        Err(error) => error_response(error),
    }
}
