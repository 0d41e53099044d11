use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use ecometer::community::{monthly_challenge, Challenge, Leaderboard};
use ecometer::error::AppError;
use ecometer::scoring::ScoreReport;
use ecometer::usage::{usage_routes, Clock, UsageService, UsageServiceError, UsageStore};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) units: f64,
    pub(crate) household_size: u32,
    #[serde(default)]
    pub(crate) months_tracked: usize,
}

pub(crate) fn with_service_routes<S, C>(service: Arc<UsageService<S, C>>) -> Router
where
    S: UsageStore + 'static,
    C: Clock + 'static,
{
    usage_routes::<S, C>()
        .route("/api/v1/bills/:filename", get(bill_image_endpoint::<S, C>))
        .route("/api/v1/score", post(score_endpoint::<S, C>))
        .route("/api/v1/leaderboard", get(leaderboard_endpoint::<S, C>))
        .route("/api/v1/challenge", get(challenge_endpoint))
        .with_state(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn score_endpoint<S, C>(
    State(service): State<Arc<UsageService<S, C>>>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreReport>, AppError>
where
    S: UsageStore + 'static,
    C: Clock + 'static,
{
    let report = service
        .engine()
        .evaluate(request.units, request.household_size, request.months_tracked)
        .map_err(UsageServiceError::from)?;
    Ok(Json(report))
}

pub(crate) async fn leaderboard_endpoint<S, C>(
    State(service): State<Arc<UsageService<S, C>>>,
) -> Result<Json<Leaderboard>, AppError>
where
    S: UsageStore + 'static,
    C: Clock + 'static,
{
    let document = service.load()?;
    Ok(Json(Leaderboard::build(&document.user, document.eco_score)))
}

pub(crate) async fn challenge_endpoint() -> Json<&'static Challenge> {
    Json(monthly_challenge(&mut rand::thread_rng()))
}

pub(crate) async fn bill_image_endpoint<S, C>(
    State(service): State<Arc<UsageService<S, C>>>,
    Path(filename): Path<String>,
) -> Result<Response, AppError>
where
    S: UsageStore + 'static,
    C: Clock + 'static,
{
    let path = service.resolve_bill_image(&filename)?;
    let bytes = tokio::fs::read(&path).await?;
    let content_type = mime_guess::from_path(&path).first_or_octet_stream();

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, content_type.to_string())],
        bytes,
    )
        .into_response())
}
