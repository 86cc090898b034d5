use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use job_match::error::AppError;
use job_match::matching::{match_router, JobMatcher};
use job_match::workflows::job_check::{
    run_blocking, JobCheckPipeline, JobCheckSummary, JobSource, Notifier, ResumeSource,
};
use serde_json::json;

use crate::infra::AppState;

/// Matching API plus the operational endpoints and the on-demand job check.
pub(crate) fn with_service_routes<M, S, R, N>(
    matcher: Arc<M>,
    pipeline: JobCheckPipeline<S, R, N>,
) -> Router
where
    M: JobMatcher + 'static,
    S: JobSource + 'static,
    R: ResumeSource + 'static,
    N: Notifier + 'static,
{
    match_router(matcher)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/job-check", post(job_check_endpoint::<S, R, N>))
        .layer(Extension(pipeline))
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

pub(crate) async fn job_check_endpoint<S, R, N>(
    Extension(pipeline): Extension<JobCheckPipeline<S, R, N>>,
) -> Result<Json<JobCheckSummary>, AppError>
where
    S: JobSource + 'static,
    R: ResumeSource + 'static,
    N: Notifier + 'static,
{
    let summary = run_blocking(pipeline).await?;
    Ok(Json(summary))
}
