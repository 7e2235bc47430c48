use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

use talentgate::workflows::assessment::submissions::{
    submission_router, SubmissionRepository, SubmissionService,
};
use talentgate::workflows::assessment::{
    assessment_router, AssessmentGenerator, AssessmentRepository, AssessmentService,
    CompanyDirectory, JobDirectory,
};

use crate::infra::AppState;

pub(crate) fn with_workflow_routes<R, J, C, G, S>(
    authoring: Arc<AssessmentService<R, J, C, G>>,
    review: Arc<SubmissionService<S, R, J>>,
) -> axum::Router
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
    S: SubmissionRepository + 'static,
{
    assessment_router(authoring)
        .merge(submission_router(review))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "success": true, "message": "Health API is working" }))
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
