use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    routing::{get, patch, post},
    Router,
};
use serde::Deserialize;
use tracing::error;

use crate::workflows::assessment::directory::JobDirectory;
use crate::workflows::assessment::domain::{AssessmentId, CompanyId};
use crate::workflows::assessment::repository::AssessmentRepository;
use crate::workflows::assessment::router::{failure, missing_company, scoped_company, success};

use super::domain::{
    DecisionNotes, NewSubmission, NextSteps, SubmissionId, SubmissionStatus, SubmissionUpdate,
};
use super::repository::SubmissionRepository;
use super::service::{SubmissionService, SubmissionServiceError};

/// Router builder exposing candidate intake and the reviewer-facing
/// evaluation endpoints.
pub fn submission_router<S, A, J>(service: Arc<SubmissionService<S, A, J>>) -> Router
where
    S: SubmissionRepository + 'static,
    A: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
{
    Router::new()
        .route(
            "/assessments/:assessment_id/submissions",
            post(submit_handler::<S, A, J>),
        )
        .route(
            "/submissions/assessment/:assessment_id",
            get(list_handler::<S, A, J>),
        )
        .route(
            "/submissions/assessment/:assessment_id/by-status",
            post(by_status_handler::<S, A, J>),
        )
        .route(
            "/submissions/assessment/:assessment_id/stats",
            post(stats_handler::<S, A, J>),
        )
        .route("/submissions/:submission_id", get(detail_handler::<S, A, J>))
        .route(
            "/submissions/:submission_id/evaluate",
            patch(evaluate_handler::<S, A, J>),
        )
        .route(
            "/submissions/:submission_id/reject",
            patch(reject_handler::<S, A, J>),
        )
        .route(
            "/submissions/:submission_id/select",
            patch(select_handler::<S, A, J>),
        )
        .route(
            "/submissions/:submission_id/hold",
            patch(hold_handler::<S, A, J>),
        )
        .route(
            "/submissions/:submission_id/status",
            patch(set_status_handler::<S, A, J>),
        )
        .route(
            "/submissions/:submission_id/next-steps",
            patch(next_steps_handler::<S, A, J>),
        )
        .with_state(service)
}

/// Acting company on read endpoints, carried as a query parameter.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CompanyScope {
    #[serde(default)]
    company_id: Option<String>,
}

impl CompanyScope {
    fn into_company_id(self) -> Option<CompanyId> {
        scoped_company(self.company_id)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EvaluatePayload {
    #[serde(default)]
    company_id: Option<String>,
    #[serde(flatten)]
    update: SubmissionUpdate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DecisionPayload {
    #[serde(default)]
    company_id: Option<String>,
    #[serde(flatten)]
    notes: DecisionNotes,
    #[serde(default)]
    next_steps: Option<NextSteps>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusPayload {
    #[serde(default)]
    company_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NextStepsPayload {
    #[serde(default)]
    company_id: Option<String>,
    #[serde(default)]
    next_steps: Option<NextSteps>,
}

pub(crate) async fn submit_handler<S, A, J>(
    State(service): State<Arc<SubmissionService<S, A, J>>>,
    Path(assessment_id): Path<String>,
    axum::Json(submission): axum::Json<NewSubmission>,
) -> Response
where
    S: SubmissionRepository + 'static,
    A: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.submit(&id, submission).await {
        Ok(record) => success(
            StatusCode::CREATED,
            "Submission created successfully",
            record,
        ),
        Err(err) => error_response("create submission", err),
    }
}

pub(crate) async fn list_handler<S, A, J>(
    State(service): State<Arc<SubmissionService<S, A, J>>>,
    Path(assessment_id): Path<String>,
    Query(scope): Query<CompanyScope>,
) -> Response
where
    S: SubmissionRepository + 'static,
    A: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
{
    let Some(company_id) = scope.into_company_id() else {
        return missing_company();
    };
    let id = AssessmentId(assessment_id);
    match service.list(&id, &company_id).await {
        Ok(listing) => success(
            StatusCode::OK,
            "Submissions retrieved successfully",
            listing,
        ),
        Err(err) => error_response("get all submissions", err),
    }
}

pub(crate) async fn detail_handler<S, A, J>(
    State(service): State<Arc<SubmissionService<S, A, J>>>,
    Path(submission_id): Path<String>,
    Query(scope): Query<CompanyScope>,
) -> Response
where
    S: SubmissionRepository + 'static,
    A: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
{
    let Some(company_id) = scope.into_company_id() else {
        return missing_company();
    };
    let id = SubmissionId(submission_id);
    match service.get(&id, &company_id).await {
        Ok(detail) => success(StatusCode::OK, "Submission retrieved successfully", detail),
        Err(err) => error_response("get submission by ID", err),
    }
}

pub(crate) async fn evaluate_handler<S, A, J>(
    State(service): State<Arc<SubmissionService<S, A, J>>>,
    Path(submission_id): Path<String>,
    axum::Json(payload): axum::Json<EvaluatePayload>,
) -> Response
where
    S: SubmissionRepository + 'static,
    A: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
{
    let Some(company_id) = scoped_company(payload.company_id) else {
        return missing_company();
    };
    let id = SubmissionId(submission_id);
    match service.evaluate(&id, &company_id, payload.update).await {
        Ok(record) => success(StatusCode::OK, "Submission evaluated successfully", record),
        Err(err) => error_response("evaluate submission", err),
    }
}

pub(crate) async fn reject_handler<S, A, J>(
    State(service): State<Arc<SubmissionService<S, A, J>>>,
    Path(submission_id): Path<String>,
    axum::Json(payload): axum::Json<DecisionPayload>,
) -> Response
where
    S: SubmissionRepository + 'static,
    A: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
{
    let Some(company_id) = scoped_company(payload.company_id) else {
        return missing_company();
    };
    let id = SubmissionId(submission_id);
    match service.reject(&id, &company_id, payload.notes).await {
        Ok(record) => success(StatusCode::OK, "Submission rejected successfully", record),
        Err(err) => error_response("reject submission", err),
    }
}

pub(crate) async fn select_handler<S, A, J>(
    State(service): State<Arc<SubmissionService<S, A, J>>>,
    Path(submission_id): Path<String>,
    axum::Json(payload): axum::Json<DecisionPayload>,
) -> Response
where
    S: SubmissionRepository + 'static,
    A: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
{
    let Some(company_id) = scoped_company(payload.company_id) else {
        return missing_company();
    };
    let id = SubmissionId(submission_id);
    match service
        .select(&id, &company_id, payload.notes, payload.next_steps)
        .await
    {
        Ok(record) => success(StatusCode::OK, "Submission selected successfully", record),
        Err(err) => error_response("select submission", err),
    }
}

pub(crate) async fn hold_handler<S, A, J>(
    State(service): State<Arc<SubmissionService<S, A, J>>>,
    Path(submission_id): Path<String>,
    axum::Json(payload): axum::Json<DecisionPayload>,
) -> Response
where
    S: SubmissionRepository + 'static,
    A: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
{
    let Some(company_id) = scoped_company(payload.company_id) else {
        return missing_company();
    };
    let id = SubmissionId(submission_id);
    match service.hold(&id, &company_id, payload.notes).await {
        Ok(record) => success(
            StatusCode::OK,
            "Submission put on hold successfully",
            record,
        ),
        Err(err) => error_response("hold submission", err),
    }
}

pub(crate) async fn set_status_handler<S, A, J>(
    State(service): State<Arc<SubmissionService<S, A, J>>>,
    Path(submission_id): Path<String>,
    axum::Json(payload): axum::Json<StatusPayload>,
) -> Response
where
    S: SubmissionRepository + 'static,
    A: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
{
    let Some(company_id) = scoped_company(payload.company_id) else {
        return missing_company();
    };
    let status = match parse_status(payload.status.as_deref()) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let id = SubmissionId(submission_id);
    match service.set_status(&id, &company_id, status).await {
        Ok(record) => success(
            StatusCode::OK,
            "Submission status updated successfully",
            record,
        ),
        Err(err) => error_response("update submission status", err),
    }
}

pub(crate) async fn next_steps_handler<S, A, J>(
    State(service): State<Arc<SubmissionService<S, A, J>>>,
    Path(submission_id): Path<String>,
    axum::Json(payload): axum::Json<NextStepsPayload>,
) -> Response
where
    S: SubmissionRepository + 'static,
    A: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
{
    let Some(company_id) = scoped_company(payload.company_id) else {
        return missing_company();
    };
    let Some(next_steps) = payload.next_steps else {
        return failure(StatusCode::BAD_REQUEST, "Next steps data is required");
    };
    let id = SubmissionId(submission_id);
    match service.add_next_steps(&id, &company_id, next_steps).await {
        Ok(record) => success(StatusCode::OK, "Next steps added successfully", record),
        Err(err) => error_response("add next steps", err),
    }
}

pub(crate) async fn by_status_handler<S, A, J>(
    State(service): State<Arc<SubmissionService<S, A, J>>>,
    Path(assessment_id): Path<String>,
    axum::Json(payload): axum::Json<StatusPayload>,
) -> Response
where
    S: SubmissionRepository + 'static,
    A: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
{
    let Some(company_id) = scoped_company(payload.company_id) else {
        return missing_company();
    };
    let status = match parse_status(payload.status.as_deref()) {
        Ok(status) => status,
        Err(response) => return response,
    };
    let id = AssessmentId(assessment_id);
    match service.list_by_status(&id, &company_id, status).await {
        Ok(listing) => success(
            StatusCode::OK,
            "Submissions retrieved successfully",
            listing,
        ),
        Err(err) => error_response("get submissions by status", err),
    }
}

pub(crate) async fn stats_handler<S, A, J>(
    State(service): State<Arc<SubmissionService<S, A, J>>>,
    Path(assessment_id): Path<String>,
    axum::Json(scope): axum::Json<CompanyScope>,
) -> Response
where
    S: SubmissionRepository + 'static,
    A: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
{
    let Some(company_id) = scope.into_company_id() else {
        return missing_company();
    };
    let id = AssessmentId(assessment_id);
    match service.stats(&id, &company_id).await {
        Ok(buckets) => success(
            StatusCode::OK,
            "Submission statistics retrieved successfully",
            buckets,
        ),
        Err(err) => error_response("get submission stats", err),
    }
}

fn parse_status(raw: Option<&str>) -> Result<SubmissionStatus, Response> {
    let Some(raw) = raw else {
        return Err(failure(StatusCode::BAD_REQUEST, "Status is required"));
    };
    SubmissionStatus::parse(raw)
        .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "Invalid status value"))
}

/// Store and directory failures are masked behind a stable message; the
/// domain errors pass their own text and status through.
fn error_response(action: &str, err: SubmissionServiceError) -> Response {
    if err.is_internal() {
        error!(error = %err, "submission endpoint failure");
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("Failed to {action}"),
        );
    }
    failure(err.status_code(), &err.to_string())
}
