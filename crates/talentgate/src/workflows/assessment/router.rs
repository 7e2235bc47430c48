use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::authoring::AssessmentGenerator;
use super::directory::{CompanyDirectory, JobDirectory};
use super::domain::{
    AssessmentDraft, AssessmentId, AssessmentStatus, AssessmentUpdate, CompanyId, JobId,
};
use super::repository::AssessmentRepository;
use super::service::{AssessmentService, AssessmentServiceError};

/// Router builder exposing the assessment authoring and lifecycle endpoints.
pub fn assessment_router<R, J, C, G>(service: Arc<AssessmentService<R, J, C, G>>) -> Router
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
{
    Router::new()
        .route(
            "/assessments/job/:job_id",
            post(create_handler::<R, J, C, G>).get(list_by_job_handler::<R, J, C, G>),
        )
        .route(
            "/assessments/job/:job_id/generate",
            post(generate_handler::<R, J, C, G>),
        )
        .route(
            "/assessments/company/:company_id",
            get(list_by_company_handler::<R, J, C, G>),
        )
        .route(
            "/assessments/company/:company_id/drafts",
            get(drafts_handler::<R, J, C, G>),
        )
        .route(
            "/assessments/unique/:unique_id",
            get(by_unique_id_handler::<R, J, C, G>),
        )
        .route(
            "/assessments/:assessment_id",
            get(get_handler::<R, J, C, G>)
                .patch(update_handler::<R, J, C, G>)
                .delete(delete_handler::<R, J, C, G>),
        )
        .route(
            "/assessments/:assessment_id/generate",
            patch(regenerate_handler::<R, J, C, G>),
        )
        .route(
            "/assessments/:assessment_id/status",
            patch(set_status_handler::<R, J, C, G>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatePayload {
    #[serde(default)]
    company_id: Option<String>,
    #[serde(flatten)]
    draft: AssessmentDraft,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeneratePayload {
    #[serde(default)]
    company_id: Option<String>,
    #[serde(default)]
    instruction: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdatePayload {
    #[serde(default)]
    company_id: Option<String>,
    #[serde(flatten)]
    changes: AssessmentUpdate,
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
pub(crate) struct CompanyPayload {
    #[serde(default)]
    company_id: Option<String>,
}

pub(crate) async fn create_handler<R, J, C, G>(
    State(service): State<Arc<AssessmentService<R, J, C, G>>>,
    Path(job_id): Path<String>,
    axum::Json(payload): axum::Json<CreatePayload>,
) -> Response
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
{
    let Some(company_id) = scoped_company(payload.company_id) else {
        return missing_company();
    };
    let job_id = JobId(job_id);
    match service.create(&job_id, &company_id, payload.draft).await {
        Ok(assessment) => success(
            StatusCode::CREATED,
            "Assessment created successfully",
            assessment,
        ),
        Err(err) => error_response("create assessment", err),
    }
}

pub(crate) async fn generate_handler<R, J, C, G>(
    State(service): State<Arc<AssessmentService<R, J, C, G>>>,
    Path(job_id): Path<String>,
    axum::Json(payload): axum::Json<GeneratePayload>,
) -> Response
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
{
    let Some(company_id) = scoped_company(payload.company_id) else {
        return missing_company();
    };
    let job_id = JobId(job_id);
    let instruction = payload.instruction.unwrap_or_default();
    match service
        .create_generated(&job_id, &company_id, &instruction)
        .await
    {
        Ok(assessment) => success(
            StatusCode::CREATED,
            "Assessment created successfully",
            assessment,
        ),
        Err(err) => error_response("create assessment by ai", err),
    }
}

pub(crate) async fn list_by_job_handler<R, J, C, G>(
    State(service): State<Arc<AssessmentService<R, J, C, G>>>,
    Path(job_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
{
    let job_id = JobId(job_id);
    match service.list_for_job(&job_id).await {
        Ok(assessments) => success(
            StatusCode::OK,
            "Assessments retrieved successfully",
            assessments,
        ),
        Err(err) => error_response("get assessments by job", err),
    }
}

pub(crate) async fn list_by_company_handler<R, J, C, G>(
    State(service): State<Arc<AssessmentService<R, J, C, G>>>,
    Path(company_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
{
    let company_id = CompanyId(company_id);
    match service.list_for_company(&company_id).await {
        Ok(assessments) => success(
            StatusCode::OK,
            "Assessments retrieved successfully",
            assessments,
        ),
        Err(err) => error_response("get assessments by company", err),
    }
}

/// Draft listing keeps the count alongside so dashboards can render a badge
/// without recounting.
pub(crate) async fn drafts_handler<R, J, C, G>(
    State(service): State<Arc<AssessmentService<R, J, C, G>>>,
    Path(company_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
{
    let company_id = CompanyId(company_id);
    match service.drafts(&company_id).await {
        Ok(drafts) => {
            let data = json!({
                "assessments": drafts,
                "totalAssessments": drafts.len(),
            });
            success(StatusCode::OK, "Assessments retrieved successfully", data)
        }
        Err(err) => error_response("get draft assessments", err),
    }
}

pub(crate) async fn by_unique_id_handler<R, J, C, G>(
    State(service): State<Arc<AssessmentService<R, J, C, G>>>,
    Path(unique_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
{
    match service.get_by_unique_id(&unique_id).await {
        Ok(assessment) => success(
            StatusCode::OK,
            "Assessment retrieved successfully",
            assessment,
        ),
        Err(err) => error_response("get assessment by unique ID", err),
    }
}

pub(crate) async fn get_handler<R, J, C, G>(
    State(service): State<Arc<AssessmentService<R, J, C, G>>>,
    Path(assessment_id): Path<String>,
) -> Response
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
{
    let id = AssessmentId(assessment_id);
    match service.get(&id).await {
        Ok(assessment) => success(
            StatusCode::OK,
            "Assessment retrieved successfully",
            assessment,
        ),
        Err(err) => error_response("get assessment", err),
    }
}

pub(crate) async fn update_handler<R, J, C, G>(
    State(service): State<Arc<AssessmentService<R, J, C, G>>>,
    Path(assessment_id): Path<String>,
    axum::Json(payload): axum::Json<UpdatePayload>,
) -> Response
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
{
    let Some(company_id) = scoped_company(payload.company_id) else {
        return missing_company();
    };
    let id = AssessmentId(assessment_id);
    match service.update(&id, &company_id, payload.changes).await {
        Ok(assessment) => success(
            StatusCode::OK,
            "Assessment updated successfully",
            assessment,
        ),
        Err(err) => error_response("update assessment", err),
    }
}

pub(crate) async fn regenerate_handler<R, J, C, G>(
    State(service): State<Arc<AssessmentService<R, J, C, G>>>,
    Path(assessment_id): Path<String>,
    axum::Json(payload): axum::Json<GeneratePayload>,
) -> Response
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
{
    let Some(company_id) = scoped_company(payload.company_id) else {
        return missing_company();
    };
    let id = AssessmentId(assessment_id);
    let instruction = payload.instruction.unwrap_or_default();
    match service
        .update_generated(&id, &company_id, &instruction)
        .await
    {
        Ok(assessment) => success(
            StatusCode::OK,
            "Assessment updated successfully",
            assessment,
        ),
        Err(err) => error_response("update assessment by ai", err),
    }
}

pub(crate) async fn set_status_handler<R, J, C, G>(
    State(service): State<Arc<AssessmentService<R, J, C, G>>>,
    Path(assessment_id): Path<String>,
    axum::Json(payload): axum::Json<StatusPayload>,
) -> Response
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
{
    let Some(company_id) = scoped_company(payload.company_id) else {
        return missing_company();
    };
    let Some(raw) = payload.status else {
        return failure(StatusCode::BAD_REQUEST, "Status is required");
    };
    let Some(status) = AssessmentStatus::parse(&raw) else {
        return failure(StatusCode::BAD_REQUEST, "Invalid status value");
    };
    let id = AssessmentId(assessment_id);
    match service.set_status(&id, &company_id, status).await {
        Ok(assessment) => success(
            StatusCode::OK,
            "Assessment status updated successfully",
            assessment,
        ),
        Err(err) => error_response("update assessment status", err),
    }
}

pub(crate) async fn delete_handler<R, J, C, G>(
    State(service): State<Arc<AssessmentService<R, J, C, G>>>,
    Path(assessment_id): Path<String>,
    axum::Json(payload): axum::Json<CompanyPayload>,
) -> Response
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
{
    let Some(company_id) = scoped_company(payload.company_id) else {
        return missing_company();
    };
    let id = AssessmentId(assessment_id);
    match service.delete(&id, &company_id).await {
        Ok(()) => {
            let body = json!({
                "success": true,
                "message": "Assessment has been deleted",
            });
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err) => error_response("delete assessment", err),
    }
}

/// Shared response envelope: `{success, message, data?}` on every workflow
/// endpoint, submissions included.
pub(crate) fn success(status: StatusCode, message: &str, data: impl Serialize) -> Response {
    let payload = json!({
        "success": true,
        "message": message,
        "data": data,
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) fn failure(status: StatusCode, message: &str) -> Response {
    let payload = json!({
        "success": false,
        "message": message,
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) fn missing_company() -> Response {
    failure(StatusCode::BAD_REQUEST, "Company ID is required")
}

pub(crate) fn scoped_company(company_id: Option<String>) -> Option<CompanyId> {
    match company_id {
        Some(id) if !id.is_empty() => Some(CompanyId(id)),
        _ => None,
    }
}

/// Store and directory failures are masked behind a stable message; the
/// domain errors pass their own text and status through.
fn error_response(action: &str, err: AssessmentServiceError) -> Response {
    if err.is_internal() {
        error!(error = %err, "assessment endpoint failure");
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            &format!("Failed to {action}"),
        );
    }
    failure(err.status_code(), &err.to_string())
}
