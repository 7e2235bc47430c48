use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::workflows::assessment::domain::{AssessmentId, CompanyId};
use crate::workflows::assessment::repository::RepositoryError;

use super::domain::{Submission, SubmissionId, SubmissionStatus, SubmissionUpdate};

/// Storage abstraction for submissions. Every read and write that takes a
/// `CompanyId` must treat it as a filter predicate, so records owned by other
/// tenants behave exactly like records that do not exist.
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    async fn insert(&self, submission: Submission) -> Result<Submission, RepositoryError>;
    async fn fetch(
        &self,
        id: &SubmissionId,
        company_id: &CompanyId,
    ) -> Result<Option<Submission>, RepositoryError>;
    async fn list_for_assessment(
        &self,
        assessment_id: &AssessmentId,
        company_id: &CompanyId,
    ) -> Result<Vec<Submission>, RepositoryError>;
    async fn list_by_status(
        &self,
        assessment_id: &AssessmentId,
        company_id: &CompanyId,
        status: SubmissionStatus,
    ) -> Result<Vec<Submission>, RepositoryError>;
    /// Field-wise merge; returns the updated record, `None` when no record
    /// matches both the id and the company filter.
    async fn apply(
        &self,
        id: &SubmissionId,
        company_id: &CompanyId,
        update: SubmissionUpdate,
    ) -> Result<Option<Submission>, RepositoryError>;
    /// Groups an assessment's submissions by status. `avg_score` averages only
    /// the records that carry a score and is absent for groups with none.
    async fn status_breakdown(
        &self,
        assessment_id: &AssessmentId,
        company_id: &CompanyId,
    ) -> Result<Vec<StatusBucket>, RepositoryError>;
}

/// One row of the per-status aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBucket {
    pub status: SubmissionStatus,
    pub count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_score: Option<f64>,
}
