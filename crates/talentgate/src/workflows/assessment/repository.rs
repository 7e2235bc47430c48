use async_trait::async_trait;

use super::domain::{Assessment, AssessmentId, AssessmentStatus, AssessmentUpdate, CompanyId, JobId};

/// Storage abstraction for assessments so services can be exercised against
/// in-memory fakes. `find_by_title` compares normalized titles
/// (see [`super::domain::normalize_title`]) within one job.
#[async_trait]
pub trait AssessmentRepository: Send + Sync {
    async fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError>;
    async fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError>;
    async fn fetch_by_unique_id(&self, unique_id: &str)
        -> Result<Option<Assessment>, RepositoryError>;
    async fn find_by_title(
        &self,
        job_id: &JobId,
        normalized_title: &str,
    ) -> Result<Option<Assessment>, RepositoryError>;
    async fn list_for_job(&self, job_id: &JobId) -> Result<Vec<Assessment>, RepositoryError>;
    async fn list_for_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<Assessment>, RepositoryError>;
    async fn list_by_status(
        &self,
        company_id: &CompanyId,
        status: AssessmentStatus,
    ) -> Result<Vec<Assessment>, RepositoryError>;
    /// Field-wise merge; returns the updated record, `None` when the id is unknown.
    async fn apply(
        &self,
        id: &AssessmentId,
        update: AssessmentUpdate,
    ) -> Result<Option<Assessment>, RepositoryError>;
    /// Returns whether a record was removed.
    async fn delete(&self, id: &AssessmentId) -> Result<bool, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
