use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::authoring::{AssessmentGenerator, GeneratedAssessment, GenerationError};
use super::directory::{CompanyDirectory, DirectoryError, JobDirectory};
use super::domain::{
    normalize_title, Assessment, AssessmentDraft, AssessmentId, AssessmentKind, AssessmentStatus,
    AssessmentUpdate, CompanyId, JobId,
};
use super::repository::{AssessmentRepository, RepositoryError};

/// Service owning the assessment lifecycle: authoring (manual and generated),
/// lookups, updates, status changes, and removal.
pub struct AssessmentService<R, J, C, G> {
    assessments: Arc<R>,
    jobs: Arc<J>,
    companies: Arc<C>,
    generator: Arc<G>,
}

/// Ownership check shared by every mutating assessment operation. Distinct
/// from not-found so an owner can tell a typo from a permissions problem.
pub fn assert_owned_by(
    assessment: &Assessment,
    company_id: &CompanyId,
) -> Result<(), AssessmentServiceError> {
    if assessment.company_id != *company_id {
        return Err(AssessmentServiceError::NotOwned);
    }
    Ok(())
}

impl<R, J, C, G> AssessmentService<R, J, C, G>
where
    R: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
    C: CompanyDirectory + 'static,
    G: AssessmentGenerator + 'static,
{
    pub fn new(assessments: Arc<R>, jobs: Arc<J>, companies: Arc<C>, generator: Arc<G>) -> Self {
        Self {
            assessments,
            jobs,
            companies,
            generator,
        }
    }

    /// Create a hand-written assessment for an existing job.
    pub async fn create(
        &self,
        job_id: &JobId,
        company_id: &CompanyId,
        draft: AssessmentDraft,
    ) -> Result<Assessment, AssessmentServiceError> {
        let job = self
            .jobs
            .find_job(job_id)
            .await?
            .ok_or(AssessmentServiceError::JobNotFound)?;
        self.ensure_title_available(job_id, &draft.title).await?;

        let now = Utc::now();
        let assessment = Assessment {
            id: AssessmentId(Uuid::new_v4().to_string()),
            unique_id: short_unique_id(),
            job_id: job.id.clone(),
            company_id: company_id.clone(),
            title: draft.title,
            problem_description: draft.problem_description,
            allowed_tech_stack: draft.allowed_tech_stack,
            instructions: draft.instructions,
            constraints: draft.constraints,
            expected_duration_hours: draft.expected_duration_hours,
            submission_deadline_days: draft.submission_deadline_days,
            submission_requirements: draft.submission_requirements,
            limitations: draft.limitations,
            evaluation: draft.evaluation,
            status: draft.status.unwrap_or(AssessmentStatus::Draft),
            kind: AssessmentKind::Manual,
            created_at: now,
            updated_at: now,
        };

        let stored = self.assessments.insert(assessment).await?;
        info!(assessment = %stored.id.0, job = %stored.job_id.0, "assessment created");
        Ok(stored)
    }

    /// Create an assessment by asking the generator to draft one from the job
    /// and recruiter instructions. Nothing is persisted on generation failure.
    pub async fn create_generated(
        &self,
        job_id: &JobId,
        company_id: &CompanyId,
        instruction: &str,
    ) -> Result<Assessment, AssessmentServiceError> {
        let job = self
            .jobs
            .find_job(job_id)
            .await?
            .ok_or(AssessmentServiceError::JobNotFound)?;

        let generated = self.generator.draft(&job, instruction).await?;
        self.ensure_title_available(job_id, &generated.title).await?;

        let now = Utc::now();
        let GeneratedAssessment {
            title,
            problem_description,
            expected_duration_hours,
            allowed_tech_stack,
            instructions,
            constraints,
            submission_deadline_days,
            submission_requirements,
            limitations,
            evaluation,
        } = generated;

        let assessment = Assessment {
            id: AssessmentId(Uuid::new_v4().to_string()),
            unique_id: short_unique_id(),
            job_id: job.id.clone(),
            company_id: company_id.clone(),
            title,
            problem_description,
            allowed_tech_stack,
            instructions,
            constraints,
            expected_duration_hours: Some(expected_duration_hours),
            submission_deadline_days,
            submission_requirements,
            limitations,
            evaluation,
            status: AssessmentStatus::Draft,
            kind: AssessmentKind::Ai,
            created_at: now,
            updated_at: now,
        };

        let stored = self.assessments.insert(assessment).await?;
        info!(assessment = %stored.id.0, job = %stored.job_id.0, "assessment generated");
        Ok(stored)
    }

    pub async fn get(&self, id: &AssessmentId) -> Result<Assessment, AssessmentServiceError> {
        self.assessments
            .fetch(id)
            .await?
            .ok_or(AssessmentServiceError::NotFound)
    }

    /// Candidate-facing lookup by the short shareable slug.
    pub async fn get_by_unique_id(
        &self,
        unique_id: &str,
    ) -> Result<Assessment, AssessmentServiceError> {
        self.assessments
            .fetch_by_unique_id(unique_id)
            .await?
            .ok_or(AssessmentServiceError::NotFound)
    }

    pub async fn list_for_job(
        &self,
        job_id: &JobId,
    ) -> Result<Vec<Assessment>, AssessmentServiceError> {
        self.jobs
            .find_job(job_id)
            .await?
            .ok_or(AssessmentServiceError::JobNotFound)?;
        let assessments = self.assessments.list_for_job(job_id).await?;
        Ok(assessments)
    }

    pub async fn list_for_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<Assessment>, AssessmentServiceError> {
        self.companies
            .find_company(company_id)
            .await?
            .ok_or(AssessmentServiceError::CompanyNotFound)?;
        let assessments = self.assessments.list_for_company(company_id).await?;
        Ok(assessments)
    }

    /// Partial manual update of content fields. Provenance is not writable
    /// through this path.
    pub async fn update(
        &self,
        id: &AssessmentId,
        company_id: &CompanyId,
        mut changes: AssessmentUpdate,
    ) -> Result<Assessment, AssessmentServiceError> {
        let existing = self.get(id).await?;
        assert_owned_by(&existing, company_id)?;

        changes.kind = None;
        self.apply(id, changes).await
    }

    /// Regenerate the assessment's content from the job and recruiter
    /// instructions. Identity fields survive; provenance flips to `ai`.
    pub async fn update_generated(
        &self,
        id: &AssessmentId,
        company_id: &CompanyId,
        instruction: &str,
    ) -> Result<Assessment, AssessmentServiceError> {
        let existing = self.get(id).await?;
        assert_owned_by(&existing, company_id)?;

        let job = self
            .jobs
            .find_job(&existing.job_id)
            .await?
            .ok_or(AssessmentServiceError::JobNotFound)?;
        let generated = self.generator.revise(&job, &existing, instruction).await?;

        let update = AssessmentUpdate {
            title: Some(generated.title),
            problem_description: Some(generated.problem_description),
            allowed_tech_stack: generated.allowed_tech_stack,
            instructions: generated.instructions,
            constraints: generated.constraints,
            expected_duration_hours: Some(generated.expected_duration_hours),
            submission_deadline_days: generated.submission_deadline_days,
            submission_requirements: generated.submission_requirements,
            limitations: generated.limitations,
            evaluation: generated.evaluation,
            status: None,
            kind: Some(AssessmentKind::Ai),
        };

        let updated = self.apply(id, update).await?;
        info!(assessment = %updated.id.0, "assessment regenerated");
        Ok(updated)
    }

    /// Explicit lifecycle move; assessments never change status on their own.
    pub async fn set_status(
        &self,
        id: &AssessmentId,
        company_id: &CompanyId,
        status: AssessmentStatus,
    ) -> Result<Assessment, AssessmentServiceError> {
        let existing = self.get(id).await?;
        assert_owned_by(&existing, company_id)?;

        let update = AssessmentUpdate {
            status: Some(status),
            ..AssessmentUpdate::default()
        };
        self.apply(id, update).await
    }

    pub async fn delete(
        &self,
        id: &AssessmentId,
        company_id: &CompanyId,
    ) -> Result<(), AssessmentServiceError> {
        let existing = self.get(id).await?;
        assert_owned_by(&existing, company_id)?;

        let removed = self.assessments.delete(id).await?;
        if !removed {
            return Err(AssessmentServiceError::NotFound);
        }
        info!(assessment = %id.0, "assessment deleted");
        Ok(())
    }

    /// Unpublished assessments of one company.
    pub async fn drafts(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<Assessment>, AssessmentServiceError> {
        let drafts = self
            .assessments
            .list_by_status(company_id, AssessmentStatus::Draft)
            .await?;
        Ok(drafts)
    }

    async fn ensure_title_available(
        &self,
        job_id: &JobId,
        title: &str,
    ) -> Result<(), AssessmentServiceError> {
        let normalized = normalize_title(title);
        if self
            .assessments
            .find_by_title(job_id, &normalized)
            .await?
            .is_some()
        {
            return Err(AssessmentServiceError::DuplicateTitle);
        }
        Ok(())
    }

    async fn apply(
        &self,
        id: &AssessmentId,
        update: AssessmentUpdate,
    ) -> Result<Assessment, AssessmentServiceError> {
        self.assessments
            .apply(id, update)
            .await?
            .ok_or(AssessmentServiceError::NotFound)
    }
}

/// Short shareable slug: the tail of a fresh UUID, collision-tolerant.
fn short_unique_id() -> String {
    let id = Uuid::new_v4().to_string();
    id[id.len() - 6..].to_string()
}

/// Error raised by the assessment service. Display text on the client-facing
/// variants doubles as the API message.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("Job not found")]
    JobNotFound,
    #[error("Company not found")]
    CompanyNotFound,
    #[error("An assessment with this title already exists for this job")]
    DuplicateTitle,
    #[error("Assessment not found")]
    NotFound,
    #[error("Not authorized to modify this assessment")]
    NotOwned,
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl AssessmentServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AssessmentServiceError::JobNotFound
            | AssessmentServiceError::CompanyNotFound
            | AssessmentServiceError::NotFound => StatusCode::NOT_FOUND,
            AssessmentServiceError::DuplicateTitle => StatusCode::CONFLICT,
            AssessmentServiceError::NotOwned => StatusCode::FORBIDDEN,
            AssessmentServiceError::Generation(_) => StatusCode::BAD_GATEWAY,
            AssessmentServiceError::Repository(_) | AssessmentServiceError::Directory(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the error must be masked behind a generic message at the edge.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AssessmentServiceError::Repository(_) | AssessmentServiceError::Directory(_)
        )
    }
}
