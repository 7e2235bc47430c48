use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::workflows::assessment::directory::{DirectoryError, Job, JobDirectory};
use crate::workflows::assessment::domain::{Assessment, AssessmentId, CompanyId};
use crate::workflows::assessment::repository::{AssessmentRepository, RepositoryError};

use super::domain::{
    DecisionNotes, DecisionOutcome, NewSubmission, NextSteps, Submission, SubmissionId,
    SubmissionStatus, SubmissionUpdate,
};
use super::repository::{StatusBucket, SubmissionRepository};
use super::requirements::{self, RequirementViolation};

/// Service running the intake gate and the evaluation state machine over
/// submissions. The assessment store backs the gate and populated views; the
/// job directory only feeds populated views.
pub struct SubmissionService<S, A, J> {
    submissions: Arc<S>,
    assessments: Arc<A>,
    jobs: Arc<J>,
}

/// Listing of an assessment's submissions with the referenced records attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionListing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
    pub submissions: Vec<Submission>,
}

/// Single submission with the referenced records attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDetail {
    pub submission: Submission,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<Job>,
}

impl<S, A, J> SubmissionService<S, A, J>
where
    S: SubmissionRepository + 'static,
    A: AssessmentRepository + 'static,
    J: JobDirectory + 'static,
{
    pub fn new(submissions: Arc<S>, assessments: Arc<A>, jobs: Arc<J>) -> Self {
        Self {
            submissions,
            assessments,
            jobs,
        }
    }

    /// Accept a candidate submission: gate on the assessment being active,
    /// validate the payload against its requirements, then persist with the
    /// assessment's own company and job references copied in.
    pub async fn submit(
        &self,
        assessment_id: &AssessmentId,
        submission: NewSubmission,
    ) -> Result<Submission, SubmissionServiceError> {
        let assessment = self
            .assessments
            .fetch(assessment_id)
            .await?
            .ok_or(SubmissionServiceError::AssessmentNotFound)?;

        if !assessment.accepts_submissions() {
            return Err(SubmissionServiceError::AssessmentNotOpen);
        }

        if let Some(declared) = assessment.submission_requirements.as_ref() {
            requirements::check(declared, &submission.submission_data)?;
        }

        let record = Submission {
            id: SubmissionId(Uuid::new_v4().to_string()),
            job_id: assessment.job_id.clone(),
            assessment_id: assessment.id.clone(),
            company_id: assessment.company_id.clone(),
            applicant: submission.applicant,
            submission_data: submission.submission_data,
            status: SubmissionStatus::Submitted,
            score: None,
            feedback: None,
            decision: None,
            next_steps: None,
            submitted_at: Utc::now(),
            evaluated_at: None,
        };

        let stored = self.submissions.insert(record).await?;
        info!(
            submission = %stored.id.0,
            assessment = %assessment.id.0,
            "submission accepted"
        );
        Ok(stored)
    }

    /// All submissions for an assessment, scoped to the acting company.
    pub async fn list(
        &self,
        assessment_id: &AssessmentId,
        company_id: &CompanyId,
    ) -> Result<SubmissionListing, SubmissionServiceError> {
        let submissions = self
            .submissions
            .list_for_assessment(assessment_id, company_id)
            .await?;
        let (assessment, job) = self.context_for(assessment_id, company_id).await?;

        Ok(SubmissionListing {
            assessment,
            job,
            submissions,
        })
    }

    /// Single fetch. A record owned by another company is reported as missing.
    pub async fn get(
        &self,
        id: &SubmissionId,
        company_id: &CompanyId,
    ) -> Result<SubmissionDetail, SubmissionServiceError> {
        let submission = self
            .submissions
            .fetch(id, company_id)
            .await?
            .ok_or(SubmissionServiceError::NotFound)?;

        let assessment = self.assessments.fetch(&submission.assessment_id).await?;
        let job = self.jobs.find_job(&submission.job_id).await?;

        Ok(SubmissionDetail {
            submission,
            assessment,
            job,
        })
    }

    /// General-purpose partial evaluation update. A decision outcome in the
    /// payload forces the matching status; any status change stamps
    /// `evaluatedAt` unless the caller supplied one.
    pub async fn evaluate(
        &self,
        id: &SubmissionId,
        company_id: &CompanyId,
        update: SubmissionUpdate,
    ) -> Result<Submission, SubmissionServiceError> {
        let update = update.normalized(Utc::now());
        self.apply(id, company_id, update).await
    }

    pub async fn reject(
        &self,
        id: &SubmissionId,
        company_id: &CompanyId,
        notes: DecisionNotes,
    ) -> Result<Submission, SubmissionServiceError> {
        self.decide(id, company_id, DecisionOutcome::Reject, notes, None)
            .await
    }

    pub async fn select(
        &self,
        id: &SubmissionId,
        company_id: &CompanyId,
        notes: DecisionNotes,
        next_steps: Option<NextSteps>,
    ) -> Result<Submission, SubmissionServiceError> {
        self.decide(id, company_id, DecisionOutcome::Select, notes, next_steps)
            .await
    }

    pub async fn hold(
        &self,
        id: &SubmissionId,
        company_id: &CompanyId,
        notes: DecisionNotes,
    ) -> Result<Submission, SubmissionServiceError> {
        self.decide(id, company_id, DecisionOutcome::Hold, notes, None)
            .await
    }

    /// Direct status set. Deliberately never touches `decision`; reviewers use
    /// this for bookkeeping moves such as marking a record under review.
    pub async fn set_status(
        &self,
        id: &SubmissionId,
        company_id: &CompanyId,
        status: SubmissionStatus,
    ) -> Result<Submission, SubmissionServiceError> {
        let update = SubmissionUpdate {
            status: Some(status),
            ..SubmissionUpdate::default()
        };
        self.apply(id, company_id, update).await
    }

    /// Attach or overwrite the follow-up plan without touching status/decision.
    pub async fn add_next_steps(
        &self,
        id: &SubmissionId,
        company_id: &CompanyId,
        next_steps: NextSteps,
    ) -> Result<Submission, SubmissionServiceError> {
        let update = SubmissionUpdate {
            next_steps: Some(next_steps),
            ..SubmissionUpdate::default()
        };
        self.apply(id, company_id, update).await
    }

    pub async fn list_by_status(
        &self,
        assessment_id: &AssessmentId,
        company_id: &CompanyId,
        status: SubmissionStatus,
    ) -> Result<SubmissionListing, SubmissionServiceError> {
        let submissions = self
            .submissions
            .list_by_status(assessment_id, company_id, status)
            .await?;
        let (assessment, job) = self.context_for(assessment_id, company_id).await?;

        Ok(SubmissionListing {
            assessment,
            job,
            submissions,
        })
    }

    /// Per-status aggregate over an assessment's submissions.
    pub async fn stats(
        &self,
        assessment_id: &AssessmentId,
        company_id: &CompanyId,
    ) -> Result<Vec<StatusBucket>, SubmissionServiceError> {
        let breakdown = self
            .submissions
            .status_breakdown(assessment_id, company_id)
            .await?;
        Ok(breakdown)
    }

    async fn decide(
        &self,
        id: &SubmissionId,
        company_id: &CompanyId,
        outcome: DecisionOutcome,
        notes: DecisionNotes,
        next_steps: Option<NextSteps>,
    ) -> Result<Submission, SubmissionServiceError> {
        let update = SubmissionUpdate::for_decision(outcome, notes, next_steps, Utc::now());
        let stored = self.apply(id, company_id, update).await?;
        info!(
            submission = %stored.id.0,
            status = stored.status.label(),
            "decision recorded"
        );
        Ok(stored)
    }

    async fn apply(
        &self,
        id: &SubmissionId,
        company_id: &CompanyId,
        update: SubmissionUpdate,
    ) -> Result<Submission, SubmissionServiceError> {
        self.submissions
            .apply(id, company_id, update)
            .await?
            .ok_or(SubmissionServiceError::NotFound)
    }

    /// Populated context for listing views. An assessment owned by another
    /// company is withheld, matching the scoped listing it accompanies.
    async fn context_for(
        &self,
        assessment_id: &AssessmentId,
        company_id: &CompanyId,
    ) -> Result<(Option<Assessment>, Option<Job>), SubmissionServiceError> {
        let assessment = self
            .assessments
            .fetch(assessment_id)
            .await?
            .filter(|assessment| assessment.company_id == *company_id);

        let job = match assessment.as_ref() {
            Some(assessment) => self.jobs.find_job(&assessment.job_id).await?,
            None => None,
        };

        Ok((assessment, job))
    }
}

/// Error raised by the submission service. Display text on the client-facing
/// variants doubles as the API message.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionServiceError {
    #[error("Assessment not found")]
    AssessmentNotFound,
    #[error("Assessment is closed or in draft")]
    AssessmentNotOpen,
    #[error(transparent)]
    Requirement(#[from] RequirementViolation),
    #[error("Submission not found")]
    NotFound,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl SubmissionServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            SubmissionServiceError::AssessmentNotFound | SubmissionServiceError::NotFound => {
                StatusCode::NOT_FOUND
            }
            SubmissionServiceError::AssessmentNotOpen
            | SubmissionServiceError::Requirement(_) => StatusCode::BAD_REQUEST,
            SubmissionServiceError::Repository(_) | SubmissionServiceError::Directory(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the error must be masked behind a generic message at the edge.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            SubmissionServiceError::Repository(_) | SubmissionServiceError::Directory(_)
        )
    }
}
