use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::workflows::assessment::directory::{DirectoryError, ExperienceRange, Job, JobDirectory};
use crate::workflows::assessment::domain::{
    normalize_title, AdditionalInfoRequirement, Assessment, AssessmentId, AssessmentKind,
    AssessmentStatus, AssessmentUpdate, CompanyId, JobId, OtherUrlRequirement,
    SubmissionRequirements, UrlRequirement, VideoDemoRequirement,
};
use crate::workflows::assessment::repository::{AssessmentRepository, RepositoryError};
use crate::workflows::assessment::submissions::domain::{
    Applicant, DecisionNotes, LabeledUrl, MeetingDetails, NewSubmission, NextStepKind, NextSteps,
    Submission, SubmissionData, SubmissionId, SubmissionStatus, SubmissionUpdate,
};
use crate::workflows::assessment::submissions::repository::{StatusBucket, SubmissionRepository};
use crate::workflows::assessment::submissions::{submission_router, SubmissionService};

pub(super) fn company_id() -> CompanyId {
    CompanyId("company-1".to_string())
}

pub(super) fn assessment_id() -> AssessmentId {
    AssessmentId("assessment-1".to_string())
}

pub(super) fn other_company_id() -> CompanyId {
    CompanyId("company-2".to_string())
}

pub(super) fn job() -> Job {
    Job {
        id: JobId("job-1".to_string()),
        company_id: company_id(),
        title: "Backend Engineer".to_string(),
        description: "Own the services behind the candidate pipeline.".to_string(),
        role: Some("backend".to_string()),
        tech_stack: vec!["Rust".to_string(), "PostgreSQL".to_string()],
        experience: Some(ExperienceRange {
            min_months: 24,
            max_months: 72,
        }),
        location: Some("Remote".to_string()),
        last_date_to_apply: None,
    }
}

pub(super) fn assessment(status: AssessmentStatus) -> Assessment {
    let created = Utc
        .with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    Assessment {
        id: AssessmentId("assessment-1".to_string()),
        unique_id: "k3x9q2".to_string(),
        job_id: JobId("job-1".to_string()),
        company_id: company_id(),
        title: "Build a rate limiter".to_string(),
        problem_description: "Implement a sliding-window rate limiter with an HTTP facade."
            .to_string(),
        allowed_tech_stack: Some("Rust".to_string()),
        instructions: None,
        constraints: None,
        expected_duration_hours: Some(6),
        submission_deadline_days: Some(7),
        submission_requirements: None,
        limitations: None,
        evaluation: None,
        status,
        kind: AssessmentKind::Manual,
        created_at: created,
        updated_at: created,
    }
}

pub(super) fn applicant() -> Applicant {
    Applicant {
        name: "Asha Verma".to_string(),
        email: "asha@example.com".to_string(),
        resume_url: "https://cdn.example.com/resumes/asha.pdf".to_string(),
        phone: None,
        location: Some("Pune".to_string()),
        linkedin_url: None,
        github_profile_url: Some("https://github.com/ashav".to_string()),
        portfolio_url: None,
        cover_letter: None,
        willing_to_relocate: Some(true),
    }
}

pub(super) fn complete_submission_data() -> SubmissionData {
    SubmissionData {
        github_url: Some("https://github.com/ashav/rate-limiter".to_string()),
        deployed_url: Some("https://limiter.fly.dev".to_string()),
        video_demo_url: Some("https://www.loom.com/share/demo".to_string()),
        documentation_url: Some("https://github.com/ashav/rate-limiter#readme".to_string()),
        other_urls: vec![LabeledUrl {
            label: "Figma".to_string(),
            url: "https://figma.com/file/limiter".to_string(),
        }],
        additional_info: Some("Token bucket fallback included.".to_string()),
    }
}

pub(super) fn new_submission() -> NewSubmission {
    NewSubmission {
        applicant: applicant(),
        submission_data: complete_submission_data(),
    }
}

pub(super) fn decision_notes(score: Option<f64>) -> DecisionNotes {
    DecisionNotes {
        feedback: Some("Clean separation of concerns.".to_string()),
        score,
        message_to_candidate: Some("Thanks for the thorough writeup.".to_string()),
    }
}

pub(super) fn meeting_next_steps() -> NextSteps {
    NextSteps {
        kind: NextStepKind::Meeting,
        description: Some("Intro call with the hiring panel".to_string()),
        meeting: Some(MeetingDetails {
            platform: Some("Zoom".to_string()),
            meeting_link: Some("https://zoom.us/j/9815510400".to_string()),
            scheduled_at: None,
            duration_minutes: Some(45),
        }),
        contact: None,
        task: None,
    }
}

/// Requirement schema exercising every component, with a "Figma" link and a
/// 500-character ceiling on the free-text addendum.
pub(super) fn full_requirements() -> SubmissionRequirements {
    SubmissionRequirements {
        github_url: UrlRequirement {
            required: true,
            description: None,
        },
        deployed_url: UrlRequirement {
            required: true,
            description: None,
        },
        video_demo: VideoDemoRequirement {
            required: true,
            description: None,
            platform: Some("Loom".to_string()),
        },
        documentation: UrlRequirement {
            required: true,
            description: None,
        },
        other_urls: vec![OtherUrlRequirement {
            label: "Figma".to_string(),
            required: true,
            description: None,
        }],
        additional_info: AdditionalInfoRequirement {
            required: true,
            placeholder: None,
            max_length: Some(500),
        },
    }
}

pub(super) fn merge_assessment(record: &mut Assessment, update: AssessmentUpdate) {
    if let Some(title) = update.title {
        record.title = title;
    }
    if let Some(problem_description) = update.problem_description {
        record.problem_description = problem_description;
    }
    if let Some(allowed_tech_stack) = update.allowed_tech_stack {
        record.allowed_tech_stack = Some(allowed_tech_stack);
    }
    if let Some(instructions) = update.instructions {
        record.instructions = Some(instructions);
    }
    if let Some(constraints) = update.constraints {
        record.constraints = Some(constraints);
    }
    if let Some(expected_duration_hours) = update.expected_duration_hours {
        record.expected_duration_hours = Some(expected_duration_hours);
    }
    if let Some(submission_deadline_days) = update.submission_deadline_days {
        record.submission_deadline_days = Some(submission_deadline_days);
    }
    if let Some(submission_requirements) = update.submission_requirements {
        record.submission_requirements = Some(submission_requirements);
    }
    if let Some(limitations) = update.limitations {
        record.limitations = Some(limitations);
    }
    if let Some(evaluation) = update.evaluation {
        record.evaluation = Some(evaluation);
    }
    if let Some(status) = update.status {
        record.status = status;
    }
    if let Some(kind) = update.kind {
        record.kind = kind;
    }
    record.updated_at = Utc::now();
}

pub(super) fn merge_submission(record: &mut Submission, update: SubmissionUpdate) {
    if let Some(status) = update.status {
        record.status = status;
    }
    if let Some(score) = update.score {
        record.score = Some(score);
    }
    if let Some(feedback) = update.feedback {
        record.feedback = Some(feedback);
    }
    if let Some(decision) = update.decision {
        record.decision = Some(decision);
    }
    if let Some(next_steps) = update.next_steps {
        record.next_steps = Some(next_steps);
    }
    if let Some(evaluated_at) = update.evaluated_at {
        record.evaluated_at = Some(evaluated_at);
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAssessments {
    pub(super) records: Arc<Mutex<HashMap<AssessmentId, Assessment>>>,
}

impl MemoryAssessments {
    pub(super) fn seed(&self, assessment: Assessment) {
        self.records
            .lock()
            .expect("assessment store mutex poisoned")
            .insert(assessment.id.clone(), assessment);
    }
}

#[async_trait]
impl AssessmentRepository for MemoryAssessments {
    async fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.records.lock().expect("assessment store mutex poisoned");
        if guard.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    async fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("assessment store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    async fn fetch_by_unique_id(
        &self,
        unique_id: &str,
    ) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("assessment store mutex poisoned");
        Ok(guard
            .values()
            .find(|record| record.unique_id == unique_id)
            .cloned())
    }

    async fn find_by_title(
        &self,
        job_id: &JobId,
        normalized_title: &str,
    ) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("assessment store mutex poisoned");
        Ok(guard
            .values()
            .find(|record| {
                record.job_id == *job_id && normalize_title(&record.title) == normalized_title
            })
            .cloned())
    }

    async fn list_for_job(&self, job_id: &JobId) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("assessment store mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.job_id == *job_id)
            .cloned()
            .collect())
    }

    async fn list_for_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("assessment store mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.company_id == *company_id)
            .cloned()
            .collect())
    }

    async fn list_by_status(
        &self,
        company_id: &CompanyId,
        status: AssessmentStatus,
    ) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("assessment store mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.company_id == *company_id && record.status == status)
            .cloned()
            .collect())
    }

    async fn apply(
        &self,
        id: &AssessmentId,
        update: AssessmentUpdate,
    ) -> Result<Option<Assessment>, RepositoryError> {
        let mut guard = self.records.lock().expect("assessment store mutex poisoned");
        let Some(record) = guard.get_mut(id) else {
            return Ok(None);
        };
        merge_assessment(record, update);
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: &AssessmentId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("assessment store mutex poisoned");
        Ok(guard.remove(id).is_some())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemorySubmissions {
    pub(super) records: Arc<Mutex<HashMap<SubmissionId, Submission>>>,
}

impl MemorySubmissions {
    fn matching(&self, assessment_id: &AssessmentId, company_id: &CompanyId) -> Vec<Submission> {
        let guard = self.records.lock().expect("submission store mutex poisoned");
        let mut records: Vec<Submission> = guard
            .values()
            .filter(|record| {
                record.assessment_id == *assessment_id && record.company_id == *company_id
            })
            .cloned()
            .collect();
        records.sort_by(|a, b| a.submitted_at.cmp(&b.submitted_at));
        records
    }
}

#[async_trait]
impl SubmissionRepository for MemorySubmissions {
    async fn insert(&self, submission: Submission) -> Result<Submission, RepositoryError> {
        let mut guard = self.records.lock().expect("submission store mutex poisoned");
        if guard.contains_key(&submission.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(submission.id.clone(), submission.clone());
        Ok(submission)
    }

    async fn fetch(
        &self,
        id: &SubmissionId,
        company_id: &CompanyId,
    ) -> Result<Option<Submission>, RepositoryError> {
        let guard = self.records.lock().expect("submission store mutex poisoned");
        Ok(guard
            .get(id)
            .filter(|record| record.company_id == *company_id)
            .cloned())
    }

    async fn list_for_assessment(
        &self,
        assessment_id: &AssessmentId,
        company_id: &CompanyId,
    ) -> Result<Vec<Submission>, RepositoryError> {
        Ok(self.matching(assessment_id, company_id))
    }

    async fn list_by_status(
        &self,
        assessment_id: &AssessmentId,
        company_id: &CompanyId,
        status: SubmissionStatus,
    ) -> Result<Vec<Submission>, RepositoryError> {
        Ok(self
            .matching(assessment_id, company_id)
            .into_iter()
            .filter(|record| record.status == status)
            .collect())
    }

    async fn apply(
        &self,
        id: &SubmissionId,
        company_id: &CompanyId,
        update: SubmissionUpdate,
    ) -> Result<Option<Submission>, RepositoryError> {
        let mut guard = self.records.lock().expect("submission store mutex poisoned");
        let Some(record) = guard.get_mut(id) else {
            return Ok(None);
        };
        if record.company_id != *company_id {
            return Ok(None);
        }
        merge_submission(record, update);
        Ok(Some(record.clone()))
    }

    async fn status_breakdown(
        &self,
        assessment_id: &AssessmentId,
        company_id: &CompanyId,
    ) -> Result<Vec<StatusBucket>, RepositoryError> {
        let records = self.matching(assessment_id, company_id);
        let mut buckets = Vec::new();
        for status in [
            SubmissionStatus::Submitted,
            SubmissionStatus::UnderReview,
            SubmissionStatus::Rejected,
            SubmissionStatus::Selected,
            SubmissionStatus::OnHold,
        ] {
            let group: Vec<&Submission> = records
                .iter()
                .filter(|record| record.status == status)
                .collect();
            if group.is_empty() {
                continue;
            }
            let scores: Vec<f64> = group.iter().filter_map(|record| record.score).collect();
            let avg_score = if scores.is_empty() {
                None
            } else {
                Some(scores.iter().sum::<f64>() / scores.len() as f64)
            };
            buckets.push(StatusBucket {
                status,
                count: group.len(),
                avg_score,
            });
        }
        Ok(buckets)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryJobs {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl MemoryJobs {
    pub(super) fn seed(&self, job: Job) {
        self.jobs
            .lock()
            .expect("job directory mutex poisoned")
            .insert(job.id.clone(), job);
    }
}

#[async_trait]
impl JobDirectory for MemoryJobs {
    async fn find_job(&self, id: &JobId) -> Result<Option<Job>, DirectoryError> {
        let guard = self.jobs.lock().expect("job directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(super) struct UnavailableSubmissions;

#[async_trait]
impl SubmissionRepository for UnavailableSubmissions {
    async fn insert(&self, _submission: Submission) -> Result<Submission, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn fetch(
        &self,
        _id: &SubmissionId,
        _company_id: &CompanyId,
    ) -> Result<Option<Submission>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn list_for_assessment(
        &self,
        _assessment_id: &AssessmentId,
        _company_id: &CompanyId,
    ) -> Result<Vec<Submission>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn list_by_status(
        &self,
        _assessment_id: &AssessmentId,
        _company_id: &CompanyId,
        _status: SubmissionStatus,
    ) -> Result<Vec<Submission>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn apply(
        &self,
        _id: &SubmissionId,
        _company_id: &CompanyId,
        _update: SubmissionUpdate,
    ) -> Result<Option<Submission>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn status_breakdown(
        &self,
        _assessment_id: &AssessmentId,
        _company_id: &CompanyId,
    ) -> Result<Vec<StatusBucket>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    SubmissionService<MemorySubmissions, MemoryAssessments, MemoryJobs>,
    Arc<MemorySubmissions>,
    Arc<MemoryAssessments>,
    Arc<MemoryJobs>,
) {
    let submissions = Arc::new(MemorySubmissions::default());
    let assessments = Arc::new(MemoryAssessments::default());
    let jobs = Arc::new(MemoryJobs::default());
    jobs.seed(job());
    let service = SubmissionService::new(submissions.clone(), assessments.clone(), jobs.clone());
    (service, submissions, assessments, jobs)
}

pub(super) fn submission_router_with_service(
    service: SubmissionService<MemorySubmissions, MemoryAssessments, MemoryJobs>,
) -> axum::Router {
    submission_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
