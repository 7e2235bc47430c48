use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::workflows::assessment::authoring::{
    AssessmentGenerator, GeneratedAssessment, GenerationError,
};
use crate::workflows::assessment::directory::{
    Company, CompanyDirectory, DirectoryError, ExperienceRange, Job, JobDirectory,
};
use crate::workflows::assessment::domain::{
    normalize_title, Assessment, AssessmentDraft, AssessmentId, AssessmentKind, AssessmentStatus,
    AssessmentUpdate, CompanyId, JobId,
};
use crate::workflows::assessment::repository::{AssessmentRepository, RepositoryError};
use crate::workflows::assessment::{assessment_router, AssessmentService};

pub(super) fn company_id() -> CompanyId {
    CompanyId("company-1".to_string())
}

pub(super) fn other_company_id() -> CompanyId {
    CompanyId("company-2".to_string())
}

pub(super) fn job_id() -> JobId {
    JobId("job-1".to_string())
}

pub(super) fn job() -> Job {
    Job {
        id: job_id(),
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

pub(super) fn other_job() -> Job {
    Job {
        id: JobId("job-2".to_string()),
        title: "Platform Engineer".to_string(),
        ..job()
    }
}

pub(super) fn company() -> Company {
    Company {
        id: company_id(),
        name: "Talentgate Labs".to_string(),
    }
}

pub(super) fn draft() -> AssessmentDraft {
    AssessmentDraft {
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
        status: None,
    }
}

/// Canned generator output used by [`StubGenerator`].
pub(super) fn generated() -> GeneratedAssessment {
    GeneratedAssessment {
        title: "Design a URL shortener".to_string(),
        problem_description: "Build a URL shortener with custom aliases and hit counts."
            .to_string(),
        expected_duration_hours: 8,
        allowed_tech_stack: Some("Rust".to_string()),
        instructions: Some("Ship a README covering tradeoffs.".to_string()),
        constraints: None,
        submission_deadline_days: Some(7),
        submission_requirements: None,
        limitations: None,
        evaluation: Some("Correctness first, then code quality.".to_string()),
    }
}

pub(super) fn stored_assessment(id: &str, company_id: CompanyId) -> Assessment {
    let created = Utc
        .with_ymd_and_hms(2025, 6, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    Assessment {
        id: AssessmentId(id.to_string()),
        unique_id: "k3x9q2".to_string(),
        job_id: job_id(),
        company_id,
        title: "Refactor a billing service".to_string(),
        problem_description: "Split the billing monolith into two services.".to_string(),
        allowed_tech_stack: None,
        instructions: None,
        constraints: None,
        expected_duration_hours: Some(6),
        submission_deadline_days: None,
        submission_requirements: None,
        limitations: None,
        evaluation: None,
        status: AssessmentStatus::Draft,
        kind: AssessmentKind::Manual,
        created_at: created,
        updated_at: created,
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

    pub(super) fn len(&self) -> usize {
        self.records
            .lock()
            .expect("assessment store mutex poisoned")
            .len()
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

#[derive(Default, Clone)]
pub(super) struct MemoryCompanies {
    companies: Arc<Mutex<HashMap<CompanyId, Company>>>,
}

impl MemoryCompanies {
    pub(super) fn seed(&self, company: Company) {
        self.companies
            .lock()
            .expect("company directory mutex poisoned")
            .insert(company.id.clone(), company);
    }
}

#[async_trait]
impl CompanyDirectory for MemoryCompanies {
    async fn find_company(&self, id: &CompanyId) -> Result<Option<Company>, DirectoryError> {
        let guard = self.companies.lock().expect("company directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Generator double returning [`generated`] and recording every instruction
/// it was handed.
#[derive(Default)]
pub(super) struct StubGenerator {
    instructions: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub(super) fn seen_instructions(&self) -> Vec<String> {
        self.instructions
            .lock()
            .expect("generator mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl AssessmentGenerator for StubGenerator {
    async fn draft(
        &self,
        _job: &Job,
        instruction: &str,
    ) -> Result<GeneratedAssessment, GenerationError> {
        self.instructions
            .lock()
            .expect("generator mutex poisoned")
            .push(instruction.to_string());
        Ok(generated())
    }

    async fn revise(
        &self,
        _job: &Job,
        _existing: &Assessment,
        instruction: &str,
    ) -> Result<GeneratedAssessment, GenerationError> {
        self.instructions
            .lock()
            .expect("generator mutex poisoned")
            .push(instruction.to_string());
        Ok(generated())
    }
}

pub(super) struct FailingGenerator;

#[async_trait]
impl AssessmentGenerator for FailingGenerator {
    async fn draft(
        &self,
        _job: &Job,
        _instruction: &str,
    ) -> Result<GeneratedAssessment, GenerationError> {
        Err(GenerationError::EmptyResponse)
    }

    async fn revise(
        &self,
        _job: &Job,
        _existing: &Assessment,
        _instruction: &str,
    ) -> Result<GeneratedAssessment, GenerationError> {
        Err(GenerationError::EmptyResponse)
    }
}

pub(super) struct UnavailableAssessments;

#[async_trait]
impl AssessmentRepository for UnavailableAssessments {
    async fn insert(&self, _assessment: Assessment) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn fetch(&self, _id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn fetch_by_unique_id(
        &self,
        _unique_id: &str,
    ) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn find_by_title(
        &self,
        _job_id: &JobId,
        _normalized_title: &str,
    ) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn list_for_job(&self, _job_id: &JobId) -> Result<Vec<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn list_for_company(
        &self,
        _company_id: &CompanyId,
    ) -> Result<Vec<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn list_by_status(
        &self,
        _company_id: &CompanyId,
        _status: AssessmentStatus,
    ) -> Result<Vec<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn apply(
        &self,
        _id: &AssessmentId,
        _update: AssessmentUpdate,
    ) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    async fn delete(&self, _id: &AssessmentId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryAssessments, MemoryJobs, MemoryCompanies, StubGenerator>,
    Arc<MemoryAssessments>,
    Arc<MemoryJobs>,
    Arc<MemoryCompanies>,
    Arc<StubGenerator>,
) {
    let assessments = Arc::new(MemoryAssessments::default());
    let jobs = Arc::new(MemoryJobs::default());
    jobs.seed(job());
    let companies = Arc::new(MemoryCompanies::default());
    companies.seed(company());
    let generator = Arc::new(StubGenerator::default());
    let service = AssessmentService::new(
        assessments.clone(),
        jobs.clone(),
        companies.clone(),
        generator.clone(),
    );
    (service, assessments, jobs, companies, generator)
}

pub(super) fn assessment_router_with_service(
    service: AssessmentService<MemoryAssessments, MemoryJobs, MemoryCompanies, StubGenerator>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
