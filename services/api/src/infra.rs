use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;

use talentgate::workflows::assessment::submissions::{
    StatusBucket, Submission, SubmissionId, SubmissionRepository, SubmissionStatus,
    SubmissionUpdate,
};
use talentgate::workflows::assessment::{
    normalize_title, Assessment, AssessmentId, AssessmentRepository, AssessmentStatus,
    AssessmentUpdate, Company, CompanyDirectory, CompanyId, DirectoryError, ExperienceRange, Job,
    JobDirectory, JobId, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

fn merge_assessment(record: &mut Assessment, update: AssessmentUpdate) {
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

fn merge_submission(record: &mut Submission, update: SubmissionUpdate) {
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
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<HashMap<AssessmentId, Assessment>>>,
}

#[async_trait]
impl AssessmentRepository for InMemoryAssessmentRepository {
    async fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(assessment.id.clone(), assessment.clone());
        Ok(assessment)
    }

    async fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    async fn fetch_by_unique_id(
        &self,
        unique_id: &str,
    ) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
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
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|record| {
                record.job_id == *job_id && normalize_title(&record.title) == normalized_title
            })
            .cloned())
    }

    async fn list_for_job(&self, job_id: &JobId) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<Assessment> = guard
            .values()
            .filter(|record| record.job_id == *job_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }

    async fn list_for_company(
        &self,
        company_id: &CompanyId,
    ) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<Assessment> = guard
            .values()
            .filter(|record| record.company_id == *company_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }

    async fn list_by_status(
        &self,
        company_id: &CompanyId,
        status: AssessmentStatus,
    ) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<Assessment> = guard
            .values()
            .filter(|record| record.company_id == *company_id && record.status == status)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }

    async fn apply(
        &self,
        id: &AssessmentId,
        update: AssessmentUpdate,
    ) -> Result<Option<Assessment>, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let Some(record) = guard.get_mut(id) else {
            return Ok(None);
        };
        merge_assessment(record, update);
        Ok(Some(record.clone()))
    }

    async fn delete(&self, id: &AssessmentId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id).is_some())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySubmissionRepository {
    records: Arc<Mutex<HashMap<SubmissionId, Submission>>>,
}

impl InMemorySubmissionRepository {
    fn matching(&self, assessment_id: &AssessmentId, company_id: &CompanyId) -> Vec<Submission> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<Submission> = guard
            .values()
            .filter(|record| {
                record.assessment_id == *assessment_id && record.company_id == *company_id
            })
            .cloned()
            .collect();
        records.sort_by_key(|record| record.submitted_at);
        records
    }
}

#[async_trait]
impl SubmissionRepository for InMemorySubmissionRepository {
    async fn insert(&self, submission: Submission) -> Result<Submission, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
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
        let guard = self.records.lock().expect("repository mutex poisoned");
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
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let Some(record) = guard
            .get_mut(id)
            .filter(|record| record.company_id == *company_id)
        else {
            return Ok(None);
        };
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
pub(crate) struct InMemoryJobDirectory {
    jobs: Arc<Mutex<HashMap<JobId, Job>>>,
}

impl InMemoryJobDirectory {
    pub(crate) fn register(&self, job: Job) {
        let mut guard = self.jobs.lock().expect("directory mutex poisoned");
        guard.insert(job.id.clone(), job);
    }
}

#[async_trait]
impl JobDirectory for InMemoryJobDirectory {
    async fn find_job(&self, id: &JobId) -> Result<Option<Job>, DirectoryError> {
        let guard = self.jobs.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCompanyDirectory {
    companies: Arc<Mutex<HashMap<CompanyId, Company>>>,
}

impl InMemoryCompanyDirectory {
    pub(crate) fn register(&self, company: Company) {
        let mut guard = self.companies.lock().expect("directory mutex poisoned");
        guard.insert(company.id.clone(), company);
    }
}

#[async_trait]
impl CompanyDirectory for InMemoryCompanyDirectory {
    async fn find_company(&self, id: &CompanyId) -> Result<Option<Company>, DirectoryError> {
        let guard = self.companies.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

pub(crate) fn sample_company() -> Company {
    Company {
        id: CompanyId("demo-company".to_string()),
        name: "Talentgate Demo Co".to_string(),
    }
}

pub(crate) fn sample_job() -> Job {
    Job {
        id: JobId("demo-job".to_string()),
        company_id: sample_company().id,
        title: "Backend Engineer".to_string(),
        description: "Own the services behind the candidate pipeline.".to_string(),
        role: Some("Individual contributor".to_string()),
        tech_stack: vec!["Rust".to_string(), "PostgreSQL".to_string()],
        experience: Some(ExperienceRange {
            min_months: 24,
            max_months: 72,
        }),
        location: Some("Remote".to_string()),
        last_date_to_apply: None,
    }
}
