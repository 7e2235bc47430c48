use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CompanyId, JobId};

/// Read-only snapshot of the job an assessment hangs off. Consumed for
/// existence checks and generator prompts; never written from this workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub company_id: CompanyId,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tech_stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<ExperienceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_date_to_apply: Option<DateTime<Utc>>,
}

/// Months-of-experience band advertised on the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceRange {
    pub min_months: u32,
    pub max_months: u32,
}

/// Read-only snapshot of a company, used for existence checks only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
}

/// Lookup seam for job records owned by other parts of the platform.
#[async_trait]
pub trait JobDirectory: Send + Sync {
    async fn find_job(&self, id: &JobId) -> Result<Option<Job>, DirectoryError>;
}

/// Lookup seam for company records.
#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    async fn find_company(&self, id: &CompanyId) -> Result<Option<Company>, DirectoryError>;
}

/// Directory lookup failure.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}
