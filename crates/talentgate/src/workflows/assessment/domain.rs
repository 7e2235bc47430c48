use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Identifier wrapper for the job a posting hangs off.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for the owning company (the tenant key on every scoped query).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub String);

/// Lifecycle of an assessment. Only `Active` accepts candidate submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentStatus {
    Draft,
    Active,
    Closed,
}

impl AssessmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentStatus::Draft => "draft",
            AssessmentStatus::Active => "active",
            AssessmentStatus::Closed => "closed",
        }
    }

    /// Parses the wire label; boundary validation for status endpoints.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(AssessmentStatus::Draft),
            "active" => Some(AssessmentStatus::Active),
            "closed" => Some(AssessmentStatus::Closed),
            _ => None,
        }
    }
}

/// Provenance marker distinguishing hand-written assessments from generated ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentKind {
    Manual,
    Ai,
}

/// Required-or-not declaration for a single well-known submission link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRequirement {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Video walkthrough declaration; `platform` is advisory (e.g. "Loom").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDemoRequirement {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

/// A labelled extra link the assessment asks for, required independently of the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherUrlRequirement {
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Free-text addendum declaration with an optional length ceiling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalInfoRequirement {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

/// Declarative schema of what a submission must contain. Every component defaults
/// to not-required so an absent block never blocks intake.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequirements {
    #[serde(default)]
    pub github_url: UrlRequirement,
    #[serde(default)]
    pub deployed_url: UrlRequirement,
    #[serde(default)]
    pub video_demo: VideoDemoRequirement,
    #[serde(default)]
    pub documentation: UrlRequirement,
    #[serde(default)]
    pub other_urls: Vec<OtherUrlRequirement>,
    #[serde(default)]
    pub additional_info: AdditionalInfoRequirement,
}

/// A take-home assessment attached to a job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: AssessmentId,
    /// Short shareable slug candidates use to look the assessment up.
    pub unique_id: String,
    pub job_id: JobId,
    pub company_id: CompanyId,
    pub title: String,
    pub problem_description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tech_stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_duration_hours: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_deadline_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_requirements: Option<SubmissionRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limitations: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<String>,
    pub status: AssessmentStatus,
    #[serde(rename = "type")]
    pub kind: AssessmentKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assessment {
    /// Whether the assessment currently accepts candidate submissions.
    pub const fn accepts_submissions(&self) -> bool {
        matches!(self.status, AssessmentStatus::Active)
    }
}

/// Author-supplied content for a new assessment. Identity fields and provenance
/// are filled in by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDraft {
    pub title: String,
    pub problem_description: String,
    #[serde(default)]
    pub allowed_tech_stack: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub constraints: Option<String>,
    #[serde(default)]
    pub expected_duration_hours: Option<u32>,
    #[serde(default)]
    pub submission_deadline_days: Option<u32>,
    #[serde(default)]
    pub submission_requirements: Option<SubmissionRequirements>,
    #[serde(default)]
    pub limitations: Option<String>,
    #[serde(default)]
    pub evaluation: Option<String>,
    #[serde(default)]
    pub status: Option<AssessmentStatus>,
}

/// Partial update applied as a field-wise merge over a stored assessment.
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub problem_description: Option<String>,
    #[serde(default)]
    pub allowed_tech_stack: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub constraints: Option<String>,
    #[serde(default)]
    pub expected_duration_hours: Option<u32>,
    #[serde(default)]
    pub submission_deadline_days: Option<u32>,
    #[serde(default)]
    pub submission_requirements: Option<SubmissionRequirements>,
    #[serde(default)]
    pub limitations: Option<String>,
    #[serde(default)]
    pub evaluation: Option<String>,
    #[serde(default)]
    pub status: Option<AssessmentStatus>,
    #[serde(default, rename = "type")]
    pub kind: Option<AssessmentKind>,
}

/// Normalized form used for the per-job duplicate-title check: trimmed and
/// case-folded so "Backend Task" and "backend task " collide.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}
