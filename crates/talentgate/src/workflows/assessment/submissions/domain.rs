use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::assessment::domain::{AssessmentId, CompanyId, JobId};

/// Identifier wrapper for candidate submissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub String);

/// The primary state machine field tracked on every submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Submitted,
    UnderReview,
    Rejected,
    Selected,
    OnHold,
}

impl SubmissionStatus {
    pub const fn label(self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::UnderReview => "under_review",
            SubmissionStatus::Rejected => "rejected",
            SubmissionStatus::Selected => "selected",
            SubmissionStatus::OnHold => "on_hold",
        }
    }

    /// Boundary-level parse so routes can reject unknown values with a stable
    /// message instead of a serde rejection.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "submitted" => Some(SubmissionStatus::Submitted),
            "under_review" => Some(SubmissionStatus::UnderReview),
            "rejected" => Some(SubmissionStatus::Rejected),
            "selected" => Some(SubmissionStatus::Selected),
            "on_hold" => Some(SubmissionStatus::OnHold),
            _ => None,
        }
    }
}

/// The outcome a reviewer records against a submission. Status is always derived
/// from this, never the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionOutcome {
    Reject,
    Select,
    Hold,
}

impl DecisionOutcome {
    /// Single outcome-to-status mapping used by every decision-bearing path.
    pub const fn derived_status(self) -> SubmissionStatus {
        match self {
            DecisionOutcome::Reject => SubmissionStatus::Rejected,
            DecisionOutcome::Select => SubmissionStatus::Selected,
            DecisionOutcome::Hold => SubmissionStatus::OnHold,
        }
    }
}

/// The recorded decision attached once an evaluation transition fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub outcome: DecisionOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_to_candidate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decided_at: Option<DateTime<Utc>>,
}

/// Follow-up action categories a reviewer can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NextStepKind {
    Meeting,
    Call,
    Email,
    Task,
}

/// Scheduling details for a meeting-type next step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
}

/// Contact coordinates for call/email next steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A concrete follow-up task handed to the candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDetails {
    pub title: String,
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
}

/// Next-step record attachable to a submission independently of its status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextSteps {
    #[serde(rename = "type")]
    pub kind: NextStepKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting: Option<MeetingDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<TaskDetails>,
}

/// Candidate identity attached to a submission at intake.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    pub name: String,
    pub email: String,
    pub resume_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portfolio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub willing_to_relocate: Option<bool>,
}

/// A labelled link the candidate attaches for an `otherUrls` requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledUrl {
    pub label: String,
    pub url: String,
}

/// The artifacts a candidate hands in. Every field is optional on the wire; the
/// requirements validator decides what was actually mandatory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_demo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub other_urls: Vec<LabeledUrl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

/// A candidate's response to an assessment, tracked through the evaluation
/// state machine. `job_id`/`assessment_id`/`company_id` are copied from the
/// assessment at intake and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: SubmissionId,
    pub job_id: JobId,
    pub assessment_id: AssessmentId,
    pub company_id: CompanyId,
    pub applicant: Applicant,
    pub submission_data: SubmissionData,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<NextSteps>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluated_at: Option<DateTime<Utc>>,
}

/// Intake payload for a new submission. References to job and company are
/// deliberately absent; the gate copies them from the assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub applicant: Applicant,
    #[serde(default)]
    pub submission_data: SubmissionData,
}

/// Reviewer-supplied notes accompanying a reject/select/hold action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionNotes {
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub message_to_candidate: Option<String>,
}

/// Partial update applied as a field-wise merge over a stored submission.
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionUpdate {
    #[serde(default)]
    pub status: Option<SubmissionStatus>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub decision: Option<Decision>,
    #[serde(default)]
    pub next_steps: Option<NextSteps>,
    #[serde(default)]
    pub evaluated_at: Option<DateTime<Utc>>,
}

impl SubmissionUpdate {
    /// Builds the update for a decision-driven transition: status derived from
    /// the outcome, `decidedAt` and `evaluatedAt` stamped to `now`.
    pub fn for_decision(
        outcome: DecisionOutcome,
        notes: DecisionNotes,
        next_steps: Option<NextSteps>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            status: Some(outcome.derived_status()),
            score: notes.score,
            feedback: notes.feedback,
            decision: Some(Decision {
                outcome,
                message_to_candidate: notes.message_to_candidate,
                decided_at: Some(now),
            }),
            next_steps,
            evaluated_at: Some(now),
        }
    }

    /// Normalizes a caller-supplied evaluation update: a decision outcome
    /// forces the matching status and stamps `decidedAt` when absent; any
    /// status change stamps `evaluatedAt` unless the caller set one.
    pub fn normalized(mut self, now: DateTime<Utc>) -> Self {
        if let Some(decision) = self.decision.as_mut() {
            self.status = Some(decision.outcome.derived_status());
            if decision.decided_at.is_none() {
                decision.decided_at = Some(now);
            }
        }
        if self.status.is_some() && self.evaluated_at.is_none() {
            self.evaluated_at = Some(now);
        }
        self
    }
}
