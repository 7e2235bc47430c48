//! Candidate submission intake and the reviewer-side evaluation state machine.
//!
//! Intake is public and gated only on the assessment being open; everything
//! after intake is scoped to the owning company. Decisions (reject, select,
//! hold) run through one path so the stored status always agrees with the
//! recorded outcome.

pub mod domain;
pub mod repository;
pub(crate) mod requirements;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Applicant, ContactDetails, Decision, DecisionNotes, DecisionOutcome, LabeledUrl,
    MeetingDetails, NewSubmission, NextStepKind, NextSteps, Submission, SubmissionData,
    SubmissionId, SubmissionStatus, SubmissionUpdate, TaskDetails,
};
pub use repository::{StatusBucket, SubmissionRepository};
pub use requirements::RequirementViolation;
pub use router::submission_router;
pub use service::{SubmissionDetail, SubmissionListing, SubmissionService, SubmissionServiceError};
