//! Take-home assessment authoring and lifecycle for job postings.
//!
//! An assessment hangs off a job, is owned by the company that posted the job,
//! and only accepts candidate submissions while `active`. Authoring is either
//! manual or delegated to the text-generation service behind
//! [`authoring::AssessmentGenerator`]; both paths land in the same store and
//! share the per-job duplicate-title rule.

pub mod authoring;
pub mod directory;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod submissions;


pub use authoring::{
    AssessmentGenerator, GeneratedAssessment, GenerationError, HttpAssessmentGenerator,
};
pub use directory::{Company, CompanyDirectory, DirectoryError, ExperienceRange, Job, JobDirectory};
pub use domain::{
    normalize_title, AdditionalInfoRequirement, Assessment, AssessmentDraft, AssessmentId,
    AssessmentKind, AssessmentStatus, AssessmentUpdate, CompanyId, JobId, OtherUrlRequirement,
    SubmissionRequirements, UrlRequirement, VideoDemoRequirement,
};
pub use repository::{AssessmentRepository, RepositoryError};
pub use router::assessment_router;
pub use service::{assert_owned_by, AssessmentService, AssessmentServiceError};
