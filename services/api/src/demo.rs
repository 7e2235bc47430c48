use crate::infra::{
    sample_company, sample_job, InMemoryAssessmentRepository, InMemoryCompanyDirectory,
    InMemoryJobDirectory, InMemorySubmissionRepository,
};
use async_trait::async_trait;
use clap::Args;
use std::sync::Arc;
use talentgate::error::AppError;
use talentgate::workflows::assessment::submissions::{
    Applicant, DecisionNotes, MeetingDetails, NewSubmission, NextStepKind, NextSteps, Submission,
    SubmissionData, SubmissionService,
};
use talentgate::workflows::assessment::{
    AdditionalInfoRequirement, Assessment, AssessmentGenerator, AssessmentService,
    AssessmentStatus, GeneratedAssessment, GenerationError, Job, SubmissionRequirements,
    UrlRequirement,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the seeded company name.
    #[arg(long)]
    pub(crate) company: Option<String>,
    /// Override the seeded job title.
    #[arg(long)]
    pub(crate) job_title: Option<String>,
    /// Stop after candidate intake, skipping the evaluation portion.
    #[arg(long)]
    pub(crate) skip_evaluation: bool,
}

/// Offline stand-in for the external generator so the demo runs without
/// credentials or a network.
struct CannedGenerator;

#[async_trait]
impl AssessmentGenerator for CannedGenerator {
    async fn draft(
        &self,
        job: &Job,
        instruction: &str,
    ) -> Result<GeneratedAssessment, GenerationError> {
        Ok(canned_assessment(job, instruction))
    }

    async fn revise(
        &self,
        job: &Job,
        _existing: &Assessment,
        instruction: &str,
    ) -> Result<GeneratedAssessment, GenerationError> {
        Ok(canned_assessment(job, instruction))
    }
}

fn canned_assessment(job: &Job, instruction: &str) -> GeneratedAssessment {
    let stack = if job.tech_stack.is_empty() {
        "any stack the candidate prefers".to_string()
    } else {
        job.tech_stack.join(", ")
    };

    GeneratedAssessment {
        title: format!("{} take-home task", job.title),
        problem_description: format!(
            "Build a small service exercising the skills advertised for {}: {}.",
            job.title, stack
        ),
        expected_duration_hours: 6,
        allowed_tech_stack: Some(stack),
        instructions: Some(format!("Recruiter guidance: {instruction}")),
        constraints: Some("Keep third-party services out of the critical path.".to_string()),
        submission_deadline_days: Some(7),
        submission_requirements: Some(demo_requirements()),
        limitations: None,
        evaluation: Some("Correctness first, then clarity of the write-up.".to_string()),
    }
}

fn demo_requirements() -> SubmissionRequirements {
    SubmissionRequirements {
        github_url: UrlRequirement {
            required: true,
            description: Some("Public repository with the solution".to_string()),
        },
        additional_info: AdditionalInfoRequirement {
            required: false,
            placeholder: Some("Anything reviewers should know up front".to_string()),
            max_length: Some(300),
        },
        ..SubmissionRequirements::default()
    }
}

fn candidate(name: &str, handle: &str, github_url: Option<&str>) -> NewSubmission {
    NewSubmission {
        applicant: Applicant {
            name: name.to_string(),
            email: format!("{handle}@example.com"),
            resume_url: format!("https://resumes.example/{handle}.pdf"),
            phone: None,
            location: Some("Remote".to_string()),
            linkedin_url: None,
            github_profile_url: None,
            portfolio_url: None,
            cover_letter: None,
            willing_to_relocate: None,
        },
        submission_data: SubmissionData {
            github_url: github_url.map(|url| url.to_string()),
            ..SubmissionData::default()
        },
    }
}

fn decision_line(record: &Submission) -> String {
    match record.score {
        Some(score) => format!(
            "- {} -> {} (score {score:.1})",
            record.applicant.name,
            record.status.label()
        ),
        None => format!("- {} -> {}", record.applicant.name, record.status.label()),
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        company,
        job_title,
        skip_evaluation,
    } = args;

    let mut demo_company = sample_company();
    if let Some(name) = company {
        demo_company.name = name;
    }
    let mut demo_job = sample_job();
    if let Some(title) = job_title {
        demo_job.title = title;
    }

    let assessments = Arc::new(InMemoryAssessmentRepository::default());
    let submissions = Arc::new(InMemorySubmissionRepository::default());
    let jobs = Arc::new(InMemoryJobDirectory::default());
    let companies = Arc::new(InMemoryCompanyDirectory::default());
    companies.register(demo_company.clone());
    jobs.register(demo_job.clone());

    let authoring = AssessmentService::new(
        assessments.clone(),
        jobs.clone(),
        companies,
        Arc::new(CannedGenerator),
    );
    let review = SubmissionService::new(submissions, assessments, jobs);

    println!("Talentgate workflow demo");
    println!("Company: {} ({})", demo_company.name, demo_company.id.0);
    println!("Job: {} ({})", demo_job.title, demo_job.id.0);

    println!("\nAuthoring");
    let assessment = match authoring
        .create_generated(
            &demo_job.id,
            &demo_company.id,
            "Scope the task to one evening and lean on the advertised stack.",
        )
        .await
    {
        Ok(assessment) => assessment,
        Err(err) => {
            println!("  Authoring failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- Drafted \"{}\" ({:?} provenance, status {})",
        assessment.title,
        assessment.kind,
        assessment.status.label()
    );

    let active = match authoring
        .set_status(&assessment.id, &demo_company.id, AssessmentStatus::Active)
        .await
    {
        Ok(active) => active,
        Err(err) => {
            println!("  Activation failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- Published; candidates reach it at /assessments/unique/{}",
        active.unique_id
    );

    println!("\nIntake");
    match review
        .submit(&assessment.id, candidate("Rohan Iyer", "rohan", None))
        .await
    {
        Ok(_) => println!("- Unexpectedly accepted a submission without a repository link"),
        Err(err) => println!("- Declined incomplete submission: {err}"),
    }

    let first = match review
        .submit(
            &assessment.id,
            candidate(
                "Asha Verma",
                "asha",
                Some("https://github.com/asha/rate-limiter"),
            ),
        )
        .await
    {
        Ok(record) => record,
        Err(err) => {
            println!("  Intake failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- Accepted {} from {} (status {})",
        first.id.0,
        first.applicant.name,
        first.status.label()
    );

    let second = match review
        .submit(
            &assessment.id,
            candidate(
                "Meera Pillai",
                "meera",
                Some("https://github.com/meera/rate-limiter"),
            ),
        )
        .await
    {
        Ok(record) => record,
        Err(err) => {
            println!("  Intake failed: {err}");
            return Ok(());
        }
    };
    println!(
        "- Accepted {} from {} (status {})",
        second.id.0,
        second.applicant.name,
        second.status.label()
    );

    if skip_evaluation {
        return Ok(());
    }

    println!("\nEvaluation");
    let rejected = match review
        .reject(
            &first.id,
            &demo_company.id,
            DecisionNotes {
                feedback: Some("Missed the burst-handling requirement.".to_string()),
                score: Some(41.0),
                message_to_candidate: Some("Thanks for taking the time.".to_string()),
            },
        )
        .await
    {
        Ok(record) => record,
        Err(err) => {
            println!("  Evaluation failed: {err}");
            return Ok(());
        }
    };
    println!("{}", decision_line(&rejected));

    let selected = match review
        .select(
            &second.id,
            &demo_company.id,
            DecisionNotes {
                feedback: Some("Clean separation of concerns.".to_string()),
                score: Some(88.0),
                message_to_candidate: Some("We would like to meet you.".to_string()),
            },
            Some(NextSteps {
                kind: NextStepKind::Meeting,
                description: Some("Intro call with the hiring panel".to_string()),
                meeting: Some(MeetingDetails {
                    platform: Some("Zoom".to_string()),
                    meeting_link: Some("https://zoom.example/talentgate".to_string()),
                    scheduled_at: None,
                    duration_minutes: Some(45),
                }),
                contact: None,
                task: None,
            }),
        )
        .await
    {
        Ok(record) => record,
        Err(err) => {
            println!("  Evaluation failed: {err}");
            return Ok(());
        }
    };
    println!("{}", decision_line(&selected));

    let breakdown = match review.stats(&assessment.id, &demo_company.id).await {
        Ok(breakdown) => breakdown,
        Err(err) => {
            println!("  Stats unavailable: {err}");
            return Ok(());
        }
    };
    println!("\nStatus breakdown");
    for bucket in &breakdown {
        match bucket.avg_score {
            Some(avg) => println!(
                "- {}: {} submission(s), avg score {avg:.1}",
                bucket.status.label(),
                bucket.count
            ),
            None => println!(
                "- {}: {} submission(s)",
                bucket.status.label(),
                bucket.count
            ),
        }
    }

    let detail = match review.get(&selected.id, &demo_company.id).await {
        Ok(detail) => detail,
        Err(err) => {
            println!("  Detail lookup failed: {err}");
            return Ok(());
        }
    };
    match serde_json::to_string_pretty(&detail.submission) {
        Ok(json) => println!("\nSelected submission payload:\n{json}"),
        Err(err) => println!("\nSelected submission payload unavailable: {err}"),
    }

    Ok(())
}
