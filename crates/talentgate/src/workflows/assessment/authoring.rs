use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::GeneratorConfig;

use super::directory::Job;
use super::domain::{Assessment, SubmissionRequirements};

/// Structured assessment content produced by the external generator, already
/// validated for the fields the platform refuses to live without.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedAssessment {
    pub title: String,
    pub problem_description: String,
    pub expected_duration_hours: u32,
    pub allowed_tech_stack: Option<String>,
    pub instructions: Option<String>,
    pub constraints: Option<String>,
    pub submission_deadline_days: Option<u32>,
    pub submission_requirements: Option<SubmissionRequirements>,
    pub limitations: Option<String>,
    pub evaluation: Option<String>,
}

/// Seam for the external AI text-generation service.
#[async_trait]
pub trait AssessmentGenerator: Send + Sync {
    /// Drafts a fresh assessment for a job from recruiter instructions.
    async fn draft(
        &self,
        job: &Job,
        instruction: &str,
    ) -> Result<GeneratedAssessment, GenerationError>;

    /// Revises an existing assessment, preserving its intent and scope.
    async fn revise(
        &self,
        job: &Job,
        existing: &Assessment,
        instruction: &str,
    ) -> Result<GeneratedAssessment, GenerationError>;
}

/// Generation failures. Raw upstream bodies are never carried here, so every
/// variant is safe to log and to fold into a client-facing upstream error.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("failed to build generator client: {0}")]
    Client(String),
    #[error("assessment generator unreachable: {0}")]
    Unreachable(String),
    #[error("assessment generator returned no content")]
    EmptyResponse,
    #[error("assessment generator returned malformed content")]
    Malformed,
    #[error("generated assessment is missing required fields")]
    Incomplete,
}

/// Chat-completions client for the generation endpoint. Requests carry a
/// bounded wait so a stalled upstream fails the request instead of the worker.
pub struct HttpAssessmentGenerator {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl HttpAssessmentGenerator {
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GenerationError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| GenerationError::Client(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    async fn complete(&self, prompt: String) -> Result<GeneratedAssessment, GenerationError> {
        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.max_tokens,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-subscription-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| GenerationError::Unreachable(err.to_string()))?;

        if !response.status().is_success() {
            return Err(GenerationError::Unreachable(format!(
                "upstream status {}",
                response.status()
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|_| GenerationError::Malformed)?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)?;

        parse_generated(&content)
    }
}

#[async_trait]
impl AssessmentGenerator for HttpAssessmentGenerator {
    async fn draft(
        &self,
        job: &Job,
        instruction: &str,
    ) -> Result<GeneratedAssessment, GenerationError> {
        self.complete(draft_prompt(job, instruction)).await
    }

    async fn revise(
        &self,
        job: &Job,
        existing: &Assessment,
        instruction: &str,
    ) -> Result<GeneratedAssessment, GenerationError> {
        self.complete(revise_prompt(job, existing, instruction)).await
    }
}

/// Parses generator output, tolerating a Markdown code fence around the JSON.
pub fn parse_generated(content: &str) -> Result<GeneratedAssessment, GenerationError> {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .map(|rest| rest.trim_end_matches("```").trim())
        .unwrap_or(trimmed);

    let payload: GeneratedPayload =
        serde_json::from_str(trimmed).map_err(|_| GenerationError::Malformed)?;
    payload.validated()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedPayload {
    #[serde(default)]
    title: Option<String>,
    // The generation schema uses snake case for this one field.
    #[serde(default, rename = "problem_description")]
    problem_description: Option<String>,
    #[serde(default)]
    allowed_tech_stack: Option<String>,
    #[serde(default)]
    instructions: Option<String>,
    #[serde(default)]
    constraints: Option<String>,
    #[serde(default)]
    expected_duration_hours: Option<u32>,
    #[serde(default)]
    submission_deadline_days: Option<u32>,
    #[serde(default)]
    submission_requirements: Option<SubmissionRequirements>,
    #[serde(default)]
    limitations: Option<String>,
    #[serde(default)]
    evaluation: Option<String>,
}

impl GeneratedPayload {
    fn validated(self) -> Result<GeneratedAssessment, GenerationError> {
        let title = self
            .title
            .filter(|value| !value.trim().is_empty())
            .ok_or(GenerationError::Incomplete)?;
        let problem_description = self
            .problem_description
            .filter(|value| !value.trim().is_empty())
            .ok_or(GenerationError::Incomplete)?;
        let expected_duration_hours = self
            .expected_duration_hours
            .filter(|hours| *hours > 0)
            .ok_or(GenerationError::Incomplete)?;

        Ok(GeneratedAssessment {
            title,
            problem_description,
            expected_duration_hours,
            allowed_tech_stack: self.allowed_tech_stack,
            instructions: self.instructions,
            constraints: self.constraints,
            submission_deadline_days: self.submission_deadline_days,
            submission_requirements: self.submission_requirements,
            limitations: self.limitations,
            evaluation: self.evaluation,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

const OUTPUT_SCHEMA: &str = "Respond ONLY with a valid JSON object (no markdown, no commentary) with keys: \
title, problem_description, allowedTechStack, instructions, constraints, \
expectedDurationHours (number), submissionDeadlineDays (number), \
submissionRequirements, limitations, evaluation. All text fields must be strings.";

fn draft_prompt(job: &Job, instruction: &str) -> String {
    let job_details = serde_json::to_string_pretty(job).unwrap_or_default();
    let instruction = if instruction.trim().is_empty() {
        "None provided"
    } else {
        instruction
    };

    format!(
        "You are a pragmatic and experienced engineering hiring manager.\n\
         Design ONE realistic take-home assessment matching the job role, the \
         experience level, and the recruiter's explicit instructions. The task \
         must be achievable in the stated time by a competent candidate.\n\n\
         JOB DETAILS:\n{job_details}\n\n\
         RECRUITER INSTRUCTIONS (HIGH PRIORITY):\n{instruction}\n\n\
         {OUTPUT_SCHEMA}"
    )
}

fn revise_prompt(job: &Job, existing: &Assessment, instruction: &str) -> String {
    let job_details = serde_json::to_string_pretty(job).unwrap_or_default();
    let baseline = serde_json::to_string_pretty(existing).unwrap_or_default();
    let instruction = if instruction.trim().is_empty() {
        "No additional instructions provided."
    } else {
        instruction
    };

    format!(
        "You are an experienced engineering hiring manager.\n\
         UPDATE the existing take-home assessment below, preserving its intent, \
         scope, and difficulty. Improve clarity and fairness; do not add new \
         systems or requirements unless the recruiter asks.\n\n\
         JOB DETAILS:\n{job_details}\n\n\
         EXISTING ASSESSMENT (BASELINE):\n{baseline}\n\n\
         RECRUITER UPDATE INSTRUCTIONS (HIGH PRIORITY):\n{instruction}\n\n\
         {OUTPUT_SCHEMA}"
    )
}
