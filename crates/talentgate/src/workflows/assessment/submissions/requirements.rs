use crate::workflows::assessment::domain::SubmissionRequirements;

use super::domain::SubmissionData;

/// Violations raised when a submission fails the assessment's declared
/// requirements. One variant per requirement kind so dispatch stays exhaustive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequirementViolation {
    #[error("GitHub URL is required")]
    MissingGithubUrl,
    #[error("Deployed URL is required")]
    MissingDeployedUrl,
    #[error("Video demo URL is required")]
    MissingVideoDemo,
    #[error("Documentation URL is required")]
    MissingDocumentation,
    #[error("Other URL \"{label}\" is required")]
    MissingOtherUrl { label: String },
    #[error("Additional information is required")]
    MissingAdditionalInfo,
    #[error("Additional info must be under {max_length} characters")]
    AdditionalInfoTooLong { max_length: usize },
}

/// Checks a candidate's payload against the assessment's requirement schema.
/// Rules are applied independently and the first failure is reported.
pub fn check(
    requirements: &SubmissionRequirements,
    data: &SubmissionData,
) -> Result<(), RequirementViolation> {
    if requirements.github_url.required && is_blank(data.github_url.as_deref()) {
        return Err(RequirementViolation::MissingGithubUrl);
    }

    if requirements.deployed_url.required && is_blank(data.deployed_url.as_deref()) {
        return Err(RequirementViolation::MissingDeployedUrl);
    }

    if requirements.video_demo.required && is_blank(data.video_demo_url.as_deref()) {
        return Err(RequirementViolation::MissingVideoDemo);
    }

    if requirements.documentation.required && is_blank(data.documentation_url.as_deref()) {
        return Err(RequirementViolation::MissingDocumentation);
    }

    for entry in requirements.other_urls.iter().filter(|entry| entry.required) {
        let satisfied = data
            .other_urls
            .iter()
            .any(|link| link.label == entry.label && !link.url.is_empty());
        if !satisfied {
            return Err(RequirementViolation::MissingOtherUrl {
                label: entry.label.clone(),
            });
        }
    }

    if requirements.additional_info.required && is_blank(data.additional_info.as_deref()) {
        return Err(RequirementViolation::MissingAdditionalInfo);
    }

    // Length ceiling applies to any supplied text, required or not.
    if let (Some(text), Some(max_length)) = (
        data.additional_info.as_deref(),
        requirements.additional_info.max_length,
    ) {
        if text.chars().count() > max_length {
            return Err(RequirementViolation::AdditionalInfoTooLong { max_length });
        }
    }

    Ok(())
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}
