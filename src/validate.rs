//! Proposal configuration checks.

use crate::error::{Error, Result};
use crate::model::{CompanyInfo, ProposalConfig};
use std::fmt;

/// A single configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path of the offending field ("clientCompany.name")
    pub field: String,
    /// Human-readable description
    pub message: String,
}

impl ValidationIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Returns every problem found in the configuration; empty means valid.
pub fn validate_config(config: &ProposalConfig) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    check_company(&mut issues, "yourCompany", &config.your_company);
    check_company(&mut issues, "clientCompany", &config.client_company);

    if config.project.title.trim().is_empty() {
        issues.push(ValidationIssue::new("project.title", "project title is required"));
    }
    if config.project.service_description.trim().is_empty() {
        issues.push(ValidationIssue::new(
            "project.serviceDescription",
            "service description is required",
        ));
    }

    if config.sections.is_empty() {
        issues.push(ValidationIssue::new("sections", "at least one section is required"));
    }
    for (i, title) in config.sections.iter().enumerate() {
        if title.trim().is_empty() {
            issues.push(ValidationIssue::new(
                format!("sections[{}]", i),
                "section title must not be blank",
            ));
        }
    }

    issues
}

/// Fails with [`Error::InvalidConfig`] listing all issues, if any.
pub fn ensure_valid(config: &ProposalConfig) -> Result<()> {
    let issues = validate_config(config);
    if issues.is_empty() {
        return Ok(());
    }

    let message = issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(Error::InvalidConfig(message))
}

fn check_company(issues: &mut Vec<ValidationIssue>, prefix: &str, company: &CompanyInfo) {
    if company.name.trim().is_empty() {
        issues.push(ValidationIssue::new(
            format!("{}.name", prefix),
            "company name is required",
        ));
    }
    if company.description.trim().is_empty() {
        issues.push(ValidationIssue::new(
            format!("{}.description", prefix),
            "company description is required",
        ));
    }
    if company.website.as_deref().is_some_and(|w| w.trim().is_empty()) {
        issues.push(ValidationIssue::new(
            format!("{}.website", prefix),
            "website must not be blank when given",
        ));
    }
}
