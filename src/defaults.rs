//! Default section catalogue and prompt template.

use crate::model::Section;

/// Standard Statement of Work sections, in document order.
pub const DEFAULT_SECTION_TITLES: &[&str] = &[
    "Introduction",
    "Definitions and Acronyms",
    "Objective",
    "Scope",
    "Solution Framework",
    "Deliverables",
    "Client Responsibilities",
    "Limitations",
    "General Operations",
    "Commercial Proposal",
    "Termination",
    "Appendix 1 – List of Holidays",
];

/// Prompt used for sections without a custom prompt.
pub const DEFAULT_FALLBACK_PROMPT: &str = r#"Write a professional {sectionTitle} section for a Statement of Work document.

Client Company: {clientCompany.name}
Client Description: {clientCompany.description}

Your Company: {yourCompany.name}
Company Description: {yourCompany.description}

Project Title: {project.title}
Service Description: {project.serviceDescription}
{project.annualBudget ? `Annual Project Budget: ${project.annualBudget}` : ''}
{project.targetGeo ? `Target Geographic Area: ${project.targetGeo}` : ''}

IMPORTANT: Write ONLY the content for the "{sectionTitle}" section. Do not include section headings, titles, or any other parts of the document. Just provide the body content for this specific section that would appear under the "{sectionTitle}" heading.

Please write comprehensive, professional content that is appropriate for this section of a Statement of Work document. Use clear formatting with bullet points, numbered lists, or tables where appropriate. Make it specific to this project and companies involved."#;

/// Returns the default sections, all idle and empty, with ids "1", "2", ...
pub fn default_sections() -> Vec<Section> {
    DEFAULT_SECTION_TITLES
        .iter()
        .enumerate()
        .map(|(i, title)| Section::new((i + 1).to_string(), *title))
        .collect()
}
