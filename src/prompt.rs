//! Prompt templates for section generation.
//!
//! Templates reference the proposal configuration through `{...}`
//! placeholders such as `{clientCompany.name}` or `{sectionTitle}`.
//! Missing values are filled with a bracketed marker (`[Client Company Name]`)
//! so the gap is visible in the populated prompt.

use crate::model::{CompanyInfo, ProjectInfo, ProposalConfig};

/// Conditional budget line; expands to nothing when no budget is set.
pub const BUDGET_EXPRESSION: &str =
    "{project.annualBudget ? `Annual Project Budget: ${project.annualBudget}` : ''}";

/// Conditional geography line; expands to nothing when no target is set.
pub const GEO_EXPRESSION: &str =
    "{project.targetGeo ? `Target Geographic Area: ${project.targetGeo}` : ''}";

/// Replaces every template placeholder with values from the configuration.
pub fn populate_prompt_template(
    template: &str,
    config: &ProposalConfig,
    section_title: &str,
) -> String {
    let mut prompt = template.replace("{sectionTitle}", or_marker(section_title, "[Section Title]"));

    for (placeholder, value, marker) in substitutions(config) {
        prompt = prompt.replace(placeholder, or_marker(value, marker));
    }

    prompt = prompt.replace(BUDGET_EXPRESSION, &budget_line(&config.project).unwrap_or_default());
    prompt.replace(GEO_EXPRESSION, &geo_line(&config.project).unwrap_or_default())
}

/// Turns a populated prompt back into a template.
///
/// Every occurrence of a configured value is replaced by its placeholder.
/// Blank values are skipped. Values that also occur in free text are
/// replaced there too, so the result is only an approximation.
pub fn extract_template_from_populated(
    populated: &str,
    config: &ProposalConfig,
    section_title: &str,
) -> String {
    let mut template = populated.to_string();

    if !section_title.trim().is_empty() {
        template = template.replace(section_title, "{sectionTitle}");
    }

    for (placeholder, value, _) in substitutions(config) {
        if !value.trim().is_empty() {
            template = template.replace(value, placeholder);
        }
    }

    if let Some(line) = budget_line(&config.project) {
        template = template.replace(&line, BUDGET_EXPRESSION);
    }
    if let Some(line) = geo_line(&config.project) {
        template = template.replace(&line, GEO_EXPRESSION);
    }

    template
}

/// Placeholder, configured value and missing-value marker, in replacement order.
fn substitutions(config: &ProposalConfig) -> Vec<(&'static str, &str, &'static str)> {
    let your = &config.your_company;
    let client = &config.client_company;

    vec![
        ("{yourCompany.name}", your.name.as_str(), "[Your Company Name]"),
        (
            "{yourCompany.description}",
            your.description.as_str(),
            "[Your Company Description]",
        ),
        ("{yourCompany.website}", website(your), "[Your Company Website]"),
        ("{clientCompany.name}", client.name.as_str(), "[Client Company Name]"),
        (
            "{clientCompany.description}",
            client.description.as_str(),
            "[Client Company Description]",
        ),
        ("{clientCompany.website}", website(client), "[Client Company Website]"),
        ("{project.title}", config.project.title.as_str(), "[Project Title]"),
        (
            "{project.serviceDescription}",
            config.project.service_description.as_str(),
            "[Service Description]",
        ),
    ]
}

fn website(company: &CompanyInfo) -> &str {
    company.website.as_deref().unwrap_or_default()
}

fn budget_line(project: &ProjectInfo) -> Option<String> {
    project
        .annual_budget
        .as_deref()
        .filter(|b| !b.trim().is_empty())
        .map(|b| format!("Annual Project Budget: {}", b))
}

fn geo_line(project: &ProjectInfo) -> Option<String> {
    project
        .target_geo
        .as_deref()
        .filter(|g| !g.trim().is_empty())
        .map(|g| format!("Target Geographic Area: {}", g))
}

fn or_marker<'a>(value: &'a str, marker: &'a str) -> &'a str {
    if value.trim().is_empty() {
        marker
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::DEFAULT_FALLBACK_PROMPT;

    fn config() -> ProposalConfig {
        let mut config = ProposalConfig::new("Intelegencia", "Acme", "Walmart Growth");
        config.your_company.description = "Digital services firm".into();
        config.client_company.website = Some("https://acme.example".into());
        config.project.service_description = "Marketplace management".into();
        config.project.annual_budget = Some("$120,000".into());
        config
    }

    #[test]
    fn test_populate_basic_fields() {
        let prompt = populate_prompt_template(
            "Write {sectionTitle} for {clientCompany.name} ({clientCompany.website}) by {yourCompany.name}.",
            &config(),
            "Scope",
        );
        assert_eq!(
            prompt,
            "Write Scope for Acme (https://acme.example) by Intelegencia."
        );
    }

    #[test]
    fn test_missing_values_get_markers() {
        let prompt = populate_prompt_template(
            "{yourCompany.website} / {clientCompany.description} / {sectionTitle}",
            &config(),
            "",
        );
        assert_eq!(
            prompt,
            "[Your Company Website] / [Client Company Description] / [Section Title]"
        );
    }

    #[test]
    fn test_conditional_expressions() {
        let template = format!("{}\n{}", BUDGET_EXPRESSION, GEO_EXPRESSION);
        let prompt = populate_prompt_template(&template, &config(), "Scope");
        assert_eq!(prompt, "Annual Project Budget: $120,000\n");
    }

    #[test]
    fn test_default_prompt_fully_populated() {
        let prompt = populate_prompt_template(DEFAULT_FALLBACK_PROMPT, &config(), "Deliverables");
        assert!(!prompt.contains('{'));
        assert!(prompt.contains("Write a professional Deliverables section"));
        assert!(prompt.contains("Client Company: Acme"));
        assert!(prompt.contains("Annual Project Budget: $120,000"));
    }

    #[test]
    fn test_extract_inverts_populate() {
        let template = "Write {sectionTitle} for {clientCompany.name} by {yourCompany.name}.\n";
        let template = format!("{}{}", template, BUDGET_EXPRESSION);
        let populated = populate_prompt_template(&template, &config(), "Scope");

        assert_eq!(
            extract_template_from_populated(&populated, &config(), "Scope"),
            template
        );
    }

    #[test]
    fn test_extract_skips_blank_values() {
        let mut config = config();
        config.client_company.name.clear();
        let text = "Nothing to replace here.";
        assert_eq!(extract_template_from_populated(text, &config, ""), text);
    }
}
