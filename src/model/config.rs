//! Proposal configuration and project files.

use super::Section;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Details about one of the two companies in a proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyInfo {
    /// Company name
    pub name: String,
    /// Website (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Logo URL (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Free-form company description
    #[serde(default)]
    pub description: String,
    /// Postal address, shown on the title page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Contact email, shown on the title page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone, shown on the title page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CompanyInfo {
    /// Creates company info with a name and description.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }
}

/// Details about the project being proposed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInfo {
    /// Project title
    pub title: String,
    /// What the engagement delivers
    #[serde(default)]
    pub service_description: String,
    /// Annual budget (optional, free text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annual_budget: Option<String>,
    /// Target geographic area (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_geo: Option<String>,
}

/// Configuration of a Statement of Work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalConfig {
    /// The company preparing the document
    pub your_company: CompanyInfo,
    /// The client the document is prepared for
    pub client_company: CompanyInfo,
    /// Project details
    pub project: ProjectInfo,
    /// Ordered section titles
    #[serde(default)]
    pub sections: Vec<String>,
}

impl ProposalConfig {
    /// Creates a configuration from the two company names and a project title.
    pub fn new(
        your_company: impl Into<String>,
        client_company: impl Into<String>,
        project_title: impl Into<String>,
    ) -> Self {
        Self {
            your_company: CompanyInfo {
                name: your_company.into(),
                ..Default::default()
            },
            client_company: CompanyInfo {
                name: client_company.into(),
                ..Default::default()
            },
            project: ProjectInfo {
                title: project_title.into(),
                ..Default::default()
            },
            sections: Vec::new(),
        }
    }
}

/// A saved project: configuration plus the current section contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Proposal configuration
    pub config: ProposalConfig,
    /// Sections in document order
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Project {
    /// Parses a project from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a project from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes the project as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the project to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
