//! Proposal sections as maintained by the surrounding application.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generation status of a section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    /// Nothing generated yet
    #[default]
    Idle,
    /// Generation in progress
    Generating,
    /// Generated successfully
    Success,
    /// Generated, then edited by hand
    Modified,
    /// Generation failed
    Error,
}

impl SectionStatus {
    /// Returns true if sections with this status belong in an export.
    pub fn is_exportable(self) -> bool {
        matches!(self, SectionStatus::Success | SectionStatus::Modified)
    }
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SectionStatus::Idle => "idle",
            SectionStatus::Generating => "generating",
            SectionStatus::Success => "success",
            SectionStatus::Modified => "modified",
            SectionStatus::Error => "error",
        };
        f.write_str(name)
    }
}

/// One section of a proposal with its raw (generated or edited) content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Stable identifier
    pub id: String,
    /// Section title, used for headings and the table of contents
    pub title: String,
    /// Raw section text in the Markdown-like dialect
    #[serde(default)]
    pub content: String,
    /// Generation status
    #[serde(default)]
    pub status: SectionStatus,
    /// Message from the last failed generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl Section {
    /// Creates an idle section with no content.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Sets the content and status.
    pub fn with_content(mut self, content: impl Into<String>, status: SectionStatus) -> Self {
        self.content = content.into();
        self.status = status;
        self
    }

    /// Returns true if this section belongs in an export.
    pub fn is_exportable(&self) -> bool {
        self.status.is_exportable()
    }
}
