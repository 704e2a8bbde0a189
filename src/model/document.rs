//! Assembled document structure and title metadata.

use super::Block;
use serde::{Deserialize, Serialize};

/// A complete Statement of Work ready for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Title page metadata
    pub title: TitleInfo,
    /// Table of contents, one entry per section in the same order
    pub toc: Vec<TocEntry>,
    /// Document sections
    pub sections: Vec<DocumentSection>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of blocks across all sections.
    pub fn block_count(&self) -> usize {
        self.sections.iter().map(|s| s.blocks.len()).sum()
    }

    /// Returns an iterator over all blocks in the document.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.sections.iter().flat_map(|s| s.blocks.iter())
    }

    /// Returns the plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        let mut result = Vec::new();
        for section in &self.sections {
            result.push(section.heading());
            for block in &section.blocks {
                result.push(block.plain_text());
            }
        }
        result.join("\n")
    }

    /// Returns the document tree as pretty-printed JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Title page metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleInfo {
    /// Client company name
    pub client_name: String,
    /// Project title
    pub project_title: String,
    /// Name of the company preparing the document
    pub preparer_name: String,
    /// Date shown on the title page
    pub date: String,
    /// Client postal address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,
    /// Preparer postal address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparer_address: Option<String>,
    /// Preparer contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparer_email: Option<String>,
    /// Preparer contact phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparer_phone: Option<String>,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// 1-based section number
    pub index: usize,
    /// Section title
    pub title: String,
}

impl TocEntry {
    /// Returns the entry as shown in the table of contents ("1. Scope").
    pub fn label(&self) -> String {
        format!("{}. {}", self.index, self.title)
    }
}

/// A section of the assembled document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSection {
    /// 1-based section number, sequential over included sections
    pub index: usize,
    /// Section title
    pub title: String,
    /// Content blocks in source order
    pub blocks: Vec<Block>,
}

impl DocumentSection {
    /// Creates an empty section.
    pub fn new(index: usize, title: impl Into<String>) -> Self {
        Self {
            index,
            title: title.into(),
            blocks: Vec::new(),
        }
    }

    /// Returns the numbered section heading ("2. Scope").
    pub fn heading(&self) -> String {
        format!("{}. {}", self.index, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_model_empty() {
        let doc = Document::new();
        assert!(doc.sections.is_empty());
        assert!(doc.toc.is_empty());
        assert_eq!(doc.block_count(), 0);
        assert!(doc.plain_text().is_empty());
    }

    #[test]
    fn test_section_heading_and_toc_label() {
        let section = DocumentSection::new(2, "Scope");
        assert_eq!(section.heading(), "2. Scope");

        let entry = TocEntry {
            index: 2,
            title: "Scope".into(),
        };
        assert_eq!(entry.label(), section.heading());
    }

    #[test]
    fn test_plain_text_includes_headings() {
        let mut section = DocumentSection::new(1, "Objective");
        section.blocks.push(Block::text("Drive traffic."));

        let doc = Document {
            sections: vec![section],
            ..Default::default()
        };

        assert_eq!(doc.plain_text(), "1. Objective\nDrive traffic.");
        assert_eq!(doc.blocks().count(), 1);
    }

    #[test]
    fn test_to_json() {
        let doc = Document::new();
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"sections\""));
    }
}
