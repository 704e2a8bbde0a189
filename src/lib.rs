//! # sowdoc
//!
//! Turns generated Statement of Work section text into structured DOCX and
//! Markdown documents.
//!
//! Section content arrives as loosely formatted, Markdown-like text. Each
//! exportable section is cleaned, parsed into typed blocks, assembled into a
//! document with a title page and table of contents, and rendered.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sowdoc::{assemble_and_render_docx, Project};
//!
//! fn main() -> sowdoc::Result<()> {
//!     let project = Project::load("project.json")?;
//!     let bytes = assemble_and_render_docx(&project.config, &project.sections)?;
//!     std::fs::write("proposal.docx", bytes)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! 1. [`cleanup`] - strip trailing commentary and normalize whitespace
//! 2. [`parser`] - classify lines into headers, lists, tables, paragraphs
//! 3. [`assemble`] - filter sections, number them, build the title page
//! 4. [`render`] - emit DOCX or Markdown through a shared visitor

pub mod assemble;
pub mod cleanup;
pub mod defaults;
pub mod error;
pub mod inline;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod render;
pub mod validate;

// Re-exports
pub use assemble::{assemble, assemble_with_options, AssembleOptions, CONTENT_PLACEHOLDER};
pub use cleanup::{clean, CleanupOptions};
pub use error::{Error, Result};
pub use model::{Block, Document, Project, ProposalConfig, Section, SectionStatus};
pub use parser::{parse, ParserOptions};
pub use prompt::{extract_template_from_populated, populate_prompt_template};
pub use render::{render_docx, render_markdown, RenderOptions};
pub use validate::{ensure_valid, validate_config, ValidationIssue};

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Word document
    Docx,
    /// Markdown text
    Markdown,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Docx => "docx",
            ExportFormat::Markdown => "md",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Docx => f.write_str("DOCX"),
            ExportFormat::Markdown => f.write_str("Markdown"),
        }
    }
}

/// Assembles the sections and renders a DOCX file.
///
/// # Example
///
/// ```no_run
/// use sowdoc::{assemble_and_render_docx, ProposalConfig, Section, SectionStatus};
///
/// let config = ProposalConfig::new("Intelegencia", "Acme", "Marketplace Growth");
/// let sections = vec![
///     Section::new("1", "Objective").with_content("Drive traffic.", SectionStatus::Success),
/// ];
/// let bytes = assemble_and_render_docx(&config, &sections)?;
/// # Ok::<(), sowdoc::Error>(())
/// ```
pub fn assemble_and_render_docx(config: &ProposalConfig, sections: &[Section]) -> Result<Vec<u8>> {
    SowExporter::new()
        .with_format(ExportFormat::Docx)
        .export(config, sections)
        .map(Export::into_bytes)
}

/// Assembles the sections and renders Markdown.
pub fn assemble_and_render_markdown(config: &ProposalConfig, sections: &[Section]) -> Result<String> {
    let document = assemble(config, sections);
    render::render_markdown(&document, &RenderOptions::default())
        .map_err(|e| Error::export_failed(ExportFormat::Markdown.to_string(), &e))
}

/// Returns the download file name, `{client}_{project}_SOW.{ext}`.
///
/// Markdown exports fall back to `Client` / `Project` for blank names.
/// Path separators and other characters unsafe in file names become `_`.
pub fn export_file_name(config: &ProposalConfig, format: ExportFormat) -> String {
    let client = config.client_company.name.trim();
    let project = config.project.title.trim();

    let (client, project) = match format {
        ExportFormat::Markdown => (
            if client.is_empty() { "Client" } else { client },
            if project.is_empty() { "Project" } else { project },
        ),
        ExportFormat::Docx => (client, project),
    };

    let name = format!("{}_{}_SOW.{}", client, project, format.extension());
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Builder for assembling and exporting documents.
///
/// # Example
///
/// ```no_run
/// use sowdoc::{ExportFormat, Project, SowExporter};
///
/// let project = Project::load("project.json")?;
/// let export = SowExporter::new()
///     .with_format(ExportFormat::Markdown)
///     .with_date("March 4, 2025")
///     .without_toc()
///     .export(&project.config, &project.sections)?;
/// export.write_to("./out")?;
/// # Ok::<(), sowdoc::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct SowExporter {
    assemble_options: AssembleOptions,
    render_options: RenderOptions,
    format: ExportFormat,
}

impl Default for SowExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SowExporter {
    /// Creates a new exporter producing DOCX with default settings.
    pub fn new() -> Self {
        Self {
            assemble_options: AssembleOptions::default(),
            render_options: RenderOptions::default(),
            format: ExportFormat::Docx,
        }
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a fixed title page date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.assemble_options = self.assemble_options.with_date(date);
        self
    }

    /// Sets the placeholder text for empty sections.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.assemble_options = self.assemble_options.with_placeholder(text);
        self
    }

    /// Sets the content cleaner options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.assemble_options = self.assemble_options.with_cleanup(cleanup);
        self
    }

    /// Sets the block parser options.
    pub fn with_parser_options(mut self, parser: ParserOptions) -> Self {
        self.assemble_options = self.assemble_options.with_parser_options(parser);
        self
    }

    /// Replaces the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Sets the DOCX font family.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_font(font);
        self
    }

    /// Omits the table of contents.
    pub fn without_toc(mut self) -> Self {
        self.render_options = self.render_options.without_toc();
        self
    }

    /// Assembles the document without rendering it.
    pub fn assemble(&self, config: &ProposalConfig, sections: &[Section]) -> Document {
        assemble_with_options(config, sections, &self.assemble_options)
    }

    /// Assembles and renders the document.
    ///
    /// Any failure is reported as [`Error::ExportFailed`] and no output is
    /// produced.
    pub fn export(&self, config: &ProposalConfig, sections: &[Section]) -> Result<Export> {
        let document = self.assemble(config, sections);

        let rendered = match self.format {
            ExportFormat::Docx => render::render_docx(&document, &self.render_options),
            ExportFormat::Markdown => render::render_markdown(&document, &self.render_options)
                .map(String::into_bytes),
        };
        let bytes = rendered.map_err(|e| Error::export_failed(self.format.to_string(), &e))?;

        info!(
            format = %self.format,
            sections = document.sections.len(),
            bytes = bytes.len(),
            "export complete"
        );

        Ok(Export {
            format: self.format,
            file_name: export_file_name(config, self.format),
            bytes,
            document,
        })
    }
}

/// A rendered export ready to be saved.
#[derive(Debug, Clone)]
pub struct Export {
    format: ExportFormat,
    file_name: String,
    bytes: Vec<u8>,
    document: Document,
}

impl Export {
    /// Returns the output format.
    pub fn format(&self) -> ExportFormat {
        self.format
    }

    /// Returns the suggested file name.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the rendered bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the rendered Markdown, or None for binary formats.
    pub fn as_text(&self) -> Option<&str> {
        match self.format {
            ExportFormat::Markdown => std::str::from_utf8(&self.bytes).ok(),
            ExportFormat::Docx => None,
        }
    }

    /// Returns the assembled document the export was rendered from.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Consumes self and returns the rendered bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Writes the export into `dir` under its file name, creating the
    /// directory if needed. Returns the written path.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProposalConfig {
        ProposalConfig::new("Intelegencia", "Acme", "Marketplace Growth")
    }

    fn sections() -> Vec<Section> {
        vec![
            Section::new("1", "Objective").with_content(
                "Drive **qualified** traffic.\n\n- SEO\n- Ads",
                SectionStatus::Success,
            ),
            Section::new("2", "Draft").with_content("Unfinished", SectionStatus::Idle),
        ]
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(
            export_file_name(&config(), ExportFormat::Docx),
            "Acme_Marketplace Growth_SOW.docx"
        );
        assert_eq!(
            export_file_name(&ProposalConfig::default(), ExportFormat::Markdown),
            "Client_Project_SOW.md"
        );
        assert_eq!(
            export_file_name(&ProposalConfig::default(), ExportFormat::Docx),
            "__SOW.docx"
        );
    }

    #[test]
    fn test_export_file_name_sanitized() {
        let config = ProposalConfig::new("Me", "A/B: Corp", "Q1?");
        assert_eq!(
            export_file_name(&config, ExportFormat::Markdown),
            "A_B_ Corp_Q1__SOW.md"
        );
    }

    #[test]
    fn test_assemble_and_render_markdown() {
        let md = assemble_and_render_markdown(&config(), &sections()).unwrap();
        assert!(md.contains("## 1. Objective"));
        assert!(md.contains("Drive **qualified** traffic."));
        assert!(md.contains("- SEO\n- Ads"));
        assert!(!md.contains("Draft"));
    }

    #[test]
    fn test_assemble_and_render_docx() {
        let bytes = assemble_and_render_docx(&config(), &sections()).unwrap();
        // ZIP local file header
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_exporter_markdown_text() {
        let export = SowExporter::new()
            .with_format(ExportFormat::Markdown)
            .with_date("March 4, 2025")
            .export(&config(), &sections())
            .unwrap();

        assert_eq!(export.format(), ExportFormat::Markdown);
        assert_eq!(export.file_name(), "Acme_Marketplace Growth_SOW.md");
        assert!(export.as_text().unwrap().contains("**Date:** March 4, 2025"));
        assert_eq!(export.document().sections.len(), 1);
    }

    #[test]
    fn test_export_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let export = SowExporter::new().export(&config(), &sections()).unwrap();
        assert!(export.as_text().is_none());

        let path = export.write_to(dir.path().join("out")).unwrap();
        assert!(path.ends_with("Acme_Marketplace Growth_SOW.docx"));
        assert_eq!(std::fs::read(&path).unwrap(), export.bytes());
    }

    #[test]
    fn test_export_format_display() {
        assert_eq!(ExportFormat::Docx.to_string(), "DOCX");
        assert_eq!(ExportFormat::Markdown.extension(), "md");
    }
}
