//! Document assembly: sections in, typed document tree out.

use crate::cleanup::{clean_with_options, CleanupOptions};
use crate::model::{
    Block, Document, DocumentSection, ProposalConfig, Section, TitleInfo, TocEntry,
};
use crate::parser::{parse_with_options, ParserOptions};
use tracing::{debug, info};

/// Paragraph used for sections whose content cleans down to nothing.
pub const CONTENT_PLACEHOLDER: &str = "Content not available.";

/// Date format for the title page ("March 4, 2025").
pub const TITLE_DATE_FORMAT: &str = "%B %-d, %Y";

/// Options for document assembly.
#[derive(Debug, Clone)]
pub struct AssembleOptions {
    /// Fixed title page date. If None, today's local date is used.
    pub date: Option<String>,

    /// Text of the placeholder paragraph for empty sections.
    pub placeholder: String,

    /// Content cleaner settings.
    pub cleanup: CleanupOptions,

    /// Block parser settings.
    pub parser: ParserOptions,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            date: None,
            placeholder: CONTENT_PLACEHOLDER.to_string(),
            cleanup: CleanupOptions::default(),
            parser: ParserOptions::default(),
        }
    }
}

impl AssembleOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a fixed title page date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Sets the placeholder text for empty sections.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Sets the content cleaner options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Sets the block parser options.
    pub fn with_parser_options(mut self, parser: ParserOptions) -> Self {
        self.parser = parser;
        self
    }

    fn resolved_date(&self) -> String {
        match &self.date {
            Some(date) => date.clone(),
            None => chrono::Local::now().format(TITLE_DATE_FORMAT).to_string(),
        }
    }
}

/// Assembles a document with default options.
pub fn assemble(config: &ProposalConfig, sections: &[Section]) -> Document {
    assemble_with_options(config, sections, &AssembleOptions::default())
}

/// Assembles a document from the configuration and the exportable sections.
///
/// Only sections with status `Success` or `Modified` are included, in input
/// order, numbered from 1. The input is never modified.
pub fn assemble_with_options(
    config: &ProposalConfig,
    sections: &[Section],
    options: &AssembleOptions,
) -> Document {
    let included: Vec<&Section> = sections.iter().filter(|s| s.is_exportable()).collect();

    info!(
        total = sections.len(),
        included = included.len(),
        "assembling document"
    );

    let toc = included
        .iter()
        .enumerate()
        .map(|(i, section)| TocEntry {
            index: i + 1,
            title: section.title.clone(),
        })
        .collect();

    let sections = included
        .iter()
        .enumerate()
        .map(|(i, section)| assemble_section(i + 1, section, options))
        .collect();

    Document {
        title: build_title(config, options),
        toc,
        sections,
    }
}

/// Runs one section through the cleaner and the parser.
pub fn assemble_section(index: usize, section: &Section, options: &AssembleOptions) -> DocumentSection {
    let cleaned = clean_with_options(&section.content, &options.cleanup);
    let mut blocks = parse_with_options(&cleaned, &options.parser);

    if blocks.is_empty() {
        debug!(section = %section.title, "no content, using placeholder");
        blocks.push(Block::text(options.placeholder.clone()));
    }

    debug!(
        section = %section.title,
        index,
        blocks = blocks.len(),
        "parsed section"
    );

    DocumentSection {
        index,
        title: section.title.clone(),
        blocks,
    }
}

fn build_title(config: &ProposalConfig, options: &AssembleOptions) -> TitleInfo {
    TitleInfo {
        client_name: config.client_company.name.clone(),
        project_title: config.project.title.clone(),
        preparer_name: config.your_company.name.clone(),
        date: options.resolved_date(),
        client_address: config.client_company.address.clone(),
        preparer_address: config.your_company.address.clone(),
        preparer_email: config.your_company.email.clone(),
        preparer_phone: config.your_company.phone.clone(),
    }
}
