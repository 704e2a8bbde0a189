//! DOCX and Markdown rendering for assembled documents.
//!
//! Both renderers implement [`DocumentVisitor`] and are driven by
//! [`walk_document`], which owns the traversal order and the per-section
//! failure handling. A section that fails to render is rolled back and
//! replaced by its heading and an error notice; the rest of the document
//! still renders.

mod docx;
mod markdown;
mod options;

pub use docx::DocxRenderer;
pub use markdown::{slugify, MarkdownRenderer};
pub use options::RenderOptions;

use crate::error::Result;
use crate::model::{Block, Document, DocumentSection, ListItem, StyledRun, Table, TitleInfo, TocEntry};
use tracing::{debug, warn};

/// Text shown in place of a section that failed to render.
pub const SECTION_ERROR_TEXT: &str = "Error generating content for this section.";

/// A consumer of the document tree, one implementation per output format.
///
/// Visit methods are called in document order: title, table of contents,
/// then for each section `begin_section`, one call per block, `end_section`.
/// Output produced since a [`checkpoint`](Self::checkpoint) must be
/// discardable with [`rollback`](Self::rollback).
pub trait DocumentVisitor {
    /// Final rendered artifact.
    type Output;

    fn visit_title(&mut self, title: &TitleInfo) -> Result<()>;

    fn visit_toc(&mut self, toc: &[TocEntry]) -> Result<()>;

    /// Starts a section. `first` is true for the first rendered section.
    fn begin_section(&mut self, section: &DocumentSection, first: bool) -> Result<()>;

    fn visit_header(&mut self, text: &str, level: u8) -> Result<()>;

    fn visit_paragraph(&mut self, runs: &[StyledRun]) -> Result<()>;

    fn visit_list(&mut self, items: &[ListItem]) -> Result<()>;

    fn visit_table(&mut self, table: &Table) -> Result<()>;

    fn visit_signature(&mut self, runs: &[StyledRun]) -> Result<()>;

    fn end_section(&mut self, _section: &DocumentSection) -> Result<()> {
        Ok(())
    }

    /// Emits the replacement for a section whose rendering failed.
    fn visit_section_error(&mut self, section: &DocumentSection, first: bool) -> Result<()>;

    /// Returns a marker for the current output position.
    fn checkpoint(&self) -> usize;

    /// Discards everything emitted after `checkpoint`.
    fn rollback(&mut self, checkpoint: usize);

    fn finish(self) -> Result<Self::Output>;
}

/// Drives a visitor over the document.
///
/// Errors raised while rendering a section are contained to that section.
/// Errors from the title, the table of contents, the error placeholder, or
/// `finish` abort the render.
pub fn walk_document<V: DocumentVisitor>(document: &Document, mut visitor: V) -> Result<V::Output> {
    visitor.visit_title(&document.title)?;
    visitor.visit_toc(&document.toc)?;

    for (i, section) in document.sections.iter().enumerate() {
        let first = i == 0;
        let mark = visitor.checkpoint();

        if let Err(err) = walk_section(&mut visitor, section, first) {
            warn!(
                section = %section.title,
                index = section.index,
                error = %err,
                "section failed to render"
            );
            visitor.rollback(mark);
            visitor.visit_section_error(section, first)?;
        }
    }

    debug!(sections = document.sections.len(), "document walk complete");
    visitor.finish()
}

fn walk_section<V: DocumentVisitor>(visitor: &mut V, section: &DocumentSection, first: bool) -> Result<()> {
    visitor.begin_section(section, first)?;

    for block in &section.blocks {
        block.validate()?;
        match block {
            Block::Header { text, level } => visitor.visit_header(text, *level)?,
            Block::Paragraph { runs } => visitor.visit_paragraph(runs)?,
            Block::List { items } => visitor.visit_list(items)?,
            Block::Table(table) => visitor.visit_table(table)?,
            Block::SignatureLine { runs } => visitor.visit_signature(runs)?,
        }
    }

    visitor.end_section(section)
}

/// Renders a document to Markdown.
pub fn render_markdown(document: &Document, options: &RenderOptions) -> Result<String> {
    MarkdownRenderer::new(options.clone()).render(document)
}

/// Renders a document to DOCX bytes.
pub fn render_docx(document: &Document, options: &RenderOptions) -> Result<Vec<u8>> {
    DocxRenderer::new(options.clone()).render(document)
}

/// Returns `value`, or `fallback` when it is blank.
pub(crate) fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}
