//! Block-level content and styled text runs.

use super::Table;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Highest heading level a `Block::Header` may carry.
pub const MAX_HEADER_LEVEL: u8 = 6;

/// A text run with uniform formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledRun {
    /// The text content
    pub text: String,
    /// Whether the run is bold
    pub bold: bool,
}

impl StyledRun {
    /// Creates a plain (non-bold) run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    /// Creates a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }

    /// Returns true if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Concatenates the text of a run sequence, dropping the styling.
pub fn runs_plain_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// One entry of a bulleted list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Inline content of the item
    pub runs: Vec<StyledRun>,
    /// Nesting depth, one level per two leading spaces in the source
    pub indent_level: usize,
}

impl ListItem {
    /// Creates a list item from runs and an indent level.
    pub fn new(runs: Vec<StyledRun>, indent_level: usize) -> Self {
        Self { runs, indent_level }
    }

    /// Returns the item text without styling.
    pub fn plain_text(&self) -> String {
        runs_plain_text(&self.runs)
    }
}

/// A block-level content element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A heading inside section body text
    Header { text: String, level: u8 },
    /// A paragraph
    Paragraph { runs: Vec<StyledRun> },
    /// A bulleted list
    List { items: Vec<ListItem> },
    /// A table
    Table(Table),
    /// A signature field, rendered with extra vertical spacing
    SignatureLine { runs: Vec<StyledRun> },
}

impl Block {
    /// Creates a paragraph holding a single plain run.
    pub fn text(text: impl Into<String>) -> Self {
        Block::Paragraph {
            runs: vec![StyledRun::plain(text)],
        }
    }

    /// Short name of the block kind, used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Header { .. } => "header",
            Block::Paragraph { .. } => "paragraph",
            Block::List { .. } => "list",
            Block::Table(_) => "table",
            Block::SignatureLine { .. } => "signature_line",
        }
    }

    /// Returns the plain text content of this block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Header { text, .. } => text.clone(),
            Block::Paragraph { runs } | Block::SignatureLine { runs } => runs_plain_text(runs),
            Block::List { items } => items
                .iter()
                .map(|item| item.plain_text())
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Table(table) => table
                .rows
                .iter()
                .map(|row| row.join("\t"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Checks the block against the model invariants.
    ///
    /// Blocks produced by the parser always pass. Renderers call this before
    /// emitting anything so a hand-built or corrupted block fails its section
    /// instead of producing broken output.
    pub fn validate(&self) -> Result<()> {
        match self {
            Block::Header { level, .. } => {
                if *level == 0 || *level > MAX_HEADER_LEVEL {
                    return Err(Error::MalformedBlock(format!(
                        "header level {} outside 1..={}",
                        level, MAX_HEADER_LEVEL
                    )));
                }
            }
            Block::List { items } => {
                if items.is_empty() {
                    return Err(Error::MalformedBlock("list without items".into()));
                }
            }
            Block::Table(table) => table.validate()?,
            Block::Paragraph { .. } | Block::SignatureLine { .. } => {}
        }
        Ok(())
    }
}
