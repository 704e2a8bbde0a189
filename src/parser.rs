//! Block parser for the section text dialect.
//!
//! Converts cleaned section text into an ordered sequence of [`Block`]s in a
//! single line-oriented pass. The dialect is a small subset of Markdown as
//! produced by text generators: `#` headers, indented `-`/`*`/`+`/`1.`
//! bullets, `|` tables with optional separator rows, `**bold**` spans and
//! signature blocks with underscore fields.
//!
//! Parsing never fails. Unexpected markup degrades into paragraphs.

use crate::inline::{format_inline, has_signature_field};
use crate::model::{is_separator_row, Block, ListItem, Table};
use regex::Regex;
use std::sync::LazyLock;

static RE_HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());

static RE_BULLET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)[-*+]\s+(.+)$").unwrap());

static RE_NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([ \t]*)\d+\.\s+(.+)$").unwrap());

/// Bold all-caps company marker used in signature blocks (`**ACME CORP**`).
static RE_COMPANY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*[A-Z0-9][A-Z0-9&.,'\- ]{2,}\*\*").unwrap());

/// Field labels that mark a line as part of a signature block.
const SIGNATURE_LABELS: &[&str] = &["By:", "Name:", "Title:", "Date:"];

/// Options for the block parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Treat a plain line right after a bullet ending in `:` as a nested item.
    ///
    /// Generated text often writes `- Listing improvements:` followed by
    /// unbulleted lines; with this enabled those lines become sub-items one
    /// level deeper instead of a separate paragraph.
    pub colon_continuation: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            colon_continuation: true,
        }
    }
}

impl ParserOptions {
    /// Creates new options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables the colon continuation rule.
    pub fn without_colon_continuation(mut self) -> Self {
        self.colon_continuation = false;
        self
    }
}

/// Parses cleaned section text with default options.
pub fn parse(cleaned: &str) -> Vec<Block> {
    parse_with_options(cleaned, &ParserOptions::default())
}

/// Parses cleaned section text with the given options.
pub fn parse_with_options(cleaned: &str, options: &ParserOptions) -> Vec<Block> {
    let mut parser = BlockParser::new(options);
    for line in cleaned.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Returns true if text looks like part of a signature block.
///
/// Signature blocks keep their line structure when accumulated into a
/// paragraph instead of being joined with spaces.
pub fn is_signature_content(text: &str) -> bool {
    SIGNATURE_LABELS.iter().any(|label| text.contains(label)) || RE_COMPANY_MARKER.is_match(text)
}

/// A list item before inline formatting.
#[derive(Debug)]
struct RawListItem {
    text: String,
    indent_level: usize,
    /// Added by the colon continuation rule rather than a bullet
    continuation: bool,
}

/// The single active accumulation buffer.
#[derive(Debug, Default)]
enum Accumulator {
    #[default]
    Idle,
    Paragraph(String),
    List(Vec<RawListItem>),
    Table(Vec<Vec<String>>),
}

/// Classification of a line containing `|`.
enum TableLine {
    Row(Vec<String>),
    Separator,
    Empty,
}

/// Block parser state machine.
struct BlockParser<'a> {
    options: &'a ParserOptions,
    state: Accumulator,
    blocks: Vec<Block>,
}

impl<'a> BlockParser<'a> {
    fn new(options: &'a ParserOptions) -> Self {
        Self {
            options,
            state: Accumulator::Idle,
            blocks: Vec::new(),
        }
    }

    fn feed(&mut self, line: &str) {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            self.flush();
            return;
        }

        if let Some(caps) = RE_HEADER.captures(trimmed) {
            self.flush();
            self.blocks.push(Block::Header {
                text: caps[2].trim().to_string(),
                level: caps[1].len() as u8,
            });
            return;
        }

        if let Some(caps) = RE_BULLET.captures(line).or_else(|| RE_NUMBERED.captures(line)) {
            let item = RawListItem {
                text: caps[2].trim().to_string(),
                indent_level: indent_level(&caps[1]),
                continuation: false,
            };
            self.push_list_item(item);
            return;
        }

        if trimmed.contains('|') {
            let in_table = matches!(self.state, Accumulator::Table(_));
            match classify_table_line(trimmed) {
                TableLine::Row(cells) if in_table || cells.len() >= 2 => {
                    self.push_table_row(cells);
                    return;
                }
                // Separator rows never become rows and never end a table.
                TableLine::Separator => return,
                TableLine::Empty if in_table => return,
                _ => {}
            }
        }

        if self.options.colon_continuation {
            if let Accumulator::List(items) = &mut self.state {
                if let Some(level) = continuation_level(items) {
                    items.push(RawListItem {
                        text: trimmed.to_string(),
                        indent_level: level,
                        continuation: true,
                    });
                    return;
                }
            }
        }

        self.push_paragraph_line(trimmed);
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }

    fn push_list_item(&mut self, item: RawListItem) {
        if !matches!(self.state, Accumulator::List(_)) {
            self.switch_to(Accumulator::List(Vec::new()));
        }
        if let Accumulator::List(items) = &mut self.state {
            items.push(item);
        }
    }

    fn push_table_row(&mut self, cells: Vec<String>) {
        if !matches!(self.state, Accumulator::Table(_)) {
            self.switch_to(Accumulator::Table(Vec::new()));
        }
        if let Accumulator::Table(rows) = &mut self.state {
            rows.push(cells);
        }
    }

    fn push_paragraph_line(&mut self, trimmed: &str) {
        if !matches!(self.state, Accumulator::Paragraph(_)) {
            self.switch_to(Accumulator::Paragraph(String::new()));
        }
        if let Accumulator::Paragraph(buffer) = &mut self.state {
            if buffer.is_empty() {
                buffer.push_str(trimmed);
            } else {
                let separator = if is_signature_content(trimmed) || is_signature_content(buffer) {
                    '\n'
                } else {
                    ' '
                };
                buffer.push(separator);
                buffer.push_str(trimmed);
            }
        }
    }

    /// Flushes the active accumulator and installs a new one.
    fn switch_to(&mut self, next: Accumulator) {
        self.flush();
        self.state = next;
    }

    /// Emits at most one block for the active accumulator and goes idle.
    fn flush(&mut self) {
        match std::mem::take(&mut self.state) {
            Accumulator::Idle => {}
            Accumulator::Paragraph(buffer) => {
                let text = buffer.trim();
                if text.is_empty() {
                    return;
                }
                let runs = format_inline(text);
                if has_signature_field(text) {
                    self.blocks.push(Block::SignatureLine { runs });
                } else {
                    self.blocks.push(Block::Paragraph { runs });
                }
            }
            Accumulator::List(items) => {
                if items.is_empty() {
                    return;
                }
                let items = items
                    .into_iter()
                    .map(|item| ListItem::new(format_inline(&item.text), item.indent_level))
                    .collect();
                self.blocks.push(Block::List { items });
            }
            Accumulator::Table(rows) => {
                let mut table = Table::from_rows(rows);
                table.normalize_width();
                table.rows.retain(|row| !is_separator_row(row));
                if table.rows.is_empty() {
                    return;
                }
                self.blocks.push(Block::Table(table));
            }
        }
    }
}

/// One level per two columns of leading whitespace; a tab counts as two.
fn indent_level(leading: &str) -> usize {
    let width: usize = leading
        .chars()
        .map(|c| if c == '\t' { 2 } else { 1 })
        .sum();
    width / 2
}

/// Splits a `|` line into trimmed cells, dropping empty edge cells.
fn classify_table_line(trimmed: &str) -> TableLine {
    let mut cells: Vec<String> = trimmed.split('|').map(|c| c.trim().to_string()).collect();

    while cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }

    if cells.is_empty() {
        TableLine::Empty
    } else if is_separator_row(&cells) {
        TableLine::Separator
    } else {
        TableLine::Row(cells)
    }
}

/// Level for a continuation line, if the list accepts one.
fn continuation_level(items: &[RawListItem]) -> Option<usize> {
    let last = items.last()?;
    if last.continuation {
        Some(last.indent_level)
    } else if last.text.ends_with(':') {
        Some(last.indent_level + 1)
    } else {
        None
    }
}
