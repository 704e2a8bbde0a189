//! Markdown renderer implementation.

use super::{or_fallback, walk_document, DocumentVisitor, RenderOptions, SECTION_ERROR_TEXT};
use crate::error::Result;
use crate::model::{Document, DocumentSection, ListItem, StyledRun, Table, TitleInfo, TocEntry};
use regex::Regex;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Heading level of section titles; body headers are placed below it.
const SECTION_TIER: u8 = 2;

static RE_SLUG_STRIP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").unwrap());
static RE_SLUG_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static RE_SLUG_DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").unwrap());

/// Line openings that Markdown would read as block syntax: headings, quotes,
/// table rows, bullets, ordered items, thematic breaks and setext underlines.
static RE_BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:#|>|\||[-+*=](?:\s|$)|-{2,}\s*$|={2,}\s*$|\*{3,}\s*$|\d{1,9}[.)](?:\s|$))")
        .unwrap()
});

/// Markdown renderer.
#[derive(Debug)]
pub struct MarkdownRenderer {
    options: RenderOptions,
    output: String,
    /// Anchor per section index, filled from the table of contents
    anchors: HashMap<usize, String>,
}

impl MarkdownRenderer {
    /// Creates a new renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            output: String::new(),
            anchors: HashMap::new(),
        }
    }

    /// Renders a document to a Markdown string.
    pub fn render(self, document: &Document) -> Result<String> {
        walk_document(document, self)
    }

    fn anchor_for(&self, section: &DocumentSection) -> String {
        self.anchors
            .get(&section.index)
            .cloned()
            .unwrap_or_else(|| fallback_slug(&section.title, section.index))
    }

    fn render_section_heading(&mut self, section: &DocumentSection) {
        let anchor = self.anchor_for(section);
        self.output.push_str("## ");
        self.output.push_str(&section.heading());
        if self.options.heading_anchors {
            self.output.push_str(&format!(" {{#{}}}", anchor));
        }
        self.output.push_str("\n\n");
    }

    /// Renders inline runs.
    fn render_runs(&self, runs: &[StyledRun], output: &mut String) {
        for run in runs {
            self.render_run(run, output);
        }
    }

    /// Renders a single run with formatting.
    fn render_run(&self, run: &StyledRun, output: &mut String) {
        if is_underscore_field(&run.text) {
            // A bare underscore line would read as a thematic break.
            output.push_str(&run.text.replace('_', "\\_"));
            return;
        }

        let text = if self.options.preserve_line_breaks {
            run.text.replace('\n', "  \n")
        } else {
            run.text.replace('\n', " ")
        };

        if !run.bold || text.trim().is_empty() {
            output.push_str(&text);
            return;
        }

        // Emphasis markers must hug the text.
        let trimmed_start = text.trim_start();
        let leading = &text[..text.len() - trimmed_start.len()];
        let inner = trimmed_start.trim_end();
        let trailing = &trimmed_start[inner.len()..];

        output.push_str(leading);
        output.push_str("**");
        output.push_str(inner);
        output.push_str("**");
        output.push_str(trailing);
    }

    /// Renders a table as Markdown.
    fn render_table_markdown(&self, table: &Table, output: &mut String) {
        let col_count = table.column_count();

        for (row_idx, row) in table.rows.iter().enumerate() {
            output.push('|');
            for cell in row {
                let text = cell.replace('\n', " ").replace('|', "\\|");
                output.push_str(&format!(" {} |", text.trim()));
            }
            output.push('\n');

            // Add separator after header row
            if row_idx == 0 {
                output.push('|');
                for _ in 0..col_count {
                    output.push_str(" --- |");
                }
                output.push('\n');
            }
        }

        output.push('\n');
    }
}

impl DocumentVisitor for MarkdownRenderer {
    type Output = String;

    fn visit_title(&mut self, title: &TitleInfo) -> Result<()> {
        let out = &mut self.output;
        out.push_str("# STATEMENT OF WORK\n\n");
        out.push_str(&format!(
            "## {}\n\n",
            or_fallback(&title.project_title, "Project Title")
        ));

        out.push_str("**Prepared for:**\n\n");
        out.push_str(&escape_block_starts(or_fallback(&title.client_name, "Client Company")));
        out.push_str("\n\n");
        if let Some(address) = title.client_address.as_deref().filter(|a| !a.trim().is_empty()) {
            out.push_str(&escape_block_starts(address));
            out.push_str("\n\n");
        }

        out.push_str("**Prepared by:**\n\n");
        out.push_str(&escape_block_starts(or_fallback(&title.preparer_name, "Your Company")));
        out.push_str("\n\n");
        let contact = [
            title.preparer_address.as_deref().map(str::to_string),
            title.preparer_email.as_deref().map(|e| format!("Email: {}", e)),
            title.preparer_phone.as_deref().map(|p| format!("Phone: {}", p)),
        ];
        for line in contact.into_iter().flatten() {
            if !line.trim().is_empty() {
                out.push_str(&escape_block_starts(&line));
                out.push_str("\n\n");
            }
        }

        out.push_str(&format!("**Date:** {}\n\n---\n\n", title.date));
        Ok(())
    }

    fn visit_toc(&mut self, toc: &[TocEntry]) -> Result<()> {
        let mut issued: HashSet<String> = HashSet::new();
        for entry in toc {
            let base = fallback_slug(&entry.title, entry.index);
            let mut anchor = base.clone();
            let mut suffix = 0;
            while issued.contains(&anchor) {
                suffix += 1;
                anchor = format!("{}-{}", base, suffix);
            }
            issued.insert(anchor.clone());
            self.anchors.insert(entry.index, anchor);
        }

        if !self.options.include_toc || toc.is_empty() {
            return Ok(());
        }

        self.output.push_str("## Table of Contents\n\n");
        for entry in toc {
            if self.options.heading_anchors {
                let anchor = self.anchors.get(&entry.index).cloned().unwrap_or_default();
                self.output
                    .push_str(&format!("{}. [{}](#{})\n", entry.index, entry.title, anchor));
            } else {
                self.output.push_str(&format!("{}\n", entry.label()));
            }
        }
        self.output.push_str("\n---\n\n");
        Ok(())
    }

    fn begin_section(&mut self, section: &DocumentSection, _first: bool) -> Result<()> {
        self.render_section_heading(section);
        Ok(())
    }

    fn visit_header(&mut self, text: &str, level: u8) -> Result<()> {
        let level = self.options.body_heading_level(level, SECTION_TIER);
        self.output.push_str(&"#".repeat(level as usize));
        self.output.push(' ');
        self.output.push_str(text.trim());
        self.output.push_str("\n\n");
        Ok(())
    }

    fn visit_paragraph(&mut self, runs: &[StyledRun]) -> Result<()> {
        let mut text = String::new();
        self.render_runs(runs, &mut text);
        let text = text.trim();
        if !text.is_empty() {
            self.output.push_str(&escape_block_starts(text));
            self.output.push_str("\n\n");
        }
        Ok(())
    }

    fn visit_list(&mut self, items: &[ListItem]) -> Result<()> {
        for item in items {
            let mut text = String::new();
            self.render_runs(&item.runs, &mut text);
            self.output.push_str(&"  ".repeat(item.indent_level));
            self.output.push(self.options.list_marker);
            self.output.push(' ');
            self.output.push_str(&escape_block_starts(text.trim()));
            self.output.push('\n');
        }
        self.output.push('\n');
        Ok(())
    }

    fn visit_table(&mut self, table: &Table) -> Result<()> {
        let mut text = String::new();
        self.render_table_markdown(table, &mut text);
        self.output.push_str(&text);
        Ok(())
    }

    fn visit_signature(&mut self, runs: &[StyledRun]) -> Result<()> {
        let mut text = String::new();
        self.render_runs(runs, &mut text);
        self.output.push_str("&nbsp;\n\n");
        self.output.push_str(&escape_block_starts(text.trim()));
        self.output.push_str("\n\n&nbsp;\n\n");
        Ok(())
    }

    fn end_section(&mut self, _section: &DocumentSection) -> Result<()> {
        self.output.push_str("---\n\n");
        Ok(())
    }

    fn visit_section_error(&mut self, section: &DocumentSection, _first: bool) -> Result<()> {
        self.render_section_heading(section);
        self.output.push_str(SECTION_ERROR_TEXT);
        self.output.push_str("\n\n---\n\n");
        Ok(())
    }

    fn checkpoint(&self) -> usize {
        self.output.len()
    }

    fn rollback(&mut self, checkpoint: usize) {
        self.output.truncate(checkpoint);
    }

    fn finish(self) -> Result<String> {
        let mut output = self.output.trim_end().to_string();
        output.push('\n');
        Ok(output)
    }
}

/// Converts a heading into a Markdown anchor.
///
/// Lowercases, drops everything but letters, digits, spaces and dashes,
/// turns whitespace into dashes and collapses dash runs.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let stripped = RE_SLUG_STRIP.replace_all(&lower, "");
    let dashed = RE_SLUG_SPACES.replace_all(stripped.trim(), "-");
    RE_SLUG_DASHES
        .replace_all(&dashed, "-")
        .trim_matches('-')
        .to_string()
}

fn fallback_slug(title: &str, index: usize) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        format!("section-{}", index)
    } else {
        slug
    }
}

/// Backslash-escapes block syntax at the start of every line so that
/// rendered text stays inside its paragraph or list item.
fn escape_block_starts(text: &str) -> String {
    text.split('\n')
        .map(escape_line_start)
        .collect::<Vec<_>>()
        .join("\n")
}

fn escape_line_start(line: &str) -> Cow<'_, str> {
    let body = line.trim_start();
    if !RE_BLOCK_START.is_match(body) {
        return Cow::Borrowed(line);
    }

    let indent = &line[..line.len() - body.len()];
    // Ordered items are escaped at the delimiter: `1\.`
    let at = if body.starts_with(|c: char| c.is_ascii_digit()) {
        body.find(['.', ')']).unwrap_or(0)
    } else {
        0
    };
    Cow::Owned(format!("{}{}\\{}", indent, &body[..at], &body[at..]))
}

fn is_underscore_field(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    fn doc_with(blocks: Vec<Block>) -> Document {
        Document {
            title: TitleInfo {
                client_name: "Acme".into(),
                project_title: "Growth Plan".into(),
                preparer_name: "Intelegencia".into(),
                date: "March 4, 2025".into(),
                ..Default::default()
            },
            toc: vec![TocEntry {
                index: 1,
                title: "Scope of Work".into(),
            }],
            sections: vec![DocumentSection {
                index: 1,
                title: "Scope of Work".into(),
                blocks,
            }],
        }
    }

    fn render(doc: &Document) -> String {
        MarkdownRenderer::new(RenderOptions::default()).render(doc).unwrap()
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Scope of Work"), "scope-of-work");
        assert_eq!(slugify("Pricing & Payment Terms"), "pricing-payment-terms");
        assert_eq!(slugify("  --Odd -- Title--  "), "odd-title");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_title_page() {
        let md = render(&doc_with(vec![Block::text("Body")]));
        assert!(md.starts_with("# STATEMENT OF WORK\n\n## Growth Plan\n\n"));
        assert!(md.contains("**Prepared for:**\n\nAcme\n\n"));
        assert!(md.contains("**Prepared by:**\n\nIntelegencia\n\n"));
        assert!(md.contains("**Date:** March 4, 2025"));
    }

    #[test]
    fn test_title_fallbacks() {
        let mut doc = doc_with(vec![]);
        doc.title.client_name.clear();
        doc.title.project_title.clear();
        let md = render(&doc);
        assert!(md.contains("## Project Title\n"));
        assert!(md.contains("Client Company"));
    }

    #[test]
    fn test_toc_and_anchors() {
        let md = render(&doc_with(vec![Block::text("Body")]));
        assert!(md.contains("## Table of Contents\n\n1. [Scope of Work](#scope-of-work)\n"));
        assert!(md.contains("## 1. Scope of Work {#scope-of-work}\n\nBody\n\n---\n"));
    }

    #[test]
    fn test_duplicate_titles_get_distinct_anchors() {
        let mut doc = doc_with(vec![Block::text("One")]);
        doc.toc.push(TocEntry {
            index: 2,
            title: "Scope of Work".into(),
        });
        doc.sections.push(DocumentSection {
            index: 2,
            title: "Scope of Work".into(),
            blocks: vec![Block::text("Two")],
        });

        let md = render(&doc);
        assert!(md.contains("(#scope-of-work-1)"));
        assert!(md.contains("## 2. Scope of Work {#scope-of-work-1}"));
    }

    #[test]
    fn test_suffixed_anchor_does_not_collide_with_title() {
        let titles = ["Scope", "Scope", "Scope 1"];
        let doc = Document {
            title: TitleInfo::default(),
            toc: titles
                .iter()
                .enumerate()
                .map(|(i, t)| TocEntry {
                    index: i + 1,
                    title: t.to_string(),
                })
                .collect(),
            sections: titles
                .iter()
                .enumerate()
                .map(|(i, t)| DocumentSection {
                    index: i + 1,
                    title: t.to_string(),
                    blocks: vec![Block::text("Body")],
                })
                .collect(),
        };

        let md = render(&doc);
        assert!(md.contains("## 1. Scope {#scope}\n"));
        assert!(md.contains("## 2. Scope {#scope-1}\n"));
        assert!(md.contains("## 3. Scope 1 {#scope-1-1}\n"));
        assert_eq!(md.matches("{#scope-1}").count(), 1);
    }

    #[test]
    fn test_without_toc_or_anchors() {
        let options = RenderOptions::default().without_toc().without_anchors();
        let md = MarkdownRenderer::new(options)
            .render(&doc_with(vec![Block::text("Body")]))
            .unwrap();
        assert!(!md.contains("Table of Contents"));
        assert!(md.contains("## 1. Scope of Work\n"));
        assert!(!md.contains("{#"));
    }

    #[test]
    fn test_body_header_below_section_title() {
        let md = render(&doc_with(vec![
            Block::Header {
                text: "Phase One".into(),
                level: 1,
            },
            Block::Header {
                text: "Deep".into(),
                level: 6,
            },
        ]));
        assert!(md.contains("\n### Phase One\n"));
        assert!(md.contains("\n###### Deep\n"));
    }

    #[test]
    fn test_bold_runs() {
        let md = render(&doc_with(vec![Block::Paragraph {
            runs: vec![
                StyledRun::bold("Budget: "),
                StyledRun::plain("$10,000"),
            ],
        }]));
        assert!(md.contains("**Budget:** $10,000"));
    }

    #[test]
    fn test_nested_list() {
        let md = render(&doc_with(vec![Block::List {
            items: vec![
                ListItem::new(vec![StyledRun::plain("Parent:")], 0),
                ListItem::new(vec![StyledRun::plain("Child")], 1),
            ],
        }]));
        assert!(md.contains("- Parent:\n  - Child\n"));
    }

    #[test]
    fn test_table() {
        let md = render(&doc_with(vec![Block::Table(Table::from_rows(vec![
            vec!["Item".into(), "Cost".into()],
            vec!["SEO".into(), "$500".into()],
        ]))]));
        assert!(md.contains("| Item | Cost |\n| --- | --- |\n| SEO | $500 |\n"));
    }

    #[test]
    fn test_signature_field_escaped() {
        let md = render(&doc_with(vec![Block::SignatureLine {
            runs: vec![StyledRun::plain("By: "), StyledRun::plain("_".repeat(30))],
        }]));
        assert!(md.contains(&format!("By: {}", "\\_".repeat(30))));
    }

    #[test]
    fn test_line_breaks() {
        let block = Block::text("Line one\nLine two");
        assert!(render(&doc_with(vec![block.clone()])).contains("Line one  \nLine two"));

        let md = MarkdownRenderer::new(RenderOptions::default().without_line_breaks())
            .render(&doc_with(vec![block]))
            .unwrap();
        assert!(md.contains("Line one Line two"));
    }

    #[test]
    fn test_block_syntax_in_text_is_escaped() {
        let md = render(&doc_with(vec![
            Block::text("# #hashtag"),
            Block::text("Total\n---"),
            Block::text("2025. A good year"),
            Block::List {
                items: vec![ListItem::new(vec![StyledRun::plain("> not a quote")], 0)],
            },
            Block::SignatureLine {
                runs: vec![StyledRun::plain("| By: Jane")],
            },
        ]));

        assert!(md.contains("\n\\# #hashtag\n"));
        assert!(md.contains("Total  \n\\---\n"));
        assert!(md.contains("\n2025\\. A good year\n"));
        assert!(md.contains("- \\> not a quote\n"));
        assert!(md.contains("\\| By: Jane"));

        let headings = pulldown_cmark::Parser::new(&md)
            .filter(|e| matches!(e, pulldown_cmark::Event::Start(pulldown_cmark::Tag::Heading { .. })))
            .count();
        // STATEMENT OF WORK, project title, TOC, and the one section
        assert_eq!(headings, 4);
    }

    #[test]
    fn test_bold_line_start_not_escaped() {
        let md = render(&doc_with(vec![Block::Paragraph {
            runs: vec![StyledRun::bold("Note"), StyledRun::plain(" text")],
        }]));
        assert!(md.contains("\n**Note** text\n"));
    }

    #[test]
    fn test_malformed_section_replaced() {
        let md = render(&doc_with(vec![
            Block::text("partial"),
            Block::List { items: vec![] },
        ]));
        assert!(md.contains("## 1. Scope of Work {#scope-of-work}\n\nError generating content for this section."));
        assert!(!md.contains("partial"));
    }
}
