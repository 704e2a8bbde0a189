//! Property-Based Tests
//!
//! Invariants of the cleaner, parser and Markdown renderer, checked with
//! proptest over generated section text.

use proptest::prelude::*;
use sowdoc::model::{runs_plain_text, Block, Document, DocumentSection, TitleInfo};
use sowdoc::{clean, parse, render_markdown, RenderOptions};

/// Section-like text biased toward what the cleaner acts on: rules,
/// disclaimers, blank runs, CR line endings, combining marks, zero-width
/// and control characters.
const NOISY_TEXT: &str = "(?:[a-e \\t\\n\\r]|-|---|\\n\\n\\n|Note: |This section is designed to |\\x{0301}|\\x{200B}|\\x{A0}|\\x{1B}|\\| A \\| B \\|){0,60}";

/// Generated block: `(is_header, text)`.
fn block_strategy() -> impl Strategy<Value = (bool, String)> {
    prop_oneof![
        "[A-Z][a-z]{1,8}( [a-z]{1,8}){0,4}".prop_map(|t| (false, t)),
        "[A-Z][a-z]{1,8}( [a-z]{1,8}){0,3}".prop_map(|t| (true, t)),
    ]
}

// ============================================================================
// Cleaner Properties
// ============================================================================

/// Property: cleaning is idempotent on noisy section text
#[test]
fn proptest_clean_idempotent() {
    proptest!(|(text in NOISY_TEXT)| {
        let once = clean(&text);
        prop_assert_eq!(clean(&once), once);
    });
}

/// Property: cleaning is idempotent on arbitrary printable Unicode
#[test]
fn proptest_clean_idempotent_unicode() {
    proptest!(|(text in "\\PC{0,200}")| {
        let once = clean(&text);
        prop_assert_eq!(clean(&once), once);
    });
}

/// Property: cleaned text carries no XML-illegal control characters
#[test]
fn proptest_clean_strips_controls() {
    proptest!(|(text in NOISY_TEXT)| {
        let cleaned = clean(&text);
        prop_assert!(!cleaned.chars().any(|c| c.is_control() && c != '\n' && c != '\t'));
    });
}

// ============================================================================
// Parser Properties
// ============================================================================

/// Property: N blank-line separated blocks parse to N blocks in the same order
#[test]
fn proptest_parse_preserves_block_order() {
    proptest!(|(blocks in prop::collection::vec(block_strategy(), 1..8))| {
        let text = blocks
            .iter()
            .map(|(header, t)| if *header { format!("## {}", t) } else { t.clone() })
            .collect::<Vec<_>>()
            .join("\n\n");

        let parsed = parse(&clean(&text));
        prop_assert_eq!(parsed.len(), blocks.len());

        for (block, (header, expected)) in parsed.iter().zip(&blocks) {
            match block {
                Block::Header { text, level } => {
                    prop_assert!(*header);
                    prop_assert_eq!(*level, 2);
                    prop_assert_eq!(text, expected);
                }
                Block::Paragraph { runs } => {
                    prop_assert!(!*header);
                    prop_assert_eq!(&runs_plain_text(runs), expected);
                }
                other => prop_assert!(false, "unexpected block {:?}", other),
            }
        }
    });
}

// ============================================================================
// Markdown Renderer Properties
// ============================================================================

/// Property: paragraph text never turns into headings, lists, quotes or tables
#[test]
fn proptest_markdown_paragraph_stays_inline() {
    use pulldown_cmark::{Event, Parser, Tag};

    proptest!(|(text in "[#>|*+=0-9. a-z\\-\\n]{1,24}")| {
        let document = Document {
            title: TitleInfo::default(),
            toc: vec![],
            sections: vec![DocumentSection {
                index: 1,
                title: "Scope".into(),
                blocks: vec![Block::text(text)],
            }],
        };
        let md = render_markdown(&document, &RenderOptions::default().without_toc()).unwrap();

        let mut headings = 0;
        for event in Parser::new(&md) {
            match event {
                Event::Start(Tag::Heading { .. }) => headings += 1,
                Event::Start(Tag::List(_)) | Event::Start(Tag::BlockQuote(_)) => {
                    prop_assert!(false, "block syntax leaked: {:?}", md);
                }
                _ => {}
            }
        }
        // STATEMENT OF WORK, project title, section title
        prop_assert_eq!(headings, 3);
    });
}
