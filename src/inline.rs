//! Inline formatting: bold spans and signature underline fields.

use crate::model::StyledRun;
use regex::Regex;
use std::sync::LazyLock;

/// Minimum width of a signature underline field, in characters.
///
/// Shorter blanks are padded so signature lines render at a consistent width.
pub const MIN_SIGNATURE_WIDTH: usize = 30;

/// Shortest underscore run treated as a signature field.
pub const MIN_UNDERSCORE_RUN: usize = 4;

static RE_BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());

static RE_UNDERSCORE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_{4,}").unwrap());

/// Splits inline text into styled runs.
///
/// `**...**` pairs are matched left to right without overlap; their inner
/// text becomes a bold run and the markers are dropped. An unpaired `**`
/// stays as literal text. Runs of four or more underscores become their own
/// plain run, padded to [`MIN_SIGNATURE_WIDTH`].
///
/// # Example
///
/// ```
/// use sowdoc::inline::format_inline;
/// use sowdoc::model::StyledRun;
///
/// let runs = format_inline("a **b** c");
/// assert_eq!(
///     runs,
///     vec![StyledRun::plain("a "), StyledRun::bold("b"), StyledRun::plain(" c")]
/// );
/// ```
pub fn format_inline(text: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    let mut last = 0;

    for m in RE_BOLD.find_iter(text) {
        push_segment(&mut runs, &text[last..m.start()], false);

        let marked = m.as_str();
        push_segment(&mut runs, &marked[2..marked.len() - 2], true);

        last = m.end();
    }
    push_segment(&mut runs, &text[last..], false);

    if runs.is_empty() {
        runs.push(StyledRun::plain(text));
    }

    runs
}

/// Returns true if the text holds an underscore run long enough to be a
/// signature field.
pub fn has_signature_field(text: &str) -> bool {
    RE_UNDERSCORE_RUN.is_match(text)
}

/// Appends a segment, splitting out underscore runs as separate plain runs.
fn push_segment(runs: &mut Vec<StyledRun>, segment: &str, bold: bool) {
    if segment.is_empty() {
        return;
    }

    let mut cursor = 0;
    for m in RE_UNDERSCORE_RUN.find_iter(segment) {
        if m.start() > cursor {
            runs.push(StyledRun {
                text: segment[cursor..m.start()].to_string(),
                bold,
            });
        }
        runs.push(StyledRun::plain(pad_signature_field(m.as_str())));
        cursor = m.end();
    }

    if cursor < segment.len() {
        runs.push(StyledRun {
            text: segment[cursor..].to_string(),
            bold,
        });
    }
}

fn pad_signature_field(field: &str) -> String {
    if field.len() < MIN_SIGNATURE_WIDTH {
        "_".repeat(MIN_SIGNATURE_WIDTH)
    } else {
        field.to_string()
    }
}
