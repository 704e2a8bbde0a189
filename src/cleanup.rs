//! # Content Cleaner
//!
//! Generated section text often ends with material that does not belong in
//! the exported document: a `---` rule followed by commentary, a closing
//! "This section is designed to..." sentence, a "Note:" line, or stray dashes.
//!
//! ## Stages
//!
//! 1. **String normalization** - Unicode NFC, line endings, invisible characters
//! 2. **End-marker truncation** - drop everything from a trailing `---` rule on
//! 3. **Boilerplate stripping** - pop trailing disclaimer lines until none match
//! 4. **Final normalization** - collapse blank-line runs, trim
//!
//! Stages 2-4 are repeated until the text stops changing, so cleaning is
//! idempotent: `clean(&clean(x)) == clean(x)`.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Cleanup configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Enable Stage 1: String normalization
    pub normalize_strings: bool,
    /// Enable Stage 2: End-marker truncation
    pub truncate_end_marker: bool,
    /// Enable Stage 3: Boilerplate stripping
    pub strip_boilerplate: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            normalize_strings: true,
            truncate_end_marker: true,
            strip_boilerplate: true,
        }
    }
}

impl CleanupOptions {
    /// Creates options for minimal cleanup (normalization and whitespace only).
    ///
    /// Useful for hand-written content where a trailing `---` is intentional.
    pub fn minimal() -> Self {
        Self {
            normalize_strings: true,
            truncate_end_marker: false,
            strip_boilerplate: false,
        }
    }
}

/// Cleans raw section text with default options.
///
/// Never fails; the result may be empty.
pub fn clean(raw: &str) -> String {
    clean_with_options(raw, &CleanupOptions::default())
}

/// Cleans raw section text with the given options.
pub fn clean_with_options(raw: &str, options: &CleanupOptions) -> String {
    let mut current = if options.normalize_strings {
        stage1_normalize_string(raw)
    } else {
        raw.to_string()
    };

    // Each pass either leaves the text unchanged or makes it shorter.
    loop {
        let next = clean_pass(&current, options);
        if next == current {
            return next;
        }
        current = next;
    }
}

fn clean_pass(input: &str, options: &CleanupOptions) -> String {
    let mut text = input.to_string();

    if options.truncate_end_marker {
        text = stage2_truncate_end_marker(&text);
    }
    if options.strip_boilerplate {
        text = stage3_strip_boilerplate(&text);
    }

    stage4_final_normalize(&text)
}

// ============================================================================
// Stage 1: String Normalization
// ============================================================================

/// Stage 1: Normalize raw string
///
/// - CRLF / CR line endings to LF
/// - Invisible and control character removal
/// - Non-breaking spaces to plain spaces
/// - Unicode NFC normalization
///
/// Filtering happens before composition: a zero-width character between a
/// base letter and a combining mark would otherwise block composing them.
pub fn stage1_normalize_string(input: &str) -> String {
    input
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|&c| !is_invisible_char(c))
        .map(|c| if c == '\u{00A0}' { ' ' } else { c })
        .nfc()
        .collect()
}

/// Check if character is invisible noise that should be removed
///
/// Covers every C0 control except tab and line feed, none of which are
/// legal in XML 1.0.
pub fn is_invisible_char(c: char) -> bool {
    matches!(
        c,
        '\0'..='\x08'
        | '\x0B'..='\x1F' // Remaining C0 controls
        | '\u{FEFF}' // BOM
        | '\u{200B}' // Zero-width space
        | '\u{200C}' // Zero-width non-joiner
        | '\u{2060}' // Word joiner
        | '\u{00AD}' // Soft hyphen
    )
}

// ============================================================================
// Stage 2: End-Marker Truncation
// ============================================================================

static RE_END_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-{3,}$").unwrap());

/// Stage 2: Truncate at the last `---` rule in the second half of the lines.
///
/// Only rules in the second half count: a rule near the top is more likely
/// a legitimate divider than an end-of-content marker. The position test is
/// a heuristic and can misfire on very short sections.
pub fn stage2_truncate_end_marker(input: &str) -> String {
    let lines: Vec<&str> = input.split('\n').collect();
    let line_count = lines.len();

    for (idx, line) in lines.iter().enumerate().rev() {
        if RE_END_MARKER.is_match(line.trim()) && idx * 2 >= line_count {
            return lines[..idx].join("\n");
        }
    }

    input.to_string()
}

// ============================================================================
// Stage 3: Boilerplate Stripping
// ============================================================================

static RE_BOILERPLATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*[*_]*\s*(?:this (?:section|content) (?:is designed to|(?:has been|was|is) (?:written|designed|tailored|crafted|structured))|note:)",
    )
    .unwrap()
});

static RE_DANGLING_DASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-+$").unwrap());

/// Stage 3: Remove trailing boilerplate lines
///
/// Pops the last non-blank line while it is a disclaimer sentence, a
/// "Note:" line, or a dangling run of dashes.
pub fn stage3_strip_boilerplate(input: &str) -> String {
    let mut lines: Vec<&str> = input.split('\n').collect();

    loop {
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }

        match lines.last() {
            Some(last) if is_trailing_boilerplate(last) => {
                lines.pop();
            }
            _ => break,
        }
    }

    lines.join("\n")
}

/// Returns true if a line is a boilerplate sentence or stray dash run.
pub fn is_trailing_boilerplate(line: &str) -> bool {
    let trimmed = line.trim();
    RE_BOILERPLATE.is_match(trimmed) || RE_DANGLING_DASHES.is_match(trimmed)
}

// ============================================================================
// Stage 4: Final Normalization
// ============================================================================

static RE_BLANK_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());

/// Stage 4: Collapse 3+ consecutive newlines to 2 and trim.
pub fn stage4_final_normalize(input: &str) -> String {
    RE_BLANK_RUNS.replace_all(input, "\n\n").trim().to_string()
}
