//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each document leads
//! with its positional index and title; source and output paths follow as
//! indented context lines. Code blocks are listed under their document the
//! same way.
//!
//! # Output Format
//!
//! ## Render
//!
//! ```text
//! 001 Copy to clipboard (post, 2021-03-04) → dist/copy-to-clipboard/index.html
//!     Source: content/posts/2021-03-04-copy-to-clipboard.md
//!     001 js copy.js (4 lines, highlighted 2-3)
//!     002 noLineNumbers (1 line)
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 Copy to clipboard (post, 2021-03-04)
//!     Source: content/posts/2021-03-04-copy-to-clipboard.md
//!     warning: code block 1: unknown language 'klingon', rendered as plain text
//!
//! Checked 1 post, 1 page: 1 warning
//! ```
//!
//! ## Copy
//!
//! ```text
//! Copied 4 lines via system
//!     Label: copy.js: copied to clipboard
//! Reset after 5000ms
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::check::{CheckReport, CheckedDocument};
use crate::code::CodeBlockSummary;
use crate::generate::{DocumentKind, GeneratedDocument};
use std::time::Duration;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// Document header: index, title, kind and date.
///
/// ```text
/// 001 Copy to clipboard (post, 2021-03-04)
/// 002 About (page)
/// ```
fn document_header(index: usize, title: &str, kind: DocumentKind, date: Option<&str>) -> String {
    match date {
        Some(date) => format!("{} {} ({}, {})", format_index(index), title, kind, date),
        None => format!("{} {} ({})", format_index(index), title, kind),
    }
}

/// Collapse sorted line numbers into `1, 3-5` ranges.
fn compact_ranges(lines: &[usize]) -> String {
    let mut parts = Vec::new();
    let mut iter = lines.iter().copied().peekable();
    while let Some(start) = iter.next() {
        let mut end = start;
        while iter.peek() == Some(&(end + 1)) {
            end += 1;
            iter.next();
        }
        if start == end {
            parts.push(start.to_string());
        } else {
            parts.push(format!("{}-{}", start, end));
        }
    }
    parts.join(", ")
}

/// Code block line: index, language, optional title, and line facts.
///
/// ```text
/// 001 js copy.js (4 lines, highlighted 2-3)
/// 002 (plain) (1 line)
/// ```
fn code_block_line(index: usize, block: &CodeBlockSummary) -> String {
    let language = if block.language.is_empty() {
        "(plain)"
    } else {
        block.language.as_str()
    };
    let mut head = format!("{} {}", format_index(index), language);
    if !block.title.is_empty() {
        head.push(' ');
        head.push_str(&block.title);
    }
    let lines = plural(block.line_count, "line");
    if block.highlighted_lines.is_empty() {
        format!("{} ({})", head, lines)
    } else {
        format!(
            "{} ({}, highlighted {})",
            head,
            lines,
            compact_ranges(&block.highlighted_lines)
        )
    }
}

fn kind_totals<'a>(kinds: impl Iterator<Item = &'a DocumentKind>) -> String {
    let (mut posts, mut pages) = (0, 0);
    for kind in kinds {
        match kind {
            DocumentKind::Post => posts += 1,
            DocumentKind::Page => pages += 1,
        }
    }
    format!("{}, {}", plural(posts, "post"), plural(pages, "page"))
}

// ============================================================================
// Render
// ============================================================================

/// Format render output: one entry per written document.
pub fn format_render_output(docs: &[GeneratedDocument]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, doc) in docs.iter().enumerate() {
        lines.push(format!(
            "{} \u{2192} {}",
            document_header(i + 1, &doc.title, doc.kind, doc.date.as_deref()),
            doc.output.display()
        ));
        lines.push(format!("{}Source: {}", indent(1), doc.source.display()));
        for (j, block) in doc.code_blocks.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), code_block_line(j + 1, block)));
        }
    }
    let blocks: usize = docs.iter().map(|d| d.code_blocks.len()).sum();
    lines.push(String::new());
    lines.push(format!(
        "Rendered {}, {}",
        kind_totals(docs.iter().map(|d| &d.kind)),
        plural(blocks, "code block")
    ));
    lines
}

/// Print render output to stdout.
pub fn print_render_output(docs: &[GeneratedDocument]) {
    for line in format_render_output(docs) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

fn checked_document_lines(index: usize, doc: &CheckedDocument) -> Vec<String> {
    let mut lines = vec![document_header(
        index,
        &doc.title,
        doc.kind,
        doc.date.as_deref(),
    )];
    lines.push(format!("{}Source: {}", indent(1), doc.source.display()));
    for warning in &doc.warnings {
        lines.push(format!("{}warning: {}", indent(1), warning));
    }
    lines
}

/// Format check output: every document, its warnings, and a summary line.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, doc) in report.documents.iter().enumerate() {
        lines.extend(checked_document_lines(i + 1, doc));
    }
    if !lines.is_empty() {
        lines.push(String::new());
    }
    let totals = kind_totals(report.documents.iter().map(|d| &d.kind));
    let warnings = report.warning_count();
    if warnings == 0 {
        lines.push(format!("Checked {}: no problems", totals));
    } else {
        lines.push(format!("Checked {}: {}", totals, plural(warnings, "warning")));
    }
    lines
}

/// Print check output to stdout.
pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Copy
// ============================================================================

/// Format the result of a successful copy.
pub fn format_copy_output(provider: &str, line_count: usize, label: &str) -> Vec<String> {
    vec![
        format!("Copied {} via {}", plural(line_count, "line"), provider),
        format!("{}Label: {}", indent(1), label),
    ]
}

pub fn print_copy_output(provider: &str, line_count: usize, label: &str) {
    for line in format_copy_output(provider, line_count, label) {
        println!("{}", line);
    }
}

pub fn format_copy_reset(delay: Duration) -> String {
    format!("Reset after {}ms", delay.as_millis())
}

// ============================================================================
// Tests
// ============================================================================
