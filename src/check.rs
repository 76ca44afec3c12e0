//! Content validation.
//!
//! Walks the posts and pages directories, renders every markdown file in
//! memory and reports code blocks that will not display as written:
//!
//! - a language syntect does not know (renders as plain text)
//! - a highlight token that selects no line of the block
//! - a highlight entry whose start is not a number
//!
//! Two documents sharing a slug are also reported, since the second would
//! overwrite the first on render.

use crate::components::{Components, render_markdown};
use crate::config::SiteConfig;
use crate::generate::{Document, DocumentKind, GenerateError, markdown_files};
use crate::highlight::LineHighlighter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("{0} warning(s) found")]
    Warnings(usize),
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckedDocument {
    pub kind: DocumentKind,
    pub source: PathBuf,
    pub title: String,
    pub slug: String,
    pub date: Option<String>,
    pub code_blocks: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub documents: Vec<CheckedDocument>,
}

impl CheckReport {
    pub fn warning_count(&self) -> usize {
        self.documents.iter().map(|d| d.warnings.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.warning_count() == 0
    }

    /// `Err(CheckError::Warnings)` unless the report is clean.
    pub fn ensure_clean(&self) -> Result<(), CheckError> {
        match self.warning_count() {
            0 => Ok(()),
            n => Err(CheckError::Warnings(n)),
        }
    }
}

/// Check every post and page under `root` using the configured paths.
pub fn check_site(
    root: &Path,
    config: &SiteConfig,
    components: &Components,
) -> Result<CheckReport, CheckError> {
    let mut report = CheckReport::default();
    let sources = [
        (DocumentKind::Post, root.join(&config.paths.posts)),
        (DocumentKind::Page, root.join(&config.paths.pages)),
    ];
    for (kind, dir) in sources {
        for path in markdown_files(&dir)? {
            report.documents.push(check_document(&path, kind, components)?);
        }
    }
    flag_duplicate_slugs(&mut report);
    Ok(report)
}

/// Render one file in memory and collect its warnings.
pub fn check_document(
    path: &Path,
    kind: DocumentKind,
    components: &Components,
) -> Result<CheckedDocument, CheckError> {
    let doc = Document::load(path, kind)?;
    let rendered = render_markdown(&doc.body, components);
    let mut warnings = Vec::new();

    for (i, block) in rendered.code_blocks.iter().enumerate() {
        let position = i + 1;
        if !components.code_renderer().knows_language(&block.language) {
            warnings.push(format!(
                "code block {position}: unknown language '{}', rendered as plain text",
                block.language
            ));
        }
        let highlighter = LineHighlighter::compile(&block.metastring);
        if highlighter.ranges().iter().any(|r| r.start.is_none()) {
            warnings.push(format!(
                "code block {position}: highlight entry without a start line in '{}'",
                block.metastring
            ));
        } else if !highlighter.is_empty() && block.highlighted_lines.is_empty() {
            warnings.push(format!(
                "code block {position}: highlight '{}' selects none of its {} lines",
                block.metastring, block.line_count
            ));
        }
    }

    for warning in &warnings {
        warn!(source = %path.display(), "{warning}");
    }

    Ok(CheckedDocument {
        kind,
        source: path.to_path_buf(),
        title: doc.title,
        slug: doc.slug,
        date: doc.date,
        code_blocks: rendered.code_blocks.len(),
        warnings,
    })
}

fn flag_duplicate_slugs(report: &mut CheckReport) {
    let mut first_seen: BTreeMap<String, PathBuf> = BTreeMap::new();
    for doc in &mut report.documents {
        match first_seen.get(&doc.slug) {
            Some(first) => doc.warnings.push(format!(
                "slug '{}' already used by {}",
                doc.slug,
                first.display()
            )),
            None => {
                first_seen.insert(doc.slug.clone(), doc.source.clone());
            }
        }
    }
}
