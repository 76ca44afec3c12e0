//! HTML generation for posts and pages.
//!
//! Reads one markdown file, renders it through [`crate::components`] and
//! wraps the result in the site shell.
//!
//! ## Documents
//!
//! | Kind | Source name | Header |
//! |------|-------------|--------|
//! | Post | `2021-03-14-rust-notes.md` | title + publication date |
//! | Page | `about.md` | title only |
//!
//! The title is the first `# heading` of the file, falling back to the file
//! name with dashes turned into spaces. A heading used as the title is not
//! repeated in the body.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── rust-notes/
//! │   └── index.html        # Post rendered from 2021-03-14-rust-notes.md
//! └── about/
//!     └── index.html        # Page rendered from about.md
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Layout and code block styles (colors injected from config)
//! - `static/copy.js`: Copy button behavior in the browser
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping.

use crate::code::{CodeBlockSummary, CodeError};
use crate::components::{Components, markdown_options, render_markdown};
use crate::config::SiteConfig;
use crate::naming::parse_post_name;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Code(#[from] CodeError),
    #[error("Not a markdown file name: {}", .0.display())]
    InvalidFileName(PathBuf),
    #[error("Failed to walk content directory: {0}")]
    Walk(#[from] walkdir::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Post,
    Page,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Post => f.write_str("post"),
            Self::Page => f.write_str("page"),
        }
    }
}

/// A markdown source file ready to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub kind: DocumentKind,
    /// From the first `# heading`, or the file name as fallback
    pub title: String,
    pub slug: String,
    /// `YYYY-MM-DD` from the file name prefix
    pub date: Option<String>,
    /// Markdown body without the title heading
    pub body: String,
}

impl Document {
    /// Read `path` and build a document from its stem and contents.
    pub fn load(path: &Path, kind: DocumentKind) -> Result<Self, GenerateError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| GenerateError::InvalidFileName(path.to_path_buf()))?;
        let source = fs::read_to_string(path)?;
        Ok(Self::from_source(stem, &source, kind))
    }

    pub fn from_source(stem: &str, source: &str, kind: DocumentKind) -> Self {
        let name = parse_post_name(stem);
        let (title, body) = match title_heading(source) {
            Some((title, range)) => {
                let body = format!("{}{}", &source[..range.start], &source[range.end..]);
                (title, body)
            }
            None => (name.display_title.clone(), source.to_string()),
        };

        Self {
            kind,
            title,
            slug: name.slug,
            // Pages have no publication date even if named like a post
            date: match kind {
                DocumentKind::Post => name.date,
                DocumentKind::Page => None,
            },
            body,
        }
    }
}

/// First ATX level-one heading: its text and its byte range in `source`.
///
/// Found through the markdown parser, so `#` lines inside code blocks and
/// setext headings never count.
fn title_heading(source: &str) -> Option<(String, Range<usize>)> {
    let mut events = Parser::new_ext(source, markdown_options()).into_offset_iter();
    let range = events.find_map(|(event, range)| match event {
        Event::Start(Tag::Heading {
            level: HeadingLevel::H1,
            ..
        }) if source[range.clone()].trim_start().starts_with('#') => Some(range),
        _ => None,
    })?;

    let mut title = String::new();
    for (event, _) in events {
        match event {
            Event::Text(text) | Event::Code(text) => title.push_str(&text),
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => break,
            _ => {}
        }
    }
    Some((title.trim().to_string(), range))
}

/// What [`generate_file`] wrote.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDocument {
    pub kind: DocumentKind,
    pub title: String,
    pub slug: String,
    pub date: Option<String>,
    pub source: PathBuf,
    pub output: PathBuf,
    pub code_blocks: Vec<CodeBlockSummary>,
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const COPY_JS: &str = include_str!("../static/copy.js");

/// Render `input` and write it to `<output_dir>/<slug>/index.html`.
pub fn generate_file(
    input: &Path,
    output_dir: &Path,
    kind: DocumentKind,
    config: &SiteConfig,
) -> Result<GeneratedDocument, GenerateError> {
    let components = Components::new(config)?;
    generate_with(input, output_dir, kind, config, &components)
}

/// Like [`generate_file`] but reuses already loaded components.
pub fn generate_with(
    input: &Path,
    output_dir: &Path,
    kind: DocumentKind,
    config: &SiteConfig,
    components: &Components,
) -> Result<GeneratedDocument, GenerateError> {
    let doc = Document::load(input, kind)?;
    debug!(source = %input.display(), slug = %doc.slug, %kind, "rendering document");

    let rendered = render_markdown(&doc.body, components);
    let page = render_document(&doc, &rendered.html, config);

    let dir = output_dir.join(&doc.slug);
    fs::create_dir_all(&dir)?;
    let output = dir.join("index.html");
    fs::write(&output, page.into_string())?;
    info!(output = %output.display(), code_blocks = rendered.code_blocks.len(), "wrote document");

    Ok(GeneratedDocument {
        kind: doc.kind,
        title: doc.title,
        slug: doc.slug,
        date: doc.date,
        source: input.to_path_buf(),
        output,
        code_blocks: rendered.code_blocks,
    })
}

/// Markdown files under `dir`, sorted by path. A missing directory is empty.
pub fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    if !dir.exists() {
        debug!(dir = %dir.display(), "content directory missing, skipping");
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let is_markdown = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == "md" || ext == "markdown");
        if entry.file_type().is_file() && is_markdown {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the full HTML document for a post or page
pub fn render_document(doc: &Document, body_html: &str, config: &SiteConfig) -> Markup {
    let page_title = if doc.title == config.site.title {
        doc.title.clone()
    } else {
        format!("{} | {}", doc.title, config.site.title)
    };
    let css = format!(
        ":root {{ --theme-color: {}; --background-color: {}; }}\n{}",
        config.manifest.theme_color, config.manifest.background_color, CSS_STATIC
    );

    let content = html! {
        (site_header(config))
        main {
            article class=(doc.kind.to_string()) {
                (document_header(doc))
                div.content {
                    (PreEscaped(body_html))
                }
            }
        }
        (site_footer(config))
        script { (PreEscaped(COPY_JS)) }
    };

    base_document(&page_title, &css, config, content)
}

/// Renders the base HTML document structure
fn base_document(title: &str, css: &str, config: &SiteConfig, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(config.site.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content=(config.site.description);
                meta name="author" content=(config.site.author);
                meta name="theme-color" content=(config.manifest.theme_color);
                meta property="og:title" content=(title);
                meta property="og:site_name" content=(config.site.title_alt);
                meta property="og:description" content=(config.site.description);
                meta property="og:image" content={ (config.site.url.trim_end_matches('/')) (config.site.image) };
                link rel="manifest" href="/manifest.webmanifest";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with title, navigation and external links
fn site_header(config: &SiteConfig) -> Markup {
    html! {
        header.site-header {
            div.site-brand {
                a.site-title href="/" { (config.site.title) }
                p.site-headline { (config.site.headline) }
            }
            nav.site-nav {
                ul {
                    @for link in &config.navigation {
                        li { a href=(link.slug) { (link.title) } }
                    }
                    @for link in &config.external_links {
                        li.external {
                            a href=(link.url) target="_blank" rel="noopener noreferrer" { (link.name) }
                        }
                    }
                }
            }
        }
    }
}

fn document_header(doc: &Document) -> Markup {
    html! {
        header {
            h1 { (doc.title) }
            @if let Some(date) = &doc.date {
                time datetime=(date) { (date) }
            }
        }
    }
}

fn site_footer(config: &SiteConfig) -> Markup {
    html! {
        footer.site-footer {
            "© " (config.site.author)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
