//! Markdown element overrides.
//!
//! Markdown is parsed with pulldown-cmark and a few elements are swapped for
//! richer views before the event stream is serialized:
//!
//! | Element | Replacement |
//! |---------|-------------|
//! | fenced or indented code block | [`CodeRenderer`] view with highlighting and copy button |
//! | link to another site | same link with `target="_blank"` |
//!
//! Everything else, including raw `<pre>` HTML, passes through untouched.

use crate::code::{CodeBlockProps, CodeBlockSummary, CodeError, CodeRenderer};
use crate::config::SiteConfig;
use crate::meta::LANGUAGE_PREFIX;
use maud::{PreEscaped, html};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, html as md_html};
use serde::Serialize;

/// Renderer registry consulted while converting markdown to HTML.
pub struct Components {
    code: CodeRenderer,
    site_url: String,
}

/// Output of [`render_markdown`].
#[derive(Debug, Clone, Serialize)]
pub struct RenderedMarkdown {
    pub html: String,
    pub code_blocks: Vec<CodeBlockSummary>,
}

impl Components {
    pub fn new(config: &SiteConfig) -> Result<Self, CodeError> {
        Ok(Self::with_renderer(
            CodeRenderer::new(&config.code)?,
            &config.site.url,
        ))
    }

    pub fn with_renderer(code: CodeRenderer, site_url: &str) -> Self {
        Self {
            code,
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn code_renderer(&self) -> &CodeRenderer {
        &self.code
    }

    /// True for absolute http(s) URLs that do not point back into this site.
    pub fn is_external(&self, href: &str) -> bool {
        let absolute = href.starts_with("http://") || href.starts_with("https://");
        if !absolute {
            return false;
        }
        if self.site_url.is_empty() {
            return true;
        }
        match href.strip_prefix(&self.site_url) {
            Some(rest) => !(rest.is_empty() || rest.starts_with(['/', '?', '#'])),
            None => true,
        }
    }

    fn render_external_link(&self, href: &str, title: &str, inner: Vec<Event<'_>>) -> String {
        let mut inner_html = String::new();
        md_html::push_html(&mut inner_html, inner.into_iter());
        let title = (!title.is_empty()).then_some(title);
        html! {
            a href=(href) title=[title] target="_blank" rel="noopener noreferrer" {
                (PreEscaped(inner_html))
            }
        }
        .into_string()
    }
}

/// Turn a code block's info string and body into view props.
///
/// The info string is split at the first whitespace: `js:title=a.js {2}`
/// yields class `language-js:title=a.js` and metastring `{2}`. Indented
/// blocks and empty info strings carry no class.
pub fn pre_to_code_block(kind: &CodeBlockKind<'_>, code: String) -> CodeBlockProps {
    let (class_name, metastring) = match kind {
        CodeBlockKind::Indented => (None, String::new()),
        CodeBlockKind::Fenced(info) => {
            let info = info.trim();
            let (language, meta) = info
                .split_once(char::is_whitespace)
                .map(|(lang, rest)| (lang, rest.trim()))
                .unwrap_or((info, ""));
            let class_name =
                (!language.is_empty()).then(|| format!("{LANGUAGE_PREFIX}{language}"));
            (class_name, meta.to_string())
        }
    };
    CodeBlockProps {
        code,
        class_name,
        metastring,
        no_line_numbers: false,
    }
}

struct PendingBlock<'a> {
    kind: CodeBlockKind<'a>,
    code: String,
}

struct PendingLink<'a> {
    href: CowStr<'a>,
    title: CowStr<'a>,
    inner: Vec<Event<'a>>,
}

pub(crate) fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_TASKLISTS
}

/// Code blocks of `source` in document order, without rendering anything.
pub fn extract_code_blocks(source: &str) -> Vec<CodeBlockProps> {
    let mut blocks = Vec::new();
    let mut pending: Option<PendingBlock<'_>> = None;
    for event in Parser::new_ext(source, markdown_options()) {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                pending = Some(PendingBlock {
                    kind,
                    code: String::new(),
                });
            }
            Event::Text(text) => {
                if let Some(block) = pending.as_mut() {
                    block.code.push_str(&text);
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some(block) = pending.take() {
                    blocks.push(pre_to_code_block(&block.kind, block.code));
                }
            }
            _ => {}
        }
    }
    blocks
}

/// Render markdown to HTML with the component overrides applied.
pub fn render_markdown(source: &str, components: &Components) -> RenderedMarkdown {
    let mut code_blocks = Vec::new();
    let mut events: Vec<Event<'_>> = Vec::new();
    let mut block: Option<PendingBlock<'_>> = None;
    let mut link: Option<PendingLink<'_>> = None;

    for event in Parser::new_ext(source, markdown_options()) {
        if let Some(pending) = block.as_mut() {
            match event {
                Event::Text(text) => pending.code.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(pending) = block.take() {
                        let props = pre_to_code_block(&pending.kind, pending.code);
                        code_blocks.push(props.summary());
                        let markup = components.code_renderer().render(&props);
                        events.push(Event::Html(markup.into_string().into()));
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                block = Some(PendingBlock {
                    kind,
                    code: String::new(),
                });
            }
            Event::Start(Tag::Link {
                dest_url, title, ..
            }) if link.is_none() && components.is_external(&dest_url) => {
                link = Some(PendingLink {
                    href: dest_url,
                    title,
                    inner: Vec::new(),
                });
            }
            Event::End(TagEnd::Link) if link.is_some() => {
                if let Some(pending) = link.take() {
                    let html = components.render_external_link(
                        &pending.href,
                        &pending.title,
                        pending.inner,
                    );
                    events.push(Event::InlineHtml(html.into()));
                }
            }
            other => match link.as_mut() {
                Some(pending) => pending.inner.push(other),
                None => events.push(other),
            },
        }
    }

    let mut html = String::new();
    md_html::push_html(&mut html, events.into_iter());
    RenderedMarkdown { html, code_blocks }
}
