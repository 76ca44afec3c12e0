//! Code block view.
//!
//! Renders one fenced code block as highlighted HTML:
//!
//! ```text
//! div.code-title > div                      title parameter, if any
//! div.code-highlight[data-language]
//! └── pre[data-linenumber]
//!     ├── button.code-copy-button           accessible label from copy::copy_label
//!     └── code.language-<lang>
//!         └── div.token-line[.highlight-line]   one per source line
//!             ├── span.line-number-style    gutter, when line numbers are on
//!             └── span[style]…              syntect tokens
//! ```
//!
//! Highlighting never fails the render: unknown languages use the plain-text
//! syntax and a syntect error drops the rest of the block to plain text.

use crate::config::CodeConfig;
use crate::copy::{CopyState, copy_label};
use crate::highlight::LineHighlighter;
use crate::meta::{BlockParams, parse_block_class};
use maud::{Markup, html};
use serde::Serialize;
use std::time::Duration;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Color, FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use thiserror::Error;
use tracing::debug;

/// Language tag that turns the line-number gutter off for a block.
pub const NO_LINE_NUMBERS: &str = "noLineNumbers";

#[derive(Error, Debug)]
pub enum CodeError {
    #[error("Unknown code theme '{name}' (available: {available})")]
    UnknownTheme { name: String, available: String },
}

/// Everything the markdown layer knows about one code block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeBlockProps {
    /// Raw code, as written between the fences.
    pub code: String,
    /// Class attribute, e.g. `language-js:title=app.js`.
    pub class_name: Option<String>,
    /// Meta string following the language, e.g. `{1,3-5}`.
    pub metastring: String,
    /// Force the gutter off regardless of config.
    pub no_line_numbers: bool,
}

impl CodeBlockProps {
    pub fn block_params(&self) -> BlockParams {
        parse_block_class(self.class_name.as_deref())
    }

    /// Source lines as rendered: one trailing newline is not a line.
    pub fn lines(&self) -> Vec<&str> {
        let code = self.code.strip_suffix('\n').unwrap_or(&self.code);
        let code = code.strip_suffix('\r').unwrap_or(code);
        code.split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect()
    }

    pub fn summary(&self) -> CodeBlockSummary {
        let params = self.block_params();
        let line_count = self.lines().len();
        let highlighted_lines =
            LineHighlighter::compile(&self.metastring).highlighted_lines(line_count);
        CodeBlockSummary {
            title: params.title().to_string(),
            language: params.language,
            metastring: self.metastring.clone(),
            line_count,
            highlighted_lines,
        }
    }
}

/// Display-oriented facts about a code block, used by CLI reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeBlockSummary {
    pub language: String,
    pub title: String,
    pub metastring: String,
    pub line_count: usize,
    /// 1-based line numbers.
    pub highlighted_lines: Vec<usize>,
}

struct Token {
    style: String,
    text: String,
}

pub struct CodeRenderer {
    syntaxes: SyntaxSet,
    theme: Theme,
    show_line_numbers: bool,
    copy_duration: Duration,
    trim_copied_text: bool,
}

impl CodeRenderer {
    /// Load syntect's bundled syntaxes and the configured theme.
    pub fn new(config: &CodeConfig) -> Result<Self, CodeError> {
        let mut themes = ThemeSet::load_defaults();
        let Some(theme) = themes.themes.remove(&config.theme) else {
            return Err(CodeError::UnknownTheme {
                name: config.theme.clone(),
                available: themes.themes.keys().cloned().collect::<Vec<_>>().join(", "),
            });
        };
        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
            show_line_numbers: config.show_line_numbers,
            copy_duration: config.copy_duration(),
            trim_copied_text: config.trim_copied_text,
        })
    }

    /// Whether `props` gets a line-number gutter.
    pub fn has_line_numbers(&self, props: &CodeBlockProps, params: &BlockParams) -> bool {
        self.show_line_numbers
            && !props.no_line_numbers
            && params.language != NO_LINE_NUMBERS
            && !params.has_flag(NO_LINE_NUMBERS)
    }

    pub fn render(&self, props: &CodeBlockProps) -> Markup {
        let params = props.block_params();
        let language = params.language.as_str();
        let title = params.title();
        let highlighter = LineHighlighter::compile(&props.metastring);
        let line_numbers = self.has_line_numbers(props, &params);
        let lines = self.highlight(&props.lines(), language);

        html! {
            @if !title.is_empty() {
                div.code-title {
                    div { (title) }
                }
            }
            div.code-highlight data-language=(language) {
                pre class={ "language-" (language) } style=(self.pre_style())
                    data-linenumber=(if line_numbers { "true" } else { "false" }) {
                    (copy_button(title, self.copy_duration, self.trim_copied_text))
                    code class={ "language-" (language) } {
                        @for (index, tokens) in lines.iter().enumerate() {
                            div class=(line_class(highlighter.is_highlighted(index))) {
                                @if line_numbers {
                                    span.line-number-style { (index + 1) }
                                }
                                @for token in tokens {
                                    span style=(token.style) { (token.text) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// True if `language` maps to a bundled syntax. Empty means plain text.
    pub fn knows_language(&self, language: &str) -> bool {
        language.is_empty()
            || language == NO_LINE_NUMBERS
            || self.syntaxes.find_syntax_by_token(language).is_some()
    }

    fn syntax_for(&self, language: &str) -> &SyntaxReference {
        if language.is_empty() {
            return self.syntaxes.find_syntax_plain_text();
        }
        self.syntaxes
            .find_syntax_by_token(language)
            .unwrap_or_else(|| self.syntaxes.find_syntax_plain_text())
    }

    fn highlight(&self, lines: &[&str], language: &str) -> Vec<Vec<Token>> {
        let mut highlighter = HighlightLines::new(self.syntax_for(language), &self.theme);
        let mut plain_from = None;
        let mut out = Vec::with_capacity(lines.len());
        let mut buffer = String::new();

        for (index, line) in lines.iter().enumerate() {
            if plain_from.is_some() {
                out.push(vec![plain_token(line)]);
                continue;
            }
            buffer.clear();
            buffer.push_str(line);
            buffer.push('\n');
            match highlighter.highlight_line(&buffer, &self.syntaxes) {
                Ok(ranges) => out.push(
                    ranges
                        .into_iter()
                        .filter_map(|(style, text)| {
                            let text = text.trim_end_matches('\n');
                            (!text.is_empty()).then(|| Token {
                                style: token_style(style),
                                text: text.to_string(),
                            })
                        })
                        .collect(),
                ),
                Err(e) => {
                    debug!(language, line = index + 1, error = %e, "highlighting failed, using plain text");
                    plain_from = Some(index);
                    out.push(vec![plain_token(line)]);
                }
            }
        }
        out
    }

    fn pre_style(&self) -> String {
        let background = self.theme.settings.background.unwrap_or(Color {
            r: 40,
            g: 44,
            b: 52,
            a: 255,
        });
        let foreground = self.theme.settings.foreground.unwrap_or(Color::WHITE);
        format!(
            "background-color: {}; color: {};",
            hex(background),
            hex(foreground)
        )
    }
}

/// Copy button as first rendered, in the idle state.
///
/// `static/copy.js` drives the same label transitions in the browser and
/// trims the copied text when `data-trim` is `true`.
pub fn copy_button(file_name: &str, duration: Duration, trim: bool) -> Markup {
    let state = CopyState::Idle;
    let label = copy_label(file_name, false);
    html! {
        button.code-copy-button type="button" name=(label)
            data-file-name=(file_name) data-copy-duration=(duration.as_millis().to_string())
            data-trim=(if trim { "true" } else { "false" }) {
            (state.caption())
            span.sc-only aria-roledescription="status" { (label) }
        }
    }
}

fn line_class(highlighted: bool) -> &'static str {
    if highlighted {
        "token-line highlight-line"
    } else {
        "token-line"
    }
}

fn plain_token(line: &str) -> Token {
    Token {
        style: String::new(),
        text: line.to_string(),
    }
}

fn token_style(style: Style) -> String {
    let mut css = format!("color: {};", hex(style.foreground));
    if style.font_style.contains(FontStyle::BOLD) {
        css.push_str(" font-weight: bold;");
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        css.push_str(" font-style: italic;");
    }
    css
}

fn hex(color: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}
