//! # Devnotes
//!
//! A small static renderer for a developer notes blog. Posts and pages are
//! markdown files; fenced code blocks are the feature: each one renders with
//! syntax highlighting, optional line numbers, emphasized line ranges, an
//! optional title bar and a copy-to-clipboard button.
//!
//! # Code Block Annotations
//!
//! Everything a block needs is written on its opening fence:
//!
//! ```text
//! ```js:title=copy.js&noLineNumbers {2,4-6}
//!    └┬┘ └──────────┬─────────────┘ └──┬──┘
//!  language    parameters        lines to emphasize
//! ```
//!
//! The class attribute (`language-js:title=copy.js&noLineNumbers`) is parsed
//! by [`meta`]; the `{...}` token in the meta string is compiled by
//! [`highlight`]. Both parsers are total: malformed input degrades to "no
//! parameters" or "no emphasis", never to an error.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`meta`] | Code block class attribute → language + parameters |
//! | [`highlight`] | `{1,3-5}` tokens → per-line emphasis predicate |
//! | [`code`] | Code block view: syntect highlighting, gutter, copy button markup |
//! | [`components`] | Markdown rendering with code block and external link overrides |
//! | [`clipboard`] | Clipboard providers: native via `arboard`, OSC 52 fallback |
//! | [`copy`] | Copy button controller: copy, disable, timed reset |
//! | [`generate`] | Post and page documents, site shell, file output |
//! | [`check`] | Content validation over the posts and pages directories |
//! | [`config`] | `config.toml` loading, merging with stock defaults, validation |
//! | [`naming`] | `YYYY-MM-DD-slug` file name convention |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Interpolation is auto-escaped, so code block contents and
//! titles can never inject markup.
//!
//! ## Highlighting at Build Time
//!
//! Code is highlighted with syntect while rendering, so the published page
//! ships inline styles and no highlighter. The only script on a page is the
//! copy button.
//!
//! ## One Copy State Machine
//!
//! The copy button's `Idle → Copying → Copied → Idle` cycle is modeled once
//! in [`copy`] and driven by a tokio timer. The `copy` CLI command runs the
//! same controller against the real clipboard; `static/copy.js` mirrors its
//! labels in the browser.

pub mod check;
pub mod clipboard;
pub mod code;
pub mod components;
pub mod config;
pub mod copy;
pub mod generate;
pub mod highlight;
pub mod meta;
pub mod naming;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
