//! Code block class-attribute parsing.
//!
//! Fenced blocks carry their language and parameters in one class string:
//!
//! ```text
//! language-js:title=app.js&foo=bar
//! └───┬────┘ └──────────┬─────────┘
//!  language     parameters (`&`-separated key=value)
//! ```
//!
//! Parsing never fails. Malformed input degrades to an empty language and an
//! empty parameter map.

use serde::Serialize;
use std::collections::BTreeMap;

/// Literal prefix markdown renderers put in front of the language tag.
pub const LANGUAGE_PREFIX: &str = "language-";

/// Language and parameters parsed from a code block class attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockParams {
    pub language: String,
    pub params: BTreeMap<String, String>,
}

impl BlockParams {
    /// The `title` parameter, or `""` when the block has none.
    pub fn title(&self) -> &str {
        self.params.get("title").map(String::as_str).unwrap_or_default()
    }

    /// True if `key` was given, with or without a value.
    pub fn has_flag(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }
}

/// Parse a code block class attribute into language and parameters.
///
/// - Splits on the first `:` into a language segment and a parameter segment.
/// - The language is the segment with [`LANGUAGE_PREFIX`] stripped and
///   everything from the first `{` discarded.
/// - Parameters are `&`-separated; each piece is split once on `=`. Empty
///   pieces are skipped, later duplicates win, and a piece without `=` is
///   kept with an empty value.
pub fn parse_block_class(class: Option<&str>) -> BlockParams {
    let class = class.unwrap_or_default();
    let (lang_segment, params_segment) = class.split_once(':').unwrap_or((class, ""));

    let language = lang_segment
        .strip_prefix(LANGUAGE_PREFIX)
        .unwrap_or(lang_segment);
    let language = language.split('{').next().unwrap_or_default();

    let params = params_segment
        .split('&')
        .filter(|piece| !piece.is_empty())
        .map(|piece| match piece.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (piece.to_string(), String::new()),
        })
        .collect();

    BlockParams {
        language: language.to_string(),
        params,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn language_and_params() {
        let parsed = parse_block_class(Some("language-js:title=app.js&foo=bar"));
        assert_eq!(parsed.language, "js");
        assert_eq!(parsed.params, params(&[("title", "app.js"), ("foo", "bar")]));
        assert_eq!(parsed.title(), "app.js");
    }

    #[test]
    fn missing_input_is_empty() {
        let parsed = parse_block_class(None);
        assert_eq!(parsed, BlockParams::default());
        assert_eq!(parsed.title(), "");
    }

    #[test]
    fn no_colon_means_no_params() {
        for input in ["language-rust", "rust", "language-ts{1,3}", "", "{2}"] {
            let parsed = parse_block_class(Some(input));
            assert!(parsed.params.is_empty(), "params for {input:?}");
        }
        assert_eq!(parse_block_class(Some("language-rust")).language, "rust");
        assert_eq!(parse_block_class(Some("rust")).language, "rust");
        assert_eq!(parse_block_class(Some("language-ts{1,3}")).language, "ts");
        assert_eq!(parse_block_class(Some("{2}")).language, "");
    }

    #[test]
    fn prefix_only_stripped_at_start() {
        let parsed = parse_block_class(Some("xlanguage-js"));
        assert_eq!(parsed.language, "xlanguage-js");
    }

    #[test]
    fn brace_in_language_segment_is_truncated() {
        let parsed = parse_block_class(Some("language-js{1,3-5}:title=a.js"));
        assert_eq!(parsed.language, "js");
        assert_eq!(parsed.title(), "a.js");
    }

    #[test]
    fn split_on_first_colon_only() {
        let parsed = parse_block_class(Some("language-text:title=C:/notes.txt"));
        assert_eq!(parsed.language, "text");
        assert_eq!(parsed.title(), "C:/notes.txt");
    }

    #[test]
    fn value_split_once_on_equals() {
        let parsed = parse_block_class(Some("language-sh:env=A=1"));
        assert_eq!(parsed.params, params(&[("env", "A=1")]));
    }

    #[test]
    fn last_duplicate_wins() {
        let parsed = parse_block_class(Some("language-js:title=a.js&title=b.js"));
        assert_eq!(parsed.title(), "b.js");
    }

    #[test]
    fn empty_pieces_skipped() {
        let parsed = parse_block_class(Some("language-js:&&title=a.js&"));
        assert_eq!(parsed.params, params(&[("title", "a.js")]));
    }

    #[test]
    fn bare_key_kept_with_empty_value() {
        let parsed = parse_block_class(Some("language-js:title=a.js&noLineNumbers"));
        assert_eq!(parsed.params.get("noLineNumbers").map(String::as_str), Some(""));
        assert!(parsed.has_flag("noLineNumbers"));
        assert!(!parsed.has_flag("live"));
    }

    #[test]
    fn empty_key_with_value_is_kept() {
        let parsed = parse_block_class(Some("language-js:=orphan"));
        assert_eq!(parsed.params, params(&[("", "orphan")]));
    }
}
