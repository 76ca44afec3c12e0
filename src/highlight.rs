//! Line emphasis ranges for code blocks.
//!
//! A code block's meta string may embed one `{...}` token listing the lines
//! to emphasize, e.g. `title=app.js {1,3-5}`. Line numbers are 1-based;
//! callers ask about 0-based line indices.
//!
//! ## Malformed Entries
//!
//! Each comma-separated entry is split on `-`. A piece that is not a number
//! becomes a not-a-number sentinel (`None`) that never matches, so `{-3}`
//! highlights nothing. An `end` that is missing, not a number or `0` is
//! treated as absent, so `{2-}` and `{2-0}` both highlight line 2 alone.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// First `{digits,commas,hyphens}` token in a meta string.
    static ref RANGE_TOKEN: Regex = Regex::new(r"\{([\d,-]+)\}").unwrap();
}

/// One entry of a highlight specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRange {
    /// First line, or `None` when the entry did not parse as a number.
    pub start: Option<usize>,
    /// Inclusive last line; `None` for a bare line number.
    pub end: Option<usize>,
}

impl LineRange {
    fn parse(entry: &str) -> Self {
        let mut pieces = entry.split('-');
        let start = pieces.next().and_then(|p| p.parse().ok());
        let end = pieces
            .next()
            .and_then(|p| p.parse().ok())
            .filter(|&end: &usize| end != 0);
        Self { start, end }
    }

    /// True if the 1-based `line` falls in this range.
    pub fn contains(&self, line: usize) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= line && line <= end,
            (Some(start), None) => line == start,
            (None, _) => false,
        }
    }
}

/// Compiled highlight specification.
///
/// An empty highlighter (no `{...}` token) answers `false` for every line
/// without allocating.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineHighlighter {
    ranges: Vec<LineRange>,
}

impl LineHighlighter {
    /// Compile the first `{...}` token of `meta`. Everything else is ignored.
    pub fn compile(meta: &str) -> Self {
        let Some(captures) = RANGE_TOKEN.captures(meta) else {
            return Self::default();
        };
        let ranges = captures[1].split(',').map(LineRange::parse).collect();
        Self { ranges }
    }

    /// True if the line at 0-based `index` should be emphasized.
    pub fn is_highlighted(&self, index: usize) -> bool {
        let line = index + 1;
        self.ranges.iter().any(|range| range.contains(line))
    }

    /// True if no line can ever be highlighted.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn ranges(&self) -> &[LineRange] {
        &self.ranges
    }

    /// 1-based line numbers highlighted within a block of `line_count` lines.
    pub fn highlighted_lines(&self, line_count: usize) -> Vec<usize> {
        (0..line_count)
            .filter(|&index| self.is_highlighted(index))
            .map(|index| index + 1)
            .collect()
    }
}

/// Compile `meta` into a predicate over 0-based line indices.
pub fn compile_highlighter(meta: &str) -> impl Fn(usize) -> bool {
    let highlighter = LineHighlighter::compile(meta);
    move |index| highlighter.is_highlighted(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_meta_never_highlights() {
        let predicate = compile_highlighter("");
        assert!((0..1000).all(|i| !predicate(i)));
        assert!(LineHighlighter::compile("").is_empty());
    }

    #[test]
    fn meta_without_token_never_highlights() {
        let hl = LineHighlighter::compile("title=app.js");
        assert!(hl.is_empty());
        assert!(!hl.is_highlighted(0));
    }

    #[test]
    fn bare_lines_and_ranges() {
        let predicate = compile_highlighter("title=x.js{2,4-6}");
        assert!(!predicate(0));
        assert!(predicate(1));
        assert!(!predicate(2));
        assert!(predicate(3));
        assert!(predicate(4));
        assert!(predicate(5));
        assert!(!predicate(6));
    }

    #[test]
    fn only_first_token_is_honored() {
        let hl = LineHighlighter::compile("{1} {3}");
        assert!(hl.is_highlighted(0));
        assert!(!hl.is_highlighted(2));
    }

    #[test]
    fn non_matching_braces_are_skipped() {
        // `{a}` is not a range token; the scan continues to `{2}`
        let hl = LineHighlighter::compile("{a} {2}");
        assert_eq!(hl.highlighted_lines(3), vec![2]);
    }

    #[test]
    fn overlapping_ranges_union() {
        let hl = LineHighlighter::compile("{1-3,2-5,4}");
        assert_eq!(hl.highlighted_lines(7), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn missing_start_never_matches() {
        let hl = LineHighlighter::compile("{-3}");
        assert_eq!(
            hl.ranges(),
            &[LineRange {
                start: None,
                end: Some(3)
            }]
        );
        assert_eq!(hl.highlighted_lines(10), Vec::<usize>::new());
    }

    #[test]
    fn missing_or_zero_end_is_a_bare_line() {
        assert_eq!(LineHighlighter::compile("{2-}").highlighted_lines(5), vec![2]);
        assert_eq!(LineHighlighter::compile("{2-0}").highlighted_lines(5), vec![2]);
    }

    #[test]
    fn empty_entries_are_ignored() {
        let hl = LineHighlighter::compile("{1,,3}");
        assert_eq!(hl.ranges().len(), 3);
        assert_eq!(hl.highlighted_lines(4), vec![1, 3]);
    }

    #[test]
    fn reversed_range_matches_nothing() {
        let hl = LineHighlighter::compile("{5-2}");
        assert_eq!(hl.highlighted_lines(10), Vec::<usize>::new());
    }

    #[test]
    fn extra_hyphen_pieces_are_dropped() {
        let hl = LineHighlighter::compile("{1-2-3}");
        assert_eq!(hl.highlighted_lines(5), vec![1, 2]);
    }

    #[test]
    fn highlighted_lines_respects_line_count() {
        let hl = LineHighlighter::compile("{2,8-12}");
        assert_eq!(hl.highlighted_lines(9), vec![2, 8, 9]);
    }
}
