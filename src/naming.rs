//! File-name parsing for posts and pages.
//!
//! Posts are conventionally named with an ISO date prefix followed by a slug:
//! `2021-03-04-copy-to-clipboard.md`. Pages carry no date: `about.md`.
//!
//! ## Display Titles
//!
//! Dashes in the slug are converted to spaces for display. The display title
//! is only a fallback; a `# heading` in the document always wins.
//! - `2021-03-04-copy-to-clipboard` → "copy to clipboard"
//! - `about` → "about"

/// Result of parsing a post or page file stem.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// `YYYY-MM-DD` prefix if present.
    pub date: Option<String>,
    /// URL slug: the stem with the date prefix stripped, dashes preserved.
    pub slug: String,
    /// Display title: slug with dashes converted to spaces.
    pub display_title: String,
}

/// Parse a file stem following the `YYYY-MM-DD-slug` convention.
///
/// - `"2021-03-04-copy-to-clipboard"` → date=Some("2021-03-04"), slug="copy-to-clipboard"
/// - `"2021-03-04"` → date=Some("2021-03-04"), slug="2021-03-04"
/// - `"about"` → date=None, slug="about"
/// - `"2021-13-40-nope"` → date=None (not a calendar-shaped date), slug unchanged
pub fn parse_post_name(stem: &str) -> ParsedName {
    if let Some(date) = date_prefix(stem) {
        let rest = stem[date.len()..].trim_start_matches('-');
        // A date-only stem keeps the date as its slug so the URL is not empty
        let slug = if rest.is_empty() { stem } else { rest };
        return ParsedName {
            date: Some(date.to_string()),
            slug: slug.to_string(),
            display_title: slug.replace('-', " "),
        };
    }
    ParsedName {
        date: None,
        slug: stem.to_string(),
        display_title: stem.replace('-', " "),
    }
}

/// Return the leading `YYYY-MM-DD` of `stem`, if it has one.
fn date_prefix(stem: &str) -> Option<&str> {
    let candidate = stem.get(..10)?;
    let mut parts = candidate.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    year.parse::<u32>().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    // The date must be followed by a separator or end the stem
    match stem.as_bytes().get(10) {
        None | Some(b'-') => Some(candidate),
        Some(_) => None,
    }
}
