//! Google Scholar byline parsing.
//!
//! A Scholar result carries its authors, venue, year and host on one line:
//!
//! ```plain
//! J Smith, A Lee, B Kim… - Nature Methods, 2020 - nature.com
//! ```
//!
//! Splitting that line on commas alone would make the venue look like the last
//! author, which breaks the last-author policy. [`parse_byline`] separates the
//! parts first and only hands the author part to the author-list parser.
//!
//! # Example
//!
//! ```
//! use selfcite::scholar::parse_byline;
//!
//! let byline = parse_byline("J Smith, A Lee - Nature, 2020 - nature.com");
//! assert_eq!(byline.authors, vec!["J Smith", "A Lee"]);
//! assert_eq!(byline.venue.as_deref(), Some("Nature"));
//! assert_eq!(byline.year, Some(2020));
//! assert_eq!(byline.host.as_deref(), Some("nature.com"));
//! ```

use crate::Publication;
use crate::authors::parse_authors;
use crate::regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PART_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+-\s+").unwrap());

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(1[89]\d{2}|20\d{2})\b").unwrap());

/// The parts of one Scholar byline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Byline {
    pub authors: Vec<String>,
    pub venue: Option<String>,
    pub year: Option<i32>,
    pub host: Option<String>,
}

impl Byline {
    /// Pairs the byline with its result title.
    pub fn into_publication(self, title: impl Into<String>) -> Publication {
        Publication::new(title, self.authors, self.year)
    }
}

/// Splits a Scholar byline into authors, venue, year and host.
pub fn parse_byline(line: &str) -> Byline {
    let line = line.replace('\u{a0}', " ");
    let parts: Vec<&str> = PART_SEPARATOR.split(line.trim()).map(str::trim).collect();

    let (author_part, rest) = match parts.split_first() {
        Some((first, rest)) => (*first, rest),
        None => ("", &[][..]),
    };

    let (middle, host) = match rest {
        [] => (None, None),
        [only] if is_host(only) => (None, Some(only.to_string())),
        [only] => (Some(only.to_string()), None),
        [middle @ .., last] => (Some(middle.join(" - ")), Some(last.to_string())),
    };

    let year = middle.as_deref().and_then(extract_year);
    let venue = middle.map(|m| strip_year(&m)).filter(|v| !v.is_empty());

    Byline {
        authors: parse_authors(author_part),
        venue,
        year,
        host,
    }
}

/// A bare domain such as `nature.com`.
fn is_host(part: &str) -> bool {
    !part.contains(char::is_whitespace)
        && part.contains('.')
        && part.chars().any(char::is_alphabetic)
        && extract_year(part).is_none()
}

fn extract_year(text: &str) -> Option<i32> {
    YEAR.captures_iter(text)
        .last()
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Removes a trailing year (and the comma before it) from a venue.
fn strip_year(venue: &str) -> String {
    match YEAR.find_iter(venue).last() {
        Some(m) if venue[m.end()..].trim().is_empty() => venue[..m.start()]
            .trim_end()
            .trim_end_matches(',')
            .trim_end()
            .to_string(),
        _ => venue.to_string(),
    }
}
