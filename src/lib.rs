//! A library for counting self-citations from noisy bibliographic records.
//!
//! `selfcite` takes an author's publications and the papers citing each of
//! them, decides for every citation whether the citing paper shares an author
//! with the original, and aggregates the result per paper and overall.
//!
//! # Key Features
//!
//! - **Name normalization**: accent folding, "Last, First" reordering,
//!   initials, honorifics and suffixes, multi-part surnames.
//! - **Author-list parsing**: commas, `and`, `&` and `;` separators, with
//!   detection of name-order commas.
//! - **Two self-citation policies**: any shared author, or the original's last
//!   author only.
//! - **Aggregation**: per-paper and overall totals with percentages, valid at
//!   any point of a run.
//! - **CSV boundary**: publication import and result export (feature `csv`).
//!
//! # Basic Usage
//!
//! ```rust
//! use selfcite::{Analysis, PolicyConfig, Publication};
//!
//! let paper = Publication::from_author_field("Deep Things", "A. Lee and B. Kim", Some(2019));
//! let citing = vec![
//!     Publication::from_author_field("Deeper Things", "B Kim, C Park", Some(2021)),
//!     Publication::from_author_field("Other Things", "D Choi", Some(2022)),
//! ];
//!
//! let mut analysis = Analysis::new(PolicyConfig::default());
//! analysis.add_publication(&paper);
//! analysis.add_citations(&paper, &citing);
//!
//! let summary = analysis.summary();
//! assert_eq!(summary.overall.self_citations, 1);
//! assert_eq!(summary.overall.percentage, 50.0);
//! ```
//!
//! # Error Handling
//!
//! Matching never fails: malformed names and author fields degrade to
//! well-defined fallbacks. [`SelfCiteError`] is only returned at the I/O
//! boundaries, namely CSV input/output and a [`CitationSource`].
//!
//! # Thread Safety
//!
//! Normalization, author parsing and classification are pure and can be
//! called from any thread. The [`Aggregator`] is the only stateful part and
//! expects a single consumer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod aggregate;
pub mod analysis;
pub mod authors;
pub mod classify;
#[cfg(feature = "csv")]
pub mod csv;
pub mod normalize;
mod regex;
pub mod scholar;
mod utils;

// Reexports
pub use aggregate::{AggregateReport, Aggregator, PaperKey, PaperSummary, Stats, Summary, Tally};
pub use analysis::{Analysis, CitationSource};
pub use authors::{AuthorListParser, DefaultAuthorListParser, parse_authors};
pub use classify::{ClassificationResult, Classifier, PolicyConfig, classify};
#[cfg(feature = "csv")]
pub use crate::csv::CsvParser;
pub use normalize::{DefaultNormalizer, NameNormalizer, NormalizedName, normalize};

/// A specialized Result type for selfcite operations.
pub type Result<T> = std::result::Result<T, SelfCiteError>;

/// Errors raised at the I/O boundaries of the crate.
#[derive(Error, Debug)]
pub enum SelfCiteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    InvalidFormat(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Malformed input: {message} at line {line}")]
    MalformedInput { message: String, line: usize },

    #[error("Citation source error: {0}")]
    Source(String),
}

#[cfg(feature = "csv")]
impl From<::csv::Error> for SelfCiteError {
    fn from(err: ::csv::Error) -> Self {
        SelfCiteError::InvalidFormat(err.to_string())
    }
}

/// A paper as delivered by the retrieval side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Publication {
    /// Title of the work
    pub title: String,
    /// Raw author names in source order; the last one is the last author
    pub authors: Vec<String>,
    /// Publication year
    pub year: Option<i32>,
}

impl Publication {
    pub fn new(title: impl Into<String>, authors: Vec<String>, year: Option<i32>) -> Self {
        Self {
            title: title.into(),
            authors,
            year,
        }
    }

    /// Builds a publication from an unsplit author field, using
    /// [`parse_authors`].
    pub fn from_author_field(title: impl Into<String>, authors: &str, year: Option<i32>) -> Self {
        Self::new(title, parse_authors(authors), year)
    }

    pub fn last_author(&self) -> Option<&str> {
        self.authors.last().map(String::as_str)
    }
}

/// `citing` cites `original`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationEdge {
    pub original: Publication,
    pub citing: Publication,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_error_display() {
        let error = SelfCiteError::InvalidFormat("Invalid line".to_string());
        assert_eq!(error.to_string(), "Parse error: Invalid line");

        let error = SelfCiteError::MalformedInput {
            message: "too many fields".to_string(),
            line: 3,
        };
        assert_eq!(error.to_string(), "Malformed input: too many fields at line 3");
    }

    #[test]
    fn test_publication_from_author_field() {
        let publication = Publication::from_author_field("Title", "Smith, John and Lee, Alice", None);
        assert_eq!(publication.authors, vec!["Smith, John", "Lee, Alice"]);
        assert_eq!(publication.last_author(), Some("Lee, Alice"));
    }

    #[test]
    fn test_publication_without_authors() {
        let publication = Publication::new("Title", Vec::new(), Some(2001));
        assert_eq!(publication.last_author(), None);
    }
}
