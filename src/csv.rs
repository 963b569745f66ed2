//! CSV input and output.
//!
//! Reads [`Publication`] records from CSV with configurable header aliases, and
//! writes classification rows and summaries for the reporting side.
//!
//! # Example
//!
//! ```
//! use selfcite::CsvParser;
//!
//! let input = "Title,Authors,Year\nExample Paper,\"Smith, John and Lee, Alice\",2023";
//!
//! let parser = CsvParser::new();
//! let publications = parser.parse(input).unwrap();
//! assert_eq!(publications[0].title, "Example Paper");
//! assert_eq!(publications[0].authors, vec!["Smith, John", "Lee, Alice"]);
//! ```

use ::csv::{ReaderBuilder, StringRecord, Writer, WriterBuilder};
use itertools::Itertools;
use std::collections::HashMap;
use std::io::Write;

use crate::aggregate::{Stats, Summary};
use crate::authors::{AuthorListParser, DefaultAuthorListParser};
use crate::classify::ClassificationResult;
use crate::normalize::NormalizedName;
use crate::{Publication, Result, SelfCiteError};

/// Default header mappings for common CSV column names
const DEFAULT_HEADERS: &[(&str, &[&str])] = &[
    ("title", &["title", "article title", "publication title"]),
    ("authors", &["author", "authors", "creator", "creators"]),
    ("year", &["year", "publication year", "pub year"]),
];

/// Columns of a classification row.
pub const RESULT_HEADERS: [&str; 8] = [
    "original_title",
    "original_authors",
    "original_year",
    "citing_title",
    "citing_authors",
    "is_self_citation",
    "original_normalized_authors",
    "citing_normalized_authors",
];

/// Columns of a summary row.
pub const SUMMARY_HEADERS: [&str; 6] = [
    "title",
    "year",
    "total_citations",
    "self_citations",
    "non_self_citations",
    "self_citation_percentage",
];

const LIST_SEPARATOR: &str = "; ";

/// Configuration for reading publications from CSV.
///
/// # Default Mappings
///
/// - "title" → ["title", "article title", "publication title"]
/// - "authors" → ["author", "authors", "creator", "creators"]
/// - "year" → ["year", "publication year", "pub year"]
///
/// # Examples
///
/// ```
/// use selfcite::csv::CsvConfig;
///
/// let mut config = CsvConfig::new();
/// config.set_header_mapping("title", vec!["Paper".to_string()]);
/// config.set_delimiter(b';');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Custom header mappings for CSV columns
    header_map: HashMap<String, Vec<String>>,
    /// Delimiter to use for parsing the CSV
    delimiter: u8,
    /// Whether the CSV has headers
    has_header: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvConfig {
    /// Creates a new CSV configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        let mut config = Self {
            header_map: HashMap::new(),
            delimiter: b',',
            has_header: true,
        };
        config.set_default_headers();
        config
    }

    fn set_default_headers(&mut self) {
        for (field, aliases) in DEFAULT_HEADERS {
            self.header_map.insert(
                field.to_string(),
                aliases.iter().map(|s| s.to_string()).collect(),
            );
        }
    }

    /// Sets a custom header mapping
    pub fn set_header_mapping(&mut self, field: &str, aliases: Vec<String>) -> &mut Self {
        self.header_map.insert(field.to_string(), aliases);
        self
    }

    pub fn set_delimiter(&mut self, delimiter: u8) -> &mut Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether the CSV has headers. Without headers, columns are read
    /// positionally as title, authors, year.
    pub fn set_has_header(&mut self, has_header: bool) -> &mut Self {
        self.has_header = has_header;
        self
    }

    /// Finds the field name for a given header
    fn get_field_for_header(&self, header: &str) -> Option<&str> {
        let header_lower = header.trim().to_lowercase();
        self.header_map
            .iter()
            .find(|(_, aliases)| aliases.iter().any(|a| a.to_lowercase() == header_lower))
            .map(|(field, _)| field.as_str())
    }
}

/// Parser for CSV files of publications.
///
/// The authors cell is split with an [`AuthorListParser`], the default one
/// unless replaced with [`CsvParser::with_author_parser`].
#[derive(Debug, Clone)]
pub struct CsvParser<P = DefaultAuthorListParser> {
    config: CsvConfig,
    author_parser: P,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvParser {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: CsvConfig::new(),
            author_parser: DefaultAuthorListParser,
        }
    }
}

impl<P: AuthorListParser> CsvParser<P> {
    #[must_use]
    pub fn with_config(mut self, config: CsvConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_author_parser<Q: AuthorListParser>(self, author_parser: Q) -> CsvParser<Q> {
        CsvParser {
            config: self.config,
            author_parser,
        }
    }

    /// Parses CSV text into publications.
    ///
    /// # Errors
    ///
    /// Returns [`SelfCiteError::InvalidFormat`] for unreadable CSV,
    /// [`SelfCiteError::MissingField`] when no title column can be found, and
    /// [`SelfCiteError::MalformedInput`] for a row with an unparseable year.
    pub fn parse(&self, input: &str) -> Result<Vec<Publication>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .has_headers(self.config.has_header)
            .flexible(true)
            .from_reader(input.as_bytes());

        let columns: Vec<Option<&str>> = if self.config.has_header {
            reader
                .headers()?
                .iter()
                .map(|header| self.config.get_field_for_header(header))
                .collect()
        } else {
            vec![Some("title"), Some("authors"), Some("year")]
        };

        if !columns.contains(&Some("title")) {
            return Err(SelfCiteError::MissingField("title".to_string()));
        }

        let mut publications = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            let line = record
                .position()
                .map_or(i + 1, |p| usize::try_from(p.line()).unwrap_or(i + 1));
            publications.push(self.parse_record(&columns, &record, line)?);
        }
        Ok(publications)
    }

    /// Parses a record into a Publication using the resolved columns
    fn parse_record(
        &self,
        columns: &[Option<&str>],
        record: &StringRecord,
        line: usize,
    ) -> Result<Publication> {
        let mut publication = Publication::default();

        for (value, field) in record.iter().zip(columns) {
            let value = value.trim();
            match field {
                Some("title") => publication.title = value.to_string(),
                Some("authors") if !value.is_empty() => {
                    publication.authors = self.author_parser.parse_authors(value);
                }
                Some("year") if !value.is_empty() => {
                    let year = value.parse().map_err(|_| SelfCiteError::MalformedInput {
                        message: format!("invalid year '{value}'"),
                        line,
                    })?;
                    publication.year = Some(year);
                }
                _ => {}
            }
        }

        Ok(publication)
    }
}

/// Writes one row per classification result, with a header row.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_results<'a, W, I>(writer: W, results: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a ClassificationResult>,
{
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(RESULT_HEADERS)?;
    for result in results {
        let edge = &result.edge;
        csv.write_record([
            edge.original.title.clone(),
            edge.original.authors.join(LIST_SEPARATOR),
            format_year(edge.original.year),
            edge.citing.title.clone(),
            edge.citing.authors.join(LIST_SEPARATOR),
            result.is_self_citation.to_string(),
            join_names(&result.original_normalized_authors),
            join_names(&result.citing_normalized_authors),
        ])?;
    }
    finish(csv)
}

/// Writes one row per paper and a final `overall` row.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_summary<W: Write>(writer: W, summary: &Summary) -> Result<()> {
    let mut csv = WriterBuilder::new().from_writer(writer);
    csv.write_record(SUMMARY_HEADERS)?;
    for paper in &summary.per_paper {
        csv.write_record(summary_row(&paper.title, &format_year(paper.year), &paper.stats))?;
    }
    csv.write_record(summary_row("overall", "", &summary.overall))?;
    finish(csv)
}

fn summary_row(title: &str, year: &str, stats: &Stats) -> [String; 6] {
    [
        title.to_string(),
        year.to_string(),
        stats.total_citations.to_string(),
        stats.self_citations.to_string(),
        stats.non_self_citations.to_string(),
        format!("{:.2}", stats.percentage),
    ]
}

fn finish<W: Write>(mut csv: Writer<W>) -> Result<()> {
    csv.flush()?;
    Ok(())
}

fn format_year(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_default()
}

fn join_names<'a>(names: impl IntoIterator<Item = &'a NormalizedName>) -> String {
    names.into_iter().map(NormalizedName::as_str).join(LIST_SEPARATOR)
}
