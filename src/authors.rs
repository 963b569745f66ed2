//! Author-list parsing.
//!
//! Splits a raw "authors" field into individual raw names, in source order.
//! The hard part is the comma: in `"Smith, John and Lee, Alice"` it orders a
//! single name, in `"J Smith, A Lee"` it separates two authors.
//!
//! # Example
//!
//! ```
//! use selfcite::authors::parse_authors;
//!
//! assert_eq!(parse_authors("J Smith, A Lee"), vec!["J Smith", "A Lee"]);
//! assert_eq!(
//!     parse_authors("Smith, John and Lee, Alice"),
//!     vec!["Smith, John", "Lee, Alice"]
//! );
//! ```

use crate::regex::Regex;
use crate::utils::{
    clean_word, has_alphabetic, is_capitalized_suffix, is_initials_cluster, is_particle,
    is_single_initial, is_suffix, split_words,
};
use std::sync::LazyLock;

static AND_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|\s+)and\s+|\s*&\s*").unwrap());

static TRUNCATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:[,;\s]*(?:…|\.\.\.|\bet\s+al\.?))+\s*$").unwrap());

/// Strategy for splitting a raw author field into raw names.
pub trait AuthorListParser {
    /// Split `raw_field` into names, preserving source order. Never fails:
    /// unusable input comes back as a single-element vector.
    fn parse_authors(&self, raw_field: &str) -> Vec<String>;
}

/// The separator-detecting parser described in the module docs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAuthorListParser;

/// Parses an author field with [`DefaultAuthorListParser`].
pub fn parse_authors(raw_field: &str) -> Vec<String> {
    DefaultAuthorListParser.parse_authors(raw_field)
}

impl AuthorListParser for DefaultAuthorListParser {
    fn parse_authors(&self, raw_field: &str) -> Vec<String> {
        let field = TRUNCATION.replace(raw_field.trim(), "");

        let names: Vec<String> = field
            .split(';')
            .flat_map(|piece| AND_SEPARATOR.split(piece.trim()))
            .flat_map(split_piece)
            .filter(|name| has_alphabetic(name))
            .collect();

        if names.is_empty() {
            vec![raw_field.to_string()]
        } else {
            names
        }
    }
}

/// Splits one separator-free piece on commas, pairing "Last, First" segments
/// when every comma in the piece reads as a name-order comma.
fn split_piece(piece: &str) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    for segment in piece.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match segments.last_mut() {
            Some(previous) if is_suffix_segment(segment) => {
                previous.push_str(", ");
                previous.push_str(segment);
            }
            _ => segments.push(segment.to_string()),
        }
    }

    let paired = segments.len() % 2 == 0
        && segments.chunks(2).all(|pair| {
            is_surname_like(pair[0].as_str()) && is_given_like(pair[1].as_str())
        });

    if paired {
        segments
            .chunks(2)
            .map(|pair| format!("{}, {}", pair[0], pair[1]))
            .collect()
    } else {
        segments
    }
}

/// A segment made only of suffixes, such as `"Jr."`, `"PhD"` or `"MD"`.
fn is_suffix_segment(segment: &str) -> bool {
    let words = split_words(segment);
    !words.is_empty()
        && words
            .iter()
            .all(|w| is_suffix(&clean_word(w)) || is_capitalized_suffix(w))
}

/// One surname word, optionally preceded by lowercase particles, and no
/// initials: `"Smith"`, `"Smith-Jones"`, `"van der Berg"`.
fn is_surname_like(segment: &str) -> bool {
    let words = split_words(segment);
    let Some((last, leading)) = words.split_last() else {
        return false;
    };
    !is_single_initial(last)
        && !is_initials_cluster(last)
        && !segment.contains('.')
        && leading.iter().all(|w| is_particle(&clean_word(w)))
}

/// Initials or at most three capitalized words: `"J."`, `"J.Q."`, `"JQ"`,
/// `"John Q."`, `"Jean-Paul"`.
fn is_given_like(segment: &str) -> bool {
    let words = split_words(segment);
    !words.is_empty()
        && words.len() <= 3
        && words.iter().all(|w| {
            is_single_initial(w)
                || is_initials_cluster(w)
                || w.chars().next().is_some_and(char::is_uppercase)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("J Smith, A Lee", &["J Smith", "A Lee"])]
    #[case("JQ Smith, A Lee, B Kim", &["JQ Smith", "A Lee", "B Kim"])]
    #[case("Smith, John", &["Smith, John"])]
    #[case("Smith, John Q.", &["Smith, John Q."])]
    #[case("Smith, John and Lee, Alice", &["Smith, John", "Lee, Alice"])]
    #[case("Smith, J., Lee, A.", &["Smith, J.", "Lee, A."])]
    #[case("Smith, J., Lee, A. & Kim, B.", &["Smith, J.", "Lee, A.", "Kim, B."])]
    #[case("John Smith and Alice Lee", &["John Smith", "Alice Lee"])]
    #[case("John Smith, Alice Lee and Bob Kim", &["John Smith", "Alice Lee", "Bob Kim"])]
    #[case("John Smith, Alice Lee, and Bob Kim", &["John Smith", "Alice Lee", "Bob Kim"])]
    #[case("John Smith & Alice Lee", &["John Smith", "Alice Lee"])]
    #[case("Smith J; Lee A; Kim B", &["Smith J", "Lee A", "Kim B"])]
    #[case("Smith, John; Lee, Alice", &["Smith, John", "Lee, Alice"])]
    #[case("Smith, J.; Lee, A.; and Kim, B.", &["Smith, J.", "Lee, A.", "Kim, B."])]
    #[case("Smith J; Lee A & Kim B", &["Smith J", "Lee A", "Kim B"])]
    #[case("Smith, J.; Lee, A. and Kim, B.", &["Smith, J.", "Lee, A.", "Kim, B."])]
    #[case("Smith, John, MD and Lee, Alice", &["Smith, John, MD", "Lee, Alice"])]
    #[case("Rahman, Md and Lee, Alice", &["Rahman, Md", "Lee, Alice"])]
    #[case("Anderson, Ferdinand", &["Anderson, Ferdinand"])]
    #[case("van der Berg, Jan and Lee, Alice", &["van der Berg, Jan", "Lee, Alice"])]
    #[case("Smith, John, Jr. and Lee, Alice", &["Smith, John, Jr.", "Lee, Alice"])]
    #[case("John Smith, Jr., Alice Lee", &["John Smith, Jr.", "Alice Lee"])]
    #[case("J Smith, A Lee…", &["J Smith", "A Lee"])]
    #[case("J Smith, A Lee, et al.", &["J Smith", "A Lee"])]
    #[case("Ferdinand Anderson and Sandra Brand", &["Ferdinand Anderson", "Sandra Brand"])]
    #[case("Aristotle", &["Aristotle"])]
    fn test_parse_authors(#[case] field: &str, #[case] expected: &[&str]) {
        assert_eq!(parse_authors(field), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("---")]
    #[case("1, 2, 3")]
    fn test_unparseable_field_falls_back_to_whole_field(#[case] field: &str) {
        assert_eq!(parse_authors(field), vec![field.to_string()]);
    }

    #[test]
    fn test_last_author_is_last_element() {
        let authors = parse_authors("A. Lee and B. Kim");
        assert_eq!(authors.last().map(String::as_str), Some("B. Kim"));
    }

    #[test]
    fn test_segment_shapes() {
        assert!(is_surname_like("Smith"));
        assert!(is_surname_like("van der Berg"));
        assert!(!is_surname_like("J Smith"));
        assert!(!is_surname_like("J."));
        assert!(is_given_like("J.Q."));
        assert!(is_given_like("John Q."));
        assert!(!is_given_like("lee"));
        assert!(is_suffix_segment("Jr."));
        assert!(is_suffix_segment("MD"));
        assert!(!is_suffix_segment("Md"));
        assert!(!is_suffix_segment("John"));
    }
}
