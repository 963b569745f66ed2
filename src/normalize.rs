//! Author name normalization.
//!
//! Turns a raw author name, as scraped from a bibliographic record, into a
//! [`NormalizedName`] whose equality stands in for "same person".
//!
//! # Canonical form
//!
//! The default rule keeps the first given name (or its initial) and the
//! surname, and drops everything else:
//!
//! | Raw name              | Normalized          |
//! |-----------------------|---------------------|
//! | `John Q. Smith`       | `john smith`        |
//! | `Smith, John Q.`      | `john smith`        |
//! | `J. Q. Smith`         | `j smith`           |
//! | `Duan JJ`             | `j duan`            |
//! | `José García`         | `jose garcia`       |
//! | `Ludwig van Beethoven`| `ludwig van-beethoven` |
//! | `Dr. Jane Doe, PhD`   | `jane doe`          |
//! | `Md Rahman`           | `md rahman`         |
//!
//! Multi-part surnames are joined with hyphens so that they stay one unit and
//! the canonical form normalizes to itself. "Last Initials" order is only read
//! from names with capital letters; canonical text is all lowercase and is
//! never reordered.
//!
//! # Example
//!
//! ```
//! use selfcite::normalize::{normalize, NormalizedName};
//!
//! assert_eq!(normalize("Smith, John Q."), normalize("John Smith"));
//! assert_ne!(normalize("James Smith"), normalize("John Smith"));
//! assert_eq!(normalize("???"), NormalizedName::Unknown);
//! ```

use crate::utils::{
    clean_word, fold_diacritics, has_alphabetic, has_uppercase, is_capitalized_suffix,
    is_honorific, is_initials_cluster, is_mixed_case, is_particle, is_single_initial, is_suffix,
    split_words, unify_dashes,
};
use compact_str::{CompactString, format_compact};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical author name.
///
/// `Unknown` is the sentinel for names with no usable content. It is a normal
/// value for storage and ordering, but [`NormalizedName::matches`] never
/// reports it as matching anything, itself included.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NormalizedName {
    Known(CompactString),
    Unknown,
}

impl NormalizedName {
    /// The canonical text, or an empty string for `Unknown`.
    pub fn as_str(&self) -> &str {
        match self {
            NormalizedName::Known(name) => name.as_str(),
            NormalizedName::Unknown => "",
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, NormalizedName::Unknown)
    }

    /// The surname unit (the last space-separated part).
    pub fn surname(&self) -> Option<&str> {
        match self {
            NormalizedName::Known(name) => name.rsplit(' ').next(),
            NormalizedName::Unknown => None,
        }
    }

    /// The kept given name or initial, if the name had one.
    pub fn given(&self) -> Option<&str> {
        match self {
            NormalizedName::Known(name) => name.rsplit_once(' ').map(|(given, _)| given),
            NormalizedName::Unknown => None,
        }
    }

    /// Strict identity: equal canonical forms, and neither side is `Unknown`.
    pub fn matches(&self, other: &NormalizedName) -> bool {
        !self.is_unknown() && self == other
    }

    /// Like [`matches`](Self::matches), but also accepts an initial against a
    /// full given name with the same surname (`j smith` ~ `john smith`).
    ///
    /// This relation is not transitive, so it is only ever used pairwise and
    /// never as equality.
    pub fn matches_initial(&self, other: &NormalizedName) -> bool {
        if self.matches(other) {
            return true;
        }
        let (Some(surname), Some(other_surname)) = (self.surname(), other.surname()) else {
            return false;
        };
        if surname != other_surname {
            return false;
        }
        match (self.given(), other.given()) {
            (Some(a), Some(b)) => initial_compatible(a, b) || initial_compatible(b, a),
            _ => false,
        }
    }
}

/// `initial` is a single letter and `given` starts with it.
fn initial_compatible(initial: &str, given: &str) -> bool {
    let mut letters = initial.chars();
    match (letters.next(), letters.next()) {
        (Some(letter), None) => given.starts_with(letter),
        _ => false,
    }
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy for turning raw names into [`NormalizedName`]s.
///
/// The classifier only talks to this trait, so an alternative rule can be
/// swapped in without touching classification or aggregation. Closures of
/// type `Fn(&str) -> NormalizedName` implement it too.
///
/// Implementations are shared across threads when a batch is classified in
/// parallel.
pub trait NameNormalizer: Send + Sync {
    /// Normalize one raw author name. Must be pure and idempotent.
    fn normalize(&self, raw: &str) -> NormalizedName;
}

impl<F> NameNormalizer for F
where
    F: Fn(&str) -> NormalizedName + Send + Sync,
{
    fn normalize(&self, raw: &str) -> NormalizedName {
        self(raw)
    }
}

/// The default normalization rule described in the module docs.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNormalizer;

/// Normalizes a name with [`DefaultNormalizer`].
pub fn normalize(raw: &str) -> NormalizedName {
    DefaultNormalizer.normalize(raw)
}

#[derive(Debug, Clone)]
struct Token {
    text: String,
    initial: bool,
}

impl NameNormalizer for DefaultNormalizer {
    fn normalize(&self, raw: &str) -> NormalizedName {
        let folded = unify_dashes(&fold_diacritics(raw));
        if !has_alphabetic(&folded) {
            return NormalizedName::Unknown;
        }
        let mixed_case = is_mixed_case(&folded);
        let trailing_initials = has_uppercase(&folded);

        let segments: Vec<Vec<Token>> = folded
            .split(',')
            .map(|segment| tokenize(segment, mixed_case))
            .filter(|tokens| !tokens.is_empty())
            .collect();

        let (given, surname) = match segments.as_slice() {
            [] => return NormalizedName::Unknown,
            [tokens] => split_natural_order(tokens, trailing_initials),
            [family, rest @ ..] => split_reversed_order(family, rest),
        };

        let surname = surname.iter().map(|t| t.text.as_str()).join("-");
        if surname.is_empty() {
            return NormalizedName::Unknown;
        }
        let canonical = match given.first() {
            Some(first) => format_compact!("{} {}", first.text, surname),
            None => CompactString::from(surname),
        };
        NormalizedName::Known(canonical)
    }
}

/// Turns one comma-free segment into cleaned tokens, expanding initials
/// clusters and dropping honorifics and suffixes.
fn tokenize(segment: &str, mixed_case: bool) -> Vec<Token> {
    let words = split_words(segment);
    let mut tokens = Vec::new();
    for (i, &word) in words.iter().enumerate() {
        let cleaned = clean_word(word);
        if cleaned.is_empty() || is_suffix(&cleaned) {
            continue;
        }
        if i + 1 == words.len() && is_capitalized_suffix(word) {
            continue;
        }
        if mixed_case && is_initials_cluster(word) {
            tokens.extend(cleaned.chars().map(|c| Token {
                text: c.to_string(),
                initial: true,
            }));
            continue;
        }
        if is_honorific(&cleaned) {
            continue;
        }
        tokens.push(Token {
            initial: is_single_initial(&cleaned),
            text: cleaned,
        });
    }
    tokens
}

/// "First [Middle] Last" or, when `trailing_initials` allows it and the name
/// ends in initials, "Last Initials".
fn split_natural_order(tokens: &[Token], trailing_initials: bool) -> (Vec<Token>, Vec<Token>) {
    if tokens.len() == 1 {
        return (Vec::new(), tokens.to_vec());
    }

    let initials_from = tokens
        .iter()
        .rposition(|t| !t.initial)
        .map_or(0, |last_word| last_word + 1);
    if trailing_initials
        && initials_from > 0
        && initials_from < tokens.len()
        && tokens[..initials_from].iter().all(|t| !t.initial)
    {
        let (surname, given) = tokens.split_at(initials_from);
        return (given.to_vec(), surname.to_vec());
    }

    let mut surname_from = tokens.len() - 1;
    while surname_from > 1 && is_particle(&tokens[surname_from - 1].text) {
        surname_from -= 1;
    }
    let (given, surname) = tokens.split_at(surname_from);
    (given.to_vec(), surname.to_vec())
}

/// "Last, First [Middle]": particles trailing the given part move to the
/// surname ("Beethoven, Ludwig van").
fn split_reversed_order(family: &[Token], rest: &[Vec<Token>]) -> (Vec<Token>, Vec<Token>) {
    let mut given: Vec<Token> = rest.concat();
    let mut surname = family.to_vec();
    while given.len() > 1 && given.last().is_some_and(|t| is_particle(&t.text)) {
        if let Some(particle) = given.pop() {
            surname.insert(0, particle);
        }
    }
    (given, surname)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn known(name: &str) -> NormalizedName {
        NormalizedName::Known(CompactString::from(name))
    }

    #[rstest]
    #[case("John Smith", "john smith")]
    #[case("  John   Smith ", "john smith")]
    #[case("John Q Smith", "john smith")]
    #[case("John Quincy Smith", "john smith")]
    #[case("Smith, John Q.", "john smith")]
    #[case("Smith, John", "john smith")]
    #[case("J. Q. Smith", "j smith")]
    #[case("J.Q. Smith", "j smith")]
    #[case("JQ Smith", "j smith")]
    #[case("Smith, J.Q.", "j smith")]
    #[case("Smith J", "j smith")]
    #[case("Duan JJ", "j duan")]
    #[case("JOHN SMITH", "john smith")]
    #[case("José García", "jose garcia")]
    #[case("Dr. Jane Doe", "jane doe")]
    #[case("Jane Doe, PhD", "jane doe")]
    #[case("Smith, John, Jr.", "john smith")]
    #[case("John Smith III", "john smith")]
    #[case("Prof. Dr. Hans Müller", "hans muller")]
    #[case("Smith-Jones, Mary", "mary smith-jones")]
    #[case("Mary Smith-Jones", "mary smith-jones")]
    #[case("Jean-Paul Sartre", "jean-paul sartre")]
    #[case("J.-P. Sartre", "j sartre")]
    #[case("Ludwig van Beethoven", "ludwig van-beethoven")]
    #[case("Beethoven, Ludwig van", "ludwig van-beethoven")]
    #[case("Jan van der Berg", "jan van-der-berg")]
    #[case("van der Berg JH", "j van-der-berg")]
    #[case("García Márquez, Gabriel", "gabriel garcia-marquez")]
    #[case("Seán O'Brien", "sean obrien")]
    #[case("Aristotle", "aristotle")]
    #[case("MS Smith", "m smith")]
    #[case("Ms. Alice Smith", "alice smith")]
    #[case("Md Rahman", "md rahman")]
    #[case("Md. Rahman", "md rahman")]
    #[case("Rahman, Md", "md rahman")]
    #[case("John Smith MD", "john smith")]
    #[case("Smith, John, MD", "john smith")]
    #[case("X, John", "john x")]
    #[case("de la Cruz, Maria", "maria de-la-cruz")]
    fn test_normalize(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize(raw), known(expected));
        assert_eq!(normalize(expected), known(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("...")]
    #[case("12345")]
    #[case(", ,")]
    #[case("Jr.")]
    #[case("Dr.")]
    fn test_unknown(#[case] raw: &str) {
        assert_eq!(normalize(raw), NormalizedName::Unknown);
    }

    #[rstest]
    #[case("John Q. Smith")]
    #[case("Smith, John Q.")]
    #[case("J. Q. Smith")]
    #[case("Duan JJ")]
    #[case("Beethoven, Ludwig van")]
    #[case("van der Berg JH")]
    #[case("García Márquez, Gabriel")]
    #[case("Dr. Jane Doe, PhD")]
    #[case("JOHN SMITH")]
    #[case("Aristotle")]
    #[case("John X")]
    #[case("X, John")]
    #[case("O, Minho")]
    #[case("Li, X")]
    #[case("Cruz, de")]
    #[case("van Berg")]
    #[case("A. B.")]
    #[case("王 小明")]
    #[case("小明 王")]
    #[case("Ii, John")]
    #[case("Smith, MD")]
    #[case("Md Rahman")]
    #[case("Md, John")]
    #[case("John Smith, Jr., MD")]
    #[case("Smith J")]
    #[case("")]
    #[case("王小明")]
    fn test_idempotent(#[case] raw: &str) {
        let once = normalize(raw);
        assert_eq!(normalize(once.as_str()), once);
    }

    #[test]
    fn test_formatting_variants_are_equal() {
        assert_eq!(normalize("Smith, John Q."), normalize("John Smith"));
        assert_eq!(normalize("José García"), normalize("Jose Garcia"));
        assert_eq!(normalize("John Q Smith"), normalize("John Smith"));
    }

    #[test]
    fn test_given_name_md_is_kept() {
        assert_ne!(normalize("Md Rahman"), normalize("Rahman"));
        assert_ne!(normalize("Md. Rahman"), normalize("Habib Rahman"));
        assert_eq!(normalize("Md Rahman"), normalize("Rahman, Md"));
    }

    #[test]
    fn test_distinct_first_names_do_not_collapse() {
        assert_ne!(normalize("James Smith"), normalize("John Smith"));
        assert_ne!(normalize("J. Smith"), normalize("John Smith"));
    }

    #[test]
    fn test_unknown_never_matches() {
        let unknown = normalize("");
        assert!(!unknown.matches(&normalize("???")));
        assert!(!unknown.matches(&unknown));
        assert!(!unknown.matches_initial(&unknown));
    }

    #[test]
    fn test_matches_initial() {
        let initial = normalize("J. Smith");
        assert!(initial.matches_initial(&normalize("John Smith")));
        assert!(normalize("John Smith").matches_initial(&initial));
        assert!(!initial.matches_initial(&normalize("Alice Smith")));
        assert!(!initial.matches_initial(&normalize("John Jones")));
        assert!(!normalize("James Smith").matches_initial(&normalize("John Smith")));
        assert!(!normalize("Smith").matches_initial(&normalize("John Smith")));
    }

    #[test]
    fn test_parts() {
        let name = normalize("Beethoven, Ludwig van");
        assert_eq!(name.given(), Some("ludwig"));
        assert_eq!(name.surname(), Some("van-beethoven"));
        assert_eq!(normalize("Aristotle").given(), None);
        assert_eq!(NormalizedName::Unknown.surname(), None);
    }

    #[test]
    fn test_closure_normalizer() {
        let lower = |raw: &str| NormalizedName::Known(CompactString::from(raw.to_lowercase()));
        assert_eq!(lower.normalize("ABC"), known("abc"));
    }
}
