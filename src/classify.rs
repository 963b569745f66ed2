//! Self-citation classification.
//!
//! A citation edge is a self-citation when a qualifying author of the original
//! paper also appears among the citing paper's authors. Which authors qualify
//! is decided by [`PolicyConfig`]:
//!
//! - any author of the original (the default), or
//! - only the original's last author, with `last_author_is_self_source`.
//!
//! Names are compared with [`NormalizedName::matches_initial`] unless
//! `match_initials` is turned off, so `J. Q. Smith` on the citing paper counts
//! as `John Smith` on the original.
//!
//! # Example
//!
//! ```
//! use selfcite::{Publication, classify::{classify, PolicyConfig}};
//!
//! let original = Publication::new("Paper", vec!["A. Lee".into(), "B. Kim".into()], Some(2020));
//! let citing = Publication::new("Follow-up", vec!["A. Lee".into()], Some(2022));
//!
//! assert!(classify(&original, &citing, &PolicyConfig::default()).is_self_citation);
//!
//! let last_author_only = PolicyConfig::default().with_last_author_is_self_source(true);
//! assert!(!classify(&original, &citing, &last_author_only).is_self_citation);
//! ```

use crate::normalize::{DefaultNormalizer, NameNormalizer, NormalizedName};
use crate::{CitationEdge, Publication};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Run-wide definition of a self-citation.
///
/// Built once at startup and passed explicitly to every classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Only the last author of the original paper counts as "self".
    pub last_author_is_self_source: bool,
    /// Also treat an initial as matching a full given name with the same
    /// surname (`J. Q. Smith` ~ `John Smith`). On by default; turning it off
    /// leaves strict equality of normalized names.
    pub match_initials: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            last_author_is_self_source: false,
            match_initials: true,
        }
    }
}

impl PolicyConfig {
    #[must_use]
    pub fn with_last_author_is_self_source(mut self, enabled: bool) -> Self {
        self.last_author_is_self_source = enabled;
        self
    }

    #[must_use]
    pub fn with_match_initials(mut self, enabled: bool) -> Self {
        self.match_initials = enabled;
        self
    }

    fn names_match(&self, a: &NormalizedName, b: &NormalizedName) -> bool {
        if self.match_initials {
            a.matches_initial(b)
        } else {
            a.matches(b)
        }
    }
}

/// The outcome of classifying one citation edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub edge: CitationEdge,
    pub is_self_citation: bool,
    /// Distinct normalized authors of the original paper, `Unknown` excluded.
    pub original_normalized_authors: BTreeSet<NormalizedName>,
    /// Distinct normalized authors of the citing paper, `Unknown` excluded.
    pub citing_normalized_authors: BTreeSet<NormalizedName>,
    /// Qualifying original authors found on the citing paper.
    pub shared_authors: Vec<NormalizedName>,
}

/// Classifies edges with a fixed normalizer and policy.
#[derive(Debug, Default, Clone)]
pub struct Classifier<N = DefaultNormalizer> {
    normalizer: N,
    policy: PolicyConfig,
}

impl Classifier<DefaultNormalizer> {
    /// Creates a classifier using the default name normalization.
    #[must_use]
    pub fn new(policy: PolicyConfig) -> Self {
        Self {
            normalizer: DefaultNormalizer,
            policy,
        }
    }
}

impl<N: NameNormalizer> Classifier<N> {
    /// Creates a classifier with a custom normalization strategy.
    #[must_use]
    pub fn with_normalizer(normalizer: N, policy: PolicyConfig) -> Self {
        Self { normalizer, policy }
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    /// Classifies `citing` as a citation of `original`.
    pub fn classify(&self, original: &Publication, citing: &Publication) -> ClassificationResult {
        let original_normalized_authors = self.normalize_all(&original.authors);
        let citing_normalized_authors = self.normalize_all(&citing.authors);

        let source_set: Vec<NormalizedName> = if self.policy.last_author_is_self_source {
            original
                .last_author()
                .map(|last| self.normalizer.normalize(last))
                .into_iter()
                .filter(|name| !name.is_unknown())
                .collect()
        } else {
            original_normalized_authors.iter().cloned().collect()
        };

        let shared_authors: Vec<NormalizedName> = source_set
            .into_iter()
            .filter(|source| {
                citing_normalized_authors
                    .iter()
                    .any(|name| self.policy.names_match(source, name))
            })
            .collect();
        let is_self_citation = !shared_authors.is_empty();

        tracing::debug!(
            original = %original.title,
            citing = %citing.title,
            is_self_citation,
            "classified citation"
        );

        ClassificationResult {
            edge: CitationEdge {
                original: original.clone(),
                citing: citing.clone(),
            },
            is_self_citation,
            original_normalized_authors,
            citing_normalized_authors,
            shared_authors,
        }
    }

    /// Classifies every citing paper of one original, keeping input order.
    #[cfg(not(feature = "parallel"))]
    pub fn classify_all(
        &self,
        original: &Publication,
        citing: &[Publication],
    ) -> Vec<ClassificationResult> {
        citing.iter().map(|c| self.classify(original, c)).collect()
    }

    /// Classifies every citing paper of one original, keeping input order.
    ///
    /// Classification is pure, so the batch runs on the rayon pool; folding
    /// the results stays with a single consumer.
    #[cfg(feature = "parallel")]
    pub fn classify_all(
        &self,
        original: &Publication,
        citing: &[Publication],
    ) -> Vec<ClassificationResult> {
        use rayon::prelude::*;

        citing
            .par_iter()
            .map(|c| self.classify(original, c))
            .collect()
    }

    fn normalize_all(&self, authors: &[String]) -> BTreeSet<NormalizedName> {
        authors
            .iter()
            .filter_map(|raw| match self.normalizer.normalize(raw) {
                NormalizedName::Unknown => {
                    tracing::warn!(name = %raw, "unparseable author name ignored");
                    None
                }
                name => Some(name),
            })
            .collect()
    }
}

/// Classifies one edge with the default normalizer.
pub fn classify(
    original: &Publication,
    citing: &Publication,
    policy: &PolicyConfig,
) -> ClassificationResult {
    Classifier::new(*policy).classify(original, citing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn publication(title: &str, authors: &[&str]) -> Publication {
        Publication::new(
            title,
            authors.iter().map(|a| a.to_string()).collect(),
            Some(2020),
        )
    }

    fn any_author() -> PolicyConfig {
        PolicyConfig::default()
    }

    fn last_author() -> PolicyConfig {
        PolicyConfig::default().with_last_author_is_self_source(true)
    }

    #[rstest]
    #[case(&["B. Kim"], any_author(), true)]
    #[case(&["B. Kim"], last_author(), true)]
    #[case(&["A. Lee"], any_author(), true)]
    #[case(&["A. Lee"], last_author(), false)]
    #[case(&["C. Park"], any_author(), false)]
    #[case(&["C. Park"], last_author(), false)]
    fn test_policy_switch(
        #[case] citing_authors: &[&str],
        #[case] policy: PolicyConfig,
        #[case] expected: bool,
    ) {
        let original = publication("Original", &["A. Lee", "B. Kim"]);
        let citing = publication("Citing", citing_authors);
        assert_eq!(classify(&original, &citing, &policy).is_self_citation, expected);
    }

    #[test]
    fn test_formatting_variants_match() {
        let original = publication("Original", &["Smith, John Q.", "García, José"]);
        let citing = publication("Citing", &["Jose Garcia", "Alice Wong"]);
        let result = classify(&original, &citing, &any_author());
        assert!(result.is_self_citation);
        assert_eq!(result.shared_authors, vec![crate::normalize::normalize("jose garcia")]);
    }

    #[test]
    fn test_unknown_names_never_match() {
        let original = publication("Original", &["???", ""]);
        let citing = publication("Citing", &["???", "..."]);
        let result = classify(&original, &citing, &any_author());
        assert!(!result.is_self_citation);
        assert!(result.original_normalized_authors.is_empty());
        assert!(result.citing_normalized_authors.is_empty());
    }

    #[test]
    fn test_unknown_last_author_never_matches() {
        let original = publication("Original", &["A. Lee", "--"]);
        let citing = publication("Citing", &["A. Lee", "--"]);
        assert!(!classify(&original, &citing, &last_author()).is_self_citation);
    }

    #[test]
    fn test_empty_original_authors() {
        let original = publication("Original", &[]);
        let citing = publication("Citing", &["A. Lee"]);
        assert!(!classify(&original, &citing, &any_author()).is_self_citation);
        assert!(!classify(&original, &citing, &last_author()).is_self_citation);
    }

    #[test]
    fn test_duplicate_authors_collapse() {
        let original = publication("Original", &["John Smith", "Smith, John", "J. Q. Smith"]);
        let citing = publication("Citing", &["Alice Wong"]);
        let result = classify(&original, &citing, &any_author());
        assert_eq!(result.original_normalized_authors.len(), 2);
    }

    #[rstest]
    #[case(&["John Smith"], &["J. Q. Smith"])]
    #[case(&["John Q Smith"], &["J Smith"])]
    #[case(&["J. Q. Smith"], &["Smith, John"])]
    #[case(&["John Smith", "Alice Wong"], &["JQ Smith", "B Kim"])]
    fn test_initials_match_full_names_by_default(
        #[case] original_authors: &[&str],
        #[case] citing_authors: &[&str],
    ) {
        let original = publication("Original", original_authors);
        let citing = publication("Citing", citing_authors);
        let result = classify(&original, &citing, &PolicyConfig::default());
        assert!(result.is_self_citation);
        assert_eq!(result.shared_authors.len(), 1);
    }

    #[test]
    fn test_distinct_given_names_never_match() {
        let original = publication("Original", &["John Smith"]);
        let citing = publication("Citing", &["James Smith", "J. Jones"]);
        assert!(!classify(&original, &citing, &PolicyConfig::default()).is_self_citation);
    }

    #[test]
    fn test_strict_matching() {
        let original = publication("Original", &["John Smith", "Alice Wong"]);
        let citing = publication("Citing", &["J Smith", "B Kim"]);
        let strict = any_author().with_match_initials(false);

        assert!(!classify(&original, &citing, &strict).is_self_citation);
        assert!(classify(&original, &citing, &any_author()).is_self_citation);
    }

    #[test]
    fn test_initial_matches_last_author() {
        let original = publication("Original", &["A. Lee", "Bora Kim"]);
        let citing = publication("Citing", &["B. Kim"]);
        assert!(classify(&original, &citing, &last_author()).is_self_citation);
    }

    #[test]
    fn test_deterministic() {
        let original = publication("Original", &["A. Lee", "B. Kim", "Smith, John"]);
        let citing = publication("Citing", &["John Smith", "D. Choi"]);
        let first = classify(&original, &citing, &any_author());
        let second = classify(&original, &citing, &any_author());
        assert_eq!(first, second);
        assert_eq!(original.authors.len(), 3);
    }

    #[test]
    fn test_classify_all_keeps_order() {
        let original = publication("Original", &["A. Lee", "B. Kim"]);
        let citing: Vec<Publication> = (0..20)
            .map(|i| {
                let author = if i % 3 == 0 { "A. Lee" } else { "Z. Other" };
                publication(&format!("Citing {i}"), &[author])
            })
            .collect();

        let classifier = Classifier::new(any_author());
        let results = classifier.classify_all(&original, &citing);

        assert_eq!(results.len(), 20);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.edge.citing.title, format!("Citing {i}"));
            assert_eq!(result.is_self_citation, i % 3 == 0);
        }
    }

    #[test]
    fn test_custom_normalizer() {
        let surname_only = |raw: &str| match raw.split_whitespace().last() {
            Some(last) => NormalizedName::Known(last.to_lowercase().into()),
            None => NormalizedName::Unknown,
        };
        let classifier = Classifier::with_normalizer(surname_only, any_author());
        let original = publication("Original", &["Alice Smith"]);
        let citing = publication("Citing", &["Bob Smith"]);
        assert!(classifier.classify(&original, &citing).is_self_citation);
    }

    #[test]
    fn test_policy_deserializes_with_defaults() {
        let policy: PolicyConfig =
            serde_json::from_str(r#"{"last_author_is_self_source": true}"#).unwrap();
        assert_eq!(policy, last_author());
        assert!(policy.match_initials);
    }
}
