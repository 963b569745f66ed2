//! Single-consumer analysis pipeline.
//!
//! [`Analysis`] owns a [`Classifier`] and an [`Aggregator`] and keeps the
//! ordered log of [`ClassificationResult`]s for reporting. Records can be pushed
//! by hand, or pulled from a [`CitationSource`] with [`Analysis::run`].
//!
//! Retrieval is expected to be interrupted (rate limits, CAPTCHAs). When
//! [`Analysis::run`] fails, everything counted so far stays valid, and running
//! the same `Analysis` again resumes at the first publication that was not
//! completed.

use crate::aggregate::{AggregateReport, Aggregator, PaperKey, Summary};
use crate::classify::{ClassificationResult, Classifier, PolicyConfig};
use crate::normalize::{DefaultNormalizer, NameNormalizer};
use crate::{Publication, Result, SelfCiteError};
use std::collections::HashSet;
use std::fmt::Display;

/// The retrieval side: an author's publications and, per publication, the
/// papers citing it.
pub trait CitationSource {
    /// Transport, CAPTCHA or missing-data failures of the source.
    type Error: Display;

    /// The author's own works.
    fn publications(&mut self) -> std::result::Result<Vec<Publication>, Self::Error>;

    /// The papers citing `publication`. May be called again for the same
    /// publication after a failure.
    fn citing_papers(
        &mut self,
        publication: &Publication,
    ) -> std::result::Result<Vec<Publication>, Self::Error>;
}

/// Classifies and aggregates one author's citations.
#[derive(Debug, Default)]
pub struct Analysis<N = DefaultNormalizer> {
    classifier: Classifier<N>,
    aggregator: Aggregator,
    results: Vec<ClassificationResult>,
    completed: HashSet<PaperKey>,
}

impl Analysis<DefaultNormalizer> {
    #[must_use]
    pub fn new(policy: PolicyConfig) -> Self {
        Self::with_classifier(Classifier::new(policy))
    }
}

impl<N: NameNormalizer> Analysis<N> {
    #[must_use]
    pub fn with_classifier(classifier: Classifier<N>) -> Self {
        Self {
            classifier,
            aggregator: Aggregator::new(),
            results: Vec::new(),
            completed: HashSet::new(),
        }
    }

    /// Registers a publication so it is reported even without citations.
    pub fn add_publication(&mut self, publication: &Publication) {
        self.aggregator.register(publication);
    }

    /// Classifies and counts one citing paper of `original`.
    pub fn add_citation(
        &mut self,
        original: &Publication,
        citing: &Publication,
    ) -> &ClassificationResult {
        let result = self.classifier.classify(original, citing);
        self.push(result)
    }

    /// Classifies a batch of citing papers of `original` and counts them in
    /// input order.
    pub fn add_citations(&mut self, original: &Publication, citing: &[Publication]) {
        self.aggregator.register(original);
        for result in self.classifier.classify_all(original, citing) {
            self.push(result);
        }
    }

    /// Marks a publication as fully processed; [`run`](Self::run) skips it.
    pub fn mark_complete(&mut self, publication: &Publication) {
        self.completed.insert(PaperKey::from(publication));
    }

    pub fn is_complete(&self, publication: &Publication) -> bool {
        self.completed.contains(&PaperKey::from(publication))
    }

    /// Pulls every publication not yet completed from `source`, with its
    /// citing papers.
    ///
    /// Publications are identified by [`PaperKey`] (trimmed title and year).
    /// When the source lists the same title and year more than once, only the
    /// first listing is fetched and counted; the others are logged and
    /// skipped, as versions of one paper share their citations.
    ///
    /// # Errors
    ///
    /// Returns [`SelfCiteError::Source`] with the source's message on the
    /// first failed fetch. Publications completed before the failure stay
    /// counted; calling `run` again resumes after them.
    pub fn run<S: CitationSource>(&mut self, source: &mut S) -> Result<()> {
        let publications = source.publications().map_err(source_error)?;
        tracing::info!(publications = publications.len(), "starting citation analysis");

        let mut listed = HashSet::new();
        for publication in &publications {
            if !listed.insert(PaperKey::from(publication)) {
                tracing::debug!(title = %publication.title, "duplicate listing, skipping");
                continue;
            }
            if self.is_complete(publication) {
                tracing::debug!(title = %publication.title, "already analyzed, skipping");
                continue;
            }
            self.add_publication(publication);
            let citing = source.citing_papers(publication).map_err(|err| {
                tracing::warn!(title = %publication.title, error = %err, "citation fetch interrupted");
                source_error(err)
            })?;

            self.discard_partial(publication);
            self.add_citations(publication, &citing);
            self.mark_complete(publication);
            tracing::info!(
                title = %publication.title,
                citations = citing.len(),
                "publication analyzed"
            );
        }
        Ok(())
    }

    pub fn policy(&self) -> &PolicyConfig {
        self.classifier.policy()
    }

    /// Classification results in the order they were counted.
    pub fn results(&self) -> &[ClassificationResult] {
        &self.results
    }

    pub fn report(&self) -> &AggregateReport {
        self.aggregator.report()
    }

    /// Finalized statistics for everything counted so far.
    pub fn summary(&self) -> Summary {
        self.aggregator.finalize()
    }

    pub fn into_parts(self) -> (Vec<ClassificationResult>, AggregateReport) {
        (self.results, self.aggregator.into_report())
    }

    fn push(&mut self, result: ClassificationResult) -> &ClassificationResult {
        self.aggregator.record(&result);
        self.results.push(result);
        match self.results.last() {
            Some(pushed) => pushed,
            None => unreachable!("result was pushed above"),
        }
    }

    /// Drops results of a publication whose citations were only partly fed,
    /// so that re-feeding it does not count anything twice.
    fn discard_partial(&mut self, publication: &Publication) {
        let key = PaperKey::from(publication);
        let before = self.results.len();
        self.results
            .retain(|result| PaperKey::from(&result.edge.original) != key);
        if self.results.len() != before {
            tracing::debug!(
                title = %publication.title,
                discarded = before - self.results.len(),
                "discarding partial citations"
            );
            self.aggregator.reset_paper(publication);
        }
    }
}

fn source_error(err: impl Display) -> SelfCiteError {
    SelfCiteError::Source(err.to_string())
}
