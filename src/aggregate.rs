//! Aggregation of classification results.
//!
//! An [`Aggregator`] owns the running [`AggregateReport`] for one author's
//! run and is its only mutator. The report can be finalized into a
//! [`Summary`] at any time, including in the middle of a run.
//!
//! # Example
//!
//! ```
//! use selfcite::{Aggregator, Publication, PolicyConfig, classify};
//!
//! let paper = Publication::new("Paper", vec!["A. Lee".into()], Some(2020));
//! let citing = Publication::new("Citing", vec!["A. Lee".into()], Some(2021));
//!
//! let mut aggregator = Aggregator::new();
//! aggregator.record(&classify(&paper, &citing, &PolicyConfig::default()));
//!
//! let summary = aggregator.finalize();
//! assert_eq!(summary.overall.percentage, 100.0);
//! assert_eq!(summary.per_paper[0].stats.total_citations, 1);
//! ```

use crate::{ClassificationResult, Publication};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Identity of a paper within a run. There is no persistent identifier, so
/// title and year stand in for one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaperKey {
    pub title: String,
    pub year: Option<i32>,
}

impl From<&Publication> for PaperKey {
    fn from(publication: &Publication) -> Self {
        Self {
            title: publication.title.trim().to_string(),
            year: publication.year,
        }
    }
}

/// Running citation counts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub total_citations: u32,
    pub self_citations: u32,
}

impl Tally {
    fn record(&mut self, is_self_citation: bool) {
        self.total_citations += 1;
        if is_self_citation {
            self.self_citations += 1;
        }
    }

    pub fn non_self_citations(&self) -> u32 {
        self.total_citations - self.self_citations
    }

    /// Share of self-citations in percent; 0 when there are no citations.
    pub fn percentage(&self) -> f64 {
        if self.total_citations == 0 {
            0.0
        } else {
            f64::from(self.self_citations) * 100.0 / f64::from(self.total_citations)
        }
    }
}

/// Per-paper and overall tallies, in first-seen paper order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AggregateReport {
    per_paper: Vec<(PaperKey, Tally)>,
    index: HashMap<PaperKey, usize>,
    overall: Tally,
}

impl AggregateReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Functional form of [`Aggregator::record`].
    #[must_use]
    pub fn fold(mut self, result: &ClassificationResult) -> Self {
        self.record(result);
        self
    }

    pub fn overall(&self) -> Tally {
        self.overall
    }

    pub fn paper(&self, key: &PaperKey) -> Option<Tally> {
        self.index.get(key).map(|&i| self.per_paper[i].1)
    }

    pub fn papers(&self) -> impl Iterator<Item = (&PaperKey, &Tally)> {
        self.per_paper.iter().map(|(key, tally)| (key, tally))
    }

    pub fn is_empty(&self) -> bool {
        self.per_paper.is_empty()
    }

    /// Computes percentages overall and per paper.
    pub fn finalize(&self) -> Summary {
        Summary {
            overall: Stats::from(self.overall),
            per_paper: self
                .per_paper
                .iter()
                .map(|(key, tally)| PaperSummary {
                    title: key.title.clone(),
                    year: key.year,
                    stats: Stats::from(*tally),
                })
                .collect(),
        }
    }

    fn entry(&mut self, key: PaperKey) -> &mut Tally {
        let existing = self.index.get(&key).copied();
        let i = match existing {
            Some(i) => i,
            None => {
                let i = self.per_paper.len();
                self.index.insert(key.clone(), i);
                self.per_paper.push((key, Tally::default()));
                i
            }
        };
        &mut self.per_paper[i].1
    }

    fn register(&mut self, publication: &Publication) {
        self.entry(PaperKey::from(publication));
    }

    fn record(&mut self, result: &ClassificationResult) {
        self.overall.record(result.is_self_citation);
        self.entry(PaperKey::from(&result.edge.original))
            .record(result.is_self_citation);
    }

    /// Subtracts a paper's counts from the overall tally and resets the paper
    /// to zero, keeping its position.
    fn reset_paper(&mut self, key: &PaperKey) {
        if let Some(&i) = self.index.get(key) {
            let tally = std::mem::take(&mut self.per_paper[i].1);
            self.overall.total_citations -= tally.total_citations;
            self.overall.self_citations -= tally.self_citations;
        }
    }
}

/// Sole owner and mutator of a run's [`AggregateReport`].
#[derive(Debug, Default, Clone)]
pub struct Aggregator {
    report: AggregateReport,
}

impl Aggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure the publication has an entry, even with zero citations.
    pub fn register(&mut self, publication: &Publication) {
        self.report.register(publication);
    }

    /// Counts one classified citation.
    pub fn record(&mut self, result: &ClassificationResult) {
        self.report.record(result);
    }

    pub(crate) fn reset_paper(&mut self, publication: &Publication) {
        self.report.reset_paper(&PaperKey::from(publication));
    }

    pub fn report(&self) -> &AggregateReport {
        &self.report
    }

    pub fn into_report(self) -> AggregateReport {
        self.report
    }

    pub fn finalize(&self) -> Summary {
        self.report.finalize()
    }
}

/// Finalized counts for one paper or for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total_citations: u32,
    pub self_citations: u32,
    pub non_self_citations: u32,
    pub percentage: f64,
}

impl From<Tally> for Stats {
    fn from(tally: Tally) -> Self {
        Self {
            total_citations: tally.total_citations,
            self_citations: tally.self_citations,
            non_self_citations: tally.non_self_citations(),
            percentage: tally.percentage(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSummary {
    pub title: String,
    pub year: Option<i32>,
    #[serde(flatten)]
    pub stats: Stats,
}

/// What the reporting side consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub overall: Stats,
    pub per_paper: Vec<PaperSummary>,
}
