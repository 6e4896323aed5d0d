//! Coverage validation
//!
//! Scores how much of the reference definition's concept vocabulary a
//! candidate explanation reflects. Lexical overlap is a proxy for
//! accuracy, not a clinical guarantee.

use serde::Serialize;
use tracing::debug;

use crate::concepts::{ConceptExtractor, ConceptSet};
use crate::parser::GeneratedSections;

/// Result of scoring one candidate against the reference definition.
///
/// The concept sets are carried for diagnostics and logging; only
/// `coverage` feeds the accept decision.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    /// Fraction of reference concepts present in the candidate, in [0, 1].
    pub coverage: f64,
    pub reference_concepts: ConceptSet,
    pub candidate_concepts: ConceptSet,
    pub matched_concepts: ConceptSet,
}

/// Scores concept overlap between a reference definition and a parsed
/// candidate, and decides acceptance against a configured threshold.
#[derive(Debug, Clone)]
pub struct CoverageValidator {
    extractor: ConceptExtractor,
    threshold: f64,
}

impl CoverageValidator {
    pub fn new(extractor: ConceptExtractor, threshold: f64) -> Self {
        Self {
            extractor,
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score a candidate. An empty reference definition means there is
    /// nothing to fail against, so coverage is 1.0 by convention.
    pub fn score(&self, reference_definition: &str, candidate: &GeneratedSections) -> ValidationOutcome {
        if reference_definition.trim().is_empty() {
            debug!("reference definition is empty, coverage defaults to 1.0");
            return ValidationOutcome {
                coverage: 1.0,
                reference_concepts: ConceptSet::new(),
                candidate_concepts: ConceptSet::new(),
                matched_concepts: ConceptSet::new(),
            };
        }

        let reference_concepts = self.extractor.extract(reference_definition);
        let candidate_concepts = self.extractor.extract(&candidate.combined_text());
        let matched_concepts = reference_concepts.intersection(&candidate_concepts);

        let coverage = if reference_concepts.is_empty() {
            // No extractable reference concepts either; same convention.
            1.0
        } else {
            matched_concepts.len() as f64 / reference_concepts.len() as f64
        };

        debug!(
            coverage,
            reference = %reference_concepts,
            candidate = %candidate_concepts,
            matched = %matched_concepts,
            "scored candidate coverage"
        );

        ValidationOutcome {
            coverage,
            reference_concepts,
            candidate_concepts,
            matched_concepts,
        }
    }

    /// Accept when coverage meets the configured threshold.
    pub fn accepts(&self, outcome: &ValidationOutcome) -> bool {
        outcome.coverage >= self.threshold
    }
}
