//! Explanation pipeline
//!
//! Composes lookup, generation, parsing, and validation into the one
//! externally callable operation: term in, validated structured
//! explanation out. Attempts run sequentially under a bounded budget;
//! the first accepted candidate short-circuits the loop and an
//! exhausted budget returns a deterministic fallback. The pipeline
//! always returns a value, never an error.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::concepts::ConceptExtractor;
use crate::config::PipelineConfig;
use crate::error::GenerationError;
use crate::generation::ResponseGenerator;
use crate::lookup::ReferenceLookup;
use crate::parser::{GeneratedSections, ResponseParser};
use crate::prompt::{approx_token_count, build_generation_prompt};
use crate::validator::{CoverageValidator, ValidationOutcome};

/// Error marker carried by fallback results.
pub const FALLBACK_ERROR: &str = "Could not generate an accurate medical explanation";

/// Outcome of a single generate-parse-validate attempt.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// Candidate met the coverage threshold.
    Accepted {
        sections: GeneratedSections,
        outcome: ValidationOutcome,
        total_tokens: usize,
    },
    /// Candidate parsed but scored below the threshold.
    Rejected { outcome: ValidationOutcome },
    /// The generation call itself failed.
    Failed { error: GenerationError },
}

/// Terminal pipeline value: exactly one of the two variants, never a
/// partially populated shape.
///
/// Serializes to the wire mapping consumed by persistence and HTTP
/// collaborators: `term`, `medical_details`, `umls_definition`,
/// `total_tokens`, plus `error` and `fallback_explanation` on
/// fallback.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PipelineResult {
    Accepted {
        term: String,
        #[serde(rename = "medical_details")]
        sections: GeneratedSections,
        #[serde(rename = "umls_definition")]
        reference_definition: String,
        total_tokens: usize,
    },
    Fallback {
        term: String,
        #[serde(rename = "medical_details")]
        sections: GeneratedSections,
        error: String,
        fallback_explanation: Option<String>,
    },
}

impl PipelineResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PipelineResult::Accepted { .. })
    }

    pub fn term(&self) -> &str {
        match self {
            PipelineResult::Accepted { term, .. } | PipelineResult::Fallback { term, .. } => term,
        }
    }

    pub fn sections(&self) -> &GeneratedSections {
        match self {
            PipelineResult::Accepted { sections, .. }
            | PipelineResult::Fallback { sections, .. } => sections,
        }
    }
}

/// The explanation pipeline with injected collaborators.
///
/// Cheap to clone behind the `Arc`s; concurrent invocations for
/// different terms share no mutable state.
#[derive(Clone)]
pub struct ExplanationPipeline {
    lookup: Arc<dyn ReferenceLookup>,
    generator: Arc<dyn ResponseGenerator>,
    parser: ResponseParser,
    validator: CoverageValidator,
    config: PipelineConfig,
}

impl ExplanationPipeline {
    /// Build a pipeline from its collaborators. The validator's
    /// acceptance threshold comes from `config`.
    pub fn new(
        lookup: Arc<dyn ReferenceLookup>,
        generator: Arc<dyn ResponseGenerator>,
        extractor: ConceptExtractor,
        config: PipelineConfig,
    ) -> Self {
        Self {
            lookup,
            generator,
            parser: ResponseParser::new(),
            validator: CoverageValidator::new(extractor, config.coverage_threshold),
            config,
        }
    }

    /// Generate a validated explanation for a term.
    ///
    /// `simplified_explanation` is an optional caller-supplied
    /// layperson explanation, embedded in the prompt and echoed back
    /// on fallback.
    pub async fn explain(
        &self,
        term: &str,
        simplified_explanation: Option<&str>,
    ) -> PipelineResult {
        let reference_definition = self.resolve_reference(term).await;

        for attempt in 1..=self.config.max_attempts {
            match self
                .run_attempt(term, &reference_definition, simplified_explanation)
                .await
            {
                AttemptOutcome::Accepted {
                    sections,
                    outcome,
                    total_tokens,
                } => {
                    info!(
                        term,
                        attempt,
                        coverage = outcome.coverage,
                        total_tokens,
                        "candidate accepted"
                    );
                    return PipelineResult::Accepted {
                        term: term.to_string(),
                        sections,
                        reference_definition,
                        total_tokens,
                    };
                }
                AttemptOutcome::Rejected { outcome } => {
                    warn!(
                        term,
                        attempt,
                        coverage = outcome.coverage,
                        threshold = self.validator.threshold(),
                        "candidate rejected, coverage below threshold"
                    );
                }
                AttemptOutcome::Failed { error } => {
                    warn!(term, attempt, %error, "generation attempt failed");
                }
            }
        }

        info!(
            term,
            max_attempts = self.config.max_attempts,
            "attempt budget exhausted, returning fallback"
        );
        PipelineResult::Fallback {
            term: term.to_string(),
            sections: GeneratedSections {
                simple_explanation: format!("Could not generate an explanation for {term}"),
                ..Default::default()
            },
            error: FALLBACK_ERROR.to_string(),
            fallback_explanation: simplified_explanation.map(str::to_string),
        }
    }

    /// One generate-parse-validate cycle. Failures are values, not
    /// unwinding: the caller decides whether budget remains.
    async fn run_attempt(
        &self,
        term: &str,
        reference_definition: &str,
        simplified_explanation: Option<&str>,
    ) -> AttemptOutcome {
        let prompt = build_generation_prompt(term, reference_definition, simplified_explanation);

        let raw = match self.generator.generate(&prompt).await {
            Ok(raw) => raw,
            Err(error) => return AttemptOutcome::Failed { error },
        };

        let sections = self.parser.parse(&raw);
        let outcome = self.validator.score(reference_definition, &sections);

        if self.validator.accepts(&outcome) {
            let total_tokens = approx_token_count(&prompt) + approx_token_count(&raw);
            AttemptOutcome::Accepted {
                sections,
                outcome,
                total_tokens,
            }
        } else {
            AttemptOutcome::Rejected { outcome }
        }
    }

    /// First authoritative definition for the term, or empty when none
    /// exists or the lookup fails. A lookup failure never aborts the
    /// pipeline.
    async fn resolve_reference(&self, term: &str) -> String {
        match self.lookup.lookup(term).await {
            Ok(definitions) => definitions.into_iter().next().unwrap_or_default(),
            Err(error) => {
                warn!(term, %error, "reference lookup failed, continuing without definition");
                String::new()
            }
        }
    }
}
