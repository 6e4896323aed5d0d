//! med-explain - validated plain-language medical explanations
//!
//! Turns a raw medical term into a structured, layperson-readable
//! explanation and cross-checks it against an authoritative UMLS
//! definition before returning it.
//!
//! ## Pipeline
//! One bounded loop does all the work:
//! term -> reference lookup -> { generate -> parse -> score } x N -> result
//!
//! Each attempt asks the generation service for the four fixed
//! sections, parses the raw text with a line-oriented state machine,
//! and scores how much of the reference definition's concept
//! vocabulary the candidate covers. The first candidate at or above
//! the coverage threshold wins; an exhausted budget returns a
//! deterministic, error-flagged fallback.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use med_explain::{
//!     ConceptExtractor, ExplanationPipeline, GeminiClient, PipelineConfig, UmlsClient,
//! };
//!
//! # async fn run() -> Result<(), med_explain::ExplainError> {
//! let pipeline = ExplanationPipeline::new(
//!     Arc::new(UmlsClient::from_env()?),
//!     Arc::new(GeminiClient::from_env()?),
//!     ConceptExtractor::with_default_tagger(),
//!     PipelineConfig::default(),
//! );
//! let result = pipeline.explain("influenza", None).await;
//! println!("{}", serde_json::to_string_pretty(&result).unwrap());
//! # Ok(())
//! # }
//! ```
//!
//! Persistence and HTTP exposure are external collaborators that
//! consume the serialized [`PipelineResult`] verbatim; this crate does
//! no I/O beyond the two external service calls.

// Core error handling
pub mod error;

// Collaborator and pipeline configuration
pub mod config;

// Concept extraction and the tagging seam
pub mod concepts;

// Generated-text section parsing
pub mod parser;

// Coverage scoring
pub mod validator;

// Generation service seam and Gemini client
pub mod generation;

// UMLS reference definition lookup
pub mod lookup;

// Prompt construction
pub mod prompt;

// The retry-driving pipeline itself
pub mod pipeline;

// Public re-exports for the common construction path
pub use concepts::{ConceptExtractor, ConceptSet, ConceptTagger, LexiconTagger, PartOfSpeech, TaggedToken};
pub use config::{GeminiConfig, PipelineConfig, UmlsConfig};
pub use error::{ConfigError, ExplainError, GenerationError, LookupError};
pub use generation::{GeminiClient, ResponseGenerator};
pub use lookup::{ReferenceLookup, UmlsClient};
pub use parser::{GeneratedSections, ResponseParser};
pub use pipeline::{AttemptOutcome, ExplanationPipeline, PipelineResult, FALLBACK_ERROR};
pub use validator::{CoverageValidator, ValidationOutcome};
