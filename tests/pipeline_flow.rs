//! End-to-end pipeline behavior against scripted collaborators.
//!
//! Verifies the retry budget, the first-success short-circuit, lookup
//! degradation, and the fallback contract without touching the network.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use med_explain::concepts::tagger::{ConceptTagger, PartOfSpeech, TaggedToken};
use med_explain::{
    ConceptExtractor, ExplanationPipeline, GenerationError, LookupError, PipelineConfig,
    PipelineResult, ReferenceLookup, ResponseGenerator, FALLBACK_ERROR,
};

/// Tagger with a fixed noun vocabulary so coverage arithmetic is exact.
struct FixedTagger {
    nouns: HashSet<&'static str>,
}

impl FixedTagger {
    fn new(nouns: &[&'static str]) -> Self {
        Self {
            nouns: nouns.iter().copied().collect(),
        }
    }
}

impl ConceptTagger for FixedTagger {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        text.split_whitespace()
            .map(|word| {
                let clean = word
                    .trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase();
                let pos = if self.nouns.contains(clean.as_str()) {
                    PartOfSpeech::Noun
                } else {
                    PartOfSpeech::Other
                };
                TaggedToken {
                    surface: clean.clone(),
                    lemma: clean,
                    pos,
                }
            })
            .collect()
    }
}

/// Generator that replays a script of responses and counts calls.
struct ScriptedGenerator {
    script: Vec<Result<String, ()>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn new(script: Vec<Result<String, ()>>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResponseGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.get(call) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(())) => Err(GenerationError::EmptyResponse),
            None => panic!("generator invoked more times than scripted: call {}", call + 1),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    fn provider_name(&self) -> &str {
        "test"
    }
}

/// Lookup stub returning a fixed definition list or a fixed error.
struct StubLookup {
    definitions: Result<Vec<String>, ()>,
}

impl StubLookup {
    fn with_definition(definition: &str) -> Self {
        Self {
            definitions: Ok(vec![definition.to_string()]),
        }
    }

    fn empty() -> Self {
        Self {
            definitions: Ok(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            definitions: Err(()),
        }
    }
}

#[async_trait]
impl ReferenceLookup for StubLookup {
    async fn lookup(&self, _term: &str) -> Result<Vec<String>, LookupError> {
        match &self.definitions {
            Ok(defs) => Ok(defs.clone()),
            Err(()) => Err(LookupError::MissingApiKey),
        }
    }
}

fn extractor() -> ConceptExtractor {
    ConceptExtractor::new(Arc::new(FixedTagger::new(&[
        "fever",
        "cough",
        "contagious",
        "rest",
        "fluids",
    ])))
}

fn pipeline(
    lookup: StubLookup,
    generator: Arc<ScriptedGenerator>,
) -> ExplanationPipeline {
    ExplanationPipeline::new(
        Arc::new(lookup),
        generator,
        extractor(),
        PipelineConfig::default(),
    )
}

/// Candidate text covering only "rest": 0 of 3 reference concepts.
fn low_coverage_response() -> String {
    "SIMPLE EXPLANATION: Get plenty of rest at home.".to_string()
}

/// Candidate text covering "fever" and "cough": 2 of 3 reference concepts.
fn passing_response() -> String {
    "\
SIMPLE EXPLANATION: A fever with a cough that spreads easily.
SIGNS TO NOTICE:
\u{2022} fever
\u{2022} cough
CARE ADVICE:
\u{2022} rest
DOCTOR CONSULTATION: See a doctor if it persists."
        .to_string()
}

const REFERENCE: &str = "fever cough contagious";

#[tokio::test]
async fn rejecting_all_attempts_exhausts_budget_and_falls_back() {
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Ok(low_coverage_response()),
        Ok(low_coverage_response()),
        Ok(low_coverage_response()),
    ]));
    let pipeline = pipeline(StubLookup::with_definition(REFERENCE), generator.clone());

    let result = pipeline.explain("influenza", Some("the common flu")).await;

    assert_eq!(generator.calls(), 3);
    match result {
        PipelineResult::Fallback {
            term,
            sections,
            error,
            fallback_explanation,
        } => {
            assert_eq!(term, "influenza");
            assert_eq!(error, FALLBACK_ERROR);
            assert_eq!(fallback_explanation.as_deref(), Some("the common flu"));
            assert_eq!(
                sections.simple_explanation,
                "Could not generate an explanation for influenza"
            );
            assert!(sections.signs_to_notice.is_empty());
            assert!(sections.care_advice.is_empty());
            assert!(sections.doctor_consultation_advice.is_empty());
        }
        PipelineResult::Accepted { .. } => panic!("expected fallback"),
    }
}

#[tokio::test]
async fn first_passing_attempt_short_circuits() {
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Ok(low_coverage_response()),
        Ok(passing_response()),
        // a third attempt would panic the scripted generator
        Ok(low_coverage_response()),
    ]));
    let pipeline = pipeline(StubLookup::with_definition(REFERENCE), generator.clone());

    let result = pipeline.explain("influenza", None).await;

    assert_eq!(generator.calls(), 2);
    match result {
        PipelineResult::Accepted {
            term,
            sections,
            reference_definition,
            total_tokens,
        } => {
            assert_eq!(term, "influenza");
            assert_eq!(reference_definition, REFERENCE);
            assert_eq!(sections.signs_to_notice, vec!["fever", "cough"]);
            assert!(total_tokens > 0);
        }
        PipelineResult::Fallback { .. } => panic!("expected acceptance"),
    }
}

#[tokio::test]
async fn empty_reference_accepts_first_candidate() {
    let generator = Arc::new(ScriptedGenerator::new(vec![Ok(low_coverage_response())]));
    let pipeline = pipeline(StubLookup::empty(), generator.clone());

    let result = pipeline.explain("influenza", None).await;

    assert_eq!(generator.calls(), 1);
    assert!(result.is_accepted());
}

#[tokio::test]
async fn lookup_failure_degrades_to_empty_reference() {
    let generator = Arc::new(ScriptedGenerator::new(vec![Ok(low_coverage_response())]));
    let pipeline = pipeline(StubLookup::failing(), generator.clone());

    let result = pipeline.explain("influenza", None).await;

    // No reference to fail against, so the first candidate is accepted.
    assert_eq!(generator.calls(), 1);
    match result {
        PipelineResult::Accepted {
            reference_definition,
            ..
        } => assert!(reference_definition.is_empty()),
        PipelineResult::Fallback { .. } => panic!("expected acceptance"),
    }
}

#[tokio::test]
async fn generation_failure_consumes_one_attempt() {
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Err(()),
        Ok(passing_response()),
    ]));
    let pipeline = pipeline(StubLookup::with_definition(REFERENCE), generator.clone());

    let result = pipeline.explain("influenza", None).await;

    assert_eq!(generator.calls(), 2);
    assert!(result.is_accepted());
}

#[tokio::test]
async fn all_failures_fall_back_without_raising() {
    let generator = Arc::new(ScriptedGenerator::new(vec![Err(()), Err(()), Err(())]));
    let pipeline = pipeline(StubLookup::with_definition(REFERENCE), generator.clone());

    let result = pipeline.explain("influenza", None).await;

    assert_eq!(generator.calls(), 3);
    assert!(!result.is_accepted());
}

#[tokio::test]
async fn headerless_output_degrades_and_retries() {
    let generator = Arc::new(ScriptedGenerator::new(vec![
        Ok("completely unstructured prose about fever cough contagious".to_string()),
        Ok(passing_response()),
    ]));
    let pipeline = pipeline(StubLookup::with_definition(REFERENCE), generator.clone());

    // The first response mentions every reference concept but carries no
    // section headers, so it parses to empty sections and is rejected.
    let result = pipeline.explain("influenza", None).await;

    assert_eq!(generator.calls(), 2);
    assert!(result.is_accepted());
}

#[tokio::test]
async fn wire_mapping_has_contract_keys() {
    let generator = Arc::new(ScriptedGenerator::new(vec![Ok(passing_response())]));
    let pipeline = pipeline(StubLookup::with_definition(REFERENCE), generator);

    let result = pipeline.explain("influenza", None).await;
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["term"], "influenza");
    assert_eq!(value["umls_definition"], REFERENCE);
    assert!(value["medical_details"]["signs_to_notice"].is_array());
    assert!(value["total_tokens"].is_u64());
}
