//! Concept extraction
//!
//! Reduces free text to a canonical set of lowercase lemmas so the
//! validator can compare generated explanations against a reference
//! definition with plain set arithmetic.

pub mod tagger;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use tagger::{ConceptTagger, LexiconTagger, PartOfSpeech, TaggedToken};

/// Tokens shorter than this (surface form) never become concepts.
const MIN_SURFACE_LEN: usize = 3;

/// A deduplicated, order-independent set of concept lemmas.
///
/// Backed by a `BTreeSet` so diagnostic output is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptSet(BTreeSet<String>);

impl ConceptSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, lemma: String) -> bool {
        self.0.insert(lemma)
    }

    pub fn contains(&self, lemma: &str) -> bool {
        self.0.contains(lemma)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Concepts present in both sets.
    pub fn intersection(&self, other: &ConceptSet) -> ConceptSet {
        ConceptSet(self.0.intersection(&other.0).cloned().collect())
    }
}

impl FromIterator<String> for ConceptSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        ConceptSet(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for ConceptSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(str::to_string).collect()
    }
}

impl fmt::Display for ConceptSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, lemma) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{lemma}")?;
        }
        write!(f, "}}")
    }
}

/// Extracts noun-like concept lemmas from free text.
///
/// Pure given a fixed tagger: no I/O, no mutable state.
#[derive(Clone)]
pub struct ConceptExtractor {
    tagger: Arc<dyn ConceptTagger>,
}

impl ConceptExtractor {
    pub fn new(tagger: Arc<dyn ConceptTagger>) -> Self {
        Self { tagger }
    }

    /// Extractor backed by the built-in rule-based tagger.
    pub fn with_default_tagger() -> Self {
        Self::new(Arc::new(LexiconTagger::new()))
    }

    /// Tokenize, lemmatize, lowercase; keep noun-like tokens whose
    /// surface form is longer than two characters; deduplicate.
    pub fn extract(&self, text: &str) -> ConceptSet {
        if text.trim().is_empty() {
            return ConceptSet::new();
        }
        self.tagger
            .tag(text)
            .into_iter()
            .filter(|token| token.pos.is_noun_like() && token.surface.chars().count() >= MIN_SURFACE_LEN)
            .map(|token| token.lemma.to_lowercase())
            .collect()
    }
}

impl fmt::Debug for ConceptExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConceptExtractor").finish_non_exhaustive()
    }
}
