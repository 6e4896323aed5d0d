//! Part-of-speech tagging seam
//!
//! Concept extraction needs lemmas and grammatical roles. A trained
//! model is deliberately out of scope here; the `ConceptTagger` trait
//! keeps one pluggable while the default `LexiconTagger` uses
//! deterministic lookup tables and suffix rules, so extraction stays
//! reproducible in tests and offline runs.

use std::collections::HashSet;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Grammatical role of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Verb,
    Adjective,
    Adverb,
    Other,
}

impl PartOfSpeech {
    /// Noun-like roles are the only ones that survive concept extraction.
    pub fn is_noun_like(self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::ProperNoun)
    }
}

/// A single tagged token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    /// Surface form as it appeared in the text, punctuation stripped.
    pub surface: String,
    /// Lowercase lemma.
    pub lemma: String,
    pub pos: PartOfSpeech,
}

/// Tokenize + lemmatize + tag. Implementations must be deterministic
/// for a fixed input so pipeline runs are reproducible.
pub trait ConceptTagger: Send + Sync {
    fn tag(&self, text: &str) -> Vec<TaggedToken>;
}

static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "an", "the", "and", "or", "but", "nor", "so", "yet", "if", "then", "than", "as",
        "at", "by", "for", "from", "in", "into", "of", "off", "on", "onto", "out", "over", "to",
        "under", "up", "with", "without", "about", "after", "before", "between", "during",
        "through", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
        "my", "your", "his", "its", "our", "their", "this", "that", "these", "those", "who",
        "whom", "which", "what", "when", "where", "why", "how", "not", "no", "all", "any",
        "both", "each", "few", "more", "most", "other", "some", "such", "only", "own", "same",
        "too", "very", "can", "will", "just", "should", "now", "also", "may", "might", "must",
        "shall", "would", "could",
    ]
    .into_iter()
    .collect()
});

static COMMON_VERBS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "is", "are", "was", "were", "be", "been", "being", "am", "have", "has", "had", "having",
        "do", "does", "did", "doing", "take", "takes", "took", "taken", "keep", "keeps", "kept",
        "make", "makes", "made", "get", "gets", "got", "go", "goes", "went", "gone", "see",
        "sees", "saw", "seen", "seek", "call", "calls", "called", "feel", "feels", "felt",
        "become", "becomes", "became", "cause", "causes", "caused", "affect", "affects",
        "affected", "occur", "occurs", "occurred", "include", "includes", "including", "help",
        "helps", "avoid", "avoids", "contact", "consult", "monitor", "notice", "stay", "drink",
        "rest", "wash", "use", "using", "used", "try", "tries", "tried",
    ]
    .into_iter()
    .collect()
});

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ible", "able", "ful", "ish", "ive", "ical"];

/// Deterministic rule-based tagger.
///
/// Heuristics, in order: stopword and function-word tables win, then a
/// common-verb table, then mid-sentence capitalization marks a proper
/// noun, then adverb/adjective suffixes; everything else that carries
/// content is treated as a noun. That bias matches the downstream
/// filter, which only keeps noun-like tokens anyway.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    pub fn new() -> Self {
        Self
    }

    fn classify(surface: &str, lower: &str, sentence_start: bool) -> PartOfSpeech {
        if lower.chars().all(|c| c.is_ascii_digit()) {
            return PartOfSpeech::Other;
        }
        if STOPWORDS.contains(lower) {
            return PartOfSpeech::Other;
        }
        if COMMON_VERBS.contains(lower) {
            return PartOfSpeech::Verb;
        }
        if !sentence_start && surface.chars().next().is_some_and(|c| c.is_uppercase()) {
            return PartOfSpeech::ProperNoun;
        }
        if lower.len() > 4 && lower.ends_with("ly") {
            return PartOfSpeech::Adverb;
        }
        for suffix in ADJECTIVE_SUFFIXES {
            if lower.len() > suffix.len() + 2 && lower.ends_with(suffix) {
                return PartOfSpeech::Adjective;
            }
        }
        PartOfSpeech::Noun
    }

    /// Singularize a lowercase token. Rules cover the regular English
    /// plural classes; irregulars pass through unchanged.
    fn lemmatize(lower: &str) -> String {
        if lower.len() > 4 && lower.ends_with("ies") {
            return format!("{}y", &lower[..lower.len() - 3]);
        }
        for suffix in ["ches", "shes", "sses", "xes", "zes"] {
            if lower.len() > suffix.len() + 1 && lower.ends_with(suffix) {
                return lower[..lower.len() - 2].to_string();
            }
        }
        if lower.len() > 3
            && lower.ends_with('s')
            && !lower.ends_with("ss")
            && !lower.ends_with("us")
            && !lower.ends_with("is")
        {
            return lower[..lower.len() - 1].to_string();
        }
        lower.to_string()
    }
}

impl ConceptTagger for LexiconTagger {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let mut tokens = Vec::new();
        let mut sentence_start = true;
        for raw in text.split_whitespace() {
            let ends_sentence = raw.ends_with(['.', '!', '?', ':', ';']);
            let surface: String = raw
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_string();
            if surface.is_empty() {
                sentence_start = sentence_start || ends_sentence;
                continue;
            }
            let lower = surface.to_lowercase();
            let pos = Self::classify(&surface, &lower, sentence_start);
            let lemma = Self::lemmatize(&lower);
            tokens.push(TaggedToken {
                surface,
                lemma,
                pos,
            });
            sentence_start = ends_sentence;
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag_one(text: &str) -> TaggedToken {
        let tokens = LexiconTagger::new().tag(text);
        assert_eq!(tokens.len(), 1, "expected a single token from {text:?}");
        tokens.into_iter().next().unwrap()
    }

    #[test]
    fn test_stopwords_are_not_nouns() {
        let tokens = LexiconTagger::new().tag("the of and");
        assert!(tokens.iter().all(|t| t.pos == PartOfSpeech::Other));
    }

    #[test]
    fn test_content_word_defaults_to_noun() {
        let token = tag_one("fever");
        assert_eq!(token.pos, PartOfSpeech::Noun);
        assert_eq!(token.lemma, "fever");
    }

    #[test]
    fn test_plural_lemmatization() {
        assert_eq!(tag_one("symptoms").lemma, "symptom");
        assert_eq!(tag_one("allergies").lemma, "allergy");
        assert_eq!(tag_one("rashes").lemma, "rash");
        // -us and -is singulars keep their trailing s
        assert_eq!(tag_one("virus").lemma, "virus");
        assert_eq!(tag_one("diagnosis").lemma, "diagnosis");
    }

    #[test]
    fn test_mid_sentence_capital_is_proper_noun() {
        let tokens = LexiconTagger::new().tag("Influenza affects Paris hospitals.");
        assert_eq!(tokens[0].pos, PartOfSpeech::Noun); // sentence-initial
        assert_eq!(tokens[2].pos, PartOfSpeech::ProperNoun);
    }

    #[test]
    fn test_suffix_classes() {
        assert_eq!(tag_one("quickly").pos, PartOfSpeech::Adverb);
        assert_eq!(tag_one("contagious").pos, PartOfSpeech::Adjective);
        assert_eq!(tag_one("is").pos, PartOfSpeech::Verb);
    }

    #[test]
    fn test_punctuation_and_numbers() {
        let tokens = LexiconTagger::new().tag("fever, 101 degrees!");
        assert_eq!(tokens[0].surface, "fever");
        assert_eq!(tokens[1].pos, PartOfSpeech::Other);
        assert_eq!(tokens[2].surface, "degrees");
    }

    #[test]
    fn test_empty_input() {
        assert!(LexiconTagger::new().tag("").is_empty());
        assert!(LexiconTagger::new().tag("   \n ").is_empty());
    }
}
