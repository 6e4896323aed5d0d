//! Prompt construction
//!
//! The generation prompt fixes the four section headers and the "•"
//! bullet marker so the parser's line rules line up with what the
//! model is told to emit.

/// Build the generation prompt for a term.
///
/// `reference_definition` may be empty; `simplified_explanation` is
/// the caller-supplied layperson explanation, if any.
pub fn build_generation_prompt(
    term: &str,
    reference_definition: &str,
    simplified_explanation: Option<&str>,
) -> String {
    format!(
        "\
Medical Term: {term}
UMLS Definition: {reference_definition}
Simplified Explanation: {simplified}

Generate a structured response with the following sections:

SIMPLE EXPLANATION: [One clear, non-technical sentence about the medical term]
SIGNS TO NOTICE:
\u{2022} [First sign to look out for]
\u{2022} [Second sign to notice]
\u{2022} [Third sign to be aware of]
CARE ADVICE:
\u{2022} [First practical care tip]
\u{2022} [Second helpful care suggestion]
\u{2022} [Third self-care recommendation]
DOCTOR CONSULTATION: [One sentence advising when to seek medical help]

Ensure clinical accuracy and integrate UMLS concepts.",
        simplified = simplified_explanation.unwrap_or("")
    )
}

/// Approximate token cost of a text as its whitespace-delimited word
/// count. Informational telemetry only.
pub fn approx_token_count(text: &str) -> usize {
    text.split_whitespace().count()
}
