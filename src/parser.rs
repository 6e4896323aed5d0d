//! Generated-text section parser
//!
//! Converts the raw text emitted by the generation service into the
//! fixed four-section schema. Line-oriented state machine: section
//! headers switch state, bullet lines feed the active list section,
//! plain lines extend the active free-text section. Parsing never
//! fails; unrecognizable input degrades to empty sections, which the
//! validator then rejects.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Exact bullet marker emitted by the prompt contract. Broader bullet
/// syntaxes are intentionally not recognized.
const BULLET_MARKER: char = '\u{2022}'; // •

static SIMPLE_EXPLANATION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^SIMPLE EXPLANATION[:\s]*").expect("valid header regex"));
static SIGNS_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^SIGNS TO NOTICE[:\s]*").expect("valid header regex"));
static CARE_ADVICE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^CARE ADVICE[:\s]*").expect("valid header regex"));
static DOCTOR_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^DOCTOR CONSULTATION[:\s]*").expect("valid header regex"));

/// The structured candidate explanation.
///
/// All fields default to empty rather than null; a field the generator
/// never emitted parses to its empty form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedSections {
    pub simple_explanation: String,
    pub signs_to_notice: Vec<String>,
    pub care_advice: Vec<String>,
    pub doctor_consultation_advice: String,
}

impl GeneratedSections {
    /// All section text joined for concept extraction.
    pub fn combined_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(4);
        parts.push(&self.simple_explanation);
        let signs = self.signs_to_notice.join(" ");
        let care = self.care_advice.join(" ");
        parts.push(&signs);
        parts.push(&care);
        parts.push(&self.doctor_consultation_advice);
        parts.join(" ")
    }

    /// Re-render in the canonical prompt format. Parsing the rendered
    /// form yields an equal value, which the tests rely on.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("SIMPLE EXPLANATION: ");
        out.push_str(&self.simple_explanation);
        out.push('\n');
        out.push_str("SIGNS TO NOTICE:\n");
        for sign in &self.signs_to_notice {
            out.push(BULLET_MARKER);
            out.push(' ');
            out.push_str(sign);
            out.push('\n');
        }
        out.push_str("CARE ADVICE:\n");
        for advice in &self.care_advice {
            out.push(BULLET_MARKER);
            out.push(' ');
            out.push_str(advice);
            out.push('\n');
        }
        out.push_str("DOCTOR CONSULTATION: ");
        out.push_str(&self.doctor_consultation_advice);
        out.push('\n');
        out
    }

    /// True when nothing was captured from the raw text.
    pub fn is_empty(&self) -> bool {
        self.simple_explanation.is_empty()
            && self.signs_to_notice.is_empty()
            && self.care_advice.is_empty()
            && self.doctor_consultation_advice.is_empty()
    }
}

/// Active section while scanning lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    SimpleExplanation,
    Signs,
    CareAdvice,
    DoctorConsultation,
}

/// Line-oriented parser for generated explanation text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseParser;

impl ResponseParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw generated text into sections. Never fails: lines that
    /// match no rule are dropped and missing sections stay empty.
    pub fn parse(&self, raw: &str) -> GeneratedSections {
        let mut sections = GeneratedSections::default();
        let mut current = Section::None;

        for line in raw.lines() {
            let line = line.trim();

            if let Some(m) = SIMPLE_EXPLANATION_HEADER.find(line) {
                current = Section::SimpleExplanation;
                sections.simple_explanation = line[m.end()..].trim().to_string();
            } else if SIGNS_HEADER.is_match(line) {
                current = Section::Signs;
            } else if CARE_ADVICE_HEADER.is_match(line) {
                current = Section::CareAdvice;
            } else if let Some(m) = DOCTOR_HEADER.find(line) {
                current = Section::DoctorConsultation;
                sections.doctor_consultation_advice = line[m.end()..].trim().to_string();
            } else if current == Section::Signs {
                if let Some(item) = strip_bullet(line) {
                    sections.signs_to_notice.push(item.to_string());
                }
            } else if current == Section::CareAdvice {
                if let Some(item) = strip_bullet(line) {
                    sections.care_advice.push(item.to_string());
                }
            } else if current == Section::SimpleExplanation
                && !line.is_empty()
                && !line.starts_with("**")
            {
                if !sections.simple_explanation.is_empty() {
                    sections.simple_explanation.push(' ');
                }
                sections.simple_explanation.push_str(line);
            }
        }

        sections
    }
}

fn strip_bullet(line: &str) -> Option<&str> {
    line.strip_prefix(BULLET_MARKER).map(str::trim)
}
