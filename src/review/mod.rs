//! Whole-document review
//!
//! Runs after the walk, over the units it recorded. The language model is
//! asked about ambiguous ideas (per chunk), transitions into sections,
//! chapter introductions and the order of sections. Its answers become
//! `ReviewFindings`, which `apply_findings` splices into the walked text
//! through the line map.

pub mod chunk;
pub mod locate;
pub mod parse;
pub mod prompts;

pub use chunk::{chunk_units, Chunk};
pub use locate::{locate, normalize, window_match, Anchor};
pub use parse::{AmbiguousIdea, SectionSuggestion};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::collab::{LanguageAnalyzer, LanguageModel};
use crate::config::ReviewOptions;
use crate::core::annotate::{insert_note_after, insert_sentence_note};
use crate::core::line_map::LineMap;
use crate::core::walker::{AnalysisUnit, UnitKind};
use crate::utils::error::ReviewWarning;

pub const MISSING_TRANSITION_NOTE: &str =
    "Falta una transición entre la sección anterior y esta.";
pub const MISSING_INTRODUCTION_NOTE: &str =
    "El primer párrafo del capítulo no introduce su tema.";
pub const SECTION_ORDER_NOTE: &str = "Revisa el orden de las secciones del capítulo.";

const NO_TEXT: &str = "sin texto";
const NO_INTRODUCTION: &str = "no hay introducción";

/// What the model reported, before it is placed in the text
#[derive(Debug, Clone, Default)]
pub struct ReviewFindings {
    /// Reasons per anchor, joined with `, ` when an anchor is reported twice
    pub ambiguities: IndexMap<Anchor, String>,
    pub transitions: Vec<SectionSuggestion>,
    pub introduction: Option<String>,
    pub order: Option<String>,
    pub warnings: Vec<ReviewWarning>,
}

impl ReviewFindings {
    pub fn is_empty(&self) -> bool {
        self.ambiguities.is_empty()
            && self.transitions.is_empty()
            && self.introduction.is_none()
            && self.order.is_none()
    }
}

/// Notes actually placed in the text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewCounts {
    pub ambiguities: usize,
    pub transitions: usize,
    pub introductions: usize,
    pub order: usize,
}

pub struct Reviewer<'a, A: LanguageAnalyzer + ?Sized, M: LanguageModel + ?Sized> {
    analyzer: &'a A,
    model: &'a M,
    options: &'a ReviewOptions,
}

impl<'a, A: LanguageAnalyzer + ?Sized, M: LanguageModel + ?Sized> Reviewer<'a, A, M> {
    pub fn new(analyzer: &'a A, model: &'a M, options: &'a ReviewOptions) -> Self {
        Self {
            analyzer,
            model,
            options,
        }
    }

    /// Ask every question about `units`. Nothing is asked when the review is
    /// disabled or the model is unavailable.
    pub fn review(&self, units: &[AnalysisUnit]) -> ReviewFindings {
        let mut findings = ReviewFindings::default();
        if !self.options.review || !self.model.is_available() || units.is_empty() {
            debug!("review skipped");
            return findings;
        }

        self.ambiguities(units, &mut findings);
        self.transitions(units, &mut findings);
        self.introduction(units, &mut findings);
        self.order(units, &mut findings);
        info!(
            ambiguities = findings.ambiguities.len(),
            transitions = findings.transitions.len(),
            "review finished"
        );
        findings
    }

    /// A failed call is logged, reported once per call and read as no answer
    fn ask(&self, prompt: &str, findings: &mut ReviewFindings) -> Option<String> {
        match self.model.ask(prompt) {
            Ok(answer) if !answer.trim().is_empty() => Some(answer),
            Ok(_) => None,
            Err(err) => {
                warn!(error = %err, "language model call failed");
                findings
                    .warnings
                    .push(ReviewWarning::collaborator_failure(format!("model: {}", err)));
                None
            }
        }
    }

    fn ambiguities(&self, units: &[AnalysisUnit], findings: &mut ReviewFindings) {
        let chunks = chunk_units(
            units,
            self.options.chunk_max_words,
            self.options.chunk_max_paragraphs,
        );
        for chunk in chunks {
            let Some(candidates) = self.ask(&prompts::ambiguity_candidates(&chunk.text), findings)
            else {
                continue;
            };
            let prompt = prompts::ambiguity_confirmation(&chunk.text, &candidates);
            let Some(answer) = self.ask(&prompt, findings) else {
                continue;
            };

            for idea in parse::parse_ambiguity(&answer) {
                let in_chunk = &units[chunk.units.clone()];
                let Some(anchor) = locate(
                    &idea.idea,
                    in_chunk,
                    self.analyzer,
                    self.options.match_threshold,
                ) else {
                    warn!(fragment = %idea.idea, "ambiguous idea not found");
                    findings
                        .warnings
                        .push(ReviewWarning::fragment_not_found(&idea.idea));
                    continue;
                };
                findings
                    .ambiguities
                    .entry(anchor)
                    .and_modify(|reasons| {
                        reasons.push_str(", ");
                        reasons.push_str(&idea.reason);
                    })
                    .or_insert(idea.reason);
            }
        }
    }

    fn transitions(&self, units: &[AnalysisUnit], findings: &mut ReviewFindings) {
        let sections = section_openings(units);
        if sections.is_empty() {
            return;
        }
        if let Some(answer) = self.ask(&prompts::transitions(&sections), findings) {
            findings.transitions = parse::parse_transitions(&answer);
        }
    }

    fn introduction(&self, units: &[AnalysisUnit], findings: &mut ReviewFindings) {
        let openings = chapter_openings(units);
        if openings.is_empty() {
            return;
        }
        if let Some(answer) = self.ask(&prompts::chapter_introduction(&openings), findings) {
            findings.introduction = parse::parse_introduction(&answer);
        }
    }

    fn order(&self, units: &[AnalysisUnit], findings: &mut ReviewFindings) {
        let structure = outline(units);
        if structure.is_empty() {
            return;
        }
        if let Some(answer) = self.ask(&prompts::logical_order(&structure), findings) {
            findings.order = parse::parse_order(&answer);
        }
    }
}

fn paragraph_prose(unit: Option<&AnalysisUnit>) -> Option<&str> {
    unit.filter(|u| u.kind == UnitKind::Paragraph)
        .map(|u| u.prose.trim())
}

/// One line per section with the paragraphs around it
fn section_openings(units: &[AnalysisUnit]) -> String {
    let mut lines = Vec::new();
    for (i, unit) in units.iter().enumerate() {
        if unit.kind != UnitKind::Section {
            continue;
        }
        let before = i.checked_sub(1).and_then(|p| units.get(p));
        let after = units.get(i + 1);
        lines.push(format!(
            "{{Sección {}: Párrafo anterior: {{{}}} Párrafo siguiente a sección: {{{}}}}}",
            unit.prose.trim(),
            paragraph_prose(before).unwrap_or(NO_TEXT),
            paragraph_prose(after).unwrap_or(NO_TEXT),
        ));
    }
    lines.join("\n")
}

/// One line per chapter with its first paragraph
fn chapter_openings(units: &[AnalysisUnit]) -> String {
    let mut lines = Vec::new();
    for (i, unit) in units.iter().enumerate() {
        if unit.kind != UnitKind::Chapter {
            continue;
        }
        lines.push(format!(
            "{{Capítulo {}: {}}}",
            unit.prose.trim(),
            paragraph_prose(units.get(i + 1)).unwrap_or(NO_INTRODUCTION),
        ));
    }
    lines.join("\n")
}

/// Chapters and sections in document order
fn outline(units: &[AnalysisUnit]) -> String {
    units
        .iter()
        .filter_map(|unit| match unit.kind {
            UnitKind::Chapter => Some(format!("Capítulo: {}", unit.prose.trim())),
            UnitKind::Section => Some(format!("Sección: {}", unit.prose.trim())),
            UnitKind::Paragraph => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Section unit whose title matches the model's `name`: equal once
/// normalized, or else one containing the other.
fn find_section<'u>(units: &'u [AnalysisUnit], name: &str) -> Option<&'u AnalysisUnit> {
    let wanted = normalize(name.trim());
    if wanted.is_empty() {
        return None;
    }
    let sections = || units.iter().filter(|u| u.kind == UnitKind::Section);
    sections()
        .find(|u| normalize(u.prose.trim()) == wanted)
        .or_else(|| {
            sections().find(|u| {
                let title = normalize(u.prose.trim());
                !title.is_empty() && (wanted.contains(&title) || title.contains(&wanted))
            })
        })
}

/// Heading that carries chapter-wide notes: the first chapter, or the first
/// heading of a document without chapters
fn chapter_anchor(units: &[AnalysisUnit]) -> Option<&AnalysisUnit> {
    units
        .iter()
        .find(|u| u.kind == UnitKind::Chapter)
        .or_else(|| units.iter().find(|u| u.is_heading()))
}

fn note_or(suggestion: &str, fallback: &str) -> String {
    if suggestion.trim().is_empty() {
        fallback.to_string()
    } else {
        suggestion.trim().to_string()
    }
}

/// Place `findings` in `text`.
///
/// Inline notes go first, since they keep every line where the line map
/// says it is. Heading notes follow, each one shifting the map below it.
pub fn apply_findings<A: LanguageAnalyzer + ?Sized>(
    text: String,
    line_map: &mut LineMap,
    units: &[AnalysisUnit],
    findings: &ReviewFindings,
    analyzer: &A,
) -> (String, ReviewCounts, Vec<ReviewWarning>) {
    let mut text = text;
    let mut counts = ReviewCounts::default();
    let mut warnings = Vec::new();

    // Later sentences of a line first, so earlier offsets stay valid
    let mut inline: Vec<(usize, usize, &str)> = Vec::new();
    for (anchor, reasons) in &findings.ambiguities {
        match line_map.resolve(anchor.compact_index) {
            Some(line) => inline.push((line, anchor.sentence, reasons.as_str())),
            None => warnings.push(ReviewWarning::anchor_out_of_range(
                anchor.compact_index,
                Some(anchor.sentence),
            )),
        }
    }
    inline.sort_by(|a, b| (b.0, b.1).cmp(&(a.0, a.1)));
    for (line, sentence, reasons) in inline {
        match insert_sentence_note(&text, line, sentence, reasons, analyzer) {
            Ok(updated) => {
                text = updated;
                counts.ambiguities += 1;
            }
            Err(warning) => warnings.push(warning),
        }
    }

    let mut heading_notes: Vec<(usize, String)> = Vec::new();
    for transition in &findings.transitions {
        match find_section(units, &transition.section) {
            Some(unit) => {
                heading_notes.push((
                    unit.compact_index,
                    note_or(&transition.suggestion, MISSING_TRANSITION_NOTE),
                ));
                counts.transitions += 1;
            }
            None => warnings.push(ReviewWarning::fragment_not_found(&transition.section)),
        }
    }
    if let Some(anchor) = chapter_anchor(units) {
        if let Some(suggestion) = &findings.introduction {
            heading_notes.push((
                anchor.compact_index,
                note_or(suggestion, MISSING_INTRODUCTION_NOTE),
            ));
            counts.introductions += 1;
        }
        if let Some(suggestion) = &findings.order {
            heading_notes.push((anchor.compact_index, note_or(suggestion, SECTION_ORDER_NOTE)));
            counts.order += 1;
        }
    }

    for (compact_index, message) in heading_notes {
        let inserted = line_map
            .resolve(compact_index)
            .and_then(|line| insert_note_after(&text, line, &message));
        match inserted {
            Some((updated, at)) => {
                text = updated;
                line_map.shift_from(at, 1);
            }
            None => warnings.push(ReviewWarning::anchor_out_of_range(compact_index, None)),
        }
    }

    (text, counts, warnings)
}
