//! Grouping of analysis units into prompt-sized chunks

use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::walker::{AnalysisUnit, UnitKind};

lazy_static! {
    static ref HEADING_COMMAND_RE: Regex =
        Regex::new(r"^\s*\\(chapter|part|(?:sub)*section)").unwrap();
}

/// Consecutive units sent together to the language model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Compact indices of the units in this chunk
    pub units: Range<usize>,
    pub text: String,
}

/// How a unit reads inside a prompt: headings as `section: Title`,
/// paragraphs as written.
pub fn render_unit(unit: &AnalysisUnit) -> String {
    match unit.kind {
        UnitKind::Paragraph => unit.text.clone(),
        UnitKind::Chapter | UnitKind::Section => {
            let command = HEADING_COMMAND_RE
                .captures(&unit.text)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
                .unwrap_or(match unit.kind {
                    UnitKind::Chapter => "chapter",
                    _ => "section",
                });
            format!("{}: {}", command, unit.prose.trim())
        }
    }
}

/// Split `units` into chunks of at most `max_words` words or
/// `max_paragraphs` paragraphs. A chunk is closed by the unit that reaches
/// either limit, so no unit is ever split.
pub fn chunk_units(units: &[AnalysisUnit], max_words: usize, max_paragraphs: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut lines: Vec<String> = Vec::new();
    let mut first = 0;
    let mut words = 0;
    let mut paragraphs = 0;

    for (index, unit) in units.iter().enumerate() {
        if unit.is_heading() {
            words += unit.prose.split_whitespace().count();
        } else {
            words += unit.text.split_whitespace().count();
            paragraphs += 1;
        }
        lines.push(render_unit(unit));

        if words >= max_words.max(1) || paragraphs >= max_paragraphs.max(1) {
            chunks.push(Chunk {
                units: first..index + 1,
                text: lines.join("\n"),
            });
            lines.clear();
            first = index + 1;
            words = 0;
            paragraphs = 0;
        }
    }

    if !lines.is_empty() {
        chunks.push(Chunk {
            units: first..units.len(),
            text: lines.join("\n"),
        });
    }
    chunks
}
