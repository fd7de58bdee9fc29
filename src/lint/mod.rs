//! Linguistic marking
//!
//! Each pass looks at one prose span and reports `Finding`s as byte ranges
//! over it. Findings from all passes are rendered together by a single
//! ordered join, so passes never see each other's markup.

pub mod citation;
pub mod heading;
pub mod long_sentence;
pub mod marker;
pub mod passive;
pub mod person;
pub mod repetition;
pub mod weasel;
pub mod wordlists;

pub use marker::{MarkCounts, WritingMarker};
pub use wordlists::{CompiledWordLists, WordLists};

use serde::Serialize;

use crate::utils::latex::inline_comment;

pub const PASSIVE_VOICE_NOTE: &str = "Voz pasiva";
pub const PERSON_NOTE: &str = "Escribir en 3ra persona";
pub const ANGLICISM_NOTE: &str = "Anglicismo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FindingKind {
    PassiveVoice,
    Person,
    WeaselWord,
    Anglicism,
}

impl FindingKind {
    /// Wrap the offending text in its markup
    pub fn wrap(self, text: &str) -> String {
        match self {
            FindingKind::PassiveVoice => inline_comment(text, PASSIVE_VOICE_NOTE),
            FindingKind::Person => inline_comment(text, PERSON_NOTE),
            FindingKind::WeaselWord => format!("\\comadreja{{{}}}", text),
            FindingKind::Anglicism => inline_comment(text, ANGLICISM_NOTE),
        }
    }
}

/// A byte range of a prose span that deserves a mark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finding {
    pub start: usize,
    pub end: usize,
    pub kind: FindingKind,
}

impl Finding {
    pub fn new(start: usize, end: usize, kind: FindingKind) -> Self {
        Self { start, end, kind }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Apply findings to `content`.
///
/// Overlaps are resolved before anything is written: the earliest start
/// wins, and the longer finding wins a tie. Returns the rewritten text and
/// the findings that were applied.
pub fn render(content: &str, mut findings: Vec<Finding>) -> (String, Vec<Finding>) {
    findings.retain(|f| {
        !f.is_empty()
            && f.end <= content.len()
            && content.is_char_boundary(f.start)
            && content.is_char_boundary(f.end)
    });
    findings.sort_by(|a, b| a.start.cmp(&b.start).then(b.len().cmp(&a.len())));

    let mut applied = Vec::new();
    let mut out = String::with_capacity(content.len());
    let mut cursor = 0;
    for finding in findings {
        if finding.start < cursor {
            continue;
        }
        out.push_str(&content[cursor..finding.start]);
        out.push_str(&finding.kind.wrap(&content[finding.start..finding.end]));
        cursor = finding.end;
        applied.push(finding);
    }
    out.push_str(&content[cursor..]);
    (out, applied)
}
