//! texnote - writing-quality notes for LaTeX documents
//!
//! texnote reads a LaTeX document and writes it back with notes for the
//! author: passive voice, first or second person, weasel words,
//! anglicisms, repeated words, misplaced citations, hand-numbered
//! headings, and, when a language model is available, ambiguous ideas,
//! missing transitions, weak chapter introductions and section order.
//! Markup outside prose (command arguments, math, environments) is never
//! touched, so the output compiles wherever the input did.
//!
//! ## Pipeline
//!
//! 1. The source is split around `\begin{document}` ... `\end{document}`
//!    and the preamble gets the lines the notes need.
//! 2. Headings, block delimiters and trailing comments that share a line
//!    with prose are moved to lines of their own.
//! 3. The body is walked line by line. Paragraph prose is separated from
//!    markup, marked, and merged back; every heading and paragraph is
//!    recorded as an analysis unit together with its output line.
//! 4. The review asks the language model about the units and places its
//!    answers through the line map.
//!
//! ## Example
//!
//! ```
//! use texnote::{review_document, BasicAnalyzer, NoopModel, ReviewOptions};
//!
//! let source = "\\documentclass{book}\n\\begin{document}\nTú escribes.\n\\end{document}\n";
//! let output = review_document(source, &ReviewOptions::default(), &BasicAnalyzer, &NoopModel)
//!     .unwrap();
//! assert!(output.text.contains("\\comment{Tú}{Escribir en 3ra persona}"));
//! ```

pub mod collab;
pub mod config;
pub mod core;
pub mod lint;
pub mod review;
pub mod utils;

pub use collab::{
    Analysis, BasicAnalyzer, CommandAnalyzer, CommandModel, LanguageAnalyzer, LanguageModel,
    NoopModel, Token,
};
pub use config::ReviewOptions;
pub use core::{
    separate, AnalysisUnit, DocumentWalker, LineCategory, LineMap, Partition, Span, SpanKind,
    SpanMarker, UnitKind, WalkOptions, WalkOutput,
};
pub use lint::{MarkCounts, WritingMarker};
pub use review::{ReviewCounts, ReviewFindings, Reviewer};
pub use utils::error::{ReviewError, ReviewResult, ReviewWarning, WarningKind};

use serde::Serialize;
use tracing::info;

use crate::core::annotate::insert_note_after;
use crate::core::document::{extend_preamble, SourceDocument, PREAMBLE_CONFLICT_NOTE};
use crate::core::line_map::LineMapEntry;
use crate::core::preprocess::prepare_body;
use crate::core::separator::DEFAULT_POLICY_TABLE;
use crate::review::apply_findings;

/// Everything a review produced
#[derive(Debug, Clone)]
pub struct ReviewOutput {
    /// The annotated document
    pub text: String,
    /// Output lines of the units, counted from the first line of the body
    pub line_map: LineMap,
    pub units: Vec<AnalysisUnit>,
    pub marks: MarkCounts,
    pub review: ReviewCounts,
    pub warnings: Vec<ReviewWarning>,
}

/// Serializable summary of a review
#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport<'a> {
    pub marks: &'a MarkCounts,
    pub review: &'a ReviewCounts,
    pub units: usize,
    pub line_map: &'a [LineMapEntry],
    pub warnings: &'a [ReviewWarning],
}

impl ReviewOutput {
    pub fn report(&self) -> ReviewReport<'_> {
        ReviewReport {
            marks: &self.marks,
            review: &self.review,
            units: self.units.len(),
            line_map: self.line_map.entries(),
            warnings: &self.warnings,
        }
    }
}

/// Annotate a whole LaTeX document.
///
/// Fails only when the source has no document environment or the word
/// lists do not compile. Collaborator failures end up in `warnings`.
pub fn review_document<A, M>(
    source: &str,
    options: &ReviewOptions,
    analyzer: &A,
    model: &M,
) -> ReviewResult<ReviewOutput>
where
    A: LanguageAnalyzer + ?Sized,
    M: LanguageModel + ?Sized,
{
    let document = SourceDocument::split(source)?;
    let preamble = extend_preamble(document.preamble, &options.preamble_lines);
    let mut warnings = preamble.warnings.clone();

    let body = prepare_body(document.body);
    let lines: Vec<&str> = body.split('\n').collect();

    let mut marker = WritingMarker::new(analyzer, options)?;
    let walk_options = options.walk_options();
    let walked = DocumentWalker::new(&DEFAULT_POLICY_TABLE, &mut marker, &walk_options).walk(&lines);
    let (marks, marker_warnings) = marker.into_parts();
    warnings.extend(walked.warnings);
    warnings.extend(marker_warnings);

    let mut line_map = walked.line_map;
    let findings = Reviewer::new(analyzer, model, options).review(&walked.units);
    warnings.extend(findings.warnings.iter().cloned());
    let (mut text, review, apply_warnings) =
        apply_findings(walked.text, &mut line_map, &walked.units, &findings, analyzer);
    warnings.extend(apply_warnings);

    if preamble.has_conflict() {
        if let Some((updated, at)) = insert_note_after(&text, 0, PREAMBLE_CONFLICT_NOTE) {
            text = updated;
            line_map.shift_from(at, 1);
        }
    }

    info!(
        units = walked.units.len(),
        marks = walked.marks,
        warnings = warnings.len(),
        "document reviewed"
    );
    Ok(ReviewOutput {
        text: document.reassemble(&preamble.text, &text),
        line_map,
        units: walked.units,
        marks,
        review,
        warnings,
    })
}
