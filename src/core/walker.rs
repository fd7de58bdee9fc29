//! Document walker
//!
//! Drives the classifier over the body, one logical unit at a time, and
//! builds the annotated output. Every heading and paragraph handed to the
//! marker becomes an `AnalysisUnit`; the line map remembers on which output
//! line each unit landed so the review phase can annotate it later.

use serde::Serialize;
use texnote_spans::Partition;
use tracing::{debug, warn};

use super::blocks::{extract_display_math, extract_environment};
use super::classify::{classify, heading_title, starts_item, BlockOpen, LineCategory};
use super::line_map::LineMap;
use super::separator::{PolicyTable, Separator};
use crate::utils::error::ReviewWarning;
use crate::utils::latex::author_note;

pub const SUBSECTION_FIRST_NOTE: &str = "Una cosa no debe empezar con una subcosa";
pub const CHAPTER_INTRO_NOTE: &str =
    "El capítulo debe tener un párrafo introductorio antes de una sección.";
pub const NEWPAGE_NOTE: &str = "Salto de página para tener espacio para los comentarios.";

/// Marker output for one piece of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marked {
    pub text: String,
    /// Inline notes added
    pub marks: usize,
}

impl Marked {
    pub fn new(text: String, marks: usize) -> Self {
        Self { text, marks }
    }

    pub fn unchanged(text: &str) -> Self {
        Self::new(text.to_string(), 0)
    }
}

/// A heading line after review, plus the notes to place below it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingReview {
    pub line: String,
    pub notes: Vec<String>,
}

impl HeadingReview {
    pub fn unchanged(line: &str) -> Self {
        Self {
            line: line.to_string(),
            notes: Vec::new(),
        }
    }
}

/// The linguistic marking hooks called by the walker
pub trait SpanMarker {
    /// Rewrite one prose span
    fn mark(&mut self, content: &str) -> Marked;

    /// Whole-paragraph rewrite applied before separation
    fn prepare_paragraph(&mut self, paragraph: &str) -> Marked {
        Marked::unchanged(paragraph)
    }

    /// Sentence-level pass over the unmarked paragraph, before `mark`
    fn mark_sentences(&mut self, _partition: &mut Partition) {}

    /// Cross-span pass over the marked paragraph, re-separated
    fn finish_paragraph(&mut self, _partition: &mut Partition) {}

    fn review_heading(&mut self, line: &str) -> HeadingReview {
        HeadingReview::unchanged(line)
    }
}

/// A marker that changes nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl SpanMarker for PassThrough {
    fn mark(&mut self, content: &str) -> Marked {
        Marked::unchanged(content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOptions {
    /// Inline notes after which a page break is suggested; 0 disables it
    pub comments_per_page: usize,
    /// Note a first section that is not preceded by an introduction
    pub chapter_intro_check: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            comments_per_page: 25,
            chapter_intro_check: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Chapter,
    Section,
    Paragraph,
}

/// A heading or paragraph, as seen by the analysis collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisUnit {
    pub compact_index: usize,
    pub kind: UnitKind,
    /// Source text (paragraph lines joined by a space, or the heading line)
    pub text: String,
    /// Prose only: the paragraph's analyze spans, or the heading title
    pub prose: String,
}

impl AnalysisUnit {
    pub fn is_heading(&self) -> bool {
        matches!(self.kind, UnitKind::Chapter | UnitKind::Section)
    }
}

#[derive(Debug, Clone, Default)]
pub struct WalkOutput {
    pub text: String,
    pub line_map: LineMap,
    pub units: Vec<AnalysisUnit>,
    pub warnings: Vec<ReviewWarning>,
    /// Inline notes added by the marker
    pub marks: usize,
}

pub struct DocumentWalker<'a, M: SpanMarker + ?Sized> {
    separator: Separator<'a>,
    marker: &'a mut M,
    options: &'a WalkOptions,
}

/// Mutable state of one pass
#[derive(Default)]
struct Pass {
    out: Vec<String>,
    output: WalkOutput,
    /// No paragraph seen since the last chapter (or the start)
    awaiting_intro: bool,
    marks_on_page: usize,
}

impl Pass {
    /// Append `text`, returning the output line of its first line
    fn emit(&mut self, text: &str) -> usize {
        let first = self.out.len();
        self.out.extend(text.split('\n').map(str::to_string));
        first
    }

    fn push_unit(&mut self, kind: UnitKind, text: String, prose: String, output_line: usize) {
        let compact_index = self.output.units.len();
        if let Err(violation) = self.output.line_map.record(compact_index, output_line) {
            warn!(?violation, "line map entry out of order");
        }
        self.output.units.push(AnalysisUnit {
            compact_index,
            kind,
            text,
            prose,
        });
    }
}

impl<'a, M: SpanMarker + ?Sized> DocumentWalker<'a, M> {
    pub fn new(table: &'a PolicyTable, marker: &'a mut M, options: &'a WalkOptions) -> Self {
        Self {
            separator: Separator::new(table),
            marker,
            options,
        }
    }

    pub fn walk<S: AsRef<str>>(&mut self, lines: &[S]) -> WalkOutput {
        let mut pass = Pass {
            awaiting_intro: true,
            ..Pass::default()
        };

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i].as_ref();
            let Some(category) = classify(line) else {
                pass.emit("");
                i += 1;
                continue;
            };

            i = match category {
                LineCategory::Comment
                | LineCategory::Command
                | LineCategory::Image
                | LineCategory::Other => {
                    pass.emit(line);
                    i + 1
                }
                LineCategory::BlockDelimiter(BlockOpen::Environment {
                    pass_through: true,
                    ..
                }) => self.pass_through(&mut pass, lines, i),
                LineCategory::BlockDelimiter(open) => self.block(&mut pass, lines, i, &open),
                LineCategory::Chapter => self.heading(&mut pass, lines, i, true),
                LineCategory::Section => self.heading(&mut pass, lines, i, false),
                LineCategory::ParagraphStart => self.paragraph(&mut pass, lines, i),
            };
        }

        let mut output = pass.output;
        output.text = pass.out.join("\n");
        debug_assert!(output.line_map.is_monotonic());
        debug!(
            units = output.units.len(),
            marks = output.marks,
            "walk finished"
        );
        output
    }

    /// Copy an opaque environment or display-math region verbatim
    fn block<S: AsRef<str>>(
        &mut self,
        pass: &mut Pass,
        lines: &[S],
        start: usize,
        open: &BlockOpen,
    ) -> usize {
        let block = match open {
            BlockOpen::Environment { .. } => extract_environment(lines, start),
            BlockOpen::DisplayMath => extract_display_math(lines, start),
        };
        if !block.balanced {
            let opener = lines[start].as_ref().trim();
            warn!(line = start + 1, opener, "unbalanced block");
            pass.output
                .warnings
                .push(ReviewWarning::unbalanced_block(opener, start));
        }
        pass.emit(&block.text);
        block.end + 1
    }

    /// Copy the delimiter line of a reviewable environment. An environment
    /// that closes on the same line is a single verbatim block; otherwise
    /// the interior is walked like the rest of the body.
    fn pass_through<S: AsRef<str>>(
        &mut self,
        pass: &mut Pass,
        lines: &[S],
        start: usize,
    ) -> usize {
        let block = extract_environment(lines, start);
        if block.balanced && block.end == start {
            pass.emit(&block.text);
        } else {
            pass.emit(lines[start].as_ref());
        }
        start + 1
    }

    fn heading<S: AsRef<str>>(
        &mut self,
        pass: &mut Pass,
        lines: &[S],
        index: usize,
        is_chapter: bool,
    ) -> usize {
        let line = lines[index].as_ref();

        if is_chapter {
            pass.awaiting_intro = true;
        } else {
            if pass.awaiting_intro && self.options.chapter_intro_check {
                pass.emit(&author_note(CHAPTER_INTRO_NOTE));
            }
            pass.awaiting_intro = false;
        }

        let review = self.marker.review_heading(line);
        let output_line = pass.emit(&review.line);
        let kind = if is_chapter {
            UnitKind::Chapter
        } else {
            UnitKind::Section
        };
        let title = heading_title(line).unwrap_or(line).to_string();
        pass.push_unit(kind, line.to_string(), title, output_line);

        for note in &review.notes {
            pass.emit(&author_note(note));
        }
        if lacks_introduction(lines, index + 1) {
            pass.emit(&author_note(SUBSECTION_FIRST_NOTE));
        }
        index + 1
    }

    fn paragraph<S: AsRef<str>>(&mut self, pass: &mut Pass, lines: &[S], start: usize) -> usize {
        let mut joined = lines[start].as_ref().to_string();
        let mut next = start + 1;
        while next < lines.len() && continues_paragraph(lines[next].as_ref()) {
            joined.push(' ');
            joined.push_str(lines[next].as_ref());
            next += 1;
        }
        pass.awaiting_intro = false;

        let prepared = self.marker.prepare_paragraph(&joined);
        let mut marks = prepared.marks;

        let mut sentences = self.separator.separate(&prepared.text);
        self.marker.mark_sentences(&mut sentences);

        let mut partition = self.separator.separate(&sentences.merge());
        let prose = self.separator.separate(&joined).analyzed_text();
        for span in partition.analyze.iter_mut() {
            let marked = self.marker.mark(&span.content);
            span.content = marked.text;
            marks += marked.marks;
        }
        let merged = partition.merge();

        let mut reread = self.separator.separate(&merged);
        self.marker.finish_paragraph(&mut reread);
        let text = reread.merge();

        let output_line = pass.emit(&text);
        pass.push_unit(UnitKind::Paragraph, joined, prose, output_line);

        pass.output.marks += marks;
        pass.marks_on_page += marks;
        let limit = self.options.comments_per_page;
        if limit > 0 && pass.marks_on_page >= limit {
            pass.emit("");
            pass.emit(&author_note(NEWPAGE_NOTE));
            pass.emit("\\newpage");
            pass.marks_on_page = 0;
        }
        next
    }
}

/// A non-blank line that is neither a list item nor anything but prose
fn continues_paragraph(line: &str) -> bool {
    !line.trim().is_empty()
        && !starts_item(line)
        && classify(line) == Some(LineCategory::ParagraphStart)
}

/// The next non-blank line opens a section, a list-like environment or a
/// `\paragraph`, so the heading has no text of its own.
fn lacks_introduction<S: AsRef<str>>(lines: &[S], from: usize) -> bool {
    let Some(next) = lines[from.min(lines.len())..]
        .iter()
        .map(|l| l.as_ref())
        .find(|l| !l.trim().is_empty())
    else {
        return false;
    };
    match classify(next) {
        Some(LineCategory::Section) => true,
        Some(LineCategory::BlockDelimiter(BlockOpen::Environment {
            pass_through: true,
            ..
        })) => true,
        _ => next.trim_start().starts_with("\\paragraph{"),
    }
}
