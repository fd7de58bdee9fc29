//! The marker plugged into the document walker

use serde::Serialize;
use texnote_spans::Partition;
use tracing::warn;

use super::heading::{highlight_number, title_words_note, HAND_NUMBERED_NOTE};
use super::wordlists::CompiledWordLists;
use super::{citation, long_sentence, passive, person, render, repetition, weasel, FindingKind};
use crate::collab::{Analysis, LanguageAnalyzer};
use crate::config::ReviewOptions;
use crate::core::walker::{HeadingReview, Marked, SpanMarker};
use crate::utils::error::{ReviewResult, ReviewWarning};

/// How many marks of each kind were placed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkCounts {
    pub passive_voice: usize,
    pub person: usize,
    pub weasel_words: usize,
    pub anglicisms: usize,
    pub citations: usize,
    pub repetitions: usize,
    pub long_sentences: usize,
    pub heading_notes: usize,
}

impl MarkCounts {
    fn add(&mut self, kind: FindingKind) {
        match kind {
            FindingKind::PassiveVoice => self.passive_voice += 1,
            FindingKind::Person => self.person += 1,
            FindingKind::WeaselWord => self.weasel_words += 1,
            FindingKind::Anglicism => self.anglicisms += 1,
        }
    }
}

pub struct WritingMarker<'a, A: LanguageAnalyzer + ?Sized> {
    analyzer: &'a A,
    lists: CompiledWordLists,
    repetition_window: usize,
    long_sentence_limit: usize,
    colors: Vec<String>,
    counts: MarkCounts,
    warnings: Vec<ReviewWarning>,
}

impl<'a, A: LanguageAnalyzer + ?Sized> WritingMarker<'a, A> {
    pub fn new(analyzer: &'a A, options: &ReviewOptions) -> ReviewResult<Self> {
        Ok(Self {
            analyzer,
            lists: options.words.compile()?,
            repetition_window: options.repetition_window,
            long_sentence_limit: options.long_sentence_limit,
            colors: options.repetition_colors.clone(),
            counts: MarkCounts::default(),
            warnings: Vec::new(),
        })
    }

    pub fn counts(&self) -> &MarkCounts {
        &self.counts
    }

    pub fn into_parts(self) -> (MarkCounts, Vec<ReviewWarning>) {
        (self.counts, self.warnings)
    }

    fn analyze(&mut self, content: &str) -> Analysis {
        match self.analyzer.analyze(content) {
            Ok(analysis) => analysis,
            Err(err) => {
                warn!(error = %err, "analyzer failed; span left unmarked");
                // One warning per run is enough for the report
                if self.warnings.is_empty() {
                    self.warnings
                        .push(ReviewWarning::collaborator_failure(format!("analyzer: {}", err)));
                }
                Analysis::default()
            }
        }
    }
}

impl<'a, A: LanguageAnalyzer + ?Sized> SpanMarker for WritingMarker<'a, A> {
    fn mark(&mut self, content: &str) -> Marked {
        if !content.chars().any(char::is_alphabetic) {
            return Marked::unchanged(content);
        }

        let analysis = self.analyze(content);
        let mut findings = passive::detect(&analysis);
        findings.extend(person::detect(&analysis));
        findings.extend(weasel::detect(content, &self.lists));

        let (text, applied) = render(content, findings);
        for finding in &applied {
            self.counts.add(finding.kind);
        }
        Marked::new(text, applied.len())
    }

    fn prepare_paragraph(&mut self, paragraph: &str) -> Marked {
        let (text, count) = citation::fix_citations(paragraph);
        self.counts.citations += count;
        Marked::new(text, count)
    }

    fn mark_sentences(&mut self, partition: &mut Partition) {
        self.counts.long_sentences += long_sentence::highlight(partition, self.long_sentence_limit);
    }

    fn finish_paragraph(&mut self, partition: &mut Partition) {
        self.counts.repetitions +=
            repetition::highlight(partition, &self.lists, self.repetition_window, &self.colors);
    }

    fn review_heading(&mut self, line: &str) -> HeadingReview {
        let mut review = HeadingReview::unchanged(line);
        if let Some(highlighted) = highlight_number(line) {
            review.line = highlighted;
            review.notes.push(HAND_NUMBERED_NOTE.to_string());
        }
        if let Some(note) = title_words_note(line, &self.lists) {
            review.notes.push(note);
        }
        self.counts.heading_notes += review.notes.len();
        review
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::BasicAnalyzer;
    use crate::utils::error::ReviewError;
    use pretty_assertions::assert_eq;

    struct Broken;

    impl LanguageAnalyzer for Broken {
        fn analyze(&self, _text: &str) -> ReviewResult<Analysis> {
            Err(ReviewError::collaborator("down"))
        }
    }

    #[test]
    fn test_marks_person_and_weasel() {
        let options = ReviewOptions::default();
        let mut marker = WritingMarker::new(&BasicAnalyzer, &options).unwrap();
        let marked = marker.mark("Tú escribes muy bien");
        assert_eq!(
            marked.text,
            r"\comment{Tú}{Escribir en 3ra persona} escribes \comadreja{muy} bien"
        );
        assert_eq!(marked.marks, 2);
        assert_eq!(marker.counts().person, 1);
        assert_eq!(marker.counts().weasel_words, 1);
    }

    #[test]
    fn test_heading_review() {
        let options = ReviewOptions::default();
        let mut marker = WritingMarker::new(&BasicAnalyzer, &options).unwrap();
        let review = marker.review_heading(r"\section{2 Un script}");
        assert_eq!(review.line, r"\section{\textcolor{orange}{2} Un script}");
        assert_eq!(review.notes.len(), 2);
        assert_eq!(review.notes[0], HAND_NUMBERED_NOTE);
    }

    #[test]
    fn test_long_sentences_are_counted() {
        let options = ReviewOptions {
            long_sentence_limit: 4,
            ..ReviewOptions::default()
        };
        let mut marker = WritingMarker::new(&BasicAnalyzer, &options).unwrap();
        let mut partition = crate::core::separator::separate("Una dos tres cuatro cinco. Breve.");
        marker.mark_sentences(&mut partition);
        assert_eq!(
            partition.merge(),
            r"{\color{Thistle} [{Una dos tres cuatro cinco.} $^{largo}$]} Breve."
        );
        assert_eq!(marker.counts().long_sentences, 1);
    }

    #[test]
    fn test_analyzer_failure_degrades() {
        let options = ReviewOptions::default();
        let mut marker = WritingMarker::new(&Broken, &options).unwrap();
        let first = marker.mark("Yo uso un script");
        marker.mark("otra vez");
        assert_eq!(first.text, r"Yo uso un \comment{script}{Anglicismo}");
        let (_, warnings) = marker.into_parts();
        assert_eq!(warnings.len(), 1);
    }
}
