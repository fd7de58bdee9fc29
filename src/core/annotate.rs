//! Annotation inserter
//!
//! Splices review notes into text that the walker already produced. Inline
//! notes go in front of a sentence of an existing line and never change the
//! line count. Heading notes go on a new line right after the heading line
//! the line map points at, and report where, so the caller can shift the
//! line map.

use tracing::warn;

use crate::collab::LanguageAnalyzer;
use crate::utils::error::ReviewWarning;
use crate::utils::latex::{author_note, inline_comment};

pub const AMBIGUITY_LABEL: &str = "Ambigüedad";

/// Prepend `\comment{Ambigüedad}{message} ` to one sentence of one line.
///
/// The line is segmented with `analyzer`. Any other byte of `text` is left
/// untouched. A line or sentence that does not exist is reported as a
/// warning instead.
pub fn insert_sentence_note<A: LanguageAnalyzer + ?Sized>(
    text: &str,
    line: usize,
    sentence: usize,
    message: &str,
    analyzer: &A,
) -> Result<String, ReviewWarning> {
    let Some((line_start, line_text)) = line_bounds(text, line) else {
        warn!(line, "annotation line out of range");
        return Err(ReviewWarning::anchor_out_of_range(line, None));
    };

    let sentences = match analyzer.sentences(line_text) {
        Ok(sentences) => sentences,
        Err(err) => {
            warn!(error = %err, line, "sentence segmentation failed");
            return Err(ReviewWarning::collaborator_failure(format!(
                "analyzer: {}",
                err
            ))
            .with_location(format!("line {}", line + 1)));
        }
    };
    let Some(&(offset, _)) = sentences.get(sentence) else {
        warn!(line, sentence, "annotation sentence out of range");
        return Err(ReviewWarning::anchor_out_of_range(line, Some(sentence)));
    };
    if offset > line_text.len() || !line_text.is_char_boundary(offset) {
        return Err(ReviewWarning::anchor_out_of_range(line, Some(sentence)));
    }

    let at = line_start + offset;
    let note = inline_comment(AMBIGUITY_LABEL, message);
    let mut out = String::with_capacity(text.len() + note.len() + 1);
    out.push_str(&text[..at]);
    out.push_str(&note);
    out.push(' ');
    out.push_str(&text[at..]);
    Ok(out)
}

/// Insert `\notaparaelautor{message}` on its own line right after line
/// `line`. Returns the new text and the index of the inserted line.
pub fn insert_note_after(text: &str, line: usize, message: &str) -> Option<(String, usize)> {
    let lines: Vec<&str> = text.split('\n').collect();
    if line >= lines.len() {
        return None;
    }
    let note = author_note(message);

    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 1);
    out.extend_from_slice(&lines[..=line]);
    out.push(&note);
    out.extend_from_slice(&lines[line + 1..]);
    Some((out.join("\n"), line + 1))
}

/// Byte offset and content of line `index`
fn line_bounds(text: &str, index: usize) -> Option<(usize, &str)> {
    let mut start = 0;
    for (i, line) in text.split('\n').enumerate() {
        if i == index {
            return Some((start, line));
        }
        start += line.len() + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::BasicAnalyzer;
    use crate::utils::error::WarningKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sentence_note_on_second_sentence() {
        let text = "\\section{Uno}\nPrimera idea. Segunda idea.\nFin";
        let out = insert_sentence_note(text, 1, 1, "¿Qué idea?", &BasicAnalyzer).unwrap();
        assert_eq!(
            out,
            "\\section{Uno}\nPrimera idea. \\comment{Ambigüedad}{¿Qué idea?} Segunda idea.\nFin"
        );
    }

    #[test]
    fn test_sentence_note_escapes_message() {
        let out = insert_sentence_note("Texto.", 0, 0, "usa {llaves} y 50%", &BasicAnalyzer)
            .unwrap();
        assert_eq!(out, r"\comment{Ambigüedad}{usa \{llaves\} y 50\%} Texto.");
    }

    #[test]
    fn test_out_of_range_anchor() {
        let text = "Una oración.";
        let err = insert_sentence_note(text, 0, 3, "x", &BasicAnalyzer).unwrap_err();
        assert_eq!(err.kind, WarningKind::AnchorOutOfRange);
        let err = insert_sentence_note(text, 5, 0, "x", &BasicAnalyzer).unwrap_err();
        assert_eq!(err.kind, WarningKind::AnchorOutOfRange);
        assert_eq!(err.location.as_deref(), Some("line 6"));
    }

    #[test]
    fn test_note_after_line() {
        let (out, inserted) = insert_note_after("a\nb", 1, "fin").unwrap();
        assert_eq!(out, "a\nb\n\\notaparaelautor{fin}");
        assert_eq!(inserted, 2);
        assert_eq!(insert_note_after("a", 1, "x"), None);
    }
}
