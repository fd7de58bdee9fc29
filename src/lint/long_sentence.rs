//! Long sentences
//!
//! Sentences are cut at `.`, `!` or `?` inside each prose span; markup
//! between spans also ends a sentence. A sentence with more words than the
//! limit is wrapped as `{\color{Thistle} [{sentence} $^{largo}$]}`, keeping
//! its surrounding whitespace outside the wrapper.

use lazy_static::lazy_static;
use regex::Regex;
use texnote_spans::Partition;

lazy_static! {
    static ref SENTENCE_RE: Regex = Regex::new(r#"[^.!?]*[.!?]["']?[ \t]*"#).unwrap();
    static ref WORD_RE: Regex = Regex::new(r"\w+").unwrap();
}

pub const DEFAULT_LIMIT: usize = 15;
pub const LONG_SENTENCE_COLOR: &str = "Thistle";

fn wrap(sentence: &str) -> String {
    format!(
        "{{\\color{{{}}} [{{{}}} $^{{largo}}$]}}",
        LONG_SENTENCE_COLOR, sentence
    )
}

/// Rewrite one span, returning the number of wrapped sentences
fn wrap_span(content: &str, limit: usize) -> Option<(String, usize)> {
    let mut pieces: Vec<&str> = SENTENCE_RE.find_iter(content).map(|m| m.as_str()).collect();
    let consumed: usize = pieces.iter().map(|p| p.len()).sum();
    if consumed < content.len() {
        pieces.push(&content[consumed..]);
    }

    let mut out = String::with_capacity(content.len());
    let mut wrapped = 0;
    for piece in pieces {
        if WORD_RE.find_iter(piece).count() <= limit {
            out.push_str(piece);
            continue;
        }
        let body = piece.trim();
        let lead = piece.len() - piece.trim_start().len();
        out.push_str(&piece[..lead]);
        out.push_str(&wrap(body));
        out.push_str(&piece[lead + body.len()..]);
        wrapped += 1;
    }
    (wrapped > 0).then_some((out, wrapped))
}

/// Wrap every sentence of the partition's prose spans with more than
/// `limit` words. A limit of 0 turns the pass off.
pub fn highlight(partition: &mut Partition, limit: usize) -> usize {
    if limit == 0 {
        return 0;
    }
    let mut total = 0;
    for span in partition.analyze.iter_mut() {
        if let Some((text, wrapped)) = wrap_span(&span.content, limit) {
            span.content = text;
            total += wrapped;
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::separator::separate;
    use pretty_assertions::assert_eq;

    fn run(text: &str, limit: usize) -> (String, usize) {
        let mut partition = separate(text);
        let count = highlight(&mut partition, limit);
        (partition.merge(), count)
    }

    #[test]
    fn test_long_sentence_is_wrapped() {
        let (out, count) = run("Uno dos tres cuatro. Corta.", 3);
        assert_eq!(
            out,
            r"{\color{Thistle} [{Uno dos tres cuatro.} $^{largo}$]} Corta."
        );
        assert_eq!(count, 1);
    }

    #[test]
    fn test_limit_is_inclusive() {
        let (out, count) = run("Uno dos tres.", 3);
        assert_eq!(out, "Uno dos tres.");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_tail_without_period_counts() {
        let (out, _) = run("Bien. uno dos tres cuatro ", 3);
        assert_eq!(
            out,
            r"Bien. {\color{Thistle} [{uno dos tres cuatro} $^{largo}$]} "
        );
    }

    #[test]
    fn test_markup_is_left_outside() {
        let (out, count) = run(r"Uno dos \cite{a_b_c_d} tres.", 3);
        assert_eq!(out, r"Uno dos \cite{a_b_c_d} tres.");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_zero_limit_disables() {
        let text = "Una frase con bastantes palabras para pasar cualquier límite razonable.";
        assert_eq!(run(text, 0), (text.to_string(), 0));
    }

    #[test]
    fn test_wrapped_sentence_stays_prose() {
        let (out, _) = run("Uno dos tres cuatro.", 3);
        let again = separate(&out);
        let prose = again.analyzed_text();
        assert!(prose.contains("Uno dos tres cuatro."));
        assert!(!prose.contains("Thistle"));
        assert!(!prose.contains("largo"));
    }
}
