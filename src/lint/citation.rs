//! Citation spacing
//!
//! A `\cite` glued to the previous word, or placed after punctuation, is
//! wrapped in a note and separated by a space. `word~\cite{x}` and
//! `word \cite{x}` are correct and left alone.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::utils::latex::inline_comment;

pub const CITATION_NOTE: &str = "Formato de cita incorrecto";

lazy_static! {
    static ref MISPLACED_CITE_RE: Regex =
        Regex::new(r"([.,;:!?][ \t]*|[^\s~])(\\cite(?:\[[^\]]*\])?\{[^}]*\})").unwrap();
}

/// Rewrite misplaced citations. Returns the text and how many were marked.
pub fn fix_citations(text: &str) -> (String, usize) {
    let mut count = 0;
    let fixed = MISPLACED_CITE_RE.replace_all(text, |caps: &Captures| {
        count += 1;
        format!(
            "{} {}",
            caps[1].trim_end(),
            inline_comment(&caps[2], CITATION_NOTE)
        )
    });
    (fixed.into_owned(), count)
}
