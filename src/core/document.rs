//! Source document split and reassembly
//!
//! Only the body between the first `\begin{document}` and the following
//! `\end{document}` is walked. The preamble gets the lines the notes need,
//! and everything else is carried over untouched.

use tracing::{info, warn};

use crate::utils::error::{ReviewError, ReviewResult, ReviewWarning};

const BEGIN_DOCUMENT: &str = "\\begin{document}";
const END_DOCUMENT: &str = "\\end{document}";

/// Prefix given to preamble lines that duplicate a required line
pub const DUPLICATE_MARK: &str = "% [texnote: duplicate removed] ";

pub const PREAMBLE_CONFLICT_NOTE: &str =
    "Algunos comandos antes de begin{document} fueron comentados por posibles conflictos";

/// A LaTeX source cut in five parts. Concatenating them gives the source back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument<'a> {
    pub preamble: &'a str,
    pub begin: &'a str,
    pub body: &'a str,
    pub end: &'a str,
    pub postamble: &'a str,
}

impl<'a> SourceDocument<'a> {
    pub fn split(source: &'a str) -> ReviewResult<Self> {
        let begin_at = source
            .find(BEGIN_DOCUMENT)
            .ok_or(ReviewError::MissingDocumentEnvironment)?;
        let body_at = begin_at + BEGIN_DOCUMENT.len();
        let end_at = source[body_at..]
            .find(END_DOCUMENT)
            .map(|offset| body_at + offset)
            .ok_or(ReviewError::MissingDocumentEnvironment)?;
        let post_at = end_at + END_DOCUMENT.len();

        Ok(Self {
            preamble: &source[..begin_at],
            begin: &source[begin_at..body_at],
            body: &source[body_at..end_at],
            end: &source[end_at..post_at],
            postamble: &source[post_at..],
        })
    }

    /// Rebuild the document around a new preamble and body
    pub fn reassemble(&self, preamble: &str, body: &str) -> String {
        let mut out = String::with_capacity(
            preamble.len() + body.len() + self.begin.len() + self.end.len() + self.postamble.len(),
        );
        out.push_str(preamble);
        out.push_str(self.begin);
        out.push_str(body);
        out.push_str(self.end);
        out.push_str(self.postamble);
        out
    }
}

/// Preamble with the required lines appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedPreamble {
    pub text: String,
    pub warnings: Vec<ReviewWarning>,
}

impl ExtendedPreamble {
    /// Some original line was commented out
    pub fn has_conflict(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Package loaded by a `\usepackage[...]{name}` line
fn package_name(line: &str) -> Option<&str> {
    let rest = line.trim().strip_prefix("\\usepackage")?;
    let rest = rest.trim_start();
    let rest = match rest.strip_prefix('[') {
        Some(options) => &options[options.find(']')? + 1..],
        None => rest,
    };
    let rest = rest.trim_start().strip_prefix('{')?;
    Some(rest[..rest.find('}')?].trim())
}

fn duplicates(line: &str, required: &[String]) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('%') {
        return false;
    }
    required.iter().any(|wanted| {
        wanted.trim() == trimmed
            || matches!((package_name(wanted), package_name(trimmed)), (Some(a), Some(b)) if a == b)
    })
}

/// Comment out preamble lines that load the same package as (or repeat) a
/// required line, then append the required lines.
pub fn extend_preamble(preamble: &str, required: &[String]) -> ExtendedPreamble {
    let mut warnings = Vec::new();
    let mut lines: Vec<String> = Vec::new();

    for line in preamble.split('\n') {
        if duplicates(line, required) {
            warn!(line = line.trim(), "preamble line duplicates a required package");
            warnings.push(ReviewWarning::preamble_conflict(line));
            lines.push(format!("{}{}", DUPLICATE_MARK, line));
        } else {
            lines.push(line.to_string());
        }
    }

    // The preamble usually ends with the newline before \begin{document}
    let trailing_blank = lines.last().is_some_and(|l| l.is_empty());
    if trailing_blank {
        lines.pop();
    }
    lines.extend(required.iter().cloned());

    let mut text = lines.join("\n");
    text.push('\n');
    if !warnings.is_empty() {
        info!(count = warnings.len(), "commented out duplicate preamble lines");
    }
    ExtendedPreamble { text, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::REQUIRED_PREAMBLE_LINES;
    use pretty_assertions::assert_eq;

    fn required() -> Vec<String> {
        REQUIRED_PREAMBLE_LINES.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_split_and_reassemble() {
        let source = "\\documentclass{book}\n\\begin{document}\nHola\n\\end{document}\n";
        let doc = SourceDocument::split(source).unwrap();
        assert_eq!(doc.preamble, "\\documentclass{book}\n");
        assert_eq!(doc.body, "\nHola\n");
        assert_eq!(doc.postamble, "\n");
        assert_eq!(doc.reassemble(doc.preamble, doc.body), source);
    }

    #[test]
    fn test_missing_environment() {
        let err = SourceDocument::split("\\begin{document} sin final").unwrap_err();
        assert!(matches!(err, ReviewError::MissingDocumentEnvironment));
        assert!(SourceDocument::split("texto").is_err());
    }

    #[test]
    fn test_extend_clean_preamble() {
        let extended = extend_preamble("\\documentclass{book}\n", &required());
        assert_eq!(
            extended.text,
            "\\documentclass{book}\n\\usepackage[dvipsnames]{xcolor}\n\\input{word-comments.tex}\n"
        );
        assert!(!extended.has_conflict());
    }

    #[test]
    fn test_duplicate_package_is_commented_out() {
        let extended = extend_preamble(
            "\\documentclass{book}\n\\usepackage{xcolor}\n\\usepackage{graphicx}\n",
            &required(),
        );
        let lines: Vec<&str> = extended.text.lines().collect();
        assert_eq!(lines[1], "% [texnote: duplicate removed] \\usepackage{xcolor}");
        assert_eq!(lines[2], "\\usepackage{graphicx}");
        assert!(extended.has_conflict());
        assert_eq!(extended.warnings.len(), 1);
    }

    #[test]
    fn test_package_name() {
        assert_eq!(package_name("\\usepackage[dvipsnames]{xcolor}"), Some("xcolor"));
        assert_eq!(package_name("  \\usepackage {soul}"), Some("soul"));
        assert_eq!(package_name("\\input{word-comments.tex}"), None);
    }
}
