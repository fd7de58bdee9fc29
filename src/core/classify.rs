//! Line classification
//!
//! Every non-blank body line gets exactly one `LineCategory`. The result
//! depends only on the line's own text, never on its neighbours.

use lazy_static::lazy_static;
use phf::phf_set;
use regex::Regex;

use crate::utils::latex::find_group_end;

/// Environments whose delimiters are copied through while their interior is
/// still reviewed line by line.
static PASS_THROUGH_ENVIRONMENTS: phf::Set<&'static str> = phf_set! {
    "document",
    "abstract",
    "frame",
    "quote",
    "multicols",
    "parcolumns",
    "itemize",
    "enumerate",
    "description",
};

/// Document-setup commands that occupy a line of their own.
static SETUP_COMMANDS: phf::Set<&'static str> = phf_set! {
    "maketitle",
    "tableofcontents",
    "listoffigures",
    "listoftables",
    "usepackage",
    "documentclass",
    "setlength",
    "addbibresource",
    "hypersetup",
    "large",
    "setcounter",
    "newpage",
    "clearpage",
    "bibliography",
    "bibliographystyle",
    "printbibliography",
    "label",
};

lazy_static! {
    static ref BEGIN_RE: Regex = Regex::new(r"\\begin\{([^}]*)\}").unwrap();
    static ref CHAPTER_RE: Regex =
        Regex::new(r"^\\(?:chapter|part)\*?\s*(?:\[[^\]]*\])?\s*\{").unwrap();
    static ref SECTION_RE: Regex =
        Regex::new(r"^\\(?:sub)*section\*?\s*(?:\[[^\]]*\])?\s*\{").unwrap();
    static ref LEADING_COMMAND_RE: Regex = Regex::new(r"^\\([a-zA-Z]+)").unwrap();
    static ref IMAGE_RE: Regex = Regex::new(r"^\\includegraphics\s*(?:\[[^\]]*\])?\s*\{").unwrap();
    static ref CLOSER_RE: Regex = Regex::new(r"^(?:\\end\s*\{[^}]*\}|\\\])").unwrap();
    static ref HEADING_PREFIX_RE: Regex =
        Regex::new(r"^\s*\\(?:chapter|part|(?:sub)*section)\*?\s*(?:\[[^\]]*\])?\s*\{").unwrap();
}

/// What opens a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOpen {
    /// `\begin{name}`; pass-through environments keep their interior reviewable
    Environment { name: String, pass_through: bool },
    /// A bare `\[` display-math opener
    DisplayMath,
}

/// Semantic category of a body line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCategory {
    Chapter,
    Section,
    Command,
    Image,
    Comment,
    ParagraphStart,
    BlockDelimiter(BlockOpen),
    Other,
}

impl LineCategory {
    pub fn is_heading(&self) -> bool {
        matches!(self, LineCategory::Chapter | LineCategory::Section)
    }
}

/// Classify one line. Blank lines yield `None`.
pub fn classify(line: &str) -> Option<LineCategory> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if line.starts_with('%') {
        return Some(LineCategory::Comment);
    }

    // "\centering \begin{figure}" is classified by its \begin alone
    if let Some(caps) = BEGIN_RE.captures(line) {
        let name = caps[1].trim().to_string();
        let pass_through = PASS_THROUGH_ENVIRONMENTS.contains(name.trim_end_matches('*'));
        return Some(LineCategory::BlockDelimiter(BlockOpen::Environment {
            name,
            pass_through,
        }));
    }

    if CHAPTER_RE.is_match(line) {
        return Some(LineCategory::Chapter);
    }

    if SECTION_RE.is_match(line) {
        return Some(LineCategory::Section);
    }

    if let Some(caps) = LEADING_COMMAND_RE.captures(line) {
        if SETUP_COMMANDS.contains(caps[1].to_ascii_lowercase().as_str()) {
            return Some(LineCategory::Command);
        }
    }

    if IMAGE_RE.is_match(line) {
        return Some(LineCategory::Image);
    }

    if line.starts_with("\\[") {
        return Some(LineCategory::BlockDelimiter(BlockOpen::DisplayMath));
    }

    if CLOSER_RE.is_match(line) {
        return Some(LineCategory::Other);
    }

    Some(LineCategory::ParagraphStart)
}

/// Title of a chapter or section declaration: the interior of its first
/// brace group, braces balanced.
pub fn heading_title(line: &str) -> Option<&str> {
    let prefix = HEADING_PREFIX_RE.find(line)?;
    let open = prefix.end() - 1;
    let end = find_group_end(line, open, '{', '}');
    let close = if line[..end].ends_with('}') { end - 1 } else { end };
    Some(&line[open + 1..close.max(open + 1)])
}

/// True when the line starts a list item or a column chunk, which always
/// begins a new logical paragraph.
pub fn starts_item(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("\\item") || line.starts_with("\\colchunk")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(name: &str, pass_through: bool) -> Option<LineCategory> {
        Some(LineCategory::BlockDelimiter(BlockOpen::Environment {
            name: name.to_string(),
            pass_through,
        }))
    }

    #[test]
    fn test_blank_is_unclassified() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("   \t"), None);
    }

    #[test]
    fn test_headings() {
        assert_eq!(classify(r"\chapter{Estado del arte}"), Some(LineCategory::Chapter));
        assert_eq!(classify(r"\part*{Anexos}"), Some(LineCategory::Chapter));
        assert_eq!(classify(r"\section{Introducción}"), Some(LineCategory::Section));
        assert_eq!(classify(r"  \subsubsection*{Detalles}"), Some(LineCategory::Section));
        assert_eq!(classify(r"\section[corto]{Largo}"), Some(LineCategory::Section));
    }

    #[test]
    fn test_comment_wins_over_begin() {
        assert_eq!(classify(r"% \begin{figure}"), Some(LineCategory::Comment));
    }

    #[test]
    fn test_setup_commands() {
        assert_eq!(classify(r"\maketitle"), Some(LineCategory::Command));
        assert_eq!(classify(r"\Large"), Some(LineCategory::Command));
        assert_eq!(classify(r"\newpage"), Some(LineCategory::Command));
        assert_eq!(classify(r"\textbf{hola} mundo"), Some(LineCategory::ParagraphStart));
    }

    #[test]
    fn test_image() {
        assert_eq!(
            classify(r"\includegraphics[width=0.5\textwidth]{fig.png}"),
            Some(LineCategory::Image)
        );
    }

    #[test]
    fn test_environments() {
        assert_eq!(classify(r"\begin{itemize}"), env("itemize", true));
        assert_eq!(classify(r"\begin{multicols}{2}"), env("multicols", true));
        assert_eq!(classify(r"\begin{figure}[h]"), env("figure", false));
        assert_eq!(classify(r"\begin{equation*}"), env("equation*", false));
    }

    #[test]
    fn test_begin_after_leading_commands() {
        assert_eq!(classify(r"\centering \begin{tabular}{cc}"), env("tabular", false));
    }

    #[test]
    fn test_display_math_and_closers() {
        assert_eq!(
            classify(r"\["),
            Some(LineCategory::BlockDelimiter(BlockOpen::DisplayMath))
        );
        assert_eq!(classify(r"\end{itemize}"), Some(LineCategory::Other));
        assert_eq!(classify(r"\]"), Some(LineCategory::Other));
    }

    #[test]
    fn test_plain_text_is_paragraph() {
        assert_eq!(
            classify("Sección uno: Tú escribes el texto."),
            Some(LineCategory::ParagraphStart)
        );
        assert_eq!(classify(r"\item Primer punto"), Some(LineCategory::ParagraphStart));
    }

    #[test]
    fn test_context_independent() {
        let lines = [r"\section{A}", "texto", r"\begin{quote}"];
        let forward: Vec<_> = lines.iter().map(|l| classify(l)).collect();
        let backward: Vec<_> = lines.iter().rev().map(|l| classify(l)).collect();
        assert_eq!(forward, backward.into_iter().rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_heading_title() {
        assert_eq!(heading_title(r"\section{Introducción}"), Some("Introducción"));
        assert_eq!(
            heading_title(r"\subsection*{El \textbf{mejor} método} \label{s}"),
            Some(r"El \textbf{mejor} método")
        );
        assert_eq!(heading_title(r"\chapter[corto]{Largo"), Some("Largo"));
        assert_eq!(heading_title("texto"), None);
    }

    #[test]
    fn test_starts_item() {
        assert!(starts_item(r"  \item uno"));
        assert!(starts_item(r"\colchunk{x}"));
        assert!(!starts_item("texto"));
    }
}
