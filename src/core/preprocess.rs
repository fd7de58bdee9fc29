//! Body clean-up before the walk
//!
//! The classifier works one physical line at a time, so a trailing `%`
//! comment, or a heading or block delimiter written in the middle of a line,
//! would be misread. Each is moved to a line of its own.

use lazy_static::lazy_static;
use phf::phf_set;
use regex::Regex;

use crate::utils::latex::find_group_end;

/// Environments whose interior is copied untouched, line breaks included
static VERBATIM_ENVIRONMENTS: phf::Set<&'static str> = phf_set! {
    "verbatim",
    "verbatim*",
    "Verbatim",
    "lstlisting",
    "minted",
    "comment",
};

lazy_static! {
    static ref HEADING_START_RE: Regex =
        Regex::new(r"^\\(?:chapter|part|(?:sub)*section)\*?\s*(?:\[[^\]]*\])?\s*\{").unwrap();
    static ref BEGIN_RE: Regex = Regex::new(r"^\\begin\s*\{([^}]*)\}").unwrap();
    static ref END_RE: Regex = Regex::new(r"^\\end\s*\{([^}]*)\}").unwrap();
    static ref ENV_DELIMITER_RE: Regex = Regex::new(r"\\(begin|end)\s*\{([^}]*)\}").unwrap();
}

/// Run every clean-up step over the body
pub fn prepare_body(body: &str) -> String {
    split_structure(&relocate_inline_comments(body))
}

/// Byte offset of the first unescaped `%` of a line
fn comment_start(line: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'%' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Move `text % comment` to `text` and `% comment` on the next line.
/// Whole-line comments and escaped `\%` are left alone.
pub fn relocate_inline_comments(body: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for line in body.split('\n') {
        match comment_start(line) {
            Some(at) if !line[..at].trim().is_empty() => {
                out.push(line[..at].trim_end());
                out.push(&line[at..]);
            }
            _ => out.push(line),
        }
    }
    out.join("\n")
}

/// Put every heading, `\begin{..}`, `\end{..}` and unclosed `\[` or `\]`
/// that shares its line with other text on a line of its own.
///
/// An environment or `\[ .. \]` region that closes on the line it opens
/// stays whole. Comment lines and the interior of verbatim environments are
/// not touched, and inline math is never cut.
pub fn split_structure(body: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut verbatim: Option<String> = None;
    for line in body.split('\n') {
        if let Some(name) = verbatim.as_deref() {
            match environment_close(line, 0, name) {
                Some(end) => {
                    verbatim = None;
                    out.push(line[..end].to_string());
                    let rest = &line[end..];
                    if !rest.trim().is_empty() {
                        verbatim = LineSplitter::new(rest.trim_start()).split(&mut out);
                    }
                }
                None => out.push(line.to_string()),
            }
            continue;
        }
        if line.trim_start().starts_with('%') {
            out.push(line.to_string());
            continue;
        }
        verbatim = LineSplitter::new(line).split(&mut out);
    }
    out.join("\n")
}

/// Offset just past the `\end{name}` that balances an environment already
/// open at `from`
fn environment_close(line: &str, from: usize, name: &str) -> Option<usize> {
    let mut depth = 1i64;
    for caps in ENV_DELIMITER_RE.captures_iter(&line[from..]) {
        if caps[2].trim() != name {
            continue;
        }
        depth += if &caps[1] == "begin" { 1 } else { -1 };
        if depth == 0 {
            return caps.get(0).map(|m| from + m.end());
        }
    }
    None
}

/// Offset just past the `\]` closing a `\[` that ends at `from`
fn display_math_close(line: &str, from: usize) -> Option<usize> {
    let bytes = line.as_bytes();
    let mut i = from;
    while i + 1 < bytes.len() {
        if bytes[i] == b'\\' {
            if bytes[i + 1] == b']' {
                return Some(i + 2);
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    None
}

/// Offset just past the closing delimiter of inline math opened at `at`
fn inline_math_end(line: &str, at: usize) -> Option<usize> {
    let rest = &line[at..];
    let close: &[u8] = if rest.starts_with("$$") {
        b"$$"
    } else if rest.starts_with('$') {
        b"$"
    } else {
        b"\\)"
    };
    let bytes = line.as_bytes();
    let mut i = at + close.len();
    while i < bytes.len() {
        if bytes[i..].starts_with(close) {
            return Some(i + close.len());
        }
        i += if bytes[i] == b'\\' { 2 } else { 1 };
    }
    None
}

/// Skip `[..]` and `{..}` groups glued to the end of a `\begin{..}`
fn skip_adjacent_groups(line: &str, mut pos: usize) -> usize {
    loop {
        let rest = &line[pos..];
        if rest.starts_with('{') {
            pos = find_group_end(line, pos, '{', '}');
        } else if rest.starts_with('[') {
            pos = find_group_end(line, pos, '[', ']');
        } else {
            return pos;
        }
    }
}

/// Cuts one line into structural pieces and the prose between them
struct LineSplitter<'a> {
    line: &'a str,
    pieces: Vec<String>,
    /// Start of the prose not yet assigned to a piece
    prose_from: usize,
}

impl<'a> LineSplitter<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            pieces: Vec::new(),
            prose_from: 0,
        }
    }

    /// Push the line's pieces onto `out`. Returns the verbatim environment
    /// left open by the line, if any.
    fn split(mut self, out: &mut Vec<String>) -> Option<String> {
        let line = self.line;
        let bytes = line.as_bytes();
        let mut verbatim = None;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'$' => match inline_math_end(line, i) {
                    Some(end) => i = end,
                    None => break,
                },
                b'\\' => {
                    let rest = &line[i..];
                    if rest.starts_with("\\(") {
                        match inline_math_end(line, i) {
                            Some(end) => i = end,
                            None => break,
                        }
                    } else if let Some(found) = HEADING_START_RE.find(rest) {
                        i = self.heading(i, i + found.end() - 1);
                    } else if let Some(caps) = BEGIN_RE.captures(rest) {
                        let name = caps[1].trim().to_string();
                        let after = skip_adjacent_groups(line, i + caps[0].len());
                        if VERBATIM_ENVIRONMENTS.contains(name.as_str()) {
                            let end = environment_close(line, after, &name);
                            if end.is_none() {
                                verbatim = Some(name);
                            }
                            let end = end.unwrap_or(line.len());
                            self.cut(i, end);
                            i = end;
                        } else {
                            let end = environment_close(line, after, &name).unwrap_or(after);
                            self.cut(i, end);
                            i = end;
                        }
                    } else if let Some(found) = END_RE.find(rest) {
                        self.cut(i, i + found.end());
                        i += found.end();
                    } else if rest.starts_with("\\[") {
                        let end = display_math_close(line, i + 2);
                        match end {
                            // Closed on the line: math inside prose
                            Some(end) if !self.at_line_start(i) => i = end,
                            Some(end) => {
                                self.cut(i, end);
                                i = end;
                            }
                            None => {
                                self.cut(i, i + 2);
                                i += 2;
                            }
                        }
                    } else if rest.starts_with("\\]") {
                        self.cut(i, i + 2);
                        i += 2;
                    } else {
                        i += 2;
                    }
                }
                _ => i += 1,
            }
        }

        self.finish(out);
        verbatim
    }

    fn at_line_start(&self, at: usize) -> bool {
        self.pieces.is_empty() && self.line[..at].trim().is_empty()
    }

    /// Make `line[start..end]` a piece of its own
    fn cut(&mut self, start: usize, end: usize) {
        let before = &self.line[self.prose_from..start];
        let piece = if self.at_line_start(start) {
            // Indentation of a piece that already starts its line is kept
            self.line[..end].to_string()
        } else {
            if !before.trim().is_empty() {
                let prose = if self.pieces.is_empty() {
                    before.trim_end()
                } else {
                    before.trim()
                };
                self.pieces.push(prose.to_string());
            }
            self.line[start..end].to_string()
        };
        self.pieces.push(piece);
        self.prose_from = end;
    }

    /// Cut a heading whose title group opens at `open`. A label right
    /// after it stays on the heading's line.
    fn heading(&mut self, start: usize, open: usize) -> usize {
        let line = self.line;
        let mut end = find_group_end(line, open, '{', '}');
        let after = line[end..].trim_start();
        if after.starts_with("\\label{") {
            let gap = line.len() - end - after.len();
            end += gap + find_group_end(after, "\\label".len(), '{', '}');
        }
        self.cut(start, end);
        end
    }

    fn finish(self, out: &mut Vec<String>) {
        if self.pieces.is_empty() {
            out.push(self.line.to_string());
            return;
        }
        let mut pieces = self.pieces;
        let rest = &self.line[self.prose_from..];
        if !rest.trim().is_empty() {
            pieces.push(rest.trim().to_string());
        } else if pieces.len() == 1 {
            // Nothing moved; keep the line as written
            out.push(self.line.to_string());
            return;
        }
        out.extend(pieces);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_inline_comment_moves() {
        assert_eq!(
            relocate_inline_comments("Texto  % nota\n% entera\n  % sangrada"),
            "Texto\n% nota\n% entera\n  % sangrada"
        );
    }

    #[test]
    fn test_escaped_percent_is_text() {
        assert_eq!(
            relocate_inline_comments(r"Un 50\% del total"),
            r"Un 50\% del total"
        );
        assert_eq!(
            relocate_inline_comments(r"fin\\% nota"),
            "fin\\\\\n% nota"
        );
    }

    #[test]
    fn test_heading_mid_line() {
        assert_eq!(
            split_structure(r"Fin del texto. \section{Nueva} Sigue aquí"),
            "Fin del texto.\n\\section{Nueva}\nSigue aquí"
        );
    }

    #[test]
    fn test_heading_alone_is_unchanged() {
        let body = "  \\section{Uno}\n\\chapter*{Dos}\nTexto";
        assert_eq!(split_structure(body), body);
    }

    #[test]
    fn test_label_stays_with_heading() {
        assert_eq!(
            split_structure(r"\section{Uno}\label{sec:uno} Texto"),
            "\\section{Uno}\\label{sec:uno}\nTexto"
        );
    }

    #[test]
    fn test_nested_title_braces() {
        assert_eq!(
            split_structure(r"a \section{El \emph{mejor}} b"),
            "a\n\\section{El \\emph{mejor}}\nb"
        );
    }

    #[test]
    fn test_comment_lines_untouched() {
        let body = r"% texto \section{X} más";
        assert_eq!(split_structure(body), body);
    }

    #[test]
    fn test_prose_before_begin_is_split() {
        assert_eq!(
            split_structure(r"Los puntos son: \begin{itemize} \item Uno"),
            "Los puntos son:\n\\begin{itemize}\n\\item Uno"
        );
    }

    #[test]
    fn test_end_after_item_is_split() {
        assert_eq!(
            split_structure("  \\item Dos \\end{itemize} Luego."),
            "  \\item Dos\n\\end{itemize}\nLuego."
        );
    }

    #[test]
    fn test_environment_arguments_stay_with_begin() {
        assert_eq!(
            split_structure(r"Tabla: \begin{tabular}{cc}[t] a & b"),
            "Tabla:\n\\begin{tabular}{cc}[t]\na & b"
        );
    }

    #[test]
    fn test_environment_closed_on_its_line_stays_whole() {
        let line = r"\begin{itemize}\item Tú escribes\end{itemize}";
        assert_eq!(split_structure(line), line);
        assert_eq!(
            split_structure(r"Antes \begin{center}x\end{center} después"),
            "Antes\n\\begin{center}x\\end{center}\ndespués"
        );
    }

    #[test]
    fn test_display_math_opener_is_split() {
        assert_eq!(
            split_structure("Como vemos \\[\nyo = tú\n\\] y seguimos"),
            "Como vemos\n\\[\nyo = tú\n\\]\ny seguimos"
        );
    }

    #[test]
    fn test_closed_display_math_in_prose_is_kept() {
        let line = r"El valor \[ x^2 \] crece.";
        assert_eq!(split_structure(line), line);
        assert_eq!(
            split_structure(r"\[ x^2 \] crece."),
            "\\[ x^2 \\]\ncrece."
        );
    }

    #[test]
    fn test_inline_math_is_never_cut() {
        let line = r"Sea $\begin{matrix} a \end{matrix}$ y \(\]\) fin";
        assert_eq!(split_structure(line), line);
        let open = r"Sea $x \end{array} sin cerrar";
        assert_eq!(split_structure(open), open);
    }

    #[test]
    fn test_line_breaks_are_not_math() {
        let line = r"a \\[2pt] b";
        assert_eq!(split_structure(line), line);
    }

    #[test]
    fn test_verbatim_interior_untouched() {
        let body = "Código: \\begin{verbatim}\n\\section{No} \\begin{x}\n\\end{verbatim} Fin";
        assert_eq!(
            split_structure(body),
            "Código:\n\\begin{verbatim}\n\\section{No} \\begin{x}\n\\end{verbatim}\nFin"
        );
    }

    #[test]
    fn test_prepare_body() {
        assert_eq!(
            prepare_body("Texto \\section{A} % nota"),
            "Texto\n\\section{A}\n% nota"
        );
    }
}
