//! Small LaTeX text helpers shared by the separator, the walker and the
//! annotation phase.

/// Index just past the group that opens at `open_at`.
///
/// `text[open_at]` must be the opening character. Backslash escapes are
/// skipped, so `\}` never closes a brace group. Returns `text.len()` when
/// the group is never closed.
pub fn find_group_end(text: &str, open_at: usize, open: char, close: char) -> usize {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut i = open_at;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if c == '\\' {
            i += 2;
            continue;
        }
        if c == open {
            depth += 1;
        } else if c == close {
            depth = depth.saturating_sub(1);
            if depth == 0 {
                return i + 1;
            }
        }
        i += 1;
    }
    text.len()
}

/// Skip spaces and tabs starting at `pos`.
pub fn skip_inline_space(text: &str, pos: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = pos;
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    i
}

/// Escape free text so it can sit inside a LaTeX argument group.
pub fn escape_note(message: &str) -> String {
    let mut out = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' | '}' | '%' | '&' | '#' | '$' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '^' => out.push_str("\\^{}"),
            '~' => out.push_str("\\~{}"),
            '\n' | '\r' => out.push(' '),
            _ => out.push(c),
        }
    }
    out
}

/// `\notaparaelautor{...}` with an escaped message.
pub fn author_note(message: &str) -> String {
    format!("\\notaparaelautor{{{}}}", escape_note(message))
}

/// `\comment{text}{note}`. `text` is already LaTeX and is kept as is.
pub fn inline_comment(text: &str, note: &str) -> String {
    format!("\\comment{{{}}}{{{}}}", text, escape_note(note))
}

/// Number of physical lines a chunk of emitted text occupies.
pub fn physical_lines(text: &str) -> usize {
    text.split('\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_end_nested() {
        let text = "{a{b}c} tail";
        assert_eq!(find_group_end(text, 0, '{', '}'), 7);
    }

    #[test]
    fn test_group_end_escaped_brace() {
        let text = r"{a\}b} x";
        assert_eq!(find_group_end(text, 0, '{', '}'), 6);
    }

    #[test]
    fn test_group_end_unbalanced_runs_to_end() {
        let text = "[opt";
        assert_eq!(find_group_end(text, 0, '[', ']'), 4);
    }

    #[test]
    fn test_escape_note() {
        assert_eq!(escape_note("a {b} 50%"), r"a \{b\} 50\%");
        assert_eq!(escape_note("x\\y"), r"x\textbackslash{}y");
    }

    #[test]
    fn test_author_note() {
        assert_eq!(author_note("hola"), r"\notaparaelautor{hola}");
    }

    #[test]
    fn test_physical_lines() {
        assert_eq!(physical_lines("a"), 1);
        assert_eq!(physical_lines("a\nb\nc"), 3);
    }
}
