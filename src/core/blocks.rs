//! Multi-line block extraction
//!
//! Environments and display-math regions are copied verbatim. The extractor
//! tracks an integer depth across lines and stops at the line where it
//! returns to zero; an unbalanced block runs to the end of the input.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ENV_DELIMITER_RE: Regex =
        Regex::new(r"\\(begin|end)\s*\{([^}]*)\}").unwrap();
}

/// A block pulled out of the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedBlock {
    /// Consumed lines joined with `\n`
    pub text: String,
    /// Index of the last consumed line
    pub end: usize,
    /// False when the depth never returned to zero
    pub balanced: bool,
}

/// Extract the environment opened on `lines[start]`.
///
/// Only delimiters of the environment named on the starting line are
/// counted, matched by literal name.
pub fn extract_environment<S: AsRef<str>>(lines: &[S], start: usize) -> ExtractedBlock {
    let first = lines[start].as_ref();
    let name = ENV_DELIMITER_RE
        .captures_iter(first)
        .find(|caps| &caps[1] == "begin")
        .map(|caps| caps[2].trim().to_string());

    let Some(name) = name else {
        return ExtractedBlock {
            text: first.to_string(),
            end: start,
            balanced: true,
        };
    };

    extract_with(lines, start, |line| environment_delta(line, &name))
}

/// Extract the `\[ ... \]` region opened on `lines[start]`.
pub fn extract_display_math<S: AsRef<str>>(lines: &[S], start: usize) -> ExtractedBlock {
    extract_with(lines, start, display_math_delta)
}

fn extract_with<S, F>(lines: &[S], start: usize, delta: F) -> ExtractedBlock
where
    S: AsRef<str>,
    F: Fn(&str) -> i64,
{
    let mut depth: i64 = 0;
    let mut consumed = Vec::new();
    let mut index = start;

    while index < lines.len() {
        let line = lines[index].as_ref();
        depth += delta(line);
        consumed.push(line);
        if depth <= 0 {
            return ExtractedBlock {
                text: consumed.join("\n"),
                end: index,
                balanced: true,
            };
        }
        index += 1;
    }

    ExtractedBlock {
        text: consumed.join("\n"),
        end: lines.len().saturating_sub(1).max(start),
        balanced: false,
    }
}

fn environment_delta(line: &str, name: &str) -> i64 {
    ENV_DELIMITER_RE
        .captures_iter(line)
        .filter(|caps| caps[2].trim() == name)
        .map(|caps| if &caps[1] == "begin" { 1 } else { -1 })
        .sum()
}

/// `\[` opens, `\]` closes; `\\` (a line break, possibly followed by
/// `[2pt]`) is neither.
fn display_math_delta(line: &str) -> i64 {
    let bytes = line.as_bytes();
    let mut delta = 0;
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'\\' {
            match bytes[i + 1] {
                b'[' => delta += 1,
                b']' => delta -= 1,
                _ => {}
            }
            i += 2;
        } else {
            i += 1;
        }
    }
    delta
}
