//! Word repetition across one paragraph
//!
//! Only the paragraph's prose spans are read and rewritten, so words inside
//! command arguments, math or notes added by earlier passes never count.
//! A word is reported when it appears three times in the paragraph, or twice
//! within the configured window of characters.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use texnote_spans::Partition;

use crate::lint::wordlists::CompiledWordLists;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\w+").unwrap();
}

pub const DEFAULT_COLORS: &[&str] = &["Green", "Cerulean", "red"];
pub const DEFAULT_WINDOW: usize = 200;

/// Occurrences needed anywhere in the paragraph
const GLOBAL_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Copy)]
struct Occurrence {
    span: usize,
    /// Byte range inside the span's content
    start: usize,
    end: usize,
    /// Position over the whole paragraph
    at: usize,
}

fn counts_for_repetition(word: &str, lists: &CompiledWordLists) -> bool {
    word.chars().count() > 2
        && word.chars().any(char::is_alphabetic)
        && !lists.is_stop_word(word)
}

/// Wrap repeated words as `\textcolor{<color>}{[word$^{n}$]}`.
///
/// `n` numbers the repeated words by first appearance; colors cycle through
/// `colors`. Returns the number of wrapped occurrences.
pub fn highlight(
    partition: &mut Partition,
    lists: &CompiledWordLists,
    window: usize,
    colors: &[String],
) -> usize {
    if colors.is_empty() {
        return 0;
    }

    let mut words: IndexMap<String, Vec<Occurrence>> = IndexMap::new();
    let mut order: Vec<usize> = (0..partition.analyze.len()).collect();
    order.sort_by_key(|&i| partition.analyze[i].start);

    for &index in &order {
        let span = &partition.analyze[index];
        for m in WORD_RE.find_iter(&span.content) {
            let lower = m.as_str().to_lowercase();
            if !counts_for_repetition(&lower, lists) {
                continue;
            }
            words.entry(lower).or_default().push(Occurrence {
                span: index,
                start: m.start(),
                end: m.end(),
                at: span.start + m.start(),
            });
        }
    }

    let repeated: Vec<&Vec<Occurrence>> = words
        .values()
        .filter(|occurrences| {
            occurrences.len() >= GLOBAL_THRESHOLD
                || occurrences
                    .windows(2)
                    .any(|pair| pair[1].at.saturating_sub(pair[0].at) < window)
        })
        .collect();

    // span index → (start, end, replacement)
    let mut edits: Vec<Vec<(usize, usize, String)>> = vec![Vec::new(); partition.analyze.len()];
    for (n, occurrences) in repeated.iter().enumerate() {
        let color = &colors[n % colors.len()];
        for occurrence in occurrences.iter() {
            let content = &partition.analyze[occurrence.span].content;
            let word = &content[occurrence.start..occurrence.end];
            edits[occurrence.span].push((
                occurrence.start,
                occurrence.end,
                format!("\\textcolor{{{}}}{{[{}$^{{{}}}$]}}", color, word, n + 1),
            ));
        }
    }

    let mut wrapped = 0;
    for (index, mut span_edits) in edits.into_iter().enumerate() {
        if span_edits.is_empty() {
            continue;
        }
        span_edits.sort_by_key(|e| e.0);
        let content = &partition.analyze[index].content;
        let mut out = String::with_capacity(content.len() + span_edits.len() * 32);
        let mut cursor = 0;
        for (start, end, replacement) in &span_edits {
            out.push_str(&content[cursor..*start]);
            out.push_str(replacement);
            cursor = *end;
        }
        out.push_str(&content[cursor..]);
        wrapped += span_edits.len();
        partition.analyze[index].content = out;
    }
    wrapped
}
