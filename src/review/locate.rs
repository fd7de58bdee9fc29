//! Locating quoted fragments in the walked paragraphs
//!
//! The model rarely quotes a sentence exactly. A fragment is found in a
//! sentence when some window of the sentence's words, as long as the
//! fragment, agrees with it word for word in at least `threshold` of the
//! positions. Words are compared without accents and without case.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::collab::LanguageAnalyzer;
use crate::core::walker::AnalysisUnit;

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"\w+").unwrap();
}

/// Where a fragment was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Anchor {
    pub compact_index: usize,
    pub sentence: usize,
}

/// Lowercase `text` and strip its accents. Replacement characters left by a
/// broken encoding are dropped.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|&c| !is_combining_mark(c) && c != '\u{FFFD}')
        .flat_map(char::to_lowercase)
        .collect()
}

fn words(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    WORD_RE
        .find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// True when some window of `sentence` matches `fragment` well enough
pub fn window_match(fragment: &str, sentence: &str, threshold: f64) -> bool {
    let fragment = words(fragment);
    let sentence = words(sentence);
    if fragment.is_empty() || sentence.len() < fragment.len() {
        return false;
    }

    sentence.windows(fragment.len()).any(|window| {
        let agree = window
            .iter()
            .zip(&fragment)
            .filter(|(a, b)| a == b)
            .count();
        agree as f64 / fragment.len() as f64 >= threshold
    })
}

/// First paragraph sentence among `units` that matches `fragment`.
/// Headings are never anchors. Units the analyzer cannot segment are skipped.
pub fn locate<A: LanguageAnalyzer + ?Sized>(
    fragment: &str,
    units: &[AnalysisUnit],
    analyzer: &A,
    threshold: f64,
) -> Option<Anchor> {
    for unit in units.iter().filter(|u| !u.is_heading()) {
        let Ok(sentences) = analyzer.sentences(&unit.text) else {
            continue;
        };
        for (index, &(start, end)) in sentences.iter().enumerate() {
            let Some(sentence) = unit.text.get(start..end) else {
                continue;
            };
            if window_match(fragment, sentence, threshold) {
                return Some(Anchor {
                    compact_index: unit.compact_index,
                    sentence: index,
                });
            }
        }
    }
    None
}
