//! Tolerant readers for the language model's answers
//!
//! Answers are expected in the formats requested by `prompts`, but accents
//! may be missing or mangled into U+FFFD, `Sí`/`No` may come in brackets and
//! blocks may be partial. Anything that cannot be read is skipped.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDEA_RE: Regex = Regex::new(r"(?i)(?:Response:\s*)?\bIdea\s*:").unwrap();
    static ref STATUS_RE: Regex = Regex::new(
        r"(?i)Ambigua(?:\s*/\s*No\s+ambigua)?\s*:\s*\[?\s*(s[ií\x{FFFD}]|no\s+ambigua|no|ambigua)"
    )
    .unwrap();
    static ref REASON_RE: Regex =
        Regex::new(r"(?i)Por\s+qu[ée\x{FFFD}]?(?:\s+es\s+ambigua)?\s*:").unwrap();
    static ref SECTION_NAME_RE: Regex =
        Regex::new(r"(?i)Nombre\s+de\s+secci[oó\x{FFFD}]?n\s*:").unwrap();
    static ref TRANSITION_RE: Regex =
        Regex::new(r"(?im)^\s*Transici[oó\x{FFFD}]?n\s*:\s*\[?\s*(s[ií\x{FFFD}]|no)").unwrap();
    static ref TRANSITION_SUGGESTION_RE: Regex =
        Regex::new(r"(?i)Sugerencia\s+para\s+incluir\s+transici[oó\x{FFFD}]?n\s*:").unwrap();
    static ref INTRO_RE: Regex =
        Regex::new(r"(?im)^\s*Introducci[oó\x{FFFD}]?n\s*:\s*\[?\s*(s[ií\x{FFFD}]|no)").unwrap();
    static ref INTRO_SUGGESTION_RE: Regex =
        Regex::new(r"(?i)Sugerencia\s+para\s+mejorar\s+(?:la\s+)?introducci[oó\x{FFFD}]?n\s*:")
            .unwrap();
    static ref ORDER_RE: Regex =
        Regex::new(r"(?im)^\s*Orden\s+l[oó\x{FFFD}]?gico\s*:\s*\[?\s*(s[ií\x{FFFD}]|no)").unwrap();
    static ref ORDER_SUGGESTION_RE: Regex =
        Regex::new(r"(?i)Sugerencias?\s+de\s+mejora\s+para\s+el\s+orden\s*:").unwrap();
    static ref BLOCK_HEADER_RE: Regex = Regex::new(r"(?m)^\s*###").unwrap();
}

/// An idea the model confirmed as ambiguous
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousIdea {
    pub idea: String,
    pub reason: String,
}

/// A section the model found without a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSuggestion {
    pub section: String,
    pub suggestion: String,
}

fn is_yes(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    answer.starts_with('s') || answer == "ambigua"
}

/// Drop surrounding whitespace, brackets and quotes
fn clean(value: &str) -> String {
    let mut value = value.trim();
    loop {
        let stripped = value
            .strip_prefix('[')
            .and_then(|v| v.strip_suffix(']'))
            .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
            .or_else(|| value.strip_prefix('“').and_then(|v| v.strip_suffix('”')));
        match stripped {
            Some(inner) => value = inner.trim(),
            None => break,
        }
    }
    value.trim_start_matches("- ").trim().to_string()
}

/// Pieces of `text` starting after each match of `re`
fn blocks<'t>(re: &Regex, text: &'t str) -> Vec<&'t str> {
    let starts: Vec<(usize, usize)> = re.find_iter(text).map(|m| (m.start(), m.end())).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &(_, body))| {
            let end = starts.get(i + 1).map_or(text.len(), |&(next, _)| next);
            &text[body..end]
        })
        .collect()
}

/// Text up to the next `###` header
fn until_header(text: &str) -> &str {
    BLOCK_HEADER_RE
        .find(text)
        .map_or(text, |m| &text[..m.start()])
}

/// Ideas answered with `Ambigua: Sí`, in answer order
pub fn parse_ambiguity(text: &str) -> Vec<AmbiguousIdea> {
    let mut ideas = Vec::new();
    for block in blocks(&IDEA_RE, text) {
        let Some(status) = STATUS_RE.captures(block) else {
            continue;
        };
        let Some(whole) = status.get(0) else {
            continue;
        };
        if !is_yes(&status[1]) {
            continue;
        }
        let Some(reason_at) = REASON_RE.find(&block[whole.end()..]) else {
            continue;
        };

        let idea = clean(&block[..whole.start()]);
        let reason = clean(&block[whole.end() + reason_at.end()..]);
        if idea.is_empty() || reason.is_empty() {
            continue;
        }
        ideas.push(AmbiguousIdea { idea, reason });
    }
    ideas
}

/// Sections answered with `Transición: No`, in answer order. A section
/// named twice keeps its last suggestion.
pub fn parse_transitions(text: &str) -> Vec<SectionSuggestion> {
    let mut found: Vec<SectionSuggestion> = Vec::new();
    for block in blocks(&SECTION_NAME_RE, text) {
        let Some(transition) = TRANSITION_RE.captures(block) else {
            continue;
        };
        if is_yes(&transition[1]) {
            continue;
        }
        let Some(name_end) = transition.get(0).map(|m| m.start()) else {
            continue;
        };
        let section = clean(&block[..name_end]);
        if section.is_empty() {
            continue;
        }
        let suggestion = TRANSITION_SUGGESTION_RE
            .find(block)
            .map(|m| clean(until_header(&block[m.end()..])))
            .unwrap_or_default();

        match found.iter_mut().find(|s| s.section == section) {
            Some(existing) => existing.suggestion = suggestion,
            None => found.push(SectionSuggestion {
                section,
                suggestion,
            }),
        }
    }
    found
}

/// Verdict followed by a free-text suggestion. `Some` only for a `No`
/// verdict; the suggestion may be empty.
fn verdict_suggestion(text: &str, verdict: &Regex, label: &Regex) -> Option<String> {
    let caps = verdict.captures(text)?;
    if is_yes(&caps[1]) {
        return None;
    }
    let suggestion = label
        .find(text)
        .map(|m| clean(until_header(&text[m.end()..])))
        .unwrap_or_default();
    Some(suggestion)
}

/// Suggestion of an `Introducción: No` answer
pub fn parse_introduction(text: &str) -> Option<String> {
    verdict_suggestion(text, &INTRO_RE, &INTRO_SUGGESTION_RE)
}

/// Suggestion of an `Orden lógico: No` answer
pub fn parse_order(text: &str) -> Option<String> {
    verdict_suggestion(text, &ORDER_RE, &ORDER_SUGGESTION_RE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ambiguity_blocks() {
        let answer = "Idea: \"El método es rápido.\"\n\
                      Ambigua/No ambigua: Sí\n\
                      Por qué: ¿rápido respecto a qué?\n\
                      \n\
                      Idea: Los datos son públicos.\n\
                      Ambigua/No ambigua: No\n\
                      Por qué: se explica después.\n\
                      Response: Idea: [Se mejora bastante.]\n\
                      Ambigua: [Si]\n\
                      Por qu\u{FFFD}: no dice cuánto";
        let ideas = parse_ambiguity(answer);
        assert_eq!(
            ideas,
            vec![
                AmbiguousIdea {
                    idea: "El método es rápido.".into(),
                    reason: "¿rápido respecto a qué?".into(),
                },
                AmbiguousIdea {
                    idea: "Se mejora bastante.".into(),
                    reason: "no dice cuánto".into(),
                },
            ]
        );
    }

    #[test]
    fn test_ambiguity_partial_blocks_are_skipped() {
        assert!(parse_ambiguity("NO").is_empty());
        assert!(parse_ambiguity("Idea: algo\nAmbigua: Sí").is_empty());
        assert!(parse_ambiguity("Idea:\nAmbigua: Sí\nPor qué: x").is_empty());
    }

    #[test]
    fn test_transitions() {
        let answer = "### Sección 1\n\
                      Nombre de sección: Métodos\n\
                      Transición: [No]\n\
                      Sugerencia para incluir transición: Anticipa los métodos.\n\
                      ### Sección 2\n\
                      Nombre de secci\u{FFFD}n: Resultados\n\
                      Transicion: Sí\n\
                      Sugerencia para incluir transición: []\n\
                      Nombre de sección: Discusión\n\
                      Transición: No\n";
        let found = parse_transitions(answer);
        assert_eq!(
            found,
            vec![
                SectionSuggestion {
                    section: "Métodos".into(),
                    suggestion: "Anticipa los métodos.".into(),
                },
                SectionSuggestion {
                    section: "Discusión".into(),
                    suggestion: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_introduction() {
        assert_eq!(
            parse_introduction(
                "Introducción: [No]\nSugerencia para mejorar introducción: Presenta el tema."
            ),
            Some("Presenta el tema.".to_string())
        );
        assert_eq!(
            parse_introduction("Introduccion: Si\nSugerencia para mejorar introducción: []"),
            None
        );
        assert_eq!(parse_introduction("sin formato"), None);
    }

    #[test]
    fn test_order() {
        assert_eq!(
            parse_order(
                "Orden lógico: No\nSugerencias de mejora para el orden:\n1. Datos\n2. Métodos"
            ),
            Some("1. Datos\n2. Métodos".to_string())
        );
        assert_eq!(parse_order("Orden l\u{FFFD}gico: [Sí]"), None);
    }
}
