//! First and second person: personal pronouns, auxiliaries (extended to the
//! participle they govern) and conjugated verbs.

use phf::phf_set;

use super::{Finding, FindingKind};
use crate::collab::Analysis;

static PERSONAL_PRONOUNS: phf::Set<&'static str> = phf_set! {
    "yo", "tú", "vos", "usted", "ustedes", "nosotros", "nosotras",
    "vosotros", "vosotras", "me",
};

/// How far past an auxiliary to look for its participle
const COMPOUND_LOOKAHEAD: usize = 2;

pub fn detect(analysis: &Analysis) -> Vec<Finding> {
    let tokens = &analysis.tokens;
    let mut findings = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        if !token.is_alphabetic() {
            i += 1;
            continue;
        }

        if token.is_pos("PRON") && PERSONAL_PRONOUNS.contains(token.text.to_lowercase().as_str()) {
            findings.push(Finding::new(token.start, token.end, FindingKind::Person));
        } else if token.is_pos("AUX") && token.is_speaker_or_listener() {
            let participle = tokens
                .iter()
                .enumerate()
                .skip(i + 1)
                .take(COMPOUND_LOOKAHEAD)
                .find(|(_, t)| t.is_pos("VERB") && t.is_participle());
            if let Some((j, last)) = participle {
                findings.push(Finding::new(token.start, last.end, FindingKind::Person));
                i = j + 1;
                continue;
            }
            findings.push(Finding::new(token.start, token.end, FindingKind::Person));
        } else if token.is_pos("VERB") && token.is_speaker_or_listener() {
            findings.push(Finding::new(token.start, token.end, FindingKind::Person));
        }
        i += 1;
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::{BasicAnalyzer, LanguageAnalyzer, Token};

    fn findings(text: &str) -> Vec<&str> {
        let analysis = BasicAnalyzer.analyze(text).unwrap();
        detect(&analysis)
            .into_iter()
            .map(|f| &text[f.start..f.end])
            .collect()
    }

    #[test]
    fn test_pronouns() {
        assert_eq!(findings("Sección uno: Tú escribes el texto."), vec!["Tú"]);
        assert_eq!(findings("Nosotros y ustedes"), vec!["Nosotros", "ustedes"]);
    }

    #[test]
    fn test_compound_tense_extends_to_participle() {
        assert_eq!(findings("Hemos analizado los datos."), vec!["Hemos analizado"]);
        assert_eq!(findings("He ya terminado."), vec!["He ya terminado"]);
    }

    #[test]
    fn test_auxiliary_alone() {
        assert_eq!(findings("Estamos en casa."), vec!["Estamos"]);
    }

    #[test]
    fn test_third_person_is_fine() {
        assert!(findings("El autor ha analizado los datos.").is_empty());
    }

    #[test]
    fn test_tagged_verb() {
        let analysis = Analysis {
            tokens: vec![Token {
                start: 0,
                end: 8,
                text: "escribes".into(),
                lemma: "escribir".into(),
                pos: "VERB".into(),
                morph: "Mood=Ind|Number=Sing|Person=2".into(),
            }],
            sentences: vec![(0, 8)],
        };
        assert_eq!(detect(&analysis), vec![Finding::new(0, 8, FindingKind::Person)]);
    }
}
