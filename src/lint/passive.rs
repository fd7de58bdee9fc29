//! Passive voice: a form of "ser" directly followed by a participle.

use super::{Finding, FindingKind};
use crate::collab::{Analysis, Token};

const PARTICIPLE_ENDINGS: &[&str] = &["ado", "ido", "to", "so", "cho"];

/// Closed word classes that can never be a participle
const NON_PARTICIPLE_TAGS: &[&str] = &["ADJ", "DET", "PRON", "ADP", "NUM", "PUNCT"];

fn is_ser(token: &Token) -> bool {
    token.lemma.eq_ignore_ascii_case("ser") && (token.is_pos("AUX") || token.is_pos("VERB"))
}

fn looks_like_participle(token: &Token) -> bool {
    if token.is_pos("VERB") && token.is_participle() {
        return true;
    }
    if NON_PARTICIPLE_TAGS.iter().any(|tag| token.is_pos(tag)) {
        return false;
    }
    let lower = token.text.to_lowercase();
    PARTICIPLE_ENDINGS.iter().any(|ending| lower.ends_with(ending))
}

pub fn detect(analysis: &Analysis) -> Vec<Finding> {
    analysis
        .tokens
        .windows(2)
        .filter(|pair| is_ser(&pair[0]) && looks_like_participle(&pair[1]))
        .map(|pair| Finding::new(pair[0].start, pair[1].end, FindingKind::PassiveVoice))
        .collect()
}
