//! Weasel words and anglicisms, matched as whole words or phrases.

use super::{Finding, FindingKind};
use crate::lint::wordlists::CompiledWordLists;

pub fn detect(text: &str, lists: &CompiledWordLists) -> Vec<Finding> {
    let mut findings = Vec::new();
    if let Some(ref pattern) = lists.weasel {
        findings.extend(
            pattern
                .find_iter(text)
                .map(|m| Finding::new(m.start(), m.end(), FindingKind::WeaselWord)),
        );
    }
    if let Some(ref pattern) = lists.anglicism {
        findings.extend(
            pattern
                .find_iter(text)
                .map(|m| Finding::new(m.start(), m.end(), FindingKind::Anglicism)),
        );
    }
    findings
}

/// Weasel words and anglicisms present in `text`, for heading notes
pub fn describe(text: &str, lists: &CompiledWordLists) -> Vec<String> {
    detect(text, lists)
        .into_iter()
        .map(|f| {
            let word = &text[f.start..f.end];
            match f.kind {
                FindingKind::Anglicism => format!("el anglicismo: {}", word),
                _ => format!("la palabra comadreja: {}", word),
            }
        })
        .collect()
}
