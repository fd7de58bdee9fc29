//! External collaborators
//!
//! The review pipeline talks to two services through narrow traits:
//! a linguistic analyzer (tokens, lemmas, tags, sentence bounds) and a
//! generative language model (prompt in, free text out). Failures on either
//! side are reported to the caller, which degrades them to "no finding".

pub mod basic;
pub mod command;

pub use basic::BasicAnalyzer;
pub use command::{CommandAnalyzer, CommandModel};

use serde::{Deserialize, Serialize};

use crate::utils::error::ReviewResult;

/// One word of analyzed text. Offsets are byte offsets into the analyzed
/// string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub text: String,
    #[serde(default)]
    pub lemma: String,
    /// Universal POS tag (`VERB`, `AUX`, `PRON`, `ADJ`, ...)
    #[serde(default)]
    pub pos: String,
    /// Morphological features, `Key=Value` pairs joined by `|`
    #[serde(default)]
    pub morph: String,
}

impl Token {
    pub fn is_pos(&self, tag: &str) -> bool {
        self.pos.eq_ignore_ascii_case(tag)
    }

    /// Value of one morphological feature
    pub fn feature(&self, key: &str) -> Option<&str> {
        self.morph.split('|').find_map(|pair| {
            let (k, v) = pair.split_once('=')?;
            (k.trim() == key).then(|| v.trim())
        })
    }

    pub fn is_participle(&self) -> bool {
        self.feature("VerbForm") == Some("Part")
    }

    /// First or second grammatical person
    pub fn is_speaker_or_listener(&self) -> bool {
        matches!(self.feature("Person"), Some("1") | Some("2"))
    }

    pub fn is_alphabetic(&self) -> bool {
        !self.text.is_empty() && self.text.chars().all(char::is_alphabetic)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub tokens: Vec<Token>,
    /// Sentence bounds as `(start, end)` byte offsets
    #[serde(default)]
    pub sentences: Vec<(usize, usize)>,
}

impl Analysis {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.sentences.is_empty()
    }
}

/// Tokenization, tagging and sentence segmentation
pub trait LanguageAnalyzer {
    fn analyze(&self, text: &str) -> ReviewResult<Analysis>;

    /// Sentence bounds only
    fn sentences(&self, text: &str) -> ReviewResult<Vec<(usize, usize)>> {
        Ok(self.analyze(text)?.sentences)
    }
}

/// Prompt → free text
pub trait LanguageModel {
    fn ask(&self, prompt: &str) -> ReviewResult<String>;

    /// False for models that never answer, so callers can skip the work of
    /// building prompts.
    fn is_available(&self) -> bool {
        true
    }
}

/// A model that never answers
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopModel;

impl LanguageModel for NoopModel {
    fn ask(&self, _prompt: &str) -> ReviewResult<String> {
        Ok(String::new())
    }

    fn is_available(&self) -> bool {
        false
    }
}

impl<T: LanguageAnalyzer + ?Sized> LanguageAnalyzer for &T {
    fn analyze(&self, text: &str) -> ReviewResult<Analysis> {
        (**self).analyze(text)
    }
}

impl<T: LanguageModel + ?Sized> LanguageModel for &T {
    fn ask(&self, prompt: &str) -> ReviewResult<String> {
        (**self).ask(prompt)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_features() {
        let token = Token {
            start: 0,
            end: 6,
            text: "escrito".into(),
            lemma: "escribir".into(),
            pos: "VERB".into(),
            morph: "Gender=Masc|VerbForm=Part".into(),
        };
        assert!(token.is_participle());
        assert!(!token.is_speaker_or_listener());
        assert_eq!(token.feature("Gender"), Some("Masc"));
        assert_eq!(token.feature("Tense"), None);
        assert!(token.is_pos("verb"));
    }

    #[test]
    fn test_analysis_deserializes_with_defaults() {
        let analysis: Analysis =
            serde_json::from_str(r#"{"tokens":[{"start":0,"end":2,"text":"Yo"}]}"#).unwrap();
        assert_eq!(analysis.tokens[0].pos, "");
        assert!(analysis.sentences.is_empty());
    }

    #[test]
    fn test_noop_model() {
        assert_eq!(NoopModel.ask("hola").unwrap(), "");
        assert!(!NoopModel.is_available());
    }
}
