//! Word lists used by the marking passes
//!
//! The lists are plain data: the defaults below can be replaced from the
//! configuration file.

use fxhash::FxHashSet;
use regex::Regex;
use serde::{Deserialize, Serialize};

const DEFAULT_WEASEL_WORDS: &[&str] = &[
    "a largo plazo", "a lo mejor", "a menudo", "a veces", "al parecer",
    "muchos", "muchas", "diversos", "diversas", "muy", "bastante",
    "varios", "varias", "extremadamente", "excesivamente", "notablemente",
    "pocos", "poco", "sorprendentemente", "principalmente", "mayormente",
    "en gran medida", "enorme", "minúsculo", "excelente", "significativo",
    "significativa", "significativamente", "sustancial", "sustancialmente",
    "tradicionalmente", "claramente", "vasto", "relativamente", "completamente",
    "unos", "unas", "cualquier", "alguno", "alguna", "algunos", "algunas",
    "bueno", "malo", "regular", "supuestamente", "aparentemente", "algo",
    "alguien", "básicamente", "casi", "cerca de", "cosa", "demasiado",
    "en cierto modo", "en cierto sentido", "en la mayoría de los casos",
    "en ocasiones", "en parte", "en principio", "en su mayoría",
    "es posible que", "generalmente", "hay quienes dicen", "parece",
    "más o menos", "por lo general", "quizá", "quizás", "se dice que",
    "se estima que", "se podría decir que", "según se cree",
    "la mayoría de la gente dice", "la mayoría de la gente piensa",
    "los investigadores creen", "para muchos", "creciente",
    "ha revolucionado",
];

const DEFAULT_ANGLICISMS: &[&str] = &["parsear", "remover", "fitness", "mapearse", "tag", "script"];

const DEFAULT_STOP_WORDS: &[&str] = &[
    // articles
    "el", "la", "los", "las", "un", "una", "unos", "unas", "del", "al",
    // prepositions
    "a", "ante", "bajo", "con", "contra", "de", "desde", "en", "entre",
    "hacia", "hasta", "para", "por", "según", "sin", "so", "sobre", "tras",
    // pronouns
    "yo", "tú", "él", "ella", "usted", "nosotros", "vosotros", "ellos",
    "ellas", "ustedes", "me", "te", "se", "nos", "os", "le", "les", "lo",
    "mi", "tu", "su", "sus", "tus", "nuestro", "vuestro", "mío", "tuyo",
    // conjunctions
    "y", "o", "u", "pero", "mas", "aunque", "como", "que", "si", "porque",
    "pues", "aún", "así", "tan", "tanto", "cuando", "mientras", "donde",
    // adverbs
    "muy", "mucho", "poco", "bien", "mal", "mejor", "peor", "siempre",
    "nunca", "también", "tampoco", "ya", "todavía", "aquí", "allí", "ahora",
    "antes", "después", "luego", "pronto", "casi", "solo", "solamente",
    // verbs
    "es", "son", "era", "fue", "ser", "estar", "tener", "haber", "hacer",
    "poder", "decir", "ir", "ver", "dar", "saber", "querer", "llegar",
    "dejar", "parecer", "seguir", "encontrar", "llamar", "venir", "pensar",
    // demonstratives and quantifiers
    "este", "ese", "aquel", "esta", "esa", "aquella", "estos", "esos",
    "aquellos", "esto", "eso", "aquello", "algo", "nada", "todo", "cada",
    "quien", "cuál", "cuáles", "cuánto", "cuánta", "cuántos", "cuántas",
    // time
    "hoy", "ayer", "mañana", "año", "mes", "semana", "día", "hora", "vez",
    "más", "qué",
];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordLists {
    pub weasel_words: Vec<String>,
    pub anglicisms: Vec<String>,
    pub stop_words: Vec<String>,
}

impl Default for WordLists {
    fn default() -> Self {
        Self {
            weasel_words: owned(DEFAULT_WEASEL_WORDS),
            anglicisms: owned(DEFAULT_ANGLICISMS),
            stop_words: owned(DEFAULT_STOP_WORDS),
        }
    }
}

impl WordLists {
    /// Lists with nothing in them
    pub fn empty() -> Self {
        Self {
            weasel_words: Vec::new(),
            anglicisms: Vec::new(),
            stop_words: Vec::new(),
        }
    }

    pub fn compile(&self) -> Result<CompiledWordLists, regex::Error> {
        Ok(CompiledWordLists {
            weasel: phrase_pattern(&self.weasel_words)?,
            anglicism: phrase_pattern(&self.anglicisms)?,
            stop_words: self.stop_words.iter().map(|w| w.to_lowercase()).collect(),
        })
    }
}

/// Word lists ready for matching
#[derive(Debug, Clone)]
pub struct CompiledWordLists {
    /// `None` when the list is empty
    pub weasel: Option<Regex>,
    pub anglicism: Option<Regex>,
    pub stop_words: FxHashSet<String>,
}

impl CompiledWordLists {
    pub fn is_stop_word(&self, lowercase: &str) -> bool {
        self.stop_words.contains(lowercase)
    }
}

/// Case-insensitive, word-bounded alternation; longer phrases are tried
/// first so "a lo mejor" wins over "a".
fn phrase_pattern(phrases: &[String]) -> Result<Option<Regex>, regex::Error> {
    let mut phrases: Vec<&str> = phrases
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if phrases.is_empty() {
        return Ok(None);
    }
    phrases.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    phrases.dedup();

    let alternation = phrases
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{})\b", alternation)).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longest_phrase_wins() {
        let lists = WordLists {
            weasel_words: vec!["a".into(), "a lo mejor".into()],
            ..WordLists::empty()
        };
        let compiled = lists.compile().unwrap();
        let found = compiled.weasel.unwrap().find("Es a lo mejor cierto").unwrap();
        assert_eq!(found.as_str(), "a lo mejor");
    }

    #[test]
    fn test_word_bounded_and_case_insensitive() {
        let compiled = WordLists::default().compile().unwrap();
        let weasel = compiled.weasel.unwrap();
        assert!(weasel.is_match("Muy bien"));
        assert!(!weasel.is_match("muyto"));
        assert!(compiled.anglicism.unwrap().is_match("un Script corto"));
    }

    #[test]
    fn test_empty_list_has_no_pattern() {
        let compiled = WordLists::empty().compile().unwrap();
        assert!(compiled.weasel.is_none());
        assert!(compiled.stop_words.is_empty());
    }
}
