//! Built-in rule-based analyzer for Spanish prose
//!
//! Word and sentence bounds come from Unicode segmentation. Tags come from a
//! small closed-class lexicon (pronouns, auxiliaries, articles, prepositions)
//! plus suffix rules for participles. Open-class verbs are not conjugated, so
//! person detection only covers pronouns and auxiliaries; plug in a
//! `CommandAnalyzer` for full tagging.

use phf::{phf_map, phf_set};
use unicode_segmentation::UnicodeSegmentation;

use super::{Analysis, LanguageAnalyzer, Token};
use crate::utils::error::ReviewResult;

/// Personal pronoun → grammatical person
static PRONOUNS: phf::Map<&'static str, &'static str> = phf_map! {
    "yo" => "1",
    "me" => "1",
    "mí" => "1",
    "conmigo" => "1",
    "nosotros" => "1",
    "nosotras" => "1",
    "nos" => "1",
    "tú" => "2",
    "vos" => "2",
    "te" => "2",
    "ti" => "2",
    "contigo" => "2",
    "vosotros" => "2",
    "vosotras" => "2",
    "os" => "2",
    "usted" => "3",
    "ustedes" => "3",
    "él" => "3",
    "ella" => "3",
    "ellos" => "3",
    "ellas" => "3",
    "se" => "3",
    "esto" => "3",
    "eso" => "3",
    "aquello" => "3",
};

/// Auxiliary form → (lemma, person). An empty person means non-finite.
static AUXILIARIES: phf::Map<&'static str, (&'static str, &'static str)> = phf_map! {
    "ser" => ("ser", ""),
    "sido" => ("ser", ""),
    "siendo" => ("ser", ""),
    "soy" => ("ser", "1"),
    "eres" => ("ser", "2"),
    "es" => ("ser", "3"),
    "somos" => ("ser", "1"),
    "sois" => ("ser", "2"),
    "son" => ("ser", "3"),
    "fui" => ("ser", "1"),
    "fuiste" => ("ser", "2"),
    "fue" => ("ser", "3"),
    "fuimos" => ("ser", "1"),
    "fuisteis" => ("ser", "2"),
    "fueron" => ("ser", "3"),
    "era" => ("ser", "3"),
    "eras" => ("ser", "2"),
    "éramos" => ("ser", "1"),
    "erais" => ("ser", "2"),
    "eran" => ("ser", "3"),
    "seré" => ("ser", "1"),
    "serás" => ("ser", "2"),
    "será" => ("ser", "3"),
    "seremos" => ("ser", "1"),
    "seréis" => ("ser", "2"),
    "serán" => ("ser", "3"),
    "sería" => ("ser", "3"),
    "serían" => ("ser", "3"),
    "sea" => ("ser", "3"),
    "sean" => ("ser", "3"),
    "seamos" => ("ser", "1"),
    "fuera" => ("ser", "3"),
    "fueran" => ("ser", "3"),
    "he" => ("haber", "1"),
    "has" => ("haber", "2"),
    "ha" => ("haber", "3"),
    "hemos" => ("haber", "1"),
    "habéis" => ("haber", "2"),
    "han" => ("haber", "3"),
    "había" => ("haber", "3"),
    "habías" => ("haber", "2"),
    "habíamos" => ("haber", "1"),
    "habían" => ("haber", "3"),
    "habré" => ("haber", "1"),
    "habremos" => ("haber", "1"),
    "estoy" => ("estar", "1"),
    "estás" => ("estar", "2"),
    "está" => ("estar", "3"),
    "estamos" => ("estar", "1"),
    "estáis" => ("estar", "2"),
    "están" => ("estar", "3"),
};

static DETERMINERS: phf::Set<&'static str> = phf_set! {
    "el", "la", "los", "las", "un", "una", "unos", "unas", "lo",
    "este", "esta", "estos", "estas", "ese", "esa", "esos", "esas",
    "mi", "mis", "tu", "tus", "su", "sus",
};

static PREPOSITIONS: phf::Set<&'static str> = phf_set! {
    "a", "al", "ante", "bajo", "con", "contra", "de", "del", "desde", "durante",
    "en", "entre", "hacia", "hasta", "mediante", "para", "por", "según", "sin",
    "sobre", "tras",
};

/// Irregular participles not caught by the suffix rule
static IRREGULAR_PARTICIPLES: phf::Map<&'static str, &'static str> = phf_map! {
    "abierto" => "abrir",
    "cubierto" => "cubrir",
    "dicho" => "decir",
    "escrito" => "escribir",
    "hecho" => "hacer",
    "impreso" => "imprimir",
    "muerto" => "morir",
    "puesto" => "poner",
    "resuelto" => "resolver",
    "roto" => "romper",
    "visto" => "ver",
    "vuelto" => "volver",
    "descrito" => "describir",
    "propuesto" => "proponer",
    "expuesto" => "exponer",
};

const PARTICIPLE_SUFFIXES: &[&str] = &[
    "ado", "ada", "ados", "adas", "ido", "ida", "idos", "idas",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct BasicAnalyzer;

impl BasicAnalyzer {
    pub fn new() -> Self {
        BasicAnalyzer
    }

    fn tag(&self, start: usize, word: &str) -> Token {
        let lower = word.to_lowercase();
        let mut token = Token {
            start,
            end: start + word.len(),
            text: word.to_string(),
            lemma: lower.clone(),
            pos: "X".to_string(),
            morph: String::new(),
        };

        if word.chars().all(|c| c.is_numeric()) {
            token.pos = "NUM".into();
        } else if let Some(person) = PRONOUNS.get(lower.as_str()) {
            token.pos = "PRON".into();
            token.morph = format!("Person={}|PronType=Prs", person);
        } else if let Some((lemma, person)) = AUXILIARIES.get(lower.as_str()) {
            token.pos = "AUX".into();
            token.lemma = (*lemma).to_string();
            token.morph = match *person {
                "" if lower == "sido" => "VerbForm=Part".to_string(),
                "" if lower.ends_with("ndo") => "VerbForm=Ger".to_string(),
                "" => "VerbForm=Inf".to_string(),
                person => format!("Person={}|VerbForm=Fin", person),
            };
        } else if DETERMINERS.contains(lower.as_str()) {
            token.pos = "DET".into();
        } else if PREPOSITIONS.contains(lower.as_str()) {
            token.pos = "ADP".into();
        } else if let Some(lemma) = IRREGULAR_PARTICIPLES.get(lower.as_str()) {
            token.pos = "VERB".into();
            token.lemma = (*lemma).to_string();
            token.morph = "VerbForm=Part".into();
        } else if is_regular_participle(&lower) {
            token.pos = "VERB".into();
            token.morph = "VerbForm=Part".into();
        }
        token
    }
}

fn is_regular_participle(word: &str) -> bool {
    word.chars().count() > 5 && PARTICIPLE_SUFFIXES.iter().any(|s| word.ends_with(s))
}

impl LanguageAnalyzer for BasicAnalyzer {
    fn analyze(&self, text: &str) -> ReviewResult<Analysis> {
        let tokens = text
            .unicode_word_indices()
            .map(|(start, word)| self.tag(start, word))
            .collect();

        let sentences = text
            .split_sentence_bound_indices()
            .filter_map(|(start, sentence)| {
                let trimmed = sentence.trim_end();
                let lead = trimmed.len() - trimmed.trim_start().len();
                (!trimmed.trim().is_empty()).then(|| (start + lead, start + trimmed.len()))
            })
            .collect();

        Ok(Analysis { tokens, sentences })
    }
}
