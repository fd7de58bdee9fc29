//! Review options
//!
//! Everything tunable lives in `ReviewOptions`. Values come from the
//! defaults, then an optional TOML file, then the environment, then the
//! command line, each layer overriding the previous one.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collab::command::{ANALYZER_CMD_ENV, LLM_CMD_ENV};
use crate::core::walker::WalkOptions;
use crate::lint::long_sentence::DEFAULT_LIMIT;
use crate::lint::repetition::{DEFAULT_COLORS, DEFAULT_WINDOW};
use crate::lint::WordLists;
use crate::utils::error::ReviewResult;

/// Lines the output preamble must contain
pub const REQUIRED_PREAMBLE_LINES: &[&str] =
    &["\\usepackage[dvipsnames]{xcolor}", "\\input{word-comments.tex}"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewOptions {
    /// Weasel words, anglicisms and repetition stop words
    pub words: WordLists,

    /// Inline notes after which a page break is suggested (0 disables it)
    /// Default: 25
    pub comments_per_page: usize,

    /// Note a first section that is not preceded by an introduction
    /// Default: true
    pub chapter_intro_check: bool,

    /// Two occurrences of a word closer than this many bytes are a repetition
    /// Default: 200
    pub repetition_window: usize,

    /// Sentences with more words than this are highlighted (0 disables it)
    /// Default: 15
    pub long_sentence_limit: usize,

    /// Highlight colors, cycled per repeated word (xcolor dvipsnames)
    pub repetition_colors: Vec<String>,

    /// Word budget of one review chunk
    /// Default: 400
    pub chunk_max_words: usize,

    /// Paragraph budget of one review chunk
    /// Default: 5
    pub chunk_max_paragraphs: usize,

    /// Share of a fragment's words that must match a sentence window for the
    /// fragment to be located there
    /// Default: 0.62
    pub match_threshold: f64,

    /// Lines added to the preamble when missing
    pub preamble_lines: Vec<String>,

    /// Run the whole-document review against the language model
    /// Default: true
    pub review: bool,

    /// Shell command of the linguistic analyzer; the built-in analyzer is
    /// used when unset
    pub analyzer_cmd: Option<String>,

    /// Shell command of the language model; the review is skipped when unset
    pub llm_cmd: Option<String>,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self {
            words: WordLists::default(),
            comments_per_page: 25,
            chapter_intro_check: true,
            repetition_window: DEFAULT_WINDOW,
            long_sentence_limit: DEFAULT_LIMIT,
            repetition_colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            chunk_max_words: 400,
            chunk_max_paragraphs: 5,
            match_threshold: 0.62,
            preamble_lines: REQUIRED_PREAMBLE_LINES.iter().map(|l| l.to_string()).collect(),
            review: true,
            analyzer_cmd: None,
            llm_cmd: None,
        }
    }
}

impl ReviewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marking only: no language model review
    pub fn marking_only() -> Self {
        Self {
            review: false,
            ..Self::default()
        }
    }

    /// Structure only: no word lists, no highlighting, no page breaks.
    /// Useful to check what the walker alone does to a document.
    pub fn structural() -> Self {
        Self {
            words: WordLists::empty(),
            comments_per_page: 0,
            long_sentence_limit: 0,
            repetition_colors: Vec::new(),
            review: false,
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> ReviewResult<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> ReviewResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Collaborator commands from the environment replace those from the file
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(cmd) = std::env::var(ANALYZER_CMD_ENV) {
            self.analyzer_cmd = Some(cmd);
        }
        if let Ok(cmd) = std::env::var(LLM_CMD_ENV) {
            self.llm_cmd = Some(cmd);
        }
        self
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            comments_per_page: self.comments_per_page,
            chapter_intro_check: self.chapter_intro_check,
        }
    }
}
