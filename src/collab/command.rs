//! Subprocess collaborators
//!
//! Both collaborators run a shell command, write one JSON request to its
//! stdin and read the answer from stdout. The analyzer answers with an
//! `Analysis` whose offsets count characters, which is what most NLP
//! toolkits report; they are converted to byte offsets on receipt.

use std::io::Write;
use std::process::{Command, Stdio};

use serde::Serialize;
use tracing::debug;

use super::{Analysis, LanguageAnalyzer, LanguageModel};
use crate::utils::error::{ReviewError, ReviewResult};

/// Environment variable naming the analyzer command
pub const ANALYZER_CMD_ENV: &str = "TEXNOTE_ANALYZER_CMD";
/// Environment variable naming the language model command
pub const LLM_CMD_ENV: &str = "TEXNOTE_LLM_CMD";

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct PromptRequest<'a> {
    prompt: &'a str,
}

/// Run `cmd` through `sh -c`, feed `payload` as JSON and return stdout
fn run_json_command<T: Serialize>(cmd: &str, payload: &T) -> ReviewResult<String> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    // A command that exits without reading its input closes the pipe; its
    // exit status is the error worth reporting then
    let serialized = serde_json::to_string(payload)?;
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(serialized.as_bytes()),
        None => Ok(()),
    };

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(ReviewError::collaborator(format!(
            "`{}` exited with {}",
            cmd, output.status
        )));
    }
    written?;

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
    cmd: String,
}

impl CommandAnalyzer {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    pub fn from_env() -> Option<Self> {
        std::env::var(ANALYZER_CMD_ENV).ok().map(Self::new)
    }

    pub fn command(&self) -> &str {
        &self.cmd
    }
}

impl LanguageAnalyzer for CommandAnalyzer {
    fn analyze(&self, text: &str) -> ReviewResult<Analysis> {
        let raw = run_json_command(&self.cmd, &AnalyzeRequest { text })?;
        if raw.is_empty() {
            return Ok(Analysis::default());
        }
        let analysis: Analysis = serde_json::from_str(&raw)?;
        debug!(
            tokens = analysis.tokens.len(),
            sentences = analysis.sentences.len(),
            "analyzer answered"
        );
        Ok(to_byte_offsets(text, analysis))
    }
}

#[derive(Debug, Clone)]
pub struct CommandModel {
    cmd: String,
}

impl CommandModel {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    pub fn from_env() -> Option<Self> {
        std::env::var(LLM_CMD_ENV).ok().map(Self::new)
    }

    pub fn command(&self) -> &str {
        &self.cmd
    }
}

impl LanguageModel for CommandModel {
    fn ask(&self, prompt: &str) -> ReviewResult<String> {
        let answer = run_json_command(&self.cmd, &PromptRequest { prompt })?;
        debug!(chars = answer.len(), "model answered");
        Ok(answer)
    }
}

/// Rewrite char offsets as byte offsets, dropping anything out of range
fn to_byte_offsets(text: &str, mut analysis: Analysis) -> Analysis {
    let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
    boundaries.push(text.len());
    let byte_at = |char_offset: usize| boundaries.get(char_offset).copied();

    analysis.tokens.retain_mut(|token| {
        match (byte_at(token.start), byte_at(token.end)) {
            (Some(start), Some(end)) if start <= end => {
                token.start = start;
                token.end = end;
                true
            }
            _ => false,
        }
    });
    analysis.sentences = analysis
        .sentences
        .iter()
        .filter_map(|&(start, end)| match (byte_at(start), byte_at(end)) {
            (Some(start), Some(end)) if start <= end => Some((start, end)),
            _ => None,
        })
        .collect();
    analysis
}
