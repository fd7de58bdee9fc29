//! Error handling for texnote reviews
//!
//! Fatal problems are `ReviewError`s. Everything that only degrades the
//! annotation (an unbalanced block, an anchor that no longer exists, a
//! collaborator that failed) is collected as a `ReviewWarning` so the run
//! can finish with a valid document.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Fatal review error
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The source has no `\begin{document}` ... `\end{document}` pair
    #[error("couldn't find both \\begin{{document}} and \\end{{document}} in the input")]
    MissingDocumentEnvironment,

    /// IO error (reading the source, writing the output)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// A configured word list did not compile into a pattern
    #[error("invalid word list: {0}")]
    Pattern(#[from] regex::Error),

    /// A collaborator process could not be run or answered garbage
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// JSON encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReviewError {
    pub fn collaborator(message: impl Into<String>) -> Self {
        ReviewError::Collaborator(message.into())
    }
}

/// Result type for review operations
pub type ReviewResult<T> = Result<T, ReviewError>;

/// Kind of recoverable anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// A block never returned to depth 0 and swallowed the rest of the body
    UnbalancedBlock,
    /// An annotation anchor pointed past the available lines or sentences
    AnchorOutOfRange,
    /// A fragment quoted by the language model could not be located
    FragmentNotFound,
    /// A collaborator call failed and was treated as "no finding"
    CollaboratorFailure,
    /// A preamble line clashed with a package texnote needs
    PreambleConflict,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::UnbalancedBlock => write!(f, "unbalanced block"),
            WarningKind::AnchorOutOfRange => write!(f, "anchor out of range"),
            WarningKind::FragmentNotFound => write!(f, "fragment not found"),
            WarningKind::CollaboratorFailure => write!(f, "collaborator failure"),
            WarningKind::PreambleConflict => write!(f, "preamble conflict"),
        }
    }
}

/// A non-fatal issue found while reviewing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewWarning {
    pub kind: WarningKind,
    pub message: String,
    /// Location context (e.g. "line 42" or "line 3, sentence 2")
    pub location: Option<String>,
}

impl ReviewWarning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn unbalanced_block(opener: &str, line: usize) -> Self {
        Self::new(
            WarningKind::UnbalancedBlock,
            format!("'{}' is never closed; kept the rest of the body verbatim", opener),
        )
        .with_location(format!("line {}", line + 1))
    }

    pub fn anchor_out_of_range(line: usize, sentence: Option<usize>) -> Self {
        let location = match sentence {
            Some(s) => format!("line {}, sentence {}", line + 1, s + 1),
            None => format!("line {}", line + 1),
        };
        Self::new(WarningKind::AnchorOutOfRange, "annotation anchor does not exist")
            .with_location(location)
    }

    pub fn fragment_not_found(fragment: &str) -> Self {
        Self::new(
            WarningKind::FragmentNotFound,
            format!("could not locate '{}'", fragment),
        )
    }

    pub fn collaborator_failure(message: impl Into<String>) -> Self {
        Self::new(WarningKind::CollaboratorFailure, message)
    }

    pub fn preamble_conflict(line: &str) -> Self {
        Self::new(
            WarningKind::PreambleConflict,
            format!("commented out duplicate package line '{}'", line.trim()),
        )
    }
}

impl fmt::Display for ReviewWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref loc) = self.location {
            write!(f, "[{}] {}: {}", self.kind, loc, self.message)
        } else {
            write!(f, "[{}] {}", self.kind, self.message)
        }
    }
}

// =============================================================================
// CLI diagnostics
// =============================================================================

/// Severity level for CLI diagnostics (determines coloring).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Warning,
    Info,
}

impl From<WarningKind> for DiagnosticSeverity {
    fn from(kind: WarningKind) -> Self {
        match kind {
            WarningKind::UnbalancedBlock | WarningKind::CollaboratorFailure => {
                DiagnosticSeverity::Warning
            }
            WarningKind::AnchorOutOfRange
            | WarningKind::FragmentNotFound
            | WarningKind::PreambleConflict => DiagnosticSeverity::Info,
        }
    }
}

impl DiagnosticSeverity {
    /// ANSI color code for this severity.
    pub fn color_code(&self) -> &'static str {
        match self {
            DiagnosticSeverity::Warning => "\x1b[33m", // yellow
            DiagnosticSeverity::Info => "\x1b[36m",    // cyan
        }
    }
}

/// Render warnings for a terminal, one per line.
pub fn format_warnings(warnings: &[ReviewWarning], color: bool) -> String {
    let mut out = String::new();
    for warning in warnings {
        if color {
            let severity = DiagnosticSeverity::from(warning.kind);
            out.push_str(severity.color_code());
            out.push_str(&warning.to_string());
            out.push_str("\x1b[0m");
        } else {
            out.push_str(&warning.to_string());
        }
        out.push('\n');
    }
    out
}
