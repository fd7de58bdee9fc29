//! Tokens produced by the separator's pre-scan.
//!
//! Only the four things that change how a paragraph is partitioned are
//! tokens; everything between them is plain text.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `\name` (letters and `@`, optional trailing `*`) or a control symbol
    /// such as `\%`. The string does NOT include the leading backslash.
    CommandHead(String),

    /// An inline or display math region: `$..$`, `$$..$$`, `\(..\)`, `\[..\]`
    Math,

    /// A bare `{`
    OpenBrace,

    /// A bare `}`
    CloseBrace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    /// The command name without backslash or star, if this is a command head
    pub fn command_name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::CommandHead(name) if name.len() > 1 => Some(name.trim_end_matches('*')),
            TokenKind::CommandHead(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_command(&self) -> bool {
        matches!(self.kind, TokenKind::CommandHead(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::CommandHead(name) => write!(f, "\\{}@{}", name, self.start),
            TokenKind::Math => write!(f, "math@{}..{}", self.start, self.end),
            TokenKind::OpenBrace => write!(f, "{{@{}", self.start),
            TokenKind::CloseBrace => write!(f, "}}@{}", self.start),
        }
    }
}
