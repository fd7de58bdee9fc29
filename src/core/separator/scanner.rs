//! Single-pass scanner for the separator.
//!
//! Walks the text once and yields a position-sorted, non-overlapping token
//! stream. Braces inside math regions are part of the math token and never
//! surface as brace tokens.

use super::token::{Token, TokenKind};

pub struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Scanner {
            text,
            bytes: text.as_bytes(),
            pos: 0,
        }
    }

    /// Scan the whole input
    pub fn scan(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens
    }

    fn peek_at(&self, index: usize) -> Option<u8> {
        self.bytes.get(index).copied()
    }

    /// Byte length of the char starting at `index`
    fn char_len_at(&self, index: usize) -> usize {
        self.text[index..].chars().next().map_or(1, char::len_utf8)
    }

    fn next_token(&mut self) -> Option<Token> {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            match self.bytes[start] {
                b'\\' => {
                    if let Some(token) = self.read_backslash(start) {
                        return Some(token);
                    }
                }
                b'$' => {
                    if let Some(token) = self.read_dollar_math(start) {
                        return Some(token);
                    }
                }
                b'{' => {
                    self.pos += 1;
                    return Some(Token::new(TokenKind::OpenBrace, start, self.pos));
                }
                b'}' => {
                    self.pos += 1;
                    return Some(Token::new(TokenKind::CloseBrace, start, self.pos));
                }
                _ => self.pos += self.char_len_at(start),
            }
        }
        None
    }

    /// `\name`, `\(..\)`, `\[..\]` or a control symbol
    fn read_backslash(&mut self, start: usize) -> Option<Token> {
        let Some(next) = self.peek_at(start + 1) else {
            // Lone backslash at end of input stays text
            self.pos += 1;
            return None;
        };

        if next.is_ascii_alphabetic() || next == b'@' {
            let mut end = start + 1;
            while let Some(c) = self.peek_at(end) {
                if c.is_ascii_alphabetic() || c == b'@' {
                    end += 1;
                } else {
                    break;
                }
            }
            if self.peek_at(end) == Some(b'*') {
                end += 1;
            }
            self.pos = end;
            let name = self.text[start + 1..end].to_string();
            return Some(Token::new(TokenKind::CommandHead(name), start, end));
        }

        let closer = match next {
            b'(' => Some(b')'),
            b'[' => Some(b']'),
            _ => None,
        };
        if let Some(closer) = closer {
            if let Some(end) = self.find_escaped(start + 2, closer) {
                self.pos = end;
                return Some(Token::new(TokenKind::Math, start, end));
            }
        }

        // Control symbol: \% \{ \} \\ \, ...
        let end = start + 1 + self.char_len_at(start + 1);
        self.pos = end;
        let name = self.text[start + 1..end].to_string();
        Some(Token::new(TokenKind::CommandHead(name), start, end))
    }

    /// `$..$` or `$$..$$`; an unmatched dollar stays text
    fn read_dollar_math(&mut self, start: usize) -> Option<Token> {
        let display = self.peek_at(start + 1) == Some(b'$');
        let body = if display { start + 2 } else { start + 1 };
        let mut i = body;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'$' if !display => {
                    self.pos = i + 1;
                    return Some(Token::new(TokenKind::Math, start, self.pos));
                }
                b'$' if self.peek_at(i + 1) == Some(b'$') => {
                    self.pos = i + 2;
                    return Some(Token::new(TokenKind::Math, start, self.pos));
                }
                _ => i += 1,
            }
        }
        self.pos = body;
        None
    }

    /// End offset (exclusive) of the first `\<closer>` at or after `from`
    fn find_escaped(&self, from: usize, closer: u8) -> Option<usize> {
        let mut i = from;
        while i + 1 < self.bytes.len() {
            if self.bytes[i] == b'\\' {
                if self.bytes[i + 1] == closer {
                    return Some(i + 2);
                }
                i += 2;
            } else {
                i += 1;
            }
        }
        None
    }
}

/// Scan `text` into a sorted token stream
pub fn scan(text: &str) -> Vec<Token> {
    Scanner::new(text).scan()
}
