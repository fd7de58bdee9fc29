//! Command span separator
//!
//! Splits a text unit into `Ignore` spans (LaTeX syntax) and `Analyze`
//! spans (prose). The text is scanned once into a token stream; a cursor
//! then walks the stream, recursing into every brace group whose content is
//! prose. The resulting spans tile the input exactly, so merging them back
//! without edits reproduces the input byte for byte.

mod policy;
mod scanner;
mod token;

pub use policy::{ArgSlot, ArgumentPolicy, Bracket, PolicyTable, SlotRole, DEFAULT_POLICY_TABLE};
pub use scanner::{scan, Scanner};
pub use token::{Token, TokenKind};

use texnote_spans::{Partition, Span};

use crate::utils::latex::{find_group_end, skip_inline_space};

/// Partition `text` with the built-in policy table
pub fn separate(text: &str) -> Partition {
    Separator::new(&DEFAULT_POLICY_TABLE).separate(text)
}

/// Separator bound to a policy table
#[derive(Debug, Clone, Copy)]
pub struct Separator<'t> {
    table: &'t PolicyTable,
}

impl<'t> Separator<'t> {
    pub fn new(table: &'t PolicyTable) -> Self {
        Self { table }
    }

    pub fn separate(&self, text: &str) -> Partition {
        let mut walk = Walk {
            text,
            tokens: scan(text),
            index: 0,
            pos: 0,
            table: self.table,
            partition: Partition::new(),
        };
        walk.run(0);
        walk.emit_analyze_until(text.len(), 0);
        debug_assert!(walk.partition.covers(text.len()));
        walk.partition
    }
}

/// Cursor state for one separation
struct Walk<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    /// Next token to look at
    index: usize,
    /// Everything before `pos` already belongs to a span
    pos: usize,
    table: &'a PolicyTable,
    partition: Partition,
}

impl<'a> Walk<'a> {
    /// Walk tokens at `depth`. Returns when the group opened by the caller
    /// is closed, or when the stream runs out.
    fn run(&mut self, depth: usize) {
        while self.index < self.tokens.len() {
            let token = self.tokens[self.index].clone();
            self.index += 1;

            // Already swallowed by an ignored argument group
            if token.start < self.pos {
                continue;
            }

            self.emit_analyze_until(token.start, depth);

            match token.kind {
                TokenKind::Math => self.emit_ignore_until(token.end, depth),
                TokenKind::OpenBrace => {
                    self.emit_ignore_until(token.end, depth);
                    self.run(depth + 1);
                }
                TokenKind::CloseBrace => {
                    if depth > 0 {
                        self.emit_ignore_until(token.end, depth - 1);
                        return;
                    }
                    // Stray brace in prose
                    self.emit_analyze_until(token.end, depth);
                }
                TokenKind::CommandHead(_) => {
                    self.emit_ignore_until(token.end, depth);
                    if let Some(name) = token.command_name() {
                        self.consume_arguments(name, depth);
                    }
                }
            }
        }
    }

    /// Apply the command's policy slots at the cursor
    fn consume_arguments(&mut self, name: &str, depth: usize) {
        let table = self.table;
        let policy = table.resolve(name);

        for slot in policy.slots() {
            let at = skip_inline_space(self.text, self.pos);
            let open = slot.bracket().open();
            if !self.text[at..].starts_with(open) {
                // Omitted optional argument; try the next slot here
                continue;
            }

            self.emit_analyze_until(at, depth);
            match (slot.role(), slot.bracket()) {
                (SlotRole::Analyze, Bracket::Brace) => {
                    self.emit_ignore_until(at + 1, depth);
                    self.run(depth + 1);
                }
                (SlotRole::Analyze, bracket) | (SlotRole::Ignore, bracket) => {
                    let end = find_group_end(self.text, at, bracket.open(), bracket.close());
                    self.emit_ignore_until(end, depth);
                }
            }
        }

        if policy.absorbs_trailing_groups() {
            while self.text[self.pos..].starts_with('{') {
                let end = find_group_end(self.text, self.pos, '{', '}');
                self.emit_ignore_until(end, depth);
            }
        }
    }

    fn emit_analyze_until(&mut self, end: usize, depth: usize) {
        if end > self.pos {
            let content = &self.text[self.pos..end];
            self.partition.push(Span::analyze(self.pos, end, depth, content));
            self.pos = end;
        }
    }

    fn emit_ignore_until(&mut self, end: usize, depth: usize) {
        if end > self.pos {
            let content = &self.text[self.pos..end];
            self.partition.push(Span::ignore(self.pos, end, depth, content));
            self.pos = end;
        }
    }
}
