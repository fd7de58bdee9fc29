//! Span partitions over LaTeX text units.
//!
//! A text unit (usually one logical paragraph) is split into spans that are
//! either copied verbatim (`Ignore`) or offered to linguistic marking
//! (`Analyze`). Offsets are byte offsets into the original unit.

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// LaTeX syntax, copied through untouched
    Ignore,
    /// Natural-language text eligible for marking
    Analyze,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub kind: SpanKind,
    /// Argument nesting depth at which the span was produced (0 = top level)
    pub depth: usize,
    /// Current content; starts as the original slice and may be rewritten
    pub content: String,
}

impl Span {
    pub fn new(kind: SpanKind, start: usize, end: usize, depth: usize, content: impl Into<String>) -> Self {
        Self {
            start,
            end,
            kind,
            depth,
            content: content.into(),
        }
    }

    pub fn ignore(start: usize, end: usize, depth: usize, content: impl Into<String>) -> Self {
        Self::new(SpanKind::Ignore, start, end, depth, content)
    }

    pub fn analyze(start: usize, end: usize, depth: usize, content: impl Into<String>) -> Self {
        Self::new(SpanKind::Analyze, start, end, depth, content)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_analyze(&self) -> bool {
        self.kind == SpanKind::Analyze
    }

    /// Ordering used for reassembly: by start, `Ignore` first on ties.
    fn reassembly_order(a: &Span, b: &Span) -> Ordering {
        a.start.cmp(&b.start).then_with(|| match (a.kind, b.kind) {
            (SpanKind::Ignore, SpanKind::Analyze) => Ordering::Less,
            (SpanKind::Analyze, SpanKind::Ignore) => Ordering::Greater,
            _ => Ordering::Equal,
        })
    }
}

/// The result of separating one text unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub ignore: Vec<Span>,
    pub analyze: Vec<Span>,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route a span to its list. Empty spans are dropped.
    pub fn push(&mut self, span: Span) {
        if span.is_empty() {
            return;
        }
        match span.kind {
            SpanKind::Ignore => self.ignore.push(span),
            SpanKind::Analyze => self.analyze.push(span),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ignore.is_empty() && self.analyze.is_empty()
    }

    /// All spans in reassembly order.
    pub fn ordered(&self) -> Vec<&Span> {
        let mut spans: Vec<&Span> = self.ignore.iter().chain(self.analyze.iter()).collect();
        spans.sort_by(|a, b| Span::reassembly_order(a, b));
        spans
    }

    /// Reassemble the unit from the current span contents.
    pub fn merge(&self) -> String {
        merge(&self.ignore, &self.analyze)
    }

    /// Concatenated analyze contents in document order.
    pub fn analyzed_text(&self) -> String {
        let mut spans: Vec<&Span> = self.analyze.iter().collect();
        spans.sort_by_key(|s| s.start);
        spans.iter().map(|s| s.content.as_str()).collect()
    }

    /// Check that the spans tile `[0, len)` without gaps or overlaps.
    pub fn covers(&self, len: usize) -> bool {
        let mut cursor = 0;
        for span in self.ordered() {
            if span.start != cursor || span.end < span.start {
                return false;
            }
            cursor = span.end;
        }
        cursor == len
    }
}

/// Join two span lists back into text, ordered by start offset.
pub fn merge(ignore: &[Span], analyze: &[Span]) -> String {
    let mut spans: Vec<&Span> = ignore.iter().chain(analyze.iter()).collect();
    spans.sort_by(|a, b| Span::reassembly_order(a, b));

    let capacity = spans.iter().map(|s| s.content.len()).sum();
    let mut out = String::with_capacity(capacity);
    for span in spans {
        out.push_str(&span.content);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_orders_by_start() {
        let ignore = vec![Span::ignore(0, 7, 0, "\\textbf"), Span::ignore(7, 8, 0, "{")];
        let analyze = vec![Span::analyze(8, 12, 1, "hola")];
        let ignore = [ignore, vec![Span::ignore(12, 13, 1, "}")]].concat();
        assert_eq!(merge(&ignore, &analyze), "\\textbf{hola}");
    }

    #[test]
    fn ignore_wins_ties() {
        let ignore = vec![Span::ignore(3, 3, 0, "X")];
        let analyze = vec![Span::analyze(3, 4, 0, "a"), Span::analyze(0, 3, 0, "abc")];
        assert_eq!(merge(&ignore, &analyze), "abcXa");
    }

    #[test]
    fn push_drops_empty_spans() {
        let mut partition = Partition::new();
        partition.push(Span::analyze(2, 2, 0, ""));
        assert!(partition.is_empty());
    }

    #[test]
    fn covers_detects_gaps() {
        let mut partition = Partition::new();
        partition.push(Span::analyze(0, 2, 0, "ab"));
        partition.push(Span::ignore(3, 4, 0, "d"));
        assert!(!partition.covers(4));
    }
}
