//! Compacted index → output line mapping
//!
//! Every heading and paragraph handed to the analysis collaborators gets a
//! compacted index. The map remembers on which output line each of them was
//! emitted so late annotations land on the right physical line.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineMapEntry {
    pub compact_index: usize,
    pub output_line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineMap {
    entries: Vec<LineMapEntry>,
}

/// Attempted to record an entry that would break monotonicity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderViolation {
    pub previous: LineMapEntry,
    pub rejected: LineMapEntry,
}

impl LineMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the next entry. Compact indices must strictly increase and
    /// output lines must not decrease.
    pub fn record(&mut self, compact_index: usize, output_line: usize) -> Result<(), OrderViolation> {
        let entry = LineMapEntry {
            compact_index,
            output_line,
        };
        if let Some(&previous) = self.entries.last() {
            if compact_index <= previous.compact_index || output_line < previous.output_line {
                return Err(OrderViolation {
                    previous,
                    rejected: entry,
                });
            }
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Output line for a compacted index
    pub fn resolve(&self, compact_index: usize) -> Option<usize> {
        self.entries
            .binary_search_by_key(&compact_index, |e| e.compact_index)
            .ok()
            .map(|i| self.entries[i].output_line)
    }

    /// Account for `delta` lines inserted at output line `line`: every entry
    /// at or after it moves down.
    pub fn shift_from(&mut self, line: usize, delta: usize) {
        for entry in &mut self.entries {
            if entry.output_line >= line {
                entry.output_line += delta;
            }
        }
    }

    pub fn entries(&self) -> &[LineMapEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the ordering invariant over the whole map
    pub fn is_monotonic(&self) -> bool {
        self.entries.windows(2).all(|pair| {
            pair[0].compact_index < pair[1].compact_index
                && pair[0].output_line <= pair[1].output_line
        })
    }
}
