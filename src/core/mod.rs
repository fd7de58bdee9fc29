//! Structural LaTeX processing
//!
//! Line classification, block extraction, command/prose separation, the
//! document walk with its line map, and the insertion of review notes.

pub mod annotate;
pub mod blocks;
pub mod classify;
pub mod document;
pub mod line_map;
pub mod preprocess;
pub mod separator;
pub mod walker;

pub use annotate::{insert_note_after, insert_sentence_note};
pub use classify::{classify, BlockOpen, LineCategory};
pub use document::{extend_preamble, SourceDocument};
pub use line_map::{LineMap, LineMapEntry};
pub use separator::{separate, ArgumentPolicy, PolicyTable, Separator, DEFAULT_POLICY_TABLE};
pub use texnote_spans::{merge, Partition, Span, SpanKind};
pub use walker::{AnalysisUnit, DocumentWalker, SpanMarker, UnitKind, WalkOptions, WalkOutput};
