//! Utility modules
//!
//! - Error and warning types, with CLI formatting
//! - LaTeX text helpers

pub mod error;
pub mod latex;

pub use error::{ReviewError, ReviewResult, ReviewWarning, WarningKind};
