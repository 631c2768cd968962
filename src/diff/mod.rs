//! Diff processing and parsing utilities.
//!
//! This module turns the unified-diff text of a single file into
//! structured, line-numbered data and provides the small extension
//! traits the record layer needs for working with git2 deltas.

pub mod parser;
pub mod traits;

pub use parser::{parse_diff, DiffError, ParsedDiff};
pub use traits::{DiffDeltaPath, Utf8String};
