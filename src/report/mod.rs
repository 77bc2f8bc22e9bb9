//! Reporting utilities: annotation text and fit summaries.

pub mod format;

pub use format::*;
