//! Reporting utilities: formatted tables, fit summaries, and query results.

pub mod format;

pub use format::*;
