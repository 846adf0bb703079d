//! Excel workbook output
//!
//! One sheet per requirement type, one row per requirement. Traces are
//! summarized in two text columns instead of being written separately.

pub mod sheet;
pub mod writer;

pub use writer::SpreadsheetWriter;
