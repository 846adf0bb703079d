//! External system integrations for Reqport.
//!
//! - [`source`] - Read-only requirement sources and image stores
//! - [`writer`] - Output formats and the writer strategy trait
//! - [`spreadsheet`] - Excel workbook writer
//! - [`reqif`] - ReqIF interchange writer
//!
//! # Design Pattern
//!
//! Adapters isolate external formats behind traits: the export engine reads
//! from a [`source::RequirementSource`] and writes through an
//! [`writer::ExportWriter`], so either side can be replaced in tests.
//!
//! ```rust,no_run
//! use reqport::adapters::writer::{create_writer, OutputFormat};
//!
//! let writer = create_writer(OutputFormat::Reqifz);
//! assert_eq!(writer.format(), OutputFormat::Reqifz);
//! ```

pub mod reqif;
pub mod source;
pub mod spreadsheet;
pub mod writer;
