//! Export writer trait

use crate::adapters::writer::OutputFormat;
use crate::core::export::context::{ExportContext, ExportType};
use crate::domain::Result;
use std::path::PathBuf;

/// Strategy for one output format
///
/// The pipeline calls the phases strictly in declaration order. Writers run
/// on the blocking export worker and own their destination exclusively until
/// [`close`](ExportWriter::close) or [`abort`](ExportWriter::abort) returns.
pub trait ExportWriter: Send {
    /// The format this writer produces
    fn format(&self) -> OutputFormat;

    /// Creates the destination file and returns its path
    ///
    /// # Errors
    ///
    /// Returns a format error if the destination cannot be created.
    fn open(&mut self, ctx: &mut ExportContext) -> Result<PathBuf>;

    /// Data types and spec types, or sheets and title rows
    fn export_definitions(&mut self, ctx: &mut ExportContext, types: &[ExportType]) -> Result<()>;

    /// One record per requirement; the only counted phase
    fn export_requirements(&mut self, ctx: &mut ExportContext, types: &[ExportType])
        -> Result<()>;

    /// Relations between exported requirements
    fn export_traces(&mut self, ctx: &mut ExportContext, types: &[ExportType]) -> Result<()>;

    /// Ordered hierarchies
    fn export_specifications(
        &mut self,
        ctx: &mut ExportContext,
        types: &[ExportType],
    ) -> Result<()>;

    /// Finishes and flushes the destination
    fn close(&mut self, ctx: &mut ExportContext) -> Result<()>;

    /// Closes whatever is open after a failed or cancelled phase
    ///
    /// The partial file is left on disk for inspection.
    fn abort(&mut self, ctx: &mut ExportContext) -> Result<()>;
}
