//! Export writer factory

use crate::adapters::reqif::ReqifWriter;
use crate::adapters::spreadsheet::SpreadsheetWriter;
use crate::adapters::writer::traits::ExportWriter;
use crate::adapters::writer::OutputFormat;

/// Create the writer for an output format
///
/// `Reqifz` uses the ReqIF writer; bundling happens after the writer closes.
pub fn create_writer(format: OutputFormat) -> Box<dyn ExportWriter> {
    match format {
        OutputFormat::Spreadsheet => {
            tracing::debug!("Creating spreadsheet writer");
            Box::new(SpreadsheetWriter::new())
        }
        OutputFormat::Reqif | OutputFormat::Reqifz => {
            tracing::debug!(format = %format, "Creating ReqIF writer");
            Box::new(ReqifWriter::new(format))
        }
    }
}
