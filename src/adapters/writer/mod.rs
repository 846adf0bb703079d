//! Output format abstraction
//!
//! One [`ExportWriter`] implementation exists per output format. The export
//! pipeline drives every writer through the same phase sequence, so adding a
//! format never touches the traversal or the orchestration code.

pub mod factory;
pub mod traits;

pub use factory::create_writer;
pub use traits::ExportWriter;

use crate::domain::{ReqportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Output format of an export run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Excel workbook, one sheet per requirement type
    Spreadsheet,
    /// ReqIF XML document
    Reqif,
    /// ReqIF XML document bundled with its images in a zip archive
    Reqifz,
}

impl OutputFormat {
    /// File extension of the primary output file
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Spreadsheet => "xlsx",
            OutputFormat::Reqif | OutputFormat::Reqifz => "reqif",
        }
    }

    /// Whether the run ends with archive packaging
    pub fn is_archive(&self) -> bool {
        matches!(self, OutputFormat::Reqifz)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Spreadsheet => "xlsx",
            OutputFormat::Reqif => "reqif",
            OutputFormat::Reqifz => "reqifz",
        };
        write!(f, "{name}")
    }
}

impl FromStr for OutputFormat {
    type Err = ReqportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "xlsx" | "excel" | "spreadsheet" => Ok(OutputFormat::Spreadsheet),
            "reqif" => Ok(OutputFormat::Reqif),
            "reqifz" => Ok(OutputFormat::Reqifz),
            _ => Err(ReqportError::Configuration(format!(
                "Invalid output format '{s}'. Must be one of: xlsx, reqif, reqifz"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("excel").unwrap(), OutputFormat::Spreadsheet);
        assert_eq!(OutputFormat::from_str("XLSX").unwrap(), OutputFormat::Spreadsheet);
        assert_eq!(OutputFormat::from_str("reqif").unwrap(), OutputFormat::Reqif);
        assert_eq!(OutputFormat::from_str("reqifz").unwrap(), OutputFormat::Reqifz);
        assert!(matches!(
            OutputFormat::from_str("csv"),
            Err(ReqportError::Configuration(_))
        ));
    }

    #[test]
    fn test_output_format_extension() {
        assert_eq!(OutputFormat::Spreadsheet.extension(), "xlsx");
        assert_eq!(OutputFormat::Reqifz.extension(), "reqif");
        assert!(OutputFormat::Reqifz.is_archive());
        assert!(!OutputFormat::Reqif.is_archive());
    }
}
