//! Domain error types
//!
//! Every fallible library operation reports a [`ReqportError`]. Third-party
//! error types are converted at the boundary so callers never match on them.

use thiserror::Error;

/// Main Reqport error type
#[derive(Debug, Error)]
pub enum ReqportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requirement source is unreachable or returned inconsistent data
    #[error("Data source error: {0}")]
    Source(#[from] SourceError),

    /// The export-count limit was hit; partial output has been closed
    #[error("Export limit of {limit} requirements reached")]
    LimitReached { limit: usize },

    /// The destination cannot be opened, written or closed
    #[error("Output format error: {0}")]
    Format(String),

    /// Archive bundling failed after the export completed
    #[error("Packaging error: {0}")]
    Packaging(String),

    /// The run was cancelled at a phase boundary
    #[error("Export cancelled")]
    Cancelled,

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ReqportError {
    /// Returns true for the expected limit-reached termination
    pub fn is_limit_reached(&self) -> bool {
        matches!(self, ReqportError::LimitReached { .. })
    }

    /// Shorthand for a [`ReqportError::Format`] built from any displayable error
    pub fn format(err: impl std::fmt::Display) -> Self {
        ReqportError::Format(err.to_string())
    }
}

/// Errors raised by a requirement source
#[derive(Debug, Error)]
pub enum SourceError {
    /// No project with the requested name
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// No baseline with the requested name in the project
    #[error("Baseline not found: {0}")]
    BaselineNotFound(String),

    /// No requirement type with the requested name
    #[error("Requirement type not found: {0}")]
    TypeNotFound(String),

    /// An attribute value whose payload does not match its definition
    #[error("Unsupported value for attribute '{attribute}': {reason}")]
    UnsupportedValue { attribute: String, reason: String },

    /// An embedded image could not be retrieved
    #[error("Image {id} ({file_name}) not found")]
    ImageNotFound { id: u32, file_name: String },

    /// The source returned structurally inconsistent data
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The source cannot be reached or read
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for ReqportError {
    fn from(err: std::io::Error) -> Self {
        ReqportError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ReqportError {
    fn from(err: serde_json::Error) -> Self {
        ReqportError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ReqportError {
    fn from(err: toml::de::Error) -> Self {
        ReqportError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<rust_xlsxwriter::XlsxError> for ReqportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ReqportError::Format(format!("workbook: {err}"))
    }
}

impl From<quick_xml::Error> for ReqportError {
    fn from(err: quick_xml::Error) -> Self {
        ReqportError::Format(format!("xml: {err}"))
    }
}

impl From<image::ImageError> for ReqportError {
    fn from(err: image::ImageError) -> Self {
        ReqportError::Format(format!("image: {err}"))
    }
}

impl From<zip::result::ZipError> for ReqportError {
    fn from(err: zip::result::ZipError) -> Self {
        ReqportError::Packaging(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reqport_error_display() {
        let err = ReqportError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_source_error_conversion() {
        let source_err = SourceError::ProjectNotFound("Demo".to_string());
        let err: ReqportError = source_err.into();
        assert!(matches!(err, ReqportError::Source(_)));
        assert!(err.to_string().contains("Demo"));
    }

    #[test]
    fn test_limit_reached_display() {
        let err = ReqportError::LimitReached { limit: 10 };
        assert!(err.is_limit_reached());
        assert_eq!(err.to_string(), "Export limit of 10 requirements reached");
        assert!(!ReqportError::Cancelled.is_limit_reached());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ReqportError = io_err.into();
        assert!(matches!(err, ReqportError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ReqportError = json_err.into();
        assert!(matches!(err, ReqportError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ReqportError = toml_err.into();
        assert!(matches!(err, ReqportError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_format_shorthand() {
        let err = ReqportError::format("disk full");
        assert!(matches!(err, ReqportError::Format(ref m) if m == "disk full"));
    }
}
