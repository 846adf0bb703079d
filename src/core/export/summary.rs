//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Every phase finished
    Completed,
    /// The row limit stopped the run; the partial output was closed
    LimitReached,
    /// The user cancelled between phases
    Cancelled,
}

impl fmt::Display for ExportOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExportOutcome::Completed => "completed",
            ExportOutcome::LimitReached => "limit reached",
            ExportOutcome::Cancelled => "cancelled",
        };
        f.write_str(text)
    }
}

/// Summary of an export operation
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub outcome: ExportOutcome,

    /// Requirements written
    pub exported: usize,

    /// Top-level requirements finished
    pub first_level: usize,

    /// Requirement types in the run
    pub types: usize,

    /// Traces left out because their target was not exported
    pub skipped_traces: usize,

    /// Embedded images that could not be exported
    pub dropped_images: usize,

    /// Primary output file
    pub output_path: Option<PathBuf>,

    /// Archive bundling the output, for `reqifz`
    pub archive_path: Option<PathBuf>,

    /// Duration of the export
    pub duration: Duration,

    /// Errors that did not stop the run
    pub errors: Vec<ExportError>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            outcome: ExportOutcome::Completed,
            exported: 0,
            first_level: 0,
            types: 0,
            skipped_traces: 0,
            dropped_images: 0,
            output_path: None,
            archive_path: None,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: ExportError) {
        self.errors.push(error);
    }

    /// Completed without recorded errors
    pub fn is_successful(&self) -> bool {
        self.outcome == ExportOutcome::Completed && self.errors.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            outcome = %self.outcome,
            exported = self.exported,
            first_level = self.first_level,
            types = self.types,
            skipped_traces = self.skipped_traces,
            dropped_images = self.dropped_images,
            output = ?self.output_path,
            archive = ?self.archive_path,
            duration_ms = self.duration.as_millis() as u64,
            "Export finished"
        );

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Export completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    message = %error.message,
                    context = ?error.context,
                    "Export error"
                );
            }
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of export error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportErrorType {
    /// Archive bundling
    Packaging,
    /// Output file handling
    Format,
    /// Requirement source
    Source,
    /// Unknown error
    Unknown,
}

/// Export error with context
#[derive(Debug, Clone)]
pub struct ExportError {
    /// Type of error
    pub error_type: ExportErrorType,

    /// Error message
    pub message: String,

    /// Optional context, such as a file path
    pub context: Option<String>,
}

impl ExportError {
    /// Create a new export error
    pub fn new(error_type: ExportErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: String) -> Self {
        self.context = Some(context);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new();

        assert_eq!(summary.outcome, ExportOutcome::Completed);
        assert_eq!(summary.exported, 0);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.errors.is_empty());
        assert!(summary.output_path.is_none());
    }

    #[test]
    fn test_export_summary_with_duration() {
        let summary = ExportSummary::new().with_duration(Duration::from_secs(120));

        assert_eq!(summary.duration, Duration::from_secs(120));
    }

    #[test]
    fn test_export_summary_is_successful() {
        let mut summary = ExportSummary::new();
        assert!(summary.is_successful());

        summary.add_error(ExportError::new(
            ExportErrorType::Packaging,
            "zip failed".to_string(),
        ));
        assert!(!summary.is_successful());

        let mut summary = ExportSummary::new();
        summary.outcome = ExportOutcome::LimitReached;
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_export_error_with_context() {
        let error = ExportError::new(ExportErrorType::Packaging, "zip failed".to_string())
            .with_context("Export - Demo.reqifz".to_string());

        assert_eq!(error.error_type, ExportErrorType::Packaging);
        assert_eq!(error.context, Some("Export - Demo.reqifz".to_string()));
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(ExportOutcome::LimitReached.to_string(), "limit reached");
        assert_eq!(ExportOutcome::Cancelled.to_string(), "cancelled");
    }
}
