//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Console output with configurable level
//! - Optional JSON file logging with rotation
//! - Helper macros for the export lifecycle
//!
//! # Example
//!
//! ```no_run
//! use reqport::logging::init_logging;
//! use reqport::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(project = "Demo", "Export requested");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an export phase
///
/// # Example
///
/// ```no_run
/// use reqport::log_phase_start;
///
/// log_phase_start!("definitions", "Demo");
/// ```
#[macro_export]
macro_rules! log_phase_start {
    ($phase:expr, $project:expr) => {
        tracing::info!(phase = $phase, project = %$project, "Starting export phase");
    };
}

/// Log the completion of an export run
///
/// # Example
///
/// ```no_run
/// use reqport::log_export_complete;
/// use std::time::Duration;
///
/// log_export_complete!(42, Duration::from_secs(3));
/// ```
#[macro_export]
macro_rules! log_export_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis(),
            "Export completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use reqport::log_error_with_context;
/// use reqport::domain::ReqportError;
///
/// let error = ReqportError::Format("disk full".to_string());
/// log_error_with_context!(&error, "Failed to close workbook");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
