//! Error context extension trait
//!
//! `.context()` and `.with_context()` for `Result<T, E>` where `E` converts
//! into [`ReqportError`]. The error keeps its category (format, packaging,
//! source...) and gains a message prefix.
//!
//! # Examples
//!
//! ```rust
//! use reqport::domain::Result;
//! use reqport::domain::context::ResultExt;
//!
//! fn read_snapshot(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read snapshot: {}", path))
//! }
//! ```

use crate::domain::errors::ReqportError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
pub trait ResultExt<T> {
    /// Add context to an error (eager)
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure, evaluated only on failure
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ReqportError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| attach(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| attach(e.into(), f()))
    }
}

fn attach(err: ReqportError, context: impl std::fmt::Display) -> ReqportError {
    match err {
        ReqportError::Configuration(m) => ReqportError::Configuration(format!("{context}: {m}")),
        ReqportError::Format(m) => ReqportError::Format(format!("{context}: {m}")),
        ReqportError::Packaging(m) => ReqportError::Packaging(format!("{context}: {m}")),
        ReqportError::Validation(m) => ReqportError::Validation(format!("{context}: {m}")),
        ReqportError::Serialization(m) => ReqportError::Serialization(format!("{context}: {m}")),
        ReqportError::Io(m) => ReqportError::Io(format!("{context}: {m}")),
        ReqportError::Other(m) => ReqportError::Other(format!("{context}: {m}")),
        // Limit, cancellation and source errors are matched on by the coordinator
        other @ (ReqportError::LimitReached { .. }
        | ReqportError::Cancelled
        | ReqportError::Source(_)) => other,
    }
}
