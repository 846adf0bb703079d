//! Export orchestration
//!
//! - [`coordinator`]: resolves the scope through the source and runs the export
//! - [`pipeline`]: phase sequencing, cancellation and abort handling
//! - [`context`]: per-run state handed to every phase
//! - [`archive`]: `.reqifz` bundling
//! - [`summary`]: results reported after a run

pub mod archive;
pub mod context;
pub mod coordinator;
pub mod naming;
pub mod pipeline;
pub mod progress;
pub mod summary;

pub use context::{ExportContext, ExportCounter, ExportOptions, ExportType};
pub use coordinator::ExportCoordinator;
pub use pipeline::{CancelSignal, Pipeline, RunState};
pub use progress::Progress;
pub use summary::{ExportError, ExportErrorType, ExportOutcome, ExportSummary};
