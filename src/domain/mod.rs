//! Domain models and types for Reqport.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Normalized identifiers** ([`TypeTag`], [`NodeId`], [`xml_name`])
//! - **Source projections** ([`Project`], [`Baseline`], [`RequirementType`], [`RequirementNode`])
//! - **The six-kind value union** ([`Value`], [`AttributeKind`])
//! - **Error types** ([`ReqportError`], [`SourceError`]) and the [`Result`] alias
//!
//! # Error Handling
//!
//! ```rust
//! use reqport::domain::{ReqportError, Result};
//!
//! fn check_limit(exported: usize, limit: usize) -> Result<()> {
//!     if exported == limit {
//!         return Err(ReqportError::LimitReached { limit });
//!     }
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod errors;
pub mod ids;
pub mod project;
pub mod requirement;
pub mod requirement_type;
pub mod result;

pub use errors::{ReqportError, SourceError};
pub use ids::{normalize_tag, xml_name, NodeId, TypeTag};
pub use project::{Baseline, ExportScope, Project};
pub use requirement::{
    AttributeValue, Person, RequirementNode, RequirementRef, Revision, Trace, TraceEndpoint,
    Value, Version,
};
pub use requirement_type::{AttributeDefinition, AttributeKind, EnumEntry, RequirementType};
pub use result::Result;
