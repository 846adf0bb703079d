//! Requirement sources
//!
//! The [`RequirementSource`] trait is the read-only contract the export engine
//! consumes. [`SnapshotSource`] implements it over a JSON snapshot file.

pub mod factory;
pub mod images;
pub mod snapshot;
mod r#trait;

pub use factory::create_source;
pub use images::{DirectoryImageStore, ImageStore, InMemoryImageStore};
pub use r#trait::{RequirementSource, SourceInfo, TypeContents};
pub use snapshot::{Snapshot, SnapshotSource};
