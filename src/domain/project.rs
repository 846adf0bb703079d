//! Projects, baselines and export scope

use serde::{Deserialize, Serialize};
use std::fmt;

/// A project in the requirement source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Display name, also used in file names and trace summaries
    pub name: String,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A named snapshot of a project's requirements
///
/// [`Baseline::CURRENT`] is the synthetic name under which the live,
/// unsnapshotted state is offered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Baseline {
    pub name: String,
}

impl Baseline {
    /// Name of the live baseline as presented to users
    pub const CURRENT: &'static str = "Current";

    /// Baseline hidden from listings
    pub const DELETED_VIEW: &'static str = "Deleted View";

    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn current() -> Self {
        Self::new(Self::CURRENT)
    }

    pub fn is_current(&self) -> bool {
        self.name == Self::CURRENT
    }
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// What one run exports
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportScope {
    /// A single requirement type, by name
    SingleType(String),
    /// Every requirement type of the project
    Project,
}

impl ExportScope {
    /// Builds the scope from an optional type name
    pub fn from_type_name(type_name: Option<&str>) -> Self {
        match type_name {
            Some(name) if !name.trim().is_empty() => ExportScope::SingleType(name.to_string()),
            _ => ExportScope::Project,
        }
    }

    /// The type name for single-type scope
    pub fn type_name(&self) -> Option<&str> {
        match self {
            ExportScope::SingleType(name) => Some(name),
            ExportScope::Project => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_baseline() {
        assert!(Baseline::current().is_current());
        assert!(!Baseline::new("Release 1").is_current());
    }

    #[test]
    fn test_scope_from_type_name() {
        assert_eq!(
            ExportScope::from_type_name(Some("Feature")),
            ExportScope::SingleType("Feature".to_string())
        );
        assert_eq!(ExportScope::from_type_name(Some(" ")), ExportScope::Project);
        assert_eq!(ExportScope::from_type_name(None), ExportScope::Project);
        assert_eq!(ExportScope::Project.type_name(), None);
    }
}
