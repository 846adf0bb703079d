//! Requirement source trait definition
//!
//! The export engine only reads from its source. Anything that can enumerate
//! projects, baselines and requirement types and hand out whole requirement
//! trees can drive an export.

use crate::adapters::source::images::ImageStore;
use crate::domain::{
    Baseline, Project, RequirementNode, RequirementType, Result, SourceError,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Everything the engine needs about one requirement type
#[derive(Debug, Clone)]
pub struct TypeContents {
    pub requirement_type: RequirementType,

    /// Top-level requirements in source order; children hang off each node
    pub roots: Vec<RequirementNode>,
}

impl TypeContents {
    /// Number of requirements in all trees
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(|r| r.subtree_len()).sum()
    }
}

/// Identity of the source, recorded in exported headers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceInfo {
    /// Server or repository the data came from
    pub repository_id: String,

    /// User on whose behalf the export runs
    pub user: String,

    /// Name of the tool that owns the data
    pub tool: String,
}

/// Read-only requirement source
///
/// # Example
///
/// ```no_run
/// use reqport::adapters::source::{RequirementSource, SnapshotSource};
/// use reqport::domain::Baseline;
///
/// # async fn example() -> reqport::domain::Result<()> {
/// let source = SnapshotSource::load("requirements.json", None, None).await?;
/// let project = source.project("Demo").await?;
/// let baseline = source.baseline(&project, Baseline::CURRENT).await?;
/// for ty in source.list_requirement_types(&project, &baseline).await? {
///     println!("{} ({})", ty.name, ty.raw_tag);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait RequirementSource: Send + Sync {
    /// Repository, user and tool identity
    fn info(&self) -> SourceInfo;

    /// Store resolving embedded image references
    fn image_store(&self) -> Arc<dyn ImageStore>;

    /// All projects visible to the user
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Baselines of a project
    ///
    /// The live baseline is reported as [`Baseline::CURRENT`]; the
    /// "Deleted View" baseline is never listed.
    async fn list_baselines(&self, project: &Project) -> Result<Vec<Baseline>>;

    /// Requirement types present in a baseline, with attribute definitions
    async fn list_requirement_types(
        &self,
        project: &Project,
        baseline: &Baseline,
    ) -> Result<Vec<RequirementType>>;

    /// Definitions and top-level requirements of one type in a baseline
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::TypeNotFound`] if the type is not in the baseline.
    async fn fetch_type(
        &self,
        project: &Project,
        baseline: &Baseline,
        type_name: &str,
    ) -> Result<TypeContents>;

    /// Selects a project by name
    async fn project(&self, name: &str) -> Result<Project> {
        self.list_projects()
            .await?
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| SourceError::ProjectNotFound(name.to_string()).into())
    }

    /// Selects a baseline by name
    async fn baseline(&self, project: &Project, name: &str) -> Result<Baseline> {
        self.list_baselines(project)
            .await?
            .into_iter()
            .find(|b| b.name == name)
            .ok_or_else(|| {
                SourceError::BaselineNotFound(format!("{name} in project {}", project.name)).into()
            })
    }
}
