//! JSON snapshot source
//!
//! A snapshot is a JSON dump of projects, baselines, requirement types and
//! requirement trees, plus a directory of embedded images.
//!
//! ```json
//! {
//!   "repository_id": "caliber.example.com",
//!   "user": "Ada Lovelace",
//!   "projects": [{
//!     "name": "Demo",
//!     "baselines": [{
//!       "name": "Current Baseline",
//!       "current": true,
//!       "types": [{
//!         "name": "Feature", "tag": "F",
//!         "attributes": [],
//!         "requirements": [{ "number": 1, "name": "Login", "children": [] }]
//!       }]
//!     }]
//!   }]
//! }
//! ```

use crate::adapters::source::images::{DirectoryImageStore, ImageStore};
use crate::adapters::source::r#trait::{RequirementSource, SourceInfo, TypeContents};
use crate::domain::{
    Baseline, Project, RequirementNode, RequirementType, Result, SourceError,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name under which the live baseline is stored by the source tool
const LIVE_BASELINE_NAME: &str = "Current Baseline";

/// Root of a snapshot document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub repository_id: String,
    #[serde(default)]
    pub user: String,
    #[serde(default = "default_tool")]
    pub tool: String,
    #[serde(default)]
    pub projects: Vec<ProjectSnapshot>,
}

fn default_tool() -> String {
    "CaliberRM".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub name: String,
    #[serde(default)]
    pub baselines: Vec<BaselineSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineSnapshot {
    pub name: String,
    /// Marks the live baseline
    #[serde(default)]
    pub current: bool,
    #[serde(default)]
    pub types: Vec<TypeSnapshot>,
}

impl BaselineSnapshot {
    fn is_live(&self) -> bool {
        self.current || self.name == LIVE_BASELINE_NAME
    }

    /// Name presented to users
    fn display_name(&self) -> &str {
        if self.is_live() {
            Baseline::CURRENT
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSnapshot {
    #[serde(flatten)]
    pub requirement_type: RequirementType,
    #[serde(default)]
    pub requirements: Vec<RequirementNode>,
}

/// Requirement source backed by a snapshot document
pub struct SnapshotSource {
    snapshot: Snapshot,
    images: Arc<dyn ImageStore>,
}

impl SnapshotSource {
    /// Reads a snapshot file
    ///
    /// Images are looked up in `images_dir`, or in an `images` directory next
    /// to the snapshot when not given. `repository_id` overrides the value
    /// recorded in the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Unavailable`] if the file cannot be read and
    /// [`SourceError::InvalidData`] if it is not a valid snapshot.
    pub async fn load(
        path: impl AsRef<Path>,
        images_dir: Option<PathBuf>,
        repository_id: Option<String>,
    ) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            SourceError::Unavailable(format!("Failed to read snapshot {}: {e}", path.display()))
        })?;

        let mut snapshot: Snapshot = serde_json::from_str(&contents).map_err(|e| {
            SourceError::InvalidData(format!("Invalid snapshot {}: {e}", path.display()))
        })?;
        if let Some(repository_id) = repository_id {
            snapshot.repository_id = repository_id;
        }

        let images_dir = images_dir.unwrap_or_else(|| {
            path.parent()
                .map(|p| p.join("images"))
                .unwrap_or_else(|| PathBuf::from("images"))
        });

        tracing::debug!(
            path = %path.display(),
            projects = snapshot.projects.len(),
            images_dir = %images_dir.display(),
            "Loaded requirement snapshot"
        );

        Ok(Self::new(snapshot, Arc::new(DirectoryImageStore::new(images_dir))))
    }

    /// Wraps an already parsed snapshot
    pub fn new(snapshot: Snapshot, images: Arc<dyn ImageStore>) -> Self {
        Self { snapshot, images }
    }

    fn find_project(&self, project: &Project) -> Result<&ProjectSnapshot> {
        self.snapshot
            .projects
            .iter()
            .find(|p| p.name == project.name)
            .ok_or_else(|| SourceError::ProjectNotFound(project.name.clone()).into())
    }

    fn find_baseline(&self, project: &Project, baseline: &Baseline) -> Result<&BaselineSnapshot> {
        let found = self.find_project(project)?.baselines.iter().find(|b| {
            if baseline.is_current() {
                b.is_live()
            } else {
                b.name == baseline.name
            }
        });
        found.ok_or_else(|| {
            SourceError::BaselineNotFound(format!("{} in project {}", baseline, project.name))
                .into()
        })
    }
}

#[async_trait]
impl RequirementSource for SnapshotSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            repository_id: self.snapshot.repository_id.clone(),
            user: self.snapshot.user.clone(),
            tool: self.snapshot.tool.clone(),
        }
    }

    fn image_store(&self) -> Arc<dyn ImageStore> {
        self.images.clone()
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self
            .snapshot
            .projects
            .iter()
            .map(|p| Project::new(&p.name))
            .collect())
    }

    async fn list_baselines(&self, project: &Project) -> Result<Vec<Baseline>> {
        Ok(self
            .find_project(project)?
            .baselines
            .iter()
            .filter(|b| b.name != Baseline::DELETED_VIEW)
            .map(|b| Baseline::new(b.display_name()))
            .collect())
    }

    async fn list_requirement_types(
        &self,
        project: &Project,
        baseline: &Baseline,
    ) -> Result<Vec<RequirementType>> {
        Ok(self
            .find_baseline(project, baseline)?
            .types
            .iter()
            .map(|t| t.requirement_type.clone())
            .collect())
    }

    async fn fetch_type(
        &self,
        project: &Project,
        baseline: &Baseline,
        type_name: &str,
    ) -> Result<TypeContents> {
        let ty = self
            .find_baseline(project, baseline)?
            .types
            .iter()
            .find(|t| t.requirement_type.name == type_name)
            .ok_or_else(|| SourceError::TypeNotFound(type_name.to_string()))?;

        Ok(TypeContents {
            requirement_type: ty.requirement_type.clone(),
            roots: ty.requirements.clone(),
        })
    }
}
