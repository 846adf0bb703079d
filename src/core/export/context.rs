//! Per-run export state
//!
//! An [`ExportContext`] is created when a run starts, passed explicitly to
//! every phase and dropped when the run ends. The requirement trees live in
//! [`ExportType`] values next to it, so a phase can read the trees while it
//! mutates the context.

use crate::adapters::source::{ImageStore, SourceInfo, TypeContents};
use crate::config::ExportConfig;
use crate::core::export::naming::export_base_name;
use crate::core::export::progress::Progress;
use crate::domain::{
    Baseline, ExportScope, NodeId, Project, ReqportError, RequirementNode, RequirementType,
    Result, SourceError, TraceEndpoint, TypeTag,
};
use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Maximum number of exported requirements
    pub limit: usize,
    pub reverse_traces: bool,
    pub include_type_attribute: bool,
    pub skip_images: bool,
    pub plaintext: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            limit: 10_000,
            reverse_traces: false,
            include_type_attribute: false,
            skip_images: false,
            plaintext: false,
        }
    }
}

impl ExportOptions {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            limit: config.max_row_count,
            reverse_traces: config.reverse_traces,
            include_type_attribute: config.include_type_attribute,
            skip_images: config.skip_images,
            plaintext: config.plaintext,
        }
    }
}

/// A requirement type selected for export, with its trees
#[derive(Debug, Clone)]
pub struct ExportType {
    pub requirement_type: RequirementType,
    pub tag: TypeTag,
    pub roots: Vec<RequirementNode>,
}

impl ExportType {
    /// Normalizes the type tag of fetched contents
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidData`] if the type has no usable tag.
    pub fn from_contents(contents: TypeContents) -> Result<Self> {
        let tag = contents.requirement_type.tag().map_err(|e| {
            SourceError::InvalidData(format!(
                "Requirement type '{}': {e}",
                contents.requirement_type.name
            ))
        })?;
        Ok(Self {
            requirement_type: contents.requirement_type,
            tag,
            roots: contents.roots,
        })
    }

    pub fn name(&self) -> &str {
        &self.requirement_type.name
    }

    /// Requirements in all trees of this type
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(|r| r.subtree_len()).sum()
    }
}

/// Counts exported requirements against the limit
#[derive(Debug, Clone)]
pub struct ExportCounter {
    limit: usize,
    exported: usize,
}

impl ExportCounter {
    pub fn new(limit: usize) -> Self {
        Self { limit, exported: 0 }
    }

    /// Admits one more requirement
    ///
    /// # Errors
    ///
    /// Returns [`ReqportError::LimitReached`] when the counter already equals
    /// the limit; the counter is left unchanged.
    pub fn admit(&mut self) -> Result<()> {
        if self.exported >= self.limit {
            return Err(ReqportError::LimitReached { limit: self.limit });
        }
        self.exported += 1;
        Ok(())
    }

    pub fn exported(&self) -> usize {
        self.exported
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Mutable state of one export run
pub struct ExportContext {
    pub options: ExportOptions,
    pub project: Project,
    pub baseline: Baseline,
    pub scope: ExportScope,
    pub source: SourceInfo,
    pub output_dir: PathBuf,
    pub created_at: DateTime<Utc>,
    pub progress: Progress,
    images: Arc<dyn ImageStore>,
    counter: ExportCounter,
    first_level_total: usize,
    first_level_done: usize,
    emitted_data_types: HashSet<String>,
    emitted_nodes: HashSet<NodeId>,
    auxiliary_files: BTreeSet<PathBuf>,
    image_names: HashMap<(u32, String), String>,
    used_image_names: HashSet<String>,
    skipped_traces: usize,
    dropped_images: usize,
}

impl ExportContext {
    pub fn new(
        options: ExportOptions,
        project: Project,
        baseline: Baseline,
        scope: ExportScope,
        source: SourceInfo,
        images: Arc<dyn ImageStore>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let counter = ExportCounter::new(options.limit);
        Self {
            options,
            project,
            baseline,
            scope,
            source,
            output_dir: output_dir.into(),
            created_at: Utc::now(),
            progress: Progress::new(),
            images,
            counter,
            first_level_total: 0,
            first_level_done: 0,
            emitted_data_types: HashSet::new(),
            emitted_nodes: HashSet::new(),
            auxiliary_files: BTreeSet::new(),
            image_names: HashMap::new(),
            used_image_names: HashSet::new(),
            skipped_traces: 0,
            dropped_images: 0,
        }
    }

    /// Replaces the progress handle with one observed elsewhere
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// File name without extension shared by all outputs of this run
    pub fn base_file_name(&self) -> String {
        export_base_name(&self.project, &self.scope)
    }

    /// Human-readable title of the export
    pub fn title(&self) -> String {
        match self.scope.type_name() {
            Some(type_name) => format!("Project: {}: {}", self.project.name, type_name),
            None => format!("Project: {}: all requirement types", self.project.name),
        }
    }

    pub fn image_store(&self) -> Arc<dyn ImageStore> {
        self.images.clone()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Admits a requirement into the output
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidData`] for an identifier seen before in
    /// this run and [`ReqportError::LimitReached`] once the limit is hit.
    pub fn admit_node(&mut self, id: &NodeId) -> Result<()> {
        if self.emitted_nodes.contains(id) {
            return Err(SourceError::InvalidData(format!(
                "Requirement {id} appears more than once"
            ))
            .into());
        }
        self.counter.admit()?;
        self.emitted_nodes.insert(id.clone());
        Ok(())
    }

    pub fn exported_count(&self) -> usize {
        self.counter.exported()
    }

    pub fn is_exported(&self, id: &NodeId) -> bool {
        self.emitted_nodes.contains(id)
    }

    pub fn set_first_level_total(&mut self, total: usize) {
        self.first_level_total = total;
        self.first_level_done = 0;
    }

    /// Records one finished top-level requirement and updates progress
    pub fn first_level_done(&mut self) {
        self.first_level_done += 1;
        self.progress
            .objects(self.first_level_done, self.first_level_total);
    }

    pub fn first_level_count(&self) -> usize {
        self.first_level_done
    }

    /// Registers a data-type identifier; false if it was emitted already
    pub fn register_data_type(&mut self, identifier: &str) -> bool {
        self.emitted_data_types.insert(identifier.to_string())
    }

    pub fn add_auxiliary_file(&mut self, path: impl Into<PathBuf>) {
        self.auxiliary_files.insert(path.into());
    }

    pub fn auxiliary_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.auxiliary_files.iter()
    }

    /// Output name of an image already written in this run
    pub fn exported_image(&self, image_id: u32, file_name: &str) -> Option<&str> {
        self.image_names
            .get(&(image_id, file_name.to_string()))
            .map(String::as_str)
    }

    /// Reserves an output file name for image `image_id`
    ///
    /// `candidate` is used when no other image of this run took it (compared
    /// case-insensitively); otherwise the image id is appended to the stem.
    pub fn claim_image_name(&mut self, image_id: u32, file_name: &str, candidate: &str) -> String {
        let path = Path::new(candidate);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image");
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("png");

        let mut name = candidate.to_string();
        let mut attempt = 0;
        while self.used_image_names.contains(&name.to_lowercase()) {
            attempt += 1;
            name = if attempt == 1 {
                format!("{stem}-{image_id}.{ext}")
            } else {
                format!("{stem}-{image_id}-{attempt}.{ext}")
            };
        }
        if name != candidate {
            tracing::debug!(image_id, from = %candidate, to = %name, "Image name taken, renamed");
        }

        self.used_image_names.insert(name.to_lowercase());
        self.image_names
            .insert((image_id, file_name.to_string()), name.clone());
        name
    }

    pub fn record_skipped_trace(&mut self) {
        self.skipped_traces += 1;
    }

    pub fn skipped_traces(&self) -> usize {
        self.skipped_traces
    }

    pub fn record_dropped_image(&mut self) {
        self.dropped_images += 1;
    }

    pub fn dropped_images(&self) -> usize {
        self.dropped_images
    }

    /// Identifier of a trace endpoint that may be emitted as a relation
    ///
    /// The target must be a requirement of the exported project (and of the
    /// exported type for a single-type run) that was admitted in this run.
    pub fn trace_target(&self, endpoint: &TraceEndpoint) -> Option<NodeId> {
        let TraceEndpoint::Requirement(target) = endpoint else {
            return None;
        };
        if target.project != self.project.name {
            return None;
        }
        if let Some(type_name) = self.scope.type_name() {
            if target.type_name != type_name {
                return None;
            }
        }
        let id = target.node_id();
        self.is_exported(&id).then_some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::source::InMemoryImageStore;
    use crate::domain::RequirementRef;

    fn context(limit: usize, scope: ExportScope) -> ExportContext {
        let options = ExportOptions {
            limit,
            ..ExportOptions::default()
        };
        ExportContext::new(
            options,
            Project::new("Demo"),
            Baseline::current(),
            scope,
            SourceInfo {
                repository_id: "rm".to_string(),
                user: "ada".to_string(),
                tool: "CaliberRM".to_string(),
            },
            Arc::new(InMemoryImageStore::new()),
            ".",
        )
    }

    fn reference(project: &str, type_name: &str, number: u64) -> TraceEndpoint {
        TraceEndpoint::Requirement(RequirementRef {
            project: project.to_string(),
            type_name: type_name.to_string(),
            tag: "F".to_string(),
            number,
        })
    }

    #[test]
    fn test_counter_stops_at_limit() {
        let mut counter = ExportCounter::new(2);
        counter.admit().unwrap();
        counter.admit().unwrap();
        let err = counter.admit().unwrap_err();
        assert!(matches!(err, ReqportError::LimitReached { limit: 2 }));
        assert_eq!(counter.exported(), 2);
    }

    #[test]
    fn test_admit_rejects_duplicates() {
        let mut ctx = context(10, ExportScope::Project);
        let tag = TypeTag::new("F").unwrap();
        ctx.admit_node(&NodeId::new(&tag, 1)).unwrap();
        let err = ctx.admit_node(&NodeId::new(&tag, 1)).unwrap_err();
        assert!(matches!(
            err,
            ReqportError::Source(SourceError::InvalidData(_))
        ));
        assert_eq!(ctx.exported_count(), 1);
    }

    #[test]
    fn test_data_type_dedup() {
        let mut ctx = context(10, ExportScope::Project);
        assert!(ctx.register_data_type("Risk-datatype"));
        assert!(!ctx.register_data_type("Risk-datatype"));
    }

    #[test]
    fn test_trace_target_scope() {
        let mut ctx = context(10, ExportScope::SingleType("Feature".to_string()));
        let tag = TypeTag::new("F").unwrap();
        ctx.admit_node(&NodeId::new(&tag, 2)).unwrap();

        assert_eq!(
            ctx.trace_target(&reference("Demo", "Feature", 2)),
            Some(NodeId::new(&tag, 2))
        );
        assert_eq!(ctx.trace_target(&reference("Other", "Feature", 2)), None);
        assert_eq!(ctx.trace_target(&reference("Demo", "Bug", 2)), None);
        assert_eq!(ctx.trace_target(&reference("Demo", "Feature", 3)), None);
        assert_eq!(ctx.trace_target(&TraceEndpoint::Deleted), None);
    }

    #[test]
    fn test_titles_and_names() {
        let ctx = context(10, ExportScope::Project);
        assert_eq!(ctx.title(), "Project: Demo: all requirement types");
        assert_eq!(ctx.base_file_name(), "Export - Demo");

        let ctx = context(10, ExportScope::SingleType("Feature".to_string()));
        assert_eq!(ctx.title(), "Project: Demo: Feature");
        assert_eq!(ctx.base_file_name(), "Export - Demo - Feature");
    }

    #[test]
    fn test_first_level_progress() {
        let mut ctx = context(10, ExportScope::Project);
        ctx.set_first_level_total(2);
        ctx.first_level_done();
        assert_eq!(ctx.progress.get(), 50);
        assert_eq!(ctx.first_level_count(), 1);
    }
}
