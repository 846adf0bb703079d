//! Export coordinator - main orchestrator for the export process
//!
//! The coordinator resolves what to export through the (async) requirement
//! source, then hands the fetched trees to the blocking export worker which
//! drives one writer through every phase.

use crate::adapters::source::RequirementSource;
use crate::adapters::writer::{create_writer, OutputFormat};
use crate::config::ReqportConfig;
use crate::core::export::archive::package_archive;
use crate::core::export::context::{ExportContext, ExportOptions, ExportType};
use crate::core::export::pipeline::{CancelSignal, Pipeline};
use crate::core::export::progress::Progress;
use crate::core::export::summary::{ExportError, ExportErrorType, ExportOutcome, ExportSummary};
use crate::domain::{Baseline, ExportScope, Project, ReqportError, Result};
use crate::{log_error_with_context, log_export_complete};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Export coordinator
pub struct ExportCoordinator {
    config: ReqportConfig,
    source: Arc<dyn RequirementSource>,
    shutdown: watch::Receiver<bool>,
    progress: Progress,
}

/// What the blocking worker hands back
struct WorkerReport {
    ctx: ExportContext,
    output_path: Option<PathBuf>,
    result: Result<PathBuf>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    ///
    /// Setting `shutdown` to `true` cancels the run at the next phase
    /// boundary.
    pub fn new(
        config: ReqportConfig,
        source: Arc<dyn RequirementSource>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            source,
            shutdown,
            progress: Progress::new(),
        }
    }

    /// Shared progress of the run, for display while it executes
    pub fn progress(&self) -> Progress {
        self.progress.clone()
    }

    /// Execute the export
    ///
    /// 1. Validates configuration
    /// 2. Resolves project, baseline and requirement types
    /// 3. Fetches the requirement trees
    /// 4. Runs the export phases on a blocking worker
    /// 5. Bundles the archive for `reqifz`
    /// 6. Reports the summary
    ///
    /// A run stopped by the row limit or by cancellation is not an error;
    /// its outcome is recorded in the summary.
    ///
    /// # Errors
    ///
    /// Returns configuration, source and format errors.
    pub async fn execute_export(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();

        tracing::info!("Starting export process");

        self.config.validate().map_err(ReqportError::Configuration)?;
        let format = self.config.export.output_format()?;

        let project = self.source.project(&self.config.export.project).await?;
        let baseline = self
            .source
            .baseline(&project, &self.config.export.baseline)
            .await?;
        let scope = ExportScope::from_type_name(self.config.export.requirement_type.as_deref());
        let types = self.fetch_types(&project, &baseline, &scope).await?;

        tracing::info!(
            project = %project,
            baseline = %baseline,
            format = %format,
            types = types.len(),
            requirements = types.iter().map(|t| t.node_count()).sum::<usize>(),
            "Export scope resolved"
        );
        summary.types = types.len();

        let ctx = ExportContext::new(
            ExportOptions::from_config(&self.config.export),
            project,
            baseline,
            scope,
            self.source.info(),
            self.source.image_store(),
            &self.config.export.output_dir,
        )
        .with_progress(self.progress.clone());

        let report = self.run_worker(format, ctx, types).await?;
        let ctx = report.ctx;

        summary.outcome = match report.result {
            Ok(_) => ExportOutcome::Completed,
            Err(ReqportError::LimitReached { limit }) => {
                tracing::warn!(limit, "Export limit reached, partial output kept");
                ExportOutcome::LimitReached
            }
            Err(ReqportError::Cancelled) => {
                tracing::warn!("Export cancelled");
                ExportOutcome::Cancelled
            }
            Err(e) => {
                log_error_with_context!(&e, "Export failed");
                return Err(e);
            }
        };

        summary.exported = ctx.exported_count();
        summary.first_level = ctx.first_level_count();
        summary.skipped_traces = ctx.skipped_traces();
        summary.dropped_images = ctx.dropped_images();
        summary.output_path = report.output_path;

        if format.is_archive() && summary.outcome != ExportOutcome::Cancelled {
            if let Some(reqif_path) = &summary.output_path {
                match package_archive(reqif_path, ctx.auxiliary_files()) {
                    Ok(archive_path) => summary.archive_path = Some(archive_path),
                    Err(e) => {
                        log_error_with_context!(&e, "Failed to package archive");
                        summary.add_error(
                            ExportError::new(ExportErrorType::Packaging, e.to_string())
                                .with_context(reqif_path.display().to_string()),
                        );
                    }
                }
            }
        }

        let duration = start_time.elapsed();
        summary = summary.with_duration(duration);
        log_export_complete!(summary.exported, duration);
        summary.log_summary();

        Ok(summary)
    }

    async fn fetch_types(
        &self,
        project: &Project,
        baseline: &Baseline,
        scope: &ExportScope,
    ) -> Result<Vec<ExportType>> {
        let names: Vec<String> = match scope {
            ExportScope::SingleType(name) => vec![name.clone()],
            ExportScope::Project => self
                .source
                .list_requirement_types(project, baseline)
                .await?
                .into_iter()
                .map(|t| t.name)
                .collect(),
        };

        let mut types = Vec::with_capacity(names.len());
        for name in &names {
            let contents = self.source.fetch_type(project, baseline, name).await?;
            tracing::debug!(
                requirement_type = %name,
                requirements = contents.node_count(),
                "Fetched requirement type"
            );
            types.push(ExportType::from_contents(contents)?);
        }
        Ok(types)
    }

    async fn run_worker(
        &self,
        format: OutputFormat,
        mut ctx: ExportContext,
        types: Vec<ExportType>,
    ) -> Result<WorkerReport> {
        let cancel = CancelSignal::new(self.shutdown.clone());

        tokio::task::spawn_blocking(move || {
            let mut writer = create_writer(format);
            let mut pipeline = Pipeline::new(writer.as_mut());
            let result = pipeline.run(&mut ctx, &types, &cancel);
            let output_path = pipeline.output_path().map(PathBuf::from);
            WorkerReport {
                ctx,
                output_path,
                result,
            }
        })
        .await
        .map_err(|e| ReqportError::Other(format!("Export worker failed: {e}")))
    }
}
