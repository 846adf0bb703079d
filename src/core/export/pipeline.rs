//! Phase sequencing for one export run
//!
//! ```text
//! Idle -> Opened -> DefinitionsDone -> ObjectsDone -> TracesDone
//!      -> SpecificationsDone -> Closed
//! ```
//!
//! Any error after the destination is opened moves the run to `Aborted`:
//! the writer's `abort` closes what is open, then the error is returned.

use crate::adapters::writer::ExportWriter;
use crate::core::export::context::{ExportContext, ExportType};
use crate::core::export::progress;
use crate::domain::{ReqportError, Result};
use crate::{log_error_with_context, log_phase_start};
use std::path::{Path, PathBuf};
use tokio::sync::watch;

/// Where a run currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Opened,
    DefinitionsDone,
    ObjectsDone,
    TracesDone,
    SpecificationsDone,
    Closed,
    Aborted,
}

/// Cancellation flag observed between phases
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Option<watch::Receiver<bool>>);

impl CancelSignal {
    pub fn new(receiver: watch::Receiver<bool>) -> Self {
        Self(Some(receiver))
    }

    /// A signal that never fires
    pub fn never() -> Self {
        Self(None)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(ReqportError::Cancelled);
        }
        Ok(())
    }
}

/// Drives a writer through the phases of one run
pub struct Pipeline<'w> {
    writer: &'w mut dyn ExportWriter,
    state: RunState,
    output_path: Option<PathBuf>,
}

impl<'w> Pipeline<'w> {
    pub fn new(writer: &'w mut dyn ExportWriter) -> Self {
        Self {
            writer,
            state: RunState::Idle,
            output_path: None,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Path of the destination once it was opened, also after an abort
    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Runs every phase in order
    ///
    /// # Errors
    ///
    /// Returns the first phase error, including [`ReqportError::LimitReached`]
    /// and [`ReqportError::Cancelled`]. The destination has been aborted by
    /// then. An error from `abort` itself is logged, not returned.
    pub fn run(
        &mut self,
        ctx: &mut ExportContext,
        types: &[ExportType],
        cancel: &CancelSignal,
    ) -> Result<PathBuf> {
        match self.run_phases(ctx, types, cancel) {
            Ok(path) => Ok(path),
            Err(err) => {
                if self.state != RunState::Idle {
                    if let Err(abort_err) = self.writer.abort(ctx) {
                        log_error_with_context!(&abort_err, "Failed to close partial output");
                    }
                }
                self.state = RunState::Aborted;
                Err(err)
            }
        }
    }

    fn run_phases(
        &mut self,
        ctx: &mut ExportContext,
        types: &[ExportType],
        cancel: &CancelSignal,
    ) -> Result<PathBuf> {
        ctx.progress.set(0);

        cancel.check()?;
        log_phase_start!("open", ctx.project);
        let path = self.writer.open(ctx)?;
        self.output_path = Some(path.clone());
        self.advance(ctx, RunState::Opened, progress::OPENED);

        cancel.check()?;
        log_phase_start!("definitions", ctx.project);
        self.writer.export_definitions(ctx, types)?;
        self.advance(ctx, RunState::DefinitionsDone, progress::DEFINITIONS_DONE);

        cancel.check()?;
        log_phase_start!("requirements", ctx.project);
        ctx.set_first_level_total(types.iter().map(|t| t.roots.len()).sum());
        self.writer.export_requirements(ctx, types)?;
        self.advance(
            ctx,
            RunState::ObjectsDone,
            progress::DEFINITIONS_DONE + progress::OBJECTS_SPAN,
        );

        cancel.check()?;
        log_phase_start!("traces", ctx.project);
        self.writer.export_traces(ctx, types)?;
        self.advance(ctx, RunState::TracesDone, progress::TRACES_DONE);

        cancel.check()?;
        log_phase_start!("specifications", ctx.project);
        self.writer.export_specifications(ctx, types)?;
        self.advance(
            ctx,
            RunState::SpecificationsDone,
            progress::SPECIFICATIONS_DONE,
        );

        self.writer.close(ctx)?;
        self.advance(ctx, RunState::Closed, progress::CLOSED);
        Ok(path)
    }

    fn advance(&mut self, ctx: &ExportContext, state: RunState, percent: u8) {
        tracing::debug!(state = ?state, progress = percent, "Export phase finished");
        self.state = state;
        ctx.progress.set(percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::source::{InMemoryImageStore, SourceInfo};
    use crate::adapters::writer::OutputFormat;
    use crate::core::export::context::ExportOptions;
    use crate::core::walk::{for_each_node, Admission};
    use crate::domain::{
        Baseline, ExportScope, Project, RequirementNode, RequirementType, TypeTag,
    };
    use std::sync::{Arc, Mutex};

    /// Records the calls it receives
    struct RecordingWriter {
        calls: Arc<Mutex<Vec<&'static str>>>,
        fail_open: bool,
    }

    impl RecordingWriter {
        fn push(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl ExportWriter for RecordingWriter {
        fn format(&self) -> OutputFormat {
            OutputFormat::Reqif
        }

        fn open(&mut self, _ctx: &mut ExportContext) -> Result<PathBuf> {
            self.push("open");
            if self.fail_open {
                return Err(ReqportError::Format("read-only".to_string()));
            }
            Ok(PathBuf::from("out.reqif"))
        }

        fn export_definitions(&mut self, _: &mut ExportContext, _: &[ExportType]) -> Result<()> {
            self.push("definitions");
            Ok(())
        }

        fn export_requirements(
            &mut self,
            ctx: &mut ExportContext,
            types: &[ExportType],
        ) -> Result<()> {
            self.push("requirements");
            for t in types {
                for_each_node(ctx, &t.roots, &t.tag, Admission::Count, |_, _, _, _| Ok(()))?;
            }
            Ok(())
        }

        fn export_traces(&mut self, _: &mut ExportContext, _: &[ExportType]) -> Result<()> {
            self.push("traces");
            Ok(())
        }

        fn export_specifications(&mut self, _: &mut ExportContext, _: &[ExportType]) -> Result<()> {
            self.push("specifications");
            Ok(())
        }

        fn close(&mut self, _: &mut ExportContext) -> Result<()> {
            self.push("close");
            Ok(())
        }

        fn abort(&mut self, _: &mut ExportContext) -> Result<()> {
            self.push("abort");
            Ok(())
        }
    }

    fn context(limit: usize) -> ExportContext {
        ExportContext::new(
            ExportOptions {
                limit,
                ..ExportOptions::default()
            },
            Project::new("Demo"),
            Baseline::current(),
            ExportScope::Project,
            SourceInfo::default(),
            Arc::new(InMemoryImageStore::new()),
            ".",
        )
    }

    fn types() -> Vec<ExportType> {
        let mut f1 = RequirementNode::new(1, "Login");
        f1.children.push(RequirementNode::new(2, "Logout"));
        vec![ExportType {
            requirement_type: RequirementType {
                name: "Feature".to_string(),
                raw_tag: "F".to_string(),
                description: String::new(),
                attributes: Vec::new(),
            },
            tag: TypeTag::new("F").unwrap(),
            roots: vec![f1],
        }]
    }

    fn writer(fail_open: bool) -> (RecordingWriter, Arc<Mutex<Vec<&'static str>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            RecordingWriter {
                calls: calls.clone(),
                fail_open,
            },
            calls,
        )
    }

    #[test]
    fn test_phases_run_in_order() {
        let (mut writer, calls) = writer(false);
        let mut ctx = context(10);
        let mut pipeline = Pipeline::new(&mut writer);

        let path = pipeline.run(&mut ctx, &types(), &CancelSignal::never()).unwrap();

        assert_eq!(path, PathBuf::from("out.reqif"));
        assert_eq!(pipeline.state(), RunState::Closed);
        assert_eq!(ctx.progress.get(), 100);
        assert_eq!(ctx.exported_count(), 2);
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["open", "definitions", "requirements", "traces", "specifications", "close"]
        );
    }

    #[test]
    fn test_limit_aborts_output() {
        let (mut writer, calls) = writer(false);
        let mut ctx = context(1);
        let mut pipeline = Pipeline::new(&mut writer);

        let err = pipeline
            .run(&mut ctx, &types(), &CancelSignal::never())
            .unwrap_err();

        assert!(err.is_limit_reached());
        assert_eq!(pipeline.state(), RunState::Aborted);
        assert_eq!(pipeline.output_path(), Some(Path::new("out.reqif")));
        assert_eq!(
            *calls.lock().unwrap(),
            vec!["open", "definitions", "requirements", "abort"]
        );
    }

    #[test]
    fn test_failed_open_is_not_aborted() {
        let (mut writer, calls) = writer(true);
        let mut ctx = context(10);
        let mut pipeline = Pipeline::new(&mut writer);

        let err = pipeline
            .run(&mut ctx, &types(), &CancelSignal::never())
            .unwrap_err();

        assert!(matches!(err, ReqportError::Format(_)));
        assert_eq!(*calls.lock().unwrap(), vec!["open"]);
        assert!(pipeline.output_path().is_none());
    }

    #[test]
    fn test_cancel_before_start() {
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let (mut writer, calls) = writer(false);
        let mut ctx = context(10);
        let mut pipeline = Pipeline::new(&mut writer);

        let err = pipeline
            .run(&mut ctx, &types(), &CancelSignal::new(rx))
            .unwrap_err();

        assert!(matches!(err, ReqportError::Cancelled));
        assert!(calls.lock().unwrap().is_empty());
    }
}
