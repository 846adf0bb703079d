//! Spreadsheet export writer

use crate::adapters::spreadsheet::sheet::{fit_cell, sheet_name, RowModel, SheetModel};
use crate::adapters::writer::{ExportWriter, OutputFormat};
use crate::core::export::context::{ExportContext, ExportType};
use crate::core::transform::{plaintext, resolve};
use crate::core::walk::{for_each_node, Admission};
use crate::domain::context::ResultExt;
use crate::domain::{AttributeDefinition, ReqportError, RequirementNode, Result, Trace, TraceEndpoint};
use rust_xlsxwriter::Workbook;
use std::collections::HashSet;
use std::fs::File;
use std::path::PathBuf;

/// Writes one workbook per run, one sheet per requirement type
///
/// Rows are buffered per sheet and the workbook is written on close (or on
/// abort, so a run stopped by the limit still leaves a readable file).
#[derive(Default)]
pub struct SpreadsheetWriter {
    path: Option<PathBuf>,
    sheets: Vec<SheetModel>,
}

impl SpreadsheetWriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn save(&mut self) -> Result<()> {
        let Some(path) = self.path.take() else {
            return Ok(());
        };
        let mut workbook = Workbook::new();
        for sheet in &self.sheets {
            workbook.push_worksheet(sheet.render()?);
        }
        workbook
            .save(&path)
            .with_context(|| format!("Cannot write {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            sheets = self.sheets.len(),
            "Workbook written"
        );
        Ok(())
    }
}

impl ExportWriter for SpreadsheetWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Spreadsheet
    }

    fn open(&mut self, ctx: &mut ExportContext) -> Result<PathBuf> {
        std::fs::create_dir_all(ctx.output_dir()).map_err(|e| {
            ReqportError::Format(format!(
                "Cannot create output directory {}: {e}",
                ctx.output_dir().display()
            ))
        })?;
        let path = ctx.output_dir().join(format!(
            "{}.{}",
            ctx.base_file_name(),
            OutputFormat::Spreadsheet.extension()
        ));
        // Fail now rather than after the whole tree was walked.
        File::create(&path).map_err(|e| {
            ReqportError::Format(format!("Cannot create {}: {e}", path.display()))
        })?;

        tracing::info!(path = %path.display(), "Workbook opened");
        self.path = Some(path.clone());
        self.sheets.clear();
        Ok(path)
    }

    fn export_definitions(&mut self, _ctx: &mut ExportContext, types: &[ExportType]) -> Result<()> {
        let mut used = HashSet::new();
        self.sheets = types
            .iter()
            .map(|export_type| {
                let name = sheet_name(export_type.name(), &mut used);
                let attributes = export_type
                    .requirement_type
                    .attributes
                    .iter()
                    .map(|a| a.name.clone());
                SheetModel::new(name, attributes)
            })
            .collect();
        Ok(())
    }

    fn export_requirements(
        &mut self,
        ctx: &mut ExportContext,
        types: &[ExportType],
    ) -> Result<()> {
        for (export_type, sheet) in types.iter().zip(self.sheets.iter_mut()) {
            let attributes = &export_type.requirement_type.attributes;
            for_each_node(
                ctx,
                &export_type.roots,
                &export_type.tag,
                Admission::Count,
                |ctx, node, id, depth| {
                    let mut cells = vec![
                        node.name.clone(),
                        id.to_string(),
                        node.status.clone(),
                        node.priority.clone(),
                        node.owner
                            .as_ref()
                            .map(|p| p.display_name())
                            .unwrap_or_default(),
                        plaintext::cell_text(&node.description),
                        trace_summary(ctx, &node.traces_from, Direction::Incoming),
                        trace_summary(ctx, &node.traces_to, Direction::Outgoing),
                    ];
                    for definition in attributes {
                        cells.push(attribute_cell(node, definition)?);
                    }
                    let cells = cells
                        .into_iter()
                        .zip(sheet.titles.iter())
                        .map(|(text, title)| fit_cell(text, &sheet.name, title))
                        .collect();
                    sheet.rows.push(RowModel {
                        indent: depth.min(u8::MAX as usize) as u8,
                        cells,
                    });
                    Ok(())
                },
            )?;
            tracing::debug!(sheet = %sheet.name, rows = sheet.rows.len(), "Sheet rows collected");
        }
        Ok(())
    }

    // Traces are summarized in the requirement rows.
    fn export_traces(&mut self, _ctx: &mut ExportContext, _types: &[ExportType]) -> Result<()> {
        Ok(())
    }

    fn export_specifications(
        &mut self,
        _ctx: &mut ExportContext,
        _types: &[ExportType],
    ) -> Result<()> {
        Ok(())
    }

    fn close(&mut self, _ctx: &mut ExportContext) -> Result<()> {
        if self.path.is_none() {
            return Err(ReqportError::Format(
                "Workbook destination is not open".to_string(),
            ));
        }
        self.save()
    }

    fn abort(&mut self, _ctx: &mut ExportContext) -> Result<()> {
        if self.path.is_some() {
            tracing::warn!(path = ?self.path, "Saving partial workbook");
        }
        self.save()
    }
}

fn attribute_cell(node: &RequirementNode, definition: &AttributeDefinition) -> Result<String> {
    match node.value_of(&definition.name) {
        Some(value) => Ok(resolve(definition, value)?.joined("\n")),
        None => Ok(String::new()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Incoming,
    Outgoing,
}

/// One line per trace: `{id} | {project}`
///
/// Incoming traces from another project use `||`. Deleted endpoints are left
/// out; external objects show their description.
fn trace_summary(ctx: &ExportContext, traces: &[Trace], direction: Direction) -> String {
    traces
        .iter()
        .filter_map(|trace| match &trace.endpoint {
            TraceEndpoint::Requirement(target) => {
                let foreign = target.project != ctx.project.name;
                let separator = if foreign && direction == Direction::Incoming {
                    "||"
                } else {
                    "|"
                };
                Some(format!("{} {separator} {}", target.node_id(), target.project))
            }
            TraceEndpoint::External { description } => Some(description.clone()),
            TraceEndpoint::Deleted => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}
