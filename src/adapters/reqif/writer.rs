//! ReqIF export writer

use crate::adapters::reqif::catalog::{write_datatypes, write_spec_types};
use crate::adapters::reqif::hierarchy::write_specifications;
use crate::adapters::reqif::objects::write_spec_objects;
use crate::adapters::reqif::relations::write_spec_relations;
use crate::adapters::reqif::xml::XmlSink;
use crate::adapters::writer::{ExportWriter, OutputFormat};
use crate::core::export::context::{ExportContext, ExportType};
use crate::core::transform::format_timestamp;
use crate::domain::{ReqportError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

const REQIF_NAMESPACE: &str = "http://www.omg.org/spec/ReqIF/20110401/reqif.xsd";
const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";
const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
const COMMON_NAMESPACE: &str = "http://www.prostep.org/reqif";

type FileSink = XmlSink<BufWriter<File>>;

/// Writes one ReqIF document per run
pub struct ReqifWriter {
    format: OutputFormat,
    sink: Option<FileSink>,
    path: Option<PathBuf>,
}

impl ReqifWriter {
    /// `format` is `Reqif` or `Reqifz`; both produce the same document
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            sink: None,
            path: None,
        }
    }

    fn sink(&mut self) -> Result<&mut FileSink> {
        self.sink
            .as_mut()
            .ok_or_else(|| ReqportError::Format("ReqIF destination is not open".to_string()))
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(mut sink) = self.sink.take() {
            sink.close_all()?;
            let mut inner = sink.into_inner();
            inner.write_all(b"\n")?;
            inner.flush().map_err(|e| {
                ReqportError::Format(format!("Failed to flush ReqIF file: {e}"))
            })?;
        }
        Ok(())
    }
}

fn write_header(sink: &mut FileSink, ctx: &ExportContext) -> Result<()> {
    let schema_location = format!("{REQIF_NAMESPACE} {REQIF_NAMESPACE}");
    sink.declaration()?;
    sink.start(
        "REQ-IF",
        &[
            ("xmlns", REQIF_NAMESPACE),
            ("xmlns:xsi", XSI_NAMESPACE),
            ("xmlns:reqif", REQIF_NAMESPACE),
            ("xmlns:reqif-xhtml", XHTML_NAMESPACE),
            ("xmlns:reqif-common", COMMON_NAMESPACE),
            ("xsi:schemaLocation", schema_location.as_str()),
            ("xml:lang", "en"),
        ],
    )?;

    let identifier = format!("id-{}", uuid::Uuid::new_v4());
    sink.start("THE-HEADER", &[])?;
    sink.start("REQ-IF-HEADER", &[("IDENTIFIER", identifier.as_str())])?;
    sink.text_element(
        "COMMENT",
        &format!("Export from {} by {}", ctx.source.tool, ctx.source.user),
    )?;
    sink.text_element("CREATION-TIME", &format_timestamp(&ctx.created_at))?;
    sink.text_element("REPOSITORY-ID", &ctx.source.repository_id)?;
    sink.text_element(
        "REQ-IF-TOOL-ID",
        &format!("reqport {}", env!("CARGO_PKG_VERSION")),
    )?;
    sink.text_element("REQ-IF-VERSION", "1.0")?;
    sink.text_element("SOURCE-TOOL-ID", &ctx.source.tool)?;
    sink.text_element("TITLE", &ctx.title())?;
    sink.end()?;
    sink.end()?;

    sink.start("CORE-CONTENT", &[])?;
    sink.start("REQ-IF-CONTENT", &[])
}

impl ExportWriter for ReqifWriter {
    fn format(&self) -> OutputFormat {
        self.format
    }

    fn open(&mut self, ctx: &mut ExportContext) -> Result<PathBuf> {
        std::fs::create_dir_all(ctx.output_dir()).map_err(|e| {
            ReqportError::Format(format!(
                "Cannot create output directory {}: {e}",
                ctx.output_dir().display()
            ))
        })?;
        let path = ctx
            .output_dir()
            .join(format!("{}.{}", ctx.base_file_name(), self.format.extension()));
        let file = File::create(&path).map_err(|e| {
            ReqportError::Format(format!("Cannot create {}: {e}", path.display()))
        })?;

        let mut sink = XmlSink::new(BufWriter::new(file));
        write_header(&mut sink, ctx)?;
        tracing::info!(path = %path.display(), "ReqIF file opened");

        self.sink = Some(sink);
        self.path = Some(path.clone());
        Ok(path)
    }

    fn export_definitions(&mut self, ctx: &mut ExportContext, types: &[ExportType]) -> Result<()> {
        let sink = self.sink()?;
        write_datatypes(sink, ctx, types)?;
        write_spec_types(sink, ctx, types)
    }

    fn export_requirements(
        &mut self,
        ctx: &mut ExportContext,
        types: &[ExportType],
    ) -> Result<()> {
        write_spec_objects(self.sink()?, ctx, types)
    }

    fn export_traces(&mut self, ctx: &mut ExportContext, types: &[ExportType]) -> Result<()> {
        write_spec_relations(self.sink()?, ctx, types)
    }

    fn export_specifications(
        &mut self,
        ctx: &mut ExportContext,
        types: &[ExportType],
    ) -> Result<()> {
        write_specifications(self.sink()?, ctx, types)
    }

    fn close(&mut self, _ctx: &mut ExportContext) -> Result<()> {
        if self.sink.is_none() {
            return Err(ReqportError::Format(
                "ReqIF destination is not open".to_string(),
            ));
        }
        self.finish()?;
        if let Some(path) = &self.path {
            tracing::info!(path = %path.display(), "ReqIF file closed");
        }
        Ok(())
    }

    fn abort(&mut self, _ctx: &mut ExportContext) -> Result<()> {
        if self.sink.is_some() {
            tracing::warn!(path = ?self.path, "Closing partial ReqIF file");
        }
        self.finish()
    }
}
