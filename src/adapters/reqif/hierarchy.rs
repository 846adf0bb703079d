//! SPECIFICATIONS region: one ordered hierarchy per requirement type
//!
//! The hierarchy references spec objects by identifier; it never repeats
//! their content.

use crate::adapters::reqif::catalog::specification_type_id;
use crate::adapters::reqif::xml::XmlSink;
use crate::core::export::context::{ExportContext, ExportType};
use crate::core::transform::format_timestamp;
use crate::core::walk::{walk, Admission, NodeVisitor};
use crate::domain::{NodeId, RequirementNode, Result};
use std::io::Write;

pub fn write_specifications<W: Write>(
    sink: &mut XmlSink<W>,
    ctx: &mut ExportContext,
    types: &[ExportType],
) -> Result<()> {
    let now = format_timestamp(&ctx.created_at);
    sink.start("SPECIFICATIONS", &[])?;

    for export_type in types {
        let tag = export_type.tag.as_str();
        let ty = &export_type.requirement_type;
        sink.start(
            "SPECIFICATION",
            &[
                ("DESC", ty.description.as_str()),
                ("IDENTIFIER", format!("{tag}-spec").as_str()),
                ("LAST-CHANGE", now.as_str()),
                ("LONG-NAME", ty.name.as_str()),
            ],
        )?;
        sink.start("TYPE", &[])?;
        sink.text_element("SPECIFICATION-TYPE-REF", &specification_type_id(tag))?;
        sink.end()?;

        if !export_type.roots.is_empty() {
            sink.start("CHILDREN", &[])?;
            let mut visitor = HierarchyWriter {
                sink: &mut *sink,
                now: &now,
            };
            walk(
                ctx,
                &export_type.roots,
                &export_type.tag,
                Admission::Free,
                &mut visitor,
            )?;
            sink.end()?;
        }
        sink.end()?;
    }

    sink.end()
}

struct HierarchyWriter<'a, W: Write> {
    sink: &'a mut XmlSink<W>,
    now: &'a str,
}

impl<W: Write> NodeVisitor for HierarchyWriter<'_, W> {
    fn enter(
        &mut self,
        _ctx: &mut ExportContext,
        node: &RequirementNode,
        id: &NodeId,
        _depth: usize,
    ) -> Result<()> {
        self.sink.start(
            "SPEC-HIERARCHY",
            &[
                ("IDENTIFIER", format!("{id}-node").as_str()),
                ("LAST-CHANGE", self.now),
            ],
        )?;
        self.sink.start("OBJECT", &[])?;
        self.sink.text_element("SPEC-OBJECT-REF", id.as_str())?;
        self.sink.end()?;
        if node.has_children() {
            self.sink.start("CHILDREN", &[])?;
        }
        Ok(())
    }

    fn leave(
        &mut self,
        _ctx: &mut ExportContext,
        node: &RequirementNode,
        _id: &NodeId,
        _depth: usize,
    ) -> Result<()> {
        if node.has_children() {
            self.sink.end()?; // CHILDREN
        }
        self.sink.end() // SPEC-HIERARCHY
    }
}
