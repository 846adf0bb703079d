//! SPEC-OBJECTS region: one spec object per exported requirement

use crate::adapters::reqif::catalog::{
    attribute_id, enum_value_id, spec_object_type_id, uda_attributes, SpecKind, FOLDER,
    FUNCTIONAL, PRIORITY, STATUS, TYPE,
};
use crate::adapters::reqif::xml::XmlSink;
use crate::core::export::context::{ExportContext, ExportType};
use crate::core::transform::{format_timestamp, plaintext, resolve, sanitize, Resolved};
use crate::core::walk::{walk, Admission, NodeVisitor};
use crate::domain::{AttributeDefinition, AttributeKind, NodeId, RequirementNode, Result};
use std::io::Write;

/// Writes the SPEC-OBJECTS region, admitting every node against the limit
pub fn write_spec_objects<W: Write>(
    sink: &mut XmlSink<W>,
    ctx: &mut ExportContext,
    types: &[ExportType],
) -> Result<()> {
    sink.start("SPEC-OBJECTS", &[])?;
    for export_type in types {
        let udas = uda_attributes(export_type, ctx.options.include_type_attribute);
        let mut visitor = SpecObjectWriter {
            sink: &mut *sink,
            tag: export_type.tag.as_str(),
            udas,
        };
        walk(
            ctx,
            &export_type.roots,
            &export_type.tag,
            Admission::Count,
            &mut visitor,
        )?;
        tracing::debug!(
            requirement_type = %export_type.name(),
            exported = ctx.exported_count(),
            "Spec objects written"
        );
    }
    sink.end()
}

struct SpecObjectWriter<'a, W: Write> {
    sink: &'a mut XmlSink<W>,
    tag: &'a str,
    udas: Vec<&'a AttributeDefinition>,
}

impl<W: Write> NodeVisitor for SpecObjectWriter<'_, W> {
    fn enter(
        &mut self,
        ctx: &mut ExportContext,
        node: &RequirementNode,
        id: &NodeId,
        _depth: usize,
    ) -> Result<()> {
        let last_change = node
            .modified()
            .map(|r| format_timestamp(&r.timestamp))
            .unwrap_or_else(|| format_timestamp(&ctx.created_at));

        self.sink.start(
            "SPEC-OBJECT",
            &[
                ("IDENTIFIER", id.as_str()),
                ("LAST-CHANGE", last_change.as_str()),
                ("LONG-NAME", node.name.as_str()),
            ],
        )?;
        self.sink.start("TYPE", &[])?;
        self.sink
            .text_element("SPEC-OBJECT-TYPE-REF", &spec_object_type_id(self.tag))?;
        self.sink.end()?;

        self.sink.start("VALUES", &[])?;
        self.write_system_values(ctx, node, id)?;
        let udas = self.udas.clone();
        for definition in udas {
            if let Some(value) = node.value_of(&definition.name) {
                let resolved = resolve(definition, value)?;
                self.write_uda_value(definition, &resolved)?;
            }
        }
        self.sink.end()?; // VALUES
        self.sink.end() // SPEC-OBJECT
    }
}

impl<W: Write> SpecObjectWriter<'_, W> {
    fn write_system_values(
        &mut self,
        ctx: &mut ExportContext,
        node: &RequirementNode,
        id: &NodeId,
    ) -> Result<()> {
        self.write_value(SpecKind::String, "ReqIF.Name", &node.name)?;
        self.write_value(SpecKind::String, "ReqIF.ForeignID", id.as_str())?;
        self.write_value(
            SpecKind::String,
            "ReqIF.ForeignRevision",
            &node.version.to_string(),
        )?;
        if let Some(modified) = node.modified() {
            self.write_value(
                SpecKind::Date,
                "ReqIF.ForeignModifiedAt",
                &format_timestamp(&modified.timestamp),
            )?;
            self.write_value(SpecKind::String, "ReqIF.ForeignModifiedBy", &modified.actor)?;
        }
        if let Some(created) = node.created() {
            self.write_value(
                SpecKind::Date,
                "ReqIF.ForeignCreatedAt",
                &format_timestamp(&created.timestamp),
            )?;
            self.write_value(SpecKind::String, "ReqIF.ForeignCreatedBy", &created.actor)?;
        }
        if let Some(owner) = &node.owner {
            self.write_value(SpecKind::String, "ReqIF.ForeignOwner", &owner.display_name())?;
        }
        self.write_enum_value(STATUS, &[node.status.as_str()])?;
        self.write_enum_value(PRIORITY, &[node.priority.as_str()])?;
        if ctx.options.include_type_attribute {
            let kind = if node.has_children() { FOLDER } else { FUNCTIONAL };
            self.write_enum_value(TYPE, &[kind])?;
        }

        let content = if ctx.options.plaintext {
            plaintext::escaped_text(&node.description)
        } else {
            sanitize(ctx, &node.description)?
        };
        self.write_xhtml_value("ReqIF.Description", &content)
    }

    fn write_uda_value(
        &mut self,
        definition: &AttributeDefinition,
        resolved: &Resolved,
    ) -> Result<()> {
        let kind = match definition.kind {
            AttributeKind::Text { .. } => SpecKind::String,
            AttributeKind::Boolean => SpecKind::Boolean,
            AttributeKind::Date => SpecKind::Date,
            AttributeKind::Integer { .. } => SpecKind::Integer,
            AttributeKind::Real { .. } => SpecKind::Real,
            AttributeKind::Enumeration { .. } => {
                let labels: Vec<&str> = match resolved {
                    Resolved::Scalar(label) => vec![label.as_str()],
                    Resolved::List(labels) => labels.iter().map(String::as_str).collect(),
                };
                return self.write_enum_value(&definition.name, &labels);
            }
        };
        self.write_value(kind, &definition.name, &resolved.joined("\n"))
    }

    /// `ATTRIBUTE-VALUE-{KIND}` with a `THE-VALUE` attribute
    fn write_value(&mut self, kind: SpecKind, name: &str, value: &str) -> Result<()> {
        let suffix = kind.element_suffix();
        self.sink.start(
            &format!("ATTRIBUTE-VALUE-{suffix}"),
            &[("THE-VALUE", value)],
        )?;
        self.write_definition_ref(suffix, name)?;
        self.sink.end()
    }

    /// Enumeration value; empty labels are not referenced
    fn write_enum_value(&mut self, name: &str, labels: &[&str]) -> Result<()> {
        self.sink.start("ATTRIBUTE-VALUE-ENUMERATION", &[])?;
        self.write_definition_ref("ENUMERATION", name)?;
        self.sink.start("VALUES", &[])?;
        for label in labels.iter().filter(|l| !l.is_empty()) {
            self.sink
                .text_element("ENUM-VALUE-REF", &enum_value_id(name, label))?;
        }
        self.sink.end()?;
        self.sink.end()
    }

    /// XHTML value; `content` is already escaped markup
    fn write_xhtml_value(&mut self, name: &str, content: &str) -> Result<()> {
        self.sink.start("ATTRIBUTE-VALUE-XHTML", &[])?;
        self.sink.start("THE-VALUE", &[])?;
        self.sink
            .raw(&format!("<reqif-xhtml:div>{content}</reqif-xhtml:div>"))?;
        self.sink.end()?;
        self.write_definition_ref("XHTML", name)?;
        self.sink.end()
    }

    fn write_definition_ref(&mut self, suffix: &str, name: &str) -> Result<()> {
        self.sink.start("DEFINITION", &[])?;
        self.sink.text_element(
            &format!("ATTRIBUTE-DEFINITION-{suffix}-REF"),
            &attribute_id(self.tag, name),
        )?;
        self.sink.end()
    }
}
