//! Data-type and spec-type catalog
//!
//! Identifiers are derived from display names through [`xml_name`], so the
//! same attribute name always maps to the same data type. Every data type is
//! registered in the run context and written at most once per run.

use crate::adapters::reqif::xml::XmlSink;
use crate::core::export::context::{ExportContext, ExportType};
use crate::core::transform::format_timestamp;
use crate::core::walk::{for_each_node, Admission};
use crate::domain::{xml_name, AttributeDefinition, AttributeKind, Result};
use std::collections::HashSet;
use std::io::Write;

pub const STRING_DATATYPE: &str = "String-datatype";
pub const XHTML_DATATYPE: &str = "XHTML-datatype";
pub const BOOLEAN_DATATYPE: &str = "Boolean-datatype";
pub const DATE_DATATYPE: &str = "Date-datatype";

/// Maximum length of system string values
const STRING_MAX_LENGTH: u32 = 255;

pub const STATUS: &str = "Status";
pub const PRIORITY: &str = "Priority";
pub const TYPE: &str = "Type";
pub const FOLDER: &str = "Folder";
pub const FUNCTIONAL: &str = "Functional";

pub const TRACE_TYPE: &str = "trace";
pub const SUSPECT_ATTRIBUTE: &str = "Suspect-attribute";
const RELATION_GROUP_TYPE: &str = "requirementType-to-requirementType";

/// Value kind of a spec attribute, naming its ReqIF element suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecKind {
    String,
    Xhtml,
    Boolean,
    Date,
    Integer,
    Real,
    Enumeration,
}

impl SpecKind {
    pub fn element_suffix(&self) -> &'static str {
        match self {
            SpecKind::String => "STRING",
            SpecKind::Xhtml => "XHTML",
            SpecKind::Boolean => "BOOLEAN",
            SpecKind::Date => "DATE",
            SpecKind::Integer => "INTEGER",
            SpecKind::Real => "REAL",
            SpecKind::Enumeration => "ENUMERATION",
        }
    }

    fn of(kind: &AttributeKind) -> Self {
        match kind {
            AttributeKind::Text { .. } => SpecKind::String,
            AttributeKind::Boolean => SpecKind::Boolean,
            AttributeKind::Date => SpecKind::Date,
            AttributeKind::Integer { .. } => SpecKind::Integer,
            AttributeKind::Real { .. } => SpecKind::Real,
            AttributeKind::Enumeration { .. } => SpecKind::Enumeration,
        }
    }
}

/// Built-in attributes of every spec-object type, in output order
pub fn system_attributes(include_type: bool) -> Vec<(&'static str, &'static str, SpecKind)> {
    let mut attributes = vec![
        ("ReqIF.Name", "Requirement name.", SpecKind::String),
        ("ReqIF.ForeignID", "Requirement identifier in the source tool.", SpecKind::String),
        ("ReqIF.ForeignRevision", "Requirement version.", SpecKind::String),
        ("ReqIF.ForeignModifiedAt", "Time of the latest change.", SpecKind::Date),
        ("ReqIF.ForeignModifiedBy", "Author of the latest change.", SpecKind::String),
        ("ReqIF.ForeignCreatedAt", "Creation time.", SpecKind::Date),
        ("ReqIF.ForeignCreatedBy", "Creator of the requirement.", SpecKind::String),
        ("ReqIF.ForeignOwner", "Owner of the requirement.", SpecKind::String),
        (STATUS, "Requirement status.", SpecKind::Enumeration),
        (PRIORITY, "Requirement priority.", SpecKind::Enumeration),
    ];
    if include_type {
        attributes.push((
            TYPE,
            "Folder for requirements with children, Functional otherwise.",
            SpecKind::Enumeration,
        ));
    }
    attributes.push(("ReqIF.Description", "Requirement description.", SpecKind::Xhtml));
    attributes
}

pub fn datatype_id(name: &str) -> String {
    format!("{}-datatype", xml_name(name))
}

/// Identifier of an enumeration value; the empty label maps to `Empty`
pub fn enum_value_id(attribute: &str, label: &str) -> String {
    if label.is_empty() {
        format!("{}-value_Empty", xml_name(attribute))
    } else {
        format!("{}-value_{}", xml_name(attribute), xml_name(label))
    }
}

pub fn attribute_id(tag: &str, name: &str) -> String {
    format!("{tag}-{}-attribute", xml_name(name))
}

pub fn spec_object_type_id(tag: &str) -> String {
    format!("{tag}-type")
}

pub fn specification_type_id(tag: &str) -> String {
    format!("{tag}-list")
}

/// Data type referenced by a user-defined attribute
pub fn uda_datatype_ref(definition: &AttributeDefinition) -> String {
    match definition.kind {
        AttributeKind::Boolean => BOOLEAN_DATATYPE.to_string(),
        AttributeKind::Date => DATE_DATATYPE.to_string(),
        _ => datatype_id(&definition.name),
    }
}

/// User-defined attributes written for a type
///
/// An attribute whose identifier collides with a built-in attribute or an
/// earlier user-defined attribute is left out.
pub fn uda_attributes<'a>(
    export_type: &'a ExportType,
    include_type: bool,
) -> Vec<&'a AttributeDefinition> {
    let mut seen: HashSet<String> = system_attributes(include_type)
        .iter()
        .map(|(name, _, _)| xml_name(name))
        .collect();
    export_type
        .requirement_type
        .attributes
        .iter()
        .filter(|definition| seen.insert(xml_name(&definition.name)))
        .collect()
}

/// Labels in first-seen order, deduplicated by enumeration value identifier
fn distinct_labels(attribute: &str, labels: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    labels
        .into_iter()
        .filter(|label| seen.insert(enum_value_id(attribute, label)))
        .collect()
}

/// Writes the DATATYPES region
pub fn write_datatypes<W: Write>(
    sink: &mut XmlSink<W>,
    ctx: &mut ExportContext,
    types: &[ExportType],
) -> Result<()> {
    let now = format_timestamp(&ctx.created_at);
    let now = now.as_str();
    sink.start("DATATYPES", &[])?;

    if ctx.register_data_type(STRING_DATATYPE) {
        let max = STRING_MAX_LENGTH.to_string();
        sink.empty(
            "DATATYPE-DEFINITION-STRING",
            &[
                ("IDENTIFIER", STRING_DATATYPE),
                ("LONG-NAME", "String"),
                ("LAST-CHANGE", now),
                ("MAX-LENGTH", max.as_str()),
            ],
        )?;
    }
    for (id, kind, long_name) in [
        (XHTML_DATATYPE, "XHTML", "XHTML"),
        (BOOLEAN_DATATYPE, "BOOLEAN", "Boolean"),
        (DATE_DATATYPE, "DATE", "Date"),
    ] {
        if ctx.register_data_type(id) {
            sink.empty(
                &format!("DATATYPE-DEFINITION-{kind}"),
                &[("IDENTIFIER", id), ("LONG-NAME", long_name), ("LAST-CHANGE", now)],
            )?;
        }
    }

    // Status and priority enumerations only carry values actually in use
    let mut statuses = Vec::new();
    let mut priorities = Vec::new();
    for export_type in types {
        for_each_node(ctx, &export_type.roots, &export_type.tag, Admission::Free, |_, node, _, _| {
            if !node.status.is_empty() {
                statuses.push(node.status.clone());
            }
            if !node.priority.is_empty() {
                priorities.push(node.priority.clone());
            }
            Ok(())
        })?;
    }
    write_enumeration(sink, ctx, STATUS, &distinct_labels(STATUS, statuses), now)?;
    write_enumeration(sink, ctx, PRIORITY, &distinct_labels(PRIORITY, priorities), now)?;
    if ctx.options.include_type_attribute {
        let labels = vec![FOLDER.to_string(), FUNCTIONAL.to_string()];
        write_enumeration(sink, ctx, TYPE, &labels, now)?;
    }

    for export_type in types {
        for definition in uda_attributes(export_type, ctx.options.include_type_attribute) {
            write_uda_datatype(sink, ctx, definition, now)?;
        }
    }

    sink.end()
}

fn write_uda_datatype<W: Write>(
    sink: &mut XmlSink<W>,
    ctx: &mut ExportContext,
    definition: &AttributeDefinition,
    now: &str,
) -> Result<()> {
    let id = datatype_id(&definition.name);
    match &definition.kind {
        AttributeKind::Boolean | AttributeKind::Date => Ok(()),
        AttributeKind::Enumeration { entries, .. } => {
            let labels = entries.iter().flatten().map(|entry| entry.label());
            let labels = distinct_labels(&definition.name, labels);
            write_enumeration(sink, ctx, &definition.name, &labels, now)
        }
        _ if !ctx.register_data_type(&id) => {
            tracing::debug!(datatype = %id, "Data type already written");
            Ok(())
        }
        AttributeKind::Text { max_length } => sink.empty(
            "DATATYPE-DEFINITION-STRING",
            &[
                ("IDENTIFIER", id.as_str()),
                ("LONG-NAME", definition.name.as_str()),
                ("LAST-CHANGE", now),
                ("MAX-LENGTH", max_length.to_string().as_str()),
            ],
        ),
        AttributeKind::Integer { min, max } => sink.empty(
            "DATATYPE-DEFINITION-INTEGER",
            &[
                ("IDENTIFIER", id.as_str()),
                ("LONG-NAME", definition.name.as_str()),
                ("LAST-CHANGE", now),
                ("MAX", max.to_string().as_str()),
                ("MIN", min.to_string().as_str()),
            ],
        ),
        AttributeKind::Real { min, max, accuracy } => sink.empty(
            "DATATYPE-DEFINITION-REAL",
            &[
                ("IDENTIFIER", id.as_str()),
                ("LONG-NAME", definition.name.as_str()),
                ("LAST-CHANGE", now),
                ("ACCURACY", accuracy.to_string().as_str()),
                ("MAX", max.to_string().as_str()),
                ("MIN", min.to_string().as_str()),
            ],
        ),
    }
}

fn write_enumeration<W: Write>(
    sink: &mut XmlSink<W>,
    ctx: &mut ExportContext,
    name: &str,
    labels: &[String],
    now: &str,
) -> Result<()> {
    let id = datatype_id(name);
    if !ctx.register_data_type(&id) {
        tracing::debug!(datatype = %id, "Enumeration already written");
        return Ok(());
    }

    sink.start(
        "DATATYPE-DEFINITION-ENUMERATION",
        &[("IDENTIFIER", id.as_str()), ("LONG-NAME", name), ("LAST-CHANGE", now)],
    )?;
    sink.start("SPECIFIED-VALUES", &[])?;
    for (key, label) in labels.iter().enumerate() {
        let value_id = enum_value_id(name, label);
        sink.start(
            "ENUM-VALUE",
            &[
                ("IDENTIFIER", value_id.as_str()),
                ("LAST-CHANGE", now),
                ("LONG-NAME", label.as_str()),
            ],
        )?;
        sink.start("PROPERTIES", &[])?;
        sink.empty(
            "EMBEDDED-VALUE",
            &[("KEY", key.to_string().as_str()), ("OTHER-CONTENT", "")],
        )?;
        sink.end()?;
        sink.end()?;
    }
    sink.end()?;
    sink.end()?;
    tracing::debug!(datatype = %id, values = labels.len(), "Enumeration written");
    Ok(())
}

/// Writes the SPEC-TYPES region
pub fn write_spec_types<W: Write>(
    sink: &mut XmlSink<W>,
    ctx: &ExportContext,
    types: &[ExportType],
) -> Result<()> {
    let now = format_timestamp(&ctx.created_at);
    let now = now.as_str();
    let include_type = ctx.options.include_type_attribute;
    sink.start("SPEC-TYPES", &[])?;

    for export_type in types {
        let tag = export_type.tag.as_str();
        let ty = &export_type.requirement_type;

        sink.start(
            "SPEC-OBJECT-TYPE",
            &[
                ("DESC", ty.description.as_str()),
                ("IDENTIFIER", spec_object_type_id(tag).as_str()),
                ("LAST-CHANGE", now),
                ("LONG-NAME", ty.name.as_str()),
            ],
        )?;
        sink.start("SPEC-ATTRIBUTES", &[])?;
        for (name, desc, kind) in system_attributes(include_type) {
            let datatype = match kind {
                SpecKind::String => STRING_DATATYPE.to_string(),
                SpecKind::Xhtml => XHTML_DATATYPE.to_string(),
                SpecKind::Date => DATE_DATATYPE.to_string(),
                _ => datatype_id(name),
            };
            write_attribute_definition(sink, tag, name, desc, kind, false, &datatype, now)?;
        }
        for definition in uda_attributes(export_type, include_type) {
            let multi_valued = matches!(
                definition.kind,
                AttributeKind::Enumeration { multi_select: true, .. }
            );
            write_attribute_definition(
                sink,
                tag,
                &definition.name,
                &definition.description,
                SpecKind::of(&definition.kind),
                multi_valued,
                &uda_datatype_ref(definition),
                now,
            )?;
        }
        sink.end()?; // SPEC-ATTRIBUTES
        sink.end()?; // SPEC-OBJECT-TYPE

        sink.empty(
            "SPECIFICATION-TYPE",
            &[
                ("DESC", format!("Hierarchy of {} requirements", ty.name).as_str()),
                ("IDENTIFIER", specification_type_id(tag).as_str()),
                ("LAST-CHANGE", now),
                ("LONG-NAME", ty.name.as_str()),
            ],
        )?;
    }

    sink.start(
        "SPEC-RELATION-TYPE",
        &[
            ("DESC", "Trace between two requirements; the suspect flag marks a stale trace."),
            ("IDENTIFIER", TRACE_TYPE),
            ("LAST-CHANGE", now),
            ("LONG-NAME", "Trace from or to"),
        ],
    )?;
    sink.start("SPEC-ATTRIBUTES", &[])?;
    sink.start(
        "ATTRIBUTE-DEFINITION-BOOLEAN",
        &[
            ("DESC", "Suspect status of the trace."),
            ("IDENTIFIER", SUSPECT_ATTRIBUTE),
            ("LAST-CHANGE", now),
            ("LONG-NAME", "Suspect"),
        ],
    )?;
    sink.start("TYPE", &[])?;
    sink.text_element("DATATYPE-DEFINITION-BOOLEAN-REF", BOOLEAN_DATATYPE)?;
    sink.end()?;
    sink.end()?;
    sink.end()?;
    sink.end()?;

    sink.empty(
        "RELATION-GROUP-TYPE",
        &[
            ("DESC", "Traces from one requirement type to another or the same."),
            ("IDENTIFIER", RELATION_GROUP_TYPE),
            ("LAST-CHANGE", now),
            ("LONG-NAME", "requirement type to requirement type"),
        ],
    )?;

    sink.end()
}

#[allow(clippy::too_many_arguments)]
fn write_attribute_definition<W: Write>(
    sink: &mut XmlSink<W>,
    tag: &str,
    name: &str,
    desc: &str,
    kind: SpecKind,
    multi_valued: bool,
    datatype: &str,
    now: &str,
) -> Result<()> {
    let suffix = kind.element_suffix();
    let id = attribute_id(tag, name);
    let mut attrs = vec![
        ("DESC", desc),
        ("IDENTIFIER", id.as_str()),
        ("LAST-CHANGE", now),
        ("LONG-NAME", name),
    ];
    if kind == SpecKind::Enumeration {
        attrs.push(("IS-EDITABLE", "true"));
        attrs.push(("MULTI-VALUED", if multi_valued { "true" } else { "false" }));
    }
    sink.start(&format!("ATTRIBUTE-DEFINITION-{suffix}"), &attrs)?;
    sink.start("TYPE", &[])?;
    sink.text_element(&format!("DATATYPE-DEFINITION-{suffix}-REF"), datatype)?;
    sink.end()?;
    sink.end()
}
