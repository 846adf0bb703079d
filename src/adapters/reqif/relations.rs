//! SPEC-RELATIONS region: one relation per resolvable outgoing trace

use crate::adapters::reqif::catalog::{SUSPECT_ATTRIBUTE, TRACE_TYPE};
use crate::adapters::reqif::xml::XmlSink;
use crate::core::export::context::{ExportContext, ExportType};
use crate::core::transform::format_timestamp;
use crate::core::walk::{for_each_node, Admission};
use crate::domain::{NodeId, Result, Trace, TraceEndpoint};
use std::io::Write;

/// Writes the SPEC-RELATIONS region
///
/// Traces whose target is deleted, external, outside the exported scope or
/// not exported in this run are skipped and counted.
pub fn write_spec_relations<W: Write>(
    sink: &mut XmlSink<W>,
    ctx: &mut ExportContext,
    types: &[ExportType],
) -> Result<()> {
    let now = format_timestamp(&ctx.created_at);
    let reverse = ctx.options.reverse_traces;
    let mut written = 0usize;

    sink.start("SPEC-RELATIONS", &[])?;
    for export_type in types {
        for_each_node(
            ctx,
            &export_type.roots,
            &export_type.tag,
            Admission::Free,
            |ctx, node, id, _| {
                for trace in &node.traces_to {
                    match ctx.trace_target(&trace.endpoint) {
                        Some(target) => {
                            write_relation(sink, id, &target, trace, reverse, &now)?;
                            written += 1;
                        }
                        None => {
                            log_skipped(id, &trace.endpoint);
                            ctx.record_skipped_trace();
                        }
                    }
                }
                Ok(())
            },
        )?;
    }
    tracing::debug!(
        relations = written,
        skipped = ctx.skipped_traces(),
        "Spec relations written"
    );
    sink.end()
}

fn log_skipped(source: &NodeId, endpoint: &TraceEndpoint) {
    match endpoint {
        TraceEndpoint::Requirement(target) => tracing::warn!(
            source = %source,
            target = %target.node_id(),
            project = %target.project,
            "Trace target outside the exported scope, trace skipped"
        ),
        TraceEndpoint::Deleted => tracing::warn!(
            source = %source,
            "Trace to a deleted or inaccessible object, trace skipped"
        ),
        TraceEndpoint::External { description } => tracing::warn!(
            source = %source,
            target = %description,
            "Trace to a non-requirement object, trace skipped"
        ),
    }
}

/// Writes one relation from `source` to `target`
///
/// The identifier is always `{source}-to-{target}`; reversing only swaps the
/// SOURCE and TARGET references.
fn write_relation<W: Write>(
    sink: &mut XmlSink<W>,
    source: &NodeId,
    target: &NodeId,
    trace: &Trace,
    reverse: bool,
    now: &str,
) -> Result<()> {
    let identifier = format!("{source}-to-{target}");
    let (from, to) = if reverse {
        (target, source)
    } else {
        (source, target)
    };

    sink.start(
        "SPEC-RELATION",
        &[("IDENTIFIER", identifier.as_str()), ("LAST-CHANGE", now)],
    )?;

    sink.start("VALUES", &[])?;
    sink.start(
        "ATTRIBUTE-VALUE-BOOLEAN",
        &[("THE-VALUE", if trace.suspect { "true" } else { "false" })],
    )?;
    sink.start("DEFINITION", &[])?;
    sink.text_element("ATTRIBUTE-DEFINITION-BOOLEAN-REF", SUSPECT_ATTRIBUTE)?;
    sink.end()?;
    sink.end()?;
    sink.end()?;

    sink.start("SOURCE", &[])?;
    sink.text_element("SPEC-OBJECT-REF", from.as_str())?;
    sink.end()?;
    sink.start("TARGET", &[])?;
    sink.text_element("SPEC-OBJECT-REF", to.as_str())?;
    sink.end()?;
    sink.start("TYPE", &[])?;
    sink.text_element("SPEC-RELATION-TYPE-REF", TRACE_TYPE)?;
    sink.end()?;

    sink.end()
}
