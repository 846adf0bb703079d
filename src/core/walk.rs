//! Depth-first traversal of requirement trees
//!
//! Every phase of every writer walks the trees through this module: nodes are
//! visited pre-order, children in source order, each with its normalized
//! identifier and depth. The source guarantees finite, acyclic trees (a node
//! owns its children), so there is no depth guard.

use crate::core::export::context::ExportContext;
use crate::domain::{NodeId, RequirementNode, Result, TypeTag};

/// Whether a walk admits nodes against the export limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Admit every node before visiting it and advance first-level progress
    Count,
    /// Visit without counting
    Free,
}

/// Callback for a tree walk
pub trait NodeVisitor {
    /// Called before the node's children are visited
    fn enter(
        &mut self,
        ctx: &mut ExportContext,
        node: &RequirementNode,
        id: &NodeId,
        depth: usize,
    ) -> Result<()>;

    /// Called after the node's children are visited
    fn leave(
        &mut self,
        _ctx: &mut ExportContext,
        _node: &RequirementNode,
        _id: &NodeId,
        _depth: usize,
    ) -> Result<()> {
        Ok(())
    }
}

struct FnVisitor<F>(F);

impl<F> NodeVisitor for FnVisitor<F>
where
    F: FnMut(&mut ExportContext, &RequirementNode, &NodeId, usize) -> Result<()>,
{
    fn enter(
        &mut self,
        ctx: &mut ExportContext,
        node: &RequirementNode,
        id: &NodeId,
        depth: usize,
    ) -> Result<()> {
        (self.0)(ctx, node, id, depth)
    }
}

/// Walks `roots` depth-first, pre-order
///
/// With [`Admission::Count`] each node is admitted through
/// [`ExportContext::admit_node`] before the visitor sees it, so the walk stops
/// with `LimitReached` once the limit is hit, aborting the whole run.
///
/// # Errors
///
/// Propagates the first error raised by admission or by the visitor.
pub fn walk<V>(
    ctx: &mut ExportContext,
    roots: &[RequirementNode],
    tag: &TypeTag,
    admission: Admission,
    visitor: &mut V,
) -> Result<()>
where
    V: NodeVisitor + ?Sized,
{
    for root in roots {
        visit(ctx, root, tag, 0, admission, visitor)?;
        if admission == Admission::Count {
            ctx.first_level_done();
        }
    }
    Ok(())
}

/// Walks `roots` calling `f` on entry to every node
pub fn for_each_node<F>(
    ctx: &mut ExportContext,
    roots: &[RequirementNode],
    tag: &TypeTag,
    admission: Admission,
    f: F,
) -> Result<()>
where
    F: FnMut(&mut ExportContext, &RequirementNode, &NodeId, usize) -> Result<()>,
{
    walk(ctx, roots, tag, admission, &mut FnVisitor(f))
}

fn visit<V>(
    ctx: &mut ExportContext,
    node: &RequirementNode,
    tag: &TypeTag,
    depth: usize,
    admission: Admission,
    visitor: &mut V,
) -> Result<()>
where
    V: NodeVisitor + ?Sized,
{
    let id = NodeId::new(tag, node.number);
    if admission == Admission::Count {
        ctx.admit_node(&id)?;
    }
    tracing::trace!(id = %id, depth, "Visiting requirement");

    visitor.enter(ctx, node, &id, depth)?;
    for child in &node.children {
        visit(ctx, child, tag, depth + 1, admission, visitor)?;
    }
    visitor.leave(ctx, node, &id, depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::source::{InMemoryImageStore, SourceInfo};
    use crate::core::export::context::ExportOptions;
    use crate::domain::{Baseline, ExportScope, Project, ReqportError};
    use std::sync::Arc;

    fn context(limit: usize) -> ExportContext {
        ExportContext::new(
            ExportOptions {
                limit,
                ..ExportOptions::default()
            },
            Project::new("Demo"),
            Baseline::current(),
            ExportScope::Project,
            SourceInfo {
                repository_id: "rm".to_string(),
                user: "ada".to_string(),
                tool: "CaliberRM".to_string(),
            },
            Arc::new(InMemoryImageStore::new()),
            ".",
        )
    }

    fn tree() -> Vec<RequirementNode> {
        let mut f1 = RequirementNode::new(1, "Login");
        let mut f2 = RequirementNode::new(2, "Password");
        f2.children.push(RequirementNode::new(3, "Reset"));
        f1.children.push(f2);
        f1.children.push(RequirementNode::new(4, "Logout"));
        vec![f1, RequirementNode::new(5, "Search")]
    }

    #[test]
    fn test_pre_order_with_depth() {
        let mut ctx = context(100);
        let tag = TypeTag::new("F").unwrap();
        let mut seen = Vec::new();
        for_each_node(&mut ctx, &tree(), &tag, Admission::Free, |_, _, id, depth| {
            seen.push((id.to_string(), depth));
            Ok(())
        })
        .unwrap();

        assert_eq!(
            seen,
            vec![
                ("F1".to_string(), 0),
                ("F2".to_string(), 1),
                ("F3".to_string(), 2),
                ("F4".to_string(), 1),
                ("F5".to_string(), 0),
            ]
        );
        assert_eq!(ctx.exported_count(), 0);
    }

    #[test]
    fn test_count_within_limit() {
        let mut ctx = context(5);
        let tag = TypeTag::new("F").unwrap();
        ctx.set_first_level_total(2);
        for_each_node(&mut ctx, &tree(), &tag, Admission::Count, |_, _, _, _| Ok(())).unwrap();
        assert_eq!(ctx.exported_count(), 5);
        assert_eq!(ctx.first_level_count(), 2);
        assert_eq!(ctx.progress.get(), 80);
    }

    #[test]
    fn test_count_stops_whole_walk_at_limit() {
        let mut ctx = context(3);
        let tag = TypeTag::new("F").unwrap();
        let mut visited = 0;
        let err = for_each_node(&mut ctx, &tree(), &tag, Admission::Count, |_, _, _, _| {
            visited += 1;
            Ok(())
        })
        .unwrap_err();

        assert!(matches!(err, ReqportError::LimitReached { limit: 3 }));
        assert_eq!(visited, 3);
        assert_eq!(ctx.exported_count(), 3);
    }

    struct Nesting {
        events: Vec<String>,
    }

    impl NodeVisitor for Nesting {
        fn enter(
            &mut self,
            _ctx: &mut ExportContext,
            _node: &RequirementNode,
            id: &NodeId,
            _depth: usize,
        ) -> Result<()> {
            self.events.push(format!("+{id}"));
            Ok(())
        }

        fn leave(
            &mut self,
            _ctx: &mut ExportContext,
            _node: &RequirementNode,
            id: &NodeId,
            _depth: usize,
        ) -> Result<()> {
            self.events.push(format!("-{id}"));
            Ok(())
        }
    }

    #[test]
    fn test_leave_after_children() {
        let mut ctx = context(100);
        let tag = TypeTag::new("F").unwrap();
        let mut visitor = Nesting { events: Vec::new() };
        walk(&mut ctx, &tree()[..1], &tag, Admission::Free, &mut visitor).unwrap();
        assert_eq!(
            visitor.events,
            vec!["+F1", "+F2", "+F3", "-F3", "-F2", "+F4", "-F4", "-F1"]
        );
    }
}
