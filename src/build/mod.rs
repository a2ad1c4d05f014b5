//! Build phase: reconstructs the containment tree.
//!
//! DESIGN
//! ======
//! Runs depth-first. For each container:
//!
//! 1. `tree::partition` nests contained siblings and splits off overlays
//! 2. every flow child and overlay is built recursively
//! 3. flow children are put in reading order
//! 4. `pattern::detect` folds repeated runs into lists
//! 5. `group::arrange` clusters the rest into rows and columns and sets the
//!    container's direction
//! 6. `simplify::simplify` collapses redundant wrappers
//!
//! Once this returns, every container has its direction and final children.
//! Nothing in the measure phase changes the shape of the tree except for
//! inserting spacers.

#[cfg(test)]
#[path = "build_test.rs"]
mod build_test;

pub mod group;
pub mod pattern;
pub mod simplify;
pub mod tree;

use std::mem;

use crate::context::Context;
use crate::error::ConvertError;
use crate::geom::Tolerance;
use crate::node::Node;

/// Build the containment tree under `root`.
///
/// # Errors
///
/// - [`ConvertError::RootNotContainer`] if the root is text or has nothing
///   to lay out
/// - [`ConvertError::DegenerateBounds`] if the root has no area
/// - any fatal error raised by a stage
pub fn build(root: Node, ctx: &mut Context) -> Result<Node, ConvertError> {
    if root.is_text() || (root.children.is_empty() && root.attach_nodes.is_empty()) {
        return Err(ConvertError::RootNotContainer { index: root.index });
    }
    if root.bounds.is_degenerate() {
        return Err(ConvertError::DegenerateBounds { index: root.index });
    }
    tracing::debug!(index = root.index, children = root.children.len(), "build phase started");
    build_node(root, ctx)
}

fn build_node(mut node: Node, ctx: &mut Context) -> Result<Node, ConvertError> {
    if node.is_text() || (node.children.is_empty() && node.attach_nodes.is_empty()) {
        return Ok(node);
    }

    let siblings = mem::take(&mut node.children);
    let part = tree::partition(siblings, &node.bounds, ctx);

    let overlays: Vec<Node> = mem::take(&mut node.attach_nodes).into_iter().chain(part.attach).collect();
    node.attach_nodes = overlays.into_iter().map(|n| build_node(n, ctx)).collect::<Result<_, _>>()?;

    let mut flow = part.flow.into_iter().map(|n| build_node(n, ctx)).collect::<Result<Vec<_>, _>>()?;
    reading_order(&mut flow, ctx.tol);

    let flow = pattern::detect(flow, ctx)?;
    group::arrange(&mut node, flow, ctx)?;
    simplify::simplify(&mut node, ctx.tol);
    Ok(node)
}

/// Sort top to bottom by line, then left to right within a line. A line is
/// every box whose top sits within tolerance of the line's first box.
pub fn reading_order(nodes: &mut [Node], tol: Tolerance) {
    nodes.sort_by(|a, b| a.bounds.top().total_cmp(&b.bounds.top()).then(a.index.cmp(&b.index)));

    let mut start = 0;
    while start < nodes.len() {
        let line_top = nodes[start].bounds.top();
        let len = nodes[start..]
            .iter()
            .take_while(|n| n.bounds.top() - line_top <= tol.eps())
            .count();
        nodes[start..start + len]
            .sort_by(|a, b| a.bounds.left().total_cmp(&b.bounds.left()).then(a.index.cmp(&b.index)));
        start += len;
    }
}
