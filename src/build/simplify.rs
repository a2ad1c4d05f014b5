//! Box simplifier: folds wrappers that add nothing but a level of nesting.
//!
//! A container whose only child covers the same bounds takes over that child's
//! tags, tokens, direction, text, and attributes, and adopts its children and
//! overlays. The container keeps its own bounds and index. Folding repeats
//! until the remaining child differs from the container, or until a child
//! carries a size hint that conflicts with the container's.

#[cfg(test)]
#[path = "simplify_test.rs"]
mod simplify_test;

use crate::geom::{Axis, Tolerance, same_bounds};
use crate::node::Node;

/// Collapse redundant single-child wrappers into `node`. Returns the number
/// of levels folded.
pub fn simplify(node: &mut Node, tol: Tolerance) -> usize {
    let mut folded = 0;
    while can_fold(node, tol) {
        let child = node.children.remove(0);
        absorb(node, child);
        folded += 1;
    }
    if folded > 0 {
        tracing::debug!(index = node.index, folded, "collapsed wrapper");
    }
    folded
}

fn can_fold(node: &Node, tol: Tolerance) -> bool {
    let [child] = node.children.as_slice() else {
        return false;
    };
    same_bounds(&node.bounds, &child.bounds, tol) && !size_locked(node, child)
}

/// Both sides carry a resolved spec on some axis and they disagree.
fn size_locked(parent: &Node, child: &Node) -> bool {
    [Axis::X, Axis::Y].into_iter().any(|axis| {
        let (p, c) = (parent.spec(axis), child.spec(axis));
        p.is_resolved() && c.is_resolved() && p != c
    })
}

fn absorb(parent: &mut Node, child: Node) {
    let Node {
        name,
        width_spec,
        height_spec,
        direction,
        roles,
        children,
        attach_nodes,
        class_list,
        text,
        attrs,
        ..
    } = child;

    parent.merge_classes(class_list);
    parent.roles.extend(&roles);
    parent.attrs.extend(attrs);
    parent.direction = direction;
    if text.is_some() {
        parent.text = text;
    }
    if parent.name.is_none() {
        parent.name = name;
    }
    if !parent.width_spec.is_resolved() {
        parent.width_spec = width_spec;
    }
    if !parent.height_spec.is_resolved() {
        parent.height_spec = height_spec;
    }
    parent.children = children;
    parent.attach_nodes.extend(attach_nodes);
}
