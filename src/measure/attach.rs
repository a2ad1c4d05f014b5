//! Attach positioner: absolute offsets for overlay nodes.
//!
//! The container becomes a positioning context (`relative`) unless it already
//! is one, and each overlay becomes `absolute`. Per axis:
//!
//! - `Fixed` overlay: inset from the nearer edge only
//! - wider (taller) than half the container: inset from both edges and
//!   stretch
//! - otherwise: inset from the nearer edge, and a childless overlay keeps its
//!   design size
//!
//! Insets are emitted even when zero, since an absolute box without one falls
//! back to its static position.

#[cfg(test)]
#[path = "attach_test.rs"]
mod attach_test;

use crate::geom::{Axis, Bounds};
use crate::measure::size;
use crate::node::{ClassToken, Direction, Node, Property, Side, SizeSpec};

/// Position every overlay of `node`.
pub fn position(node: &mut Node) {
    if node.attach_nodes.is_empty() {
        return;
    }
    if !node.has_class(&ClassToken::Relative) && !node.has_class(&ClassToken::Absolute) {
        node.push_class(ClassToken::Relative);
    }

    let parent = node.bounds;
    for overlay in &mut node.attach_nodes {
        if !overlay.has_class(&ClassToken::Absolute) {
            overlay.push_class(ClassToken::Absolute);
        }
        place_axis(overlay, &parent, Axis::X);
        place_axis(overlay, &parent, Axis::Y);
        size::emit_tokens(overlay, Direction::Unset);
        tracing::debug!(
            index = overlay.index,
            host = node.index,
            width = ?overlay.width_spec,
            height = ?overlay.height_spec,
            "positioned overlay"
        );
    }
}

fn place_axis(overlay: &mut Node, parent: &Bounds, axis: Axis) {
    let start = overlay.bounds.start(axis) - parent.start(axis);
    let end = parent.end(axis) - overlay.bounds.end(axis);
    let nearer = if start <= end { (Side::start(axis), start) } else { (Side::end(axis), end) };

    if overlay.spec(axis) == SizeSpec::Fixed {
        inset(overlay, nearer);
        return;
    }
    if overlay.bounds.extent(axis) > parent.extent(axis) / 2.0 {
        inset(overlay, (Side::start(axis), start));
        inset(overlay, (Side::end(axis), end));
        overlay.set_spec(axis, SizeSpec::Constrained);
        return;
    }
    inset(overlay, nearer);
    if overlay.children.is_empty() {
        overlay.set_spec(axis, SizeSpec::Fixed);
    }
}

fn inset(overlay: &mut Node, (side, px): (Side, f64)) {
    overlay.push_class(ClassToken::length(Property::Inset, side, px));
}
