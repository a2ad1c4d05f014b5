//! Size-spec resolver.
//!
//! DESIGN
//! ======
//! Bottom-up ([`resolve`]): leaves are `Fixed` unless they carry a hint,
//! text follows its content, and a container is `Auto` on its main axis and
//! `Auto` on its cross axis only when some child is. Hints already on a node
//! are never overwritten.
//!
//! Top-down ([`promote`]): run by the measure pass at each container before
//! its children are visited, so promotions cascade from the root down.
//!
//! ERROR HANDLING
//! ==============
//! [`validate`] turns a leftover `Unknown` into
//! [`ConvertError::UnresolvedSpec`]. That only happens when an upstream stage
//! left a container without a direction.

#[cfg(test)]
#[path = "size_test.rs"]
mod size_test;

use crate::config::ConvertOptions;
use crate::error::ConvertError;
use crate::geom::Axis;
use crate::node::{ClassToken, Direction, Node, Property, Role, Side, SizeSpec};

// =============================================================================
// BOTTOM-UP
// =============================================================================

/// Resolve every `Unknown` spec under `root`, leaves first.
pub fn resolve(root: &mut Node, options: &ConvertOptions) {
    if options.page_fills_viewport && root.has_role(Role::Page) && root.width_spec == SizeSpec::Unknown {
        root.width_spec = SizeSpec::Constrained;
    }
    resolve_node(root, options);
}

fn resolve_node(node: &mut Node, options: &ConvertOptions) {
    for child in &mut node.children {
        resolve_node(child, options);
    }
    for overlay in &mut node.attach_nodes {
        resolve_node(overlay, options);
    }

    if node.is_text() {
        let width = if node.is_multiline_text() && options.multiline_text_fixed_width {
            SizeSpec::Fixed
        } else {
            SizeSpec::Auto
        };
        fill(node, Axis::X, width);
        fill(node, Axis::Y, SizeSpec::Auto);
        return;
    }

    let Some(main) = node.direction.main_axis().filter(|_| !node.children.is_empty()) else {
        fill(node, Axis::X, SizeSpec::Fixed);
        fill(node, Axis::Y, SizeSpec::Fixed);
        return;
    };
    let cross = main.cross();
    if node.has_role(Role::ListWrap) {
        // Items only wrap against a definite width.
        fill(node, main, SizeSpec::Fixed);
    }
    fill(node, main, SizeSpec::Auto);
    let cross_spec = if node.children.iter().any(|c| c.spec(cross) == SizeSpec::Auto) {
        SizeSpec::Auto
    } else {
        SizeSpec::Fixed
    };
    fill(node, cross, cross_spec);
}

fn fill(node: &mut Node, axis: Axis, spec: SizeSpec) {
    if node.spec(axis) == SizeSpec::Unknown {
        node.set_spec(axis, spec);
    }
}

/// Check that no spec anywhere under `root` is still `Unknown`.
///
/// # Errors
///
/// Returns [`ConvertError::UnresolvedSpec`] for the first offending node in
/// pre-order.
pub fn validate(root: &Node) -> Result<(), ConvertError> {
    for axis in [Axis::X, Axis::Y] {
        if !root.spec(axis).is_resolved() {
            return Err(ConvertError::UnresolvedSpec { index: root.index, axis });
        }
    }
    for child in root.children.iter().chain(&root.attach_nodes) {
        validate(child)?;
    }
    Ok(())
}

// =============================================================================
// TOP-DOWN
// =============================================================================

/// Promote `Auto` children of a stretched container to `Constrained`.
pub fn promote(node: &mut Node) {
    let Some(main) = node.direction.main_axis() else {
        return;
    };
    let cross = main.cross();
    let (main_stretched, cross_stretched) = (
        node.spec(main) == SizeSpec::Constrained,
        node.spec(cross) == SizeSpec::Constrained,
    );
    for child in &mut node.children {
        if main_stretched && child.spec(main) == SizeSpec::Auto {
            child.set_spec(main, SizeSpec::Constrained);
        }
        if cross_stretched && child.spec(cross) == SizeSpec::Auto {
            child.set_spec(cross, SizeSpec::Constrained);
        }
    }
}

// =============================================================================
// TOKENS
// =============================================================================

/// Emit explicit sizes for `Fixed` axes, and `flex-1` when the node grows
/// along its parent's main axis.
pub fn emit_tokens(node: &mut Node, parent: Direction) {
    if node.width_spec == SizeSpec::Fixed {
        node.push_length(Property::Width, Side::All, node.bounds.width());
    }
    if node.height_spec == SizeSpec::Fixed {
        node.push_length(Property::Height, Side::All, node.bounds.height());
    }
    if let Some(main) = parent.main_axis() {
        if node.spec(main) == SizeSpec::Constrained && !node.has_class(&ClassToken::Flex1) {
            node.push_class(ClassToken::Flex1);
        }
    }
}
