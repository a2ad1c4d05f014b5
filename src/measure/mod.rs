//! Measure phase: sizes, alignment, distribution, and overlay offsets.
//!
//! DESIGN
//! ======
//! Specs are resolved bottom-up over the whole tree first, then checked, so
//! no container is measured while a descendant is still `Unknown`. A single
//! pre-order pass then handles each container before its children:
//!
//! 1. container tokens (`flex`, `flex-col`)
//! 2. promotion of stretched children (`size::promote`)
//! 3. cross-axis alignment, then main-axis justification (wrapped lists get
//!    gap tokens instead)
//! 4. size tokens for each child, now that its specs are final
//! 5. overlay positioning
//!
//! ERROR HANDLING
//! ==============
//! The only fatal condition is an `Unknown` spec surviving resolution.

pub mod align;
pub mod attach;
pub mod justify;
pub mod size;

use crate::context::Context;
use crate::error::ConvertError;
use crate::geom::{Axis, Tolerance};
use crate::node::{ClassToken, Direction, Node, Property, Role, Side};

/// Run the measure phase over a built tree.
///
/// # Errors
///
/// Returns [`ConvertError::UnresolvedSpec`] if size resolution leaves any
/// axis `Unknown`.
pub fn measure(mut root: Node, ctx: &mut Context) -> Result<Node, ConvertError> {
    size::resolve(&mut root, &ctx.options);
    size::validate(&root)?;
    size::emit_tokens(&mut root, Direction::Unset);
    place(&mut root, ctx);
    Ok(root)
}

fn place(node: &mut Node, ctx: &mut Context) {
    if !node.children.is_empty() {
        match node.direction {
            Direction::Row => node.push_class(ClassToken::Flex),
            Direction::Column => {
                node.push_class(ClassToken::Flex);
                node.push_class(ClassToken::FlexCol);
            }
            Direction::Unset => {}
        }
    }

    size::promote(node);
    if node.has_role(Role::ListWrap) {
        justify::wrap(node, ctx);
    } else {
        align::align(node, ctx);
        justify::justify(node, ctx);
    }

    let direction = node.direction;
    for child in &mut node.children {
        size::emit_tokens(child, direction);
    }
    attach::position(node);

    for child in node.children.iter_mut().chain(node.attach_nodes.iter_mut()) {
        place(child, ctx);
    }
}

/// Padding on both ends of `axis`, collapsed to one token when they match.
pub(crate) fn push_padding(node: &mut Node, axis: Axis, start: f64, end: f64, tol: Tolerance) {
    if tol.num_same(start, end) {
        node.push_length(Property::Padding, Side::both(axis), start);
    } else {
        node.push_length(Property::Padding, Side::start(axis), start);
        node.push_length(Property::Padding, Side::end(axis), end);
    }
}
