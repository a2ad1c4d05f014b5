//! Justification engine: main-axis distribution of a container's children.
//!
//! DESIGN
//! ======
//! From the leading edge gap, the trailing edge gap, and the gaps between
//! children:
//!
//! - content-sized container (`Auto` main axis), or a child that stretches on
//!   the main axis: edge gaps become padding, uniform gaps a gap token,
//!   anything else per-child margins
//! - three or more children at one gap: `around` when each edge holds half a
//!   gap, `between` when the gap beats both edges, otherwise a gap token with
//!   `center`, `start`, or `end`
//! - otherwise, if one gap beats both edges, a flexible spacer takes its place
//!   and the other gaps become exact margins
//! - a single gap that does not beat both edges: gap token plus edge alignment
//! - otherwise literal margins
//!
//! Largest-gap ties: when the leading edge is no larger than the trailing
//! edge the last tied gap wins, otherwise the first.
//!
//! Wrapped lists skip all of this and get row and column gap tokens instead.

#[cfg(test)]
#[path = "justify_test.rs"]
mod justify_test;

use crate::context::Context;
use crate::diag::Stage;
use crate::geom::{Axis, Tolerance};
use crate::measure::push_padding;
use crate::node::{Align, ClassToken, Justify, Node, Property, Side, SizeSpec};

/// Distribute the children of `node` along its main axis.
pub fn justify(node: &mut Node, ctx: &mut Context) {
    let Some(main) = node.direction.main_axis() else {
        return;
    };
    if node.children.is_empty() {
        return;
    }
    let tol = ctx.tol;
    node.children.sort_by(|a, b| a.bounds.start(main).total_cmp(&b.bounds.start(main)));

    let leading = node.children[0].bounds.start(main) - node.bounds.start(main);
    let trailing = node.bounds.end(main) - node.children[node.children.len() - 1].bounds.end(main);
    let gaps: Vec<f64> = node
        .children
        .windows(2)
        .map(|w| w[1].bounds.start(main) - w[0].bounds.end(main))
        .collect();
    let uniform = gaps.first().is_some_and(|&g| gaps.iter().all(|&v| tol.num_eq(v, g)));

    let content_sized = node.spec(main) == SizeSpec::Auto;
    let stretching_child = node.children.iter().any(|c| c.spec(main) == SizeSpec::Constrained);
    if content_sized || stretching_child {
        push_padding(node, main, leading, trailing, tol);
        if uniform {
            node.push_length(Property::Gap, Side::both(main), gaps[0]);
        } else {
            report_uneven(node, &gaps, ctx);
            push_margins(node, main, &gaps, None);
        }
        return;
    }

    if uniform && gaps.len() >= 2 {
        equal_gaps(node, main, leading, trailing, gaps[0], tol);
        return;
    }
    if gaps.is_empty() {
        edge_align(node, main, leading, trailing, tol);
        return;
    }

    if let Some(k) = dominant_gap(leading, trailing, &gaps, tol) {
        push_padding(node, main, leading, trailing, tol);
        push_margins(node, main, &gaps, Some(k));
        insert_spacer(node, main, k, ctx);
        return;
    }
    if uniform {
        equal_gaps(node, main, leading, trailing, gaps[0], tol);
        return;
    }

    report_uneven(node, &gaps, ctx);
    node.push_length(Property::Padding, Side::start(main), leading);
    push_margins(node, main, &gaps, None);
}

fn equal_gaps(node: &mut Node, main: Axis, leading: f64, trailing: f64, gap: f64, tol: Tolerance) {
    let half = gap / 2.0;
    if tol.num_eq(leading, half) && tol.num_eq(trailing, half) {
        node.push_class(ClassToken::Justify { justify: Justify::Around });
        return;
    }
    if tol.num_gt(gap, leading) && tol.num_gt(gap, trailing) {
        node.push_class(ClassToken::Justify { justify: Justify::Between });
        push_padding(node, main, leading, trailing, tol);
        return;
    }

    node.push_length(Property::Gap, Side::both(main), gap);
    edge_align(node, main, leading, trailing, tol);
}

/// Center when both edges match, otherwise pin to the nearer edge.
fn edge_align(node: &mut Node, main: Axis, leading: f64, trailing: f64, tol: Tolerance) {
    if tol.num_eq(leading, trailing) {
        node.push_class(ClassToken::Justify { justify: Justify::Center });
    } else if leading < trailing {
        node.push_class(ClassToken::Justify { justify: Justify::Start });
        node.push_length(Property::Padding, Side::start(main), leading);
    } else {
        node.push_class(ClassToken::Justify { justify: Justify::End });
        node.push_length(Property::Padding, Side::end(main), trailing);
    }
}

/// Index of the gap a spacer should fill, if one gap beats both edges.
fn dominant_gap(leading: f64, trailing: f64, gaps: &[f64], tol: Tolerance) -> Option<usize> {
    let largest = gaps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(tol.num_gt(largest, leading) && tol.num_gt(largest, trailing)) {
        return None;
    }
    let mut tied = gaps.iter().enumerate().filter(|&(_, &g)| tol.num_eq(g, largest)).map(|(i, _)| i);
    if leading <= trailing { tied.last() } else { tied.next() }
}

/// Margin on the leading side of every child after the first, except the
/// one following `skip`.
fn push_margins(node: &mut Node, main: Axis, gaps: &[f64], skip: Option<usize>) {
    for (i, &gap) in gaps.iter().enumerate() {
        if Some(i) != skip {
            node.children[i + 1].push_length(Property::Margin, Side::start(main), gap);
        }
    }
}

fn insert_spacer(node: &mut Node, main: Axis, k: usize, ctx: &mut Context) {
    let start = node.children[k].bounds.end(main);
    let end = node.children[k + 1].bounds.start(main);
    let bounds = node.bounds.with_span(main, start, end);

    let mut spacer = Node::new(ctx.ids.fresh(), bounds);
    spacer.spacer = true;
    spacer.set_spec(main, SizeSpec::Constrained);
    spacer.set_spec(main.cross(), SizeSpec::Auto);
    spacer.push_class(ClassToken::Flex1);
    tracing::debug!(index = node.index, spacer = spacer.index, gap = end - start, "inserted spacer");
    node.children.insert(k + 1, spacer);
}

fn report_uneven(node: &Node, gaps: &[f64], ctx: &mut Context) {
    if gaps.len() >= 2 {
        ctx.report(
            Stage::Justification,
            node.index,
            format!("{} uneven gaps between children; using literal margins", gaps.len()),
        );
    }
}

// =============================================================================
// WRAPPED LISTS
// =============================================================================

/// Gap and padding tokens for a `list-wrap` container.
pub fn wrap(node: &mut Node, ctx: &mut Context) {
    let tol = ctx.tol;
    let Some(first) = node.children.first() else {
        return;
    };
    let first_top = first.bounds.top();
    let row_len = node
        .children
        .iter()
        .take_while(|c| tol.num_eq(c.bounds.top(), first_top))
        .count();
    let first_row = &node.children[..row_len];

    let gap_x = (row_len >= 2).then(|| first_row[1].bounds.left() - first_row[0].bounds.right());
    let gap_y = node.children.get(row_len).map(|next| {
        let row_bottom = first_row.iter().map(|c| c.bounds.bottom()).fold(f64::NEG_INFINITY, f64::max);
        next.bounds.top() - row_bottom
    });
    let pad_left = node.children.iter().map(|c| c.bounds.left()).fold(f64::INFINITY, f64::min) - node.bounds.left();
    let pad_top = first_top - node.bounds.top();

    if !node.has_class(&ClassToken::FlexWrap) {
        node.push_class(ClassToken::FlexWrap);
    }
    node.push_class(ClassToken::Items { align: Align::Start });
    match (gap_x, gap_y) {
        (Some(x), Some(y)) if tol.num_same(x, y) => node.push_length(Property::Gap, Side::All, x),
        (x, y) => {
            if let Some(x) = x {
                node.push_length(Property::Gap, Side::X, x);
            }
            if let Some(y) = y {
                node.push_length(Property::Gap, Side::Y, y);
            }
        }
    }
    node.push_length(Property::Padding, Side::Left, pad_left);
    node.push_length(Property::Padding, Side::Top, pad_top);
    tracing::debug!(index = node.index, ?gap_x, ?gap_y, first_row = row_len, "laid out wrapped list");
}
