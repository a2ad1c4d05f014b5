//! Tree builder: turns a flat sibling list into containment and overlays.
//!
//! DESIGN
//! ======
//! Every sibling is placed against a snapshot of the whole list before any
//! node moves:
//!
//! - contained in another sibling: child of the smallest such sibling
//!   (earliest creation index on equal area)
//! - overlapping a larger sibling drawn earlier that it does not itself
//!   contain: overlay of that sibling
//! - not contained in the parent: overlay of the parent
//! - hairline flush with a parent edge: `border` overlay of the parent
//! - otherwise: flow sibling
//!
//! Targets must rank before the node in (area desc, index asc) order, which
//! keeps the placement graph acyclic even when tolerance makes containment
//! mutual. Nodes are then moved smallest-first, so a node carries the children
//! it received when it moves into its own container.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here is fatal. Overlapping boxes that fit none of the rules stay in
//! flow and are reported as a diagnostic.

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;

use std::cmp::Ordering;

use crate::consts::HAIRLINE_MAX_PX;
use crate::context::Context;
use crate::diag::Stage;
use crate::geom::{Bounds, Tolerance, contained, overlapping};
use crate::node::{Node, Role};

/// Result of partitioning one sibling list.
#[derive(Debug, Default)]
pub struct Partition {
    /// Flow siblings, each possibly carrying newly nested children.
    pub flow: Vec<Node>,
    /// Overlays that belong to the parent itself.
    pub attach: Vec<Node>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Flow,
    Divider,
    ChildOf(usize),
    AttachTo(usize),
    AttachParent,
    Border,
}

/// Reclassify `siblings` against each other and the `parent` bounds.
pub fn partition(siblings: Vec<Node>, parent: &Bounds, ctx: &mut Context) -> Partition {
    let tol = ctx.tol;
    let count = siblings.len();

    let mut order: Vec<usize> = (0..count).collect();
    order.sort_by(|&a, &b| by_area_desc(&siblings[a], &siblings[b]));
    let mut rank = vec![0; count];
    for (r, &i) in order.iter().enumerate() {
        rank[i] = r;
    }

    let placements: Vec<Placement> = (0..count).map(|i| place(i, &siblings, &rank, parent, tol)).collect();
    for (node, placement) in siblings.iter().zip(&placements) {
        tracing::debug!(index = node.index, ?placement, "placed node");
    }

    let mut slots: Vec<Option<Node>> = siblings.into_iter().map(Some).collect();
    for &i in order.iter().rev() {
        let (target, as_overlay) = match placements[i] {
            Placement::ChildOf(t) => (t, false),
            Placement::AttachTo(t) => (t, true),
            _ => continue,
        };
        let Some(node) = slots[i].take() else {
            continue;
        };
        match slots[target].as_mut() {
            Some(host) if as_overlay => host.attach_nodes.push(node),
            Some(host) => host.children.push(node),
            None => slots[i] = Some(node),
        }
    }

    let mut out = Partition::default();
    for (slot, placement) in slots.into_iter().zip(placements) {
        let Some(mut node) = slot else {
            continue;
        };
        match placement {
            Placement::AttachParent => out.attach.push(node),
            Placement::Border => {
                node.roles.insert(Role::Border);
                out.attach.push(node);
            }
            Placement::Divider => {
                node.roles.insert(Role::Divider);
                out.flow.push(node);
            }
            Placement::Flow | Placement::ChildOf(_) | Placement::AttachTo(_) => out.flow.push(node),
        }
    }

    report_flow_overlaps(&out.flow, ctx);
    out
}

fn place(i: usize, siblings: &[Node], rank: &[usize], parent: &Bounds, tol: Tolerance) -> Placement {
    let me = &siblings[i];
    let candidates = || {
        siblings
            .iter()
            .enumerate()
            .filter(move |&(j, other)| j != i && rank[j] < rank[i] && !other.is_text())
    };

    let container = candidates()
        .filter(|(_, other)| contained(&me.bounds, &other.bounds, tol))
        .min_by(|(_, a), (_, b)| by_area_asc(a, b));
    if let Some((j, _)) = container {
        return Placement::ChildOf(j);
    }

    let host = candidates()
        .filter(|(_, other)| {
            other.index < me.index
                && other.bounds.area() >= me.bounds.area()
                && overlapping(&me.bounds, &other.bounds)
                && !contained(&other.bounds, &me.bounds, tol)
        })
        .min_by(|(_, a), (_, b)| by_area_asc(a, b));
    if let Some((j, _)) = host {
        return Placement::AttachTo(j);
    }

    if !contained(&me.bounds, parent, tol) {
        return Placement::AttachParent;
    }

    if is_hairline(&me.bounds) {
        if flush_with_edge(&me.bounds, parent, tol) {
            return Placement::Border;
        }
        return Placement::Divider;
    }

    Placement::Flow
}

/// One axis is at most a pixel-ish thick.
fn is_hairline(b: &Bounds) -> bool {
    b.width().min(b.height()) <= HAIRLINE_MAX_PX
}

fn flush_with_edge(b: &Bounds, parent: &Bounds, tol: Tolerance) -> bool {
    if b.height() <= b.width() {
        tol.num_eq(b.top(), parent.top()) || tol.num_eq(b.bottom(), parent.bottom())
    } else {
        tol.num_eq(b.left(), parent.left()) || tol.num_eq(b.right(), parent.right())
    }
}

fn by_area_desc(a: &Node, b: &Node) -> Ordering {
    b.bounds.area().total_cmp(&a.bounds.area()).then(a.index.cmp(&b.index))
}

fn by_area_asc(a: &Node, b: &Node) -> Ordering {
    a.bounds.area().total_cmp(&b.bounds.area()).then(a.index.cmp(&b.index))
}

fn report_flow_overlaps(flow: &[Node], ctx: &mut Context) {
    for (i, a) in flow.iter().enumerate() {
        for b in &flow[i + 1..] {
            if overlapping(&a.bounds, &b.bounds) {
                ctx.report(
                    Stage::TreeBuilder,
                    b.index,
                    format!("overlaps flow sibling {} but fits no overlay rule", a.index),
                );
            }
        }
    }
}
