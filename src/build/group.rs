//! Direction grouper: clusters flow siblings into nested rows and columns.
//!
//! DESIGN
//! ======
//! Repeatedly take the tallest remaining node and gather the nodes whose
//! vertical extent sits inside it (the band). Band members are clustered by
//! transitive horizontal overlap; a cluster with several members is a column
//! and gets grouped again on its own. The band becomes a row of its clusters,
//! left to right. Everything outside the band is grouped the same way, and the
//! resulting cells are stacked top to bottom.
//!
//! The caller's container takes `Row` when a single cell comes out and
//! `Column` when several are stacked.

#[cfg(test)]
#[path = "group_test.rs"]
mod group_test;

use crate::build::pattern;
use crate::context::Context;
use crate::diag::Stage;
use crate::error::ConvertError;
use crate::geom::{Bounds, Tolerance, overlapping_x};
use crate::node::{Direction, Node};

/// One stacked entry produced by [`group`].
#[derive(Debug)]
enum Cell {
    Single(Node),
    /// Band members left to right, not yet wrapped in a container.
    Row(Vec<Node>),
}

impl Cell {
    fn top(&self) -> f64 {
        match self {
            Self::Single(node) => node.bounds.top(),
            Self::Row(members) => members.iter().map(|n| n.bounds.top()).fold(f64::INFINITY, f64::min),
        }
    }

    fn into_node(self, ctx: &mut Context) -> Node {
        match self {
            Self::Single(node) => node,
            Self::Row(members) => {
                let bounds = union(&members);
                Node::container(ctx.ids.fresh(), bounds, Direction::Row, members)
            }
        }
    }
}

/// Group `nodes` and install the result as `parent`'s children, setting its
/// direction.
///
/// # Errors
///
/// Propagates list folding errors from column-list detection.
pub fn arrange(parent: &mut Node, nodes: Vec<Node>, ctx: &mut Context) -> Result<(), ConvertError> {
    let mut cells = group(nodes, ctx)?;

    match cells.len() {
        0 => {
            parent.children.clear();
        }
        1 => {
            parent.children = match cells.remove(0) {
                Cell::Single(node) => vec![node],
                Cell::Row(members) => members,
            };
            parent.direction = Direction::Row;
        }
        _ => {
            parent.children = cells.into_iter().map(|c| c.into_node(ctx)).collect();
            parent.direction = Direction::Column;
            pattern::detect_column_list(parent, ctx)?;
        }
    }
    tracing::debug!(
        index = parent.index,
        direction = ?parent.direction,
        children = parent.children.len(),
        "arranged container"
    );
    Ok(())
}

fn group(nodes: Vec<Node>, ctx: &mut Context) -> Result<Vec<Cell>, ConvertError> {
    let Some(tallest) = tallest(&nodes) else {
        return Ok(Vec::new());
    };
    let tol = ctx.tol;
    let band_span = nodes[tallest].bounds;
    let total = nodes.len();

    let (band, leftover): (Vec<Node>, Vec<Node>) = nodes.into_iter().partition(|n| within_band(n, &band_span, tol));

    let mut cells = Vec::new();
    if band.len() == 1 {
        cells.extend(band.into_iter().map(Cell::Single));
    } else {
        let clusters = cluster_x(band);
        if clusters.len() == 1 && leftover.is_empty() && clusters[0].len() == total {
            cells.extend(stack_overlapping(clusters.into_iter().flatten().collect(), ctx));
        } else {
            let mut members = Vec::with_capacity(clusters.len());
            for cluster in clusters {
                members.push(column_box(cluster, ctx)?);
            }
            members.sort_by(|a, b| a.bounds.left().total_cmp(&b.bounds.left()));
            cells.push(Cell::Row(members));
        }
    }

    cells.extend(group(leftover, ctx)?);
    cells.sort_by(|a, b| a.top().total_cmp(&b.top()));
    Ok(cells)
}

/// Tallest node, earliest on ties.
fn tallest(nodes: &[Node]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, node) in nodes.iter().enumerate() {
        if best.is_none_or(|b| node.bounds.height() > nodes[b].bounds.height()) {
            best = Some(i);
        }
    }
    best
}

fn within_band(node: &Node, band: &Bounds, tol: Tolerance) -> bool {
    node.bounds.top() >= band.top() - tol.eps() && node.bounds.bottom() <= band.bottom() + tol.eps()
}

/// Split `nodes` into groups connected by horizontal overlap.
fn cluster_x(nodes: Vec<Node>) -> Vec<Vec<Node>> {
    let mut clusters: Vec<Vec<Node>> = Vec::new();
    for node in nodes {
        let mut joined: Vec<Node> = vec![node];
        let mut i = 0;
        while i < clusters.len() {
            let touches = clusters[i]
                .iter()
                .any(|member| joined.iter().any(|n| overlapping_x(&member.bounds, &n.bounds)));
            if touches {
                joined.extend(clusters.remove(i));
            } else {
                i += 1;
            }
        }
        clusters.push(joined);
    }
    clusters
}

fn column_box(mut members: Vec<Node>, ctx: &mut Context) -> Result<Node, ConvertError> {
    if members.len() == 1 {
        return Ok(members.remove(0));
    }
    members.sort_by(|a, b| a.bounds.top().total_cmp(&b.bounds.top()));
    let bounds = union(&members);
    let cells = group(members, ctx)?;
    let children = cells.into_iter().map(|c| c.into_node(ctx)).collect();

    let mut column = Node::container(ctx.ids.fresh(), bounds, Direction::Column, children);
    pattern::detect_column_list(&mut column, ctx)?;
    Ok(column)
}

/// Boxes that overlap on both axes cannot be split into rows or columns.
/// They are stacked in top order as a fallback.
fn stack_overlapping(mut nodes: Vec<Node>, ctx: &mut Context) -> Vec<Cell> {
    nodes.sort_by(|a, b| a.bounds.top().total_cmp(&b.bounds.top()));
    if let Some(first) = nodes.first() {
        ctx.report(
            Stage::DirectionGrouper,
            first.index,
            format!("{} overlapping boxes stacked in top order", nodes.len()),
        );
    }
    nodes.into_iter().map(Cell::Single).collect()
}

fn union(nodes: &[Node]) -> Bounds {
    Bounds::union_all(nodes.iter().map(|n| &n.bounds)).unwrap_or_default()
}
