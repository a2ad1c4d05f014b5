//! Alignment engine: cross-axis placement of a container's children.
//!
//! DESIGN
//! ======
//! Each child has a start margin, an end margin, and their difference,
//! measured against the container's cross-axis edges. Children are grouped
//! by near-equal value on each of the three, and the largest group decides:
//!
//! | Largest group | Strategy | Container padding        |
//! |---------------|----------|--------------------------|
//! | difference    | center   | the common offset        |
//! | start margin  | start    | the common start margin  |
//! | end margin    | end      | the common end margin    |
//!
//! Ties are broken in the order difference, start, end. A difference group
//! away from zero centers the children inside asymmetric padding. Children
//! outside the winning group get a self-alignment override and a residual
//! margin.
//!
//! When every child touches both cross edges the container stretches. When
//! no group has two members the container falls back to stretch with the
//! smallest margins as padding and reports a diagnostic.

#[cfg(test)]
#[path = "align_test.rs"]
mod align_test;

use crate::context::Context;
use crate::diag::Stage;
use crate::geom::{Axis, Tolerance};
use crate::measure::push_padding;
use crate::node::{Align, ClassToken, Node, Property, Side, SizeSpec};

#[derive(Debug, Clone, Copy)]
struct Margins {
    start: f64,
    end: f64,
}

impl Margins {
    fn diff(self) -> f64 {
        self.start - self.end
    }
}

/// Members of the largest near-equal group and the value they share.
#[derive(Debug, Clone)]
struct Group {
    value: f64,
    members: Vec<bool>,
}

impl Group {
    fn size(&self) -> usize {
        self.members.iter().filter(|&&m| m).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Center,
    Start,
    End,
}

/// Align the children of `node` on its cross axis.
pub fn align(node: &mut Node, ctx: &mut Context) {
    let Some(main) = node.direction.main_axis() else {
        return;
    };
    if node.children.is_empty() {
        return;
    }
    let cross = main.cross();
    let tol = ctx.tol;
    let margins: Vec<Margins> = node
        .children
        .iter()
        .map(|c| Margins {
            start: c.bounds.start(cross) - node.bounds.start(cross),
            end: node.bounds.end(cross) - c.bounds.end(cross),
        })
        .collect();

    if margins.iter().all(|m| tol.num_eq(m.start, 0.0) && tol.num_eq(m.end, 0.0)) {
        node.push_class(ClassToken::Items { align: Align::Stretch });
        stretch_children(node, cross);
        return;
    }

    let by_diff = largest_group(margins.iter().map(|m| m.diff()), tol);
    let by_start = largest_group(margins.iter().map(|m| m.start), tol);
    let by_end = largest_group(margins.iter().map(|m| m.end), tol);

    let (strategy, group) = if by_diff.size() >= by_start.size().max(by_end.size()) {
        (Strategy::Center, by_diff)
    } else if by_start.size() >= by_end.size() {
        (Strategy::Start, by_start)
    } else {
        (Strategy::End, by_end)
    };

    if group.size() < 2 && margins.len() > 1 {
        ctx.report(
            Stage::Alignment,
            node.index,
            format!("no two of {} children share a cross-axis offset; stretching", margins.len()),
        );
        fallback_stretch(node, cross, &margins, tol);
        return;
    }

    let (pad_start, pad_end) = match strategy {
        Strategy::Center => (group.value.max(0.0), (-group.value).max(0.0)),
        Strategy::Start => (group.value, 0.0),
        Strategy::End => (0.0, group.value),
    };
    tracing::debug!(index = node.index, ?strategy, members = group.size(), "aligned children");

    node.push_class(ClassToken::Items { align: items_keyword(strategy) });
    push_padding(node, cross, pad_start, pad_end, tol);

    for ((child, m), in_group) in node.children.iter_mut().zip(&margins).zip(&group.members) {
        let m = Margins { start: m.start - pad_start, end: m.end - pad_end };
        if child.spec(cross) == SizeSpec::Constrained {
            child.push_class(ClassToken::SelfAlign { align: Align::Stretch });
            child.push_length(Property::Margin, Side::start(cross), m.start);
            child.push_length(Property::Margin, Side::end(cross), m.end);
        } else if !in_group {
            override_child(child, cross, strategy, m, tol);
        }
    }
}

fn items_keyword(strategy: Strategy) -> Align {
    match strategy {
        Strategy::Center => Align::Center,
        Strategy::Start => Align::Start,
        Strategy::End => Align::End,
    }
}

/// Place a child that does not follow the container's alignment.
fn override_child(child: &mut Node, cross: Axis, strategy: Strategy, m: Margins, tol: Tolerance) {
    if tol.num_eq(m.start, m.end) {
        if strategy != Strategy::Center {
            child.push_class(ClassToken::SelfAlign { align: Align::Center });
        }
    } else if m.start <= m.end {
        if strategy != Strategy::Start {
            child.push_class(ClassToken::SelfAlign { align: Align::Start });
        }
        child.push_length(Property::Margin, Side::start(cross), m.start);
    } else {
        if strategy != Strategy::End {
            child.push_class(ClassToken::SelfAlign { align: Align::End });
        }
        child.push_length(Property::Margin, Side::end(cross), m.end);
    }
}

fn fallback_stretch(node: &mut Node, cross: Axis, margins: &[Margins], tol: Tolerance) {
    let pad_start = margins.iter().map(|m| m.start).fold(f64::INFINITY, f64::min);
    let pad_end = margins.iter().map(|m| m.end).fold(f64::INFINITY, f64::min);

    node.push_class(ClassToken::Items { align: Align::Stretch });
    push_padding(node, cross, pad_start, pad_end, tol);
    stretch_children(node, cross);

    for (child, m) in node.children.iter_mut().zip(margins) {
        child.push_length(Property::Margin, Side::start(cross), m.start - pad_start);
        if child.spec(cross) == SizeSpec::Constrained {
            child.push_length(Property::Margin, Side::end(cross), m.end - pad_end);
        }
    }
}

/// Content-sized children of a stretching container fill its cross axis.
fn stretch_children(node: &mut Node, cross: Axis) {
    for child in &mut node.children {
        if child.spec(cross) == SizeSpec::Auto {
            child.set_spec(cross, SizeSpec::Constrained);
        }
    }
}

/// Largest set of values within tolerance of one another's first member.
/// The earliest seed wins ties.
fn largest_group(values: impl Iterator<Item = f64>, tol: Tolerance) -> Group {
    let values: Vec<f64> = values.collect();
    let mut best = Group { value: 0.0, members: vec![false; values.len()] };
    for &seed in &values {
        let members: Vec<bool> = values.iter().map(|&v| tol.num_eq(v, seed)).collect();
        let candidate = Group { value: seed, members };
        if candidate.size() > best.size() {
            best = candidate;
        }
    }
    best
}
