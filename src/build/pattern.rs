//! Pattern detector: repeated sibling runs become list containers.
//!
//! DESIGN
//! ======
//! Works on flow siblings already in reading order.
//!
//! Row lists: at each position, every unit length `L` is tried. A unit repeats
//! while each member matches the corresponding member of the first instance
//! (same top, same shape) and instances keep moving right. The plan covering
//! the most siblings wins, shortest unit on ties. Single-member units need
//! uniform gaps (uniform centerline spacing for text); composite units need
//! matching internal gaps across instances. A passing run may continue onto
//! following rows with the same horizontal composition, which makes it a
//! wrapped list.
//!
//! Parallel lists: adjacent `list-x` containers with the same item count, the
//! same gaps, and horizontally overlapping items are transposed into one
//! `list-x` whose items are columns.
//!
//! Column lists: inside a column container, the longest run of boxes with the
//! same left, width, and height at a uniform gap becomes a `list-y`.
//!
//! ERROR HANDLING
//! ==============
//! A run that repeats but fails its spacing check is reported once and left
//! as plain flow. Scanning resumes one sibling later; inside the rejected
//! span only a run of three or more instances is folded. Folding fewer than
//! two items is an invariant violation.

#[cfg(test)]
#[path = "pattern_test.rs"]
mod pattern_test;

use crate::context::Context;
use crate::diag::Stage;
use crate::error::ConvertError;
use crate::geom::{Axis, Bounds, Tolerance, overlapping_x};
use crate::node::{ClassToken, Direction, Node, Role};

// =============================================================================
// ROW LISTS
// =============================================================================

/// A repeated run found at the head of a sibling slice.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RunPlan {
    /// Members per repeated instance.
    unit: usize,
    /// Instances per visual row. More than one entry means the run wraps.
    rows: Vec<usize>,
}

impl RunPlan {
    fn instances(&self) -> usize {
        self.rows.iter().sum()
    }

    fn len(&self) -> usize {
        self.unit * self.instances()
    }
}

/// Instances a run found inside a rejected span needs before it is folded.
const MIN_RETRY_INSTANCES: usize = 3;

enum Detection {
    Found(RunPlan),
    Rejected { span: usize, reason: String },
    Nothing,
}

/// Fold repeated runs in `nodes` into list containers, then merge parallel
/// `list-x` rows into grids.
///
/// # Errors
///
/// Propagates [`ConvertError::ListTooShort`] if a fold is attempted with fewer
/// than two items.
pub fn detect(nodes: Vec<Node>, ctx: &mut Context) -> Result<Vec<Node>, ConvertError> {
    let rows = detect_row_lists(nodes, ctx)?;
    merge_parallel_lists(rows, ctx)
}

/// Fold repeated horizontal runs into `list-x` / `list-wrap` containers.
///
/// # Errors
///
/// See [`detect`].
pub fn detect_row_lists(mut nodes: Vec<Node>, ctx: &mut Context) -> Result<Vec<Node>, ConvertError> {
    let tol = ctx.tol;
    let mut out = Vec::with_capacity(nodes.len());
    // Siblings left in the most recent rejected span.
    let mut rejected = 0usize;

    while !nodes.is_empty() {
        match find_run(&nodes, tol) {
            Detection::Found(plan) if rejected == 0 || plan.instances() >= MIN_RETRY_INSTANCES => {
                let members: Vec<Node> = nodes.drain(..plan.len()).collect();
                rejected = rejected.saturating_sub(members.len());
                out.push(fold_run(members, &plan, ctx)?);
            }
            Detection::Rejected { span, reason } => {
                if rejected == 0 {
                    ctx.report(Stage::PatternDetector, nodes[0].index, reason);
                }
                rejected = rejected.max(span) - 1;
                out.extend(nodes.drain(..1));
            }
            Detection::Found(_) | Detection::Nothing => {
                rejected = rejected.saturating_sub(1);
                out.extend(nodes.drain(..1));
            }
        }
    }
    Ok(out)
}

fn find_run(nodes: &[Node], tol: Tolerance) -> Detection {
    let mut best: Option<RunPlan> = None;
    let mut rejection: Option<(usize, String)> = None;

    for unit in 1..=nodes.len() / 2 {
        let repeats = count_repeats(nodes, unit, tol);
        if repeats < 2 {
            continue;
        }
        if let Err(reason) = check_spacing(nodes, unit, repeats, tol) {
            if rejection.is_none() {
                rejection = Some((unit * repeats, reason));
            }
            continue;
        }
        let covered = unit * repeats;
        if best.as_ref().is_none_or(|b| covered > b.unit * b.rows[0]) {
            log_incomplete_repeat(nodes, unit, repeats, tol);
            let rows = extend_wrap(nodes, unit, repeats, tol);
            best = Some(RunPlan { unit, rows });
        }
    }

    match (best, rejection) {
        (Some(plan), _) => Detection::Found(plan),
        (None, Some((span, reason))) => Detection::Rejected { span, reason },
        (None, None) => Detection::Nothing,
    }
}

/// Same top within tolerance and the same shape.
fn similar(a: &Node, b: &Node, tol: Tolerance) -> bool {
    tol.num_eq(a.bounds.top(), b.bounds.top()) && same_shape(a, b, tol)
}

/// Text boxes match on height (their widths follow the content); other boxes
/// match on width and height.
fn same_shape(a: &Node, b: &Node, tol: Tolerance) -> bool {
    match (a.is_text(), b.is_text()) {
        (true, true) => tol.num_eq(a.bounds.height(), b.bounds.height()),
        (false, false) => {
            tol.num_eq(a.bounds.width(), b.bounds.width()) && tol.num_eq(a.bounds.height(), b.bounds.height())
        }
        _ => false,
    }
}

fn instance_bounds(nodes: &[Node], unit: usize, r: usize) -> Option<Bounds> {
    Bounds::union_all(nodes[r * unit..(r + 1) * unit].iter().map(|n| &n.bounds))
}

fn count_repeats(nodes: &[Node], unit: usize, tol: Tolerance) -> usize {
    let mut repeats = 1;
    while (repeats + 1) * unit <= nodes.len() {
        let matches = (0..unit).all(|k| similar(&nodes[k], &nodes[repeats * unit + k], tol));
        let moves_right = match (
            instance_bounds(nodes, unit, repeats - 1),
            instance_bounds(nodes, unit, repeats),
        ) {
            (Some(prev), Some(next)) => next.left() >= prev.right() - tol.eps(),
            _ => false,
        };
        if !(matches && moves_right) {
            break;
        }
        repeats += 1;
    }
    repeats
}

fn check_spacing(nodes: &[Node], unit: usize, repeats: usize, tol: Tolerance) -> Result<(), String> {
    if unit == 1 {
        let items = &nodes[..repeats];
        if items.iter().all(Node::is_text) {
            let steps: Vec<f64> = items
                .windows(2)
                .map(|w| w[1].bounds.center(Axis::X) - w[0].bounds.center(Axis::X))
                .collect();
            if !uniform(&steps, tol) {
                return Err(format!("{repeats} repeated text boxes have uneven centerline spacing"));
            }
        } else {
            let gaps: Vec<f64> = items.windows(2).map(|w| w[1].bounds.left() - w[0].bounds.right()).collect();
            if !uniform(&gaps, tol) {
                return Err(format!("{repeats} repeated boxes have uneven gaps"));
            }
        }
        return Ok(());
    }

    for k in 0..unit - 1 {
        let gap = |r: usize| nodes[r * unit + k + 1].bounds.left() - nodes[r * unit + k].bounds.right();
        let first = gap(0);
        if (1..repeats).any(|r| !tol.num_eq(gap(r), first)) {
            return Err(format!("{repeats} repeated {unit}-box groups differ in internal spacing"));
        }
    }
    Ok(())
}

fn uniform(values: &[f64], tol: Tolerance) -> bool {
    values.first().is_none_or(|&first| values.iter().all(|&v| tol.num_eq(v, first)))
}

/// Log leading members of a unit that follow the last full repeat.
/// `count_repeats` already stops before them, so they stay in flow.
fn log_incomplete_repeat(nodes: &[Node], unit: usize, repeats: usize, tol: Tolerance) {
    let tail = &nodes[unit * repeats..];
    let partial = (0..unit.min(tail.len()))
        .take_while(|&k| similar(&nodes[k], &tail[k], tol))
        .count();
    if partial > 0 && partial < unit {
        tracing::debug!(
            index = nodes[0].index,
            unit,
            repeats,
            partial,
            "left trailing incomplete repeat in flow"
        );
    }
}

/// Follow the run onto later rows that repeat the first row's composition.
/// A row with fewer instances than the first ends the run.
fn extend_wrap(nodes: &[Node], unit: usize, first_repeats: usize, tol: Tolerance) -> Vec<usize> {
    let lefts: Vec<f64> = (0..first_repeats).map(|r| nodes[r * unit].bounds.left()).collect();
    let mut rows = vec![first_repeats];
    let mut pos = unit * first_repeats;
    let mut prev = row_bounds(&nodes[..pos]);
    let mut row_gap: Option<f64> = None;

    while pos + unit <= nodes.len() {
        let row = &nodes[pos..];
        let mut repeats = 0;
        while repeats < first_repeats && (repeats + 1) * unit <= row.len() {
            let fits = (0..unit).all(|k| {
                let member = &row[repeats * unit + k];
                same_shape(&nodes[k], member, tol) && similar(&row[k], member, tol)
            });
            if !fits || !tol.num_eq(row[repeats * unit].bounds.left(), lefts[repeats]) {
                break;
            }
            repeats += 1;
        }
        if repeats == 0 {
            break;
        }

        let this = row_bounds(&row[..repeats * unit]);
        let (Some(above), Some(here)) = (prev, this) else {
            break;
        };
        let gap = here.top() - above.bottom();
        if gap < -tol.eps() || row_gap.is_some_and(|g| !tol.num_eq(g, gap)) {
            break;
        }
        row_gap = Some(gap);
        rows.push(repeats);
        pos += repeats * unit;
        prev = this;
        if repeats < first_repeats {
            break;
        }
    }
    rows
}

fn row_bounds(nodes: &[Node]) -> Option<Bounds> {
    Bounds::union_all(nodes.iter().map(|n| &n.bounds))
}

fn fold_run(members: Vec<Node>, plan: &RunPlan, ctx: &mut Context) -> Result<Node, ConvertError> {
    let items: Vec<Node> = if plan.unit == 1 {
        members
            .into_iter()
            .map(|mut n| {
                n.roles.insert(Role::ListItem);
                n
            })
            .collect()
    } else {
        let mut items = Vec::new();
        let mut iter = members.into_iter();
        loop {
            let group: Vec<Node> = iter.by_ref().take(plan.unit).collect();
            let Some(bounds) = row_bounds(&group) else {
                break;
            };
            items.push(Node::container(ctx.ids.fresh(), bounds, Direction::Row, group).with_role(Role::ListItem));
        }
        items
    };

    let wraps = plan.rows.len() > 1;
    let role = if wraps { Role::ListWrap } else { Role::ListX };
    let mut list = make_list(items, role, Direction::Row, ctx)?;
    if wraps {
        list.push_class(ClassToken::FlexWrap);
    }
    tracing::debug!(
        index = list.index,
        unit = plan.unit,
        rows = plan.rows.len(),
        items = list.children.len(),
        "folded repeated run"
    );
    Ok(list)
}

/// Wrap `items` in a new list container.
///
/// # Errors
///
/// Returns [`ConvertError::ListTooShort`] for fewer than two items.
pub fn make_list(items: Vec<Node>, role: Role, direction: Direction, ctx: &mut Context) -> Result<Node, ConvertError> {
    if items.len() < 2 {
        return Err(ConvertError::ListTooShort { found: items.len() });
    }
    let bounds = row_bounds(&items).ok_or(ConvertError::ListTooShort { found: 0 })?;
    Ok(Node::container(ctx.ids.fresh(), bounds, direction, items).with_role(role))
}

// =============================================================================
// PARALLEL LISTS
// =============================================================================

/// Transpose runs of stacked, aligned `list-x` rows into a single `list-x` of
/// column items.
///
/// # Errors
///
/// See [`detect`].
pub fn merge_parallel_lists(nodes: Vec<Node>, ctx: &mut Context) -> Result<Vec<Node>, ConvertError> {
    let tol = ctx.tol;
    let mut out = Vec::with_capacity(nodes.len());
    let mut iter = nodes.into_iter().peekable();

    while let Some(first) = iter.next() {
        if !is_row_list(&first) {
            out.push(first);
            continue;
        }
        let mut group = vec![first];
        while let Some(next) = iter.next_if(|next| mergeable(&group[group.len() - 1], next, tol)) {
            group.push(next);
        }
        if group.len() < 2 {
            out.extend(group);
            continue;
        }
        out.push(transpose(group, ctx)?);
    }
    Ok(out)
}

fn is_row_list(node: &Node) -> bool {
    node.has_role(Role::ListX) && !node.has_role(Role::ListWrap)
}

fn item_gaps(list: &Node) -> Vec<f64> {
    list.children
        .windows(2)
        .map(|w| w[1].bounds.left() - w[0].bounds.right())
        .collect()
}

fn mergeable(above: &Node, below: &Node, tol: Tolerance) -> bool {
    if !is_row_list(below) || above.children.len() != below.children.len() {
        return false;
    }
    if below.bounds.top() < above.bounds.bottom() - tol.eps() {
        return false;
    }
    let gaps_match = item_gaps(above)
        .iter()
        .zip(item_gaps(below))
        .all(|(&a, b)| tol.num_eq(a, b));
    let aligned = above
        .children
        .iter()
        .zip(&below.children)
        .all(|(a, b)| overlapping_x(&a.bounds, &b.bounds));
    gaps_match && aligned
}

fn transpose(lists: Vec<Node>, ctx: &mut Context) -> Result<Node, ConvertError> {
    let count = lists[0].children.len();
    let mut columns: Vec<Vec<Node>> = (0..count).map(|_| Vec::with_capacity(lists.len())).collect();
    for list in lists {
        for (k, mut item) in list.children.into_iter().enumerate() {
            item.roles.remove(Role::ListItem);
            columns[k].push(item);
        }
    }

    let mut items = Vec::with_capacity(count);
    for column in columns {
        let Some(bounds) = row_bounds(&column) else {
            continue;
        };
        items.push(Node::container(ctx.ids.fresh(), bounds, Direction::Column, column).with_role(Role::ListItem));
    }
    let grid = make_list(items, Role::ListX, Direction::Row, ctx)?;
    tracing::debug!(index = grid.index, columns = count, "merged parallel lists");
    Ok(grid)
}

// =============================================================================
// COLUMN LISTS
// =============================================================================

/// Fold the longest uniform vertical run in a column container into a
/// `list-y`, or tag the container itself when the run spans every child.
///
/// # Errors
///
/// See [`detect`].
pub fn detect_column_list(node: &mut Node, ctx: &mut Context) -> Result<(), ConvertError> {
    if node.direction != Direction::Column || node.roles.is_list() {
        return Ok(());
    }
    let Some((start, len)) = longest_column_run(&node.children, ctx.tol) else {
        return Ok(());
    };

    if len == node.children.len() {
        node.roles.insert(Role::ListY);
        for child in &mut node.children {
            child.roles.insert(Role::ListItem);
        }
        tracing::debug!(index = node.index, items = len, "promoted column to list-y");
        return Ok(());
    }

    let run: Vec<Node> = node
        .children
        .drain(start..start + len)
        .map(|mut n| {
            n.roles.insert(Role::ListItem);
            n
        })
        .collect();
    let list = make_list(run, Role::ListY, Direction::Column, ctx)?;
    tracing::debug!(index = list.index, parent = node.index, items = len, "folded column run");
    node.children.insert(start, list);
    Ok(())
}

fn column_similar(a: &Node, b: &Node, tol: Tolerance) -> bool {
    a.is_text() == b.is_text()
        && tol.num_eq(a.bounds.left(), b.bounds.left())
        && tol.num_eq(a.bounds.width(), b.bounds.width())
        && tol.num_eq(a.bounds.height(), b.bounds.height())
}

/// Longest run of vertically similar, evenly spaced children as
/// `(start, len)`. The earliest run wins ties.
fn longest_column_run(children: &[Node], tol: Tolerance) -> Option<(usize, usize)> {
    let gap = |i: usize| children[i + 1].bounds.top() - children[i].bounds.bottom();
    let mut best: Option<(usize, usize)> = None;
    let mut i = 0;
    while i + 1 < children.len() {
        if !column_similar(&children[i], &children[i + 1], tol) || gap(i) < -tol.eps() {
            i += 1;
            continue;
        }
        let step = gap(i);
        let mut j = i + 1;
        while j + 1 < children.len()
            && column_similar(&children[i], &children[j + 1], tol)
            && tol.num_eq(gap(j), step)
        {
            j += 1;
        }
        let len = j - i + 1;
        if best.is_none_or(|(_, l)| len > l) {
            best = Some((i, len));
        }
        i = j;
    }
    best
}
