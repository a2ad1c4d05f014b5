//! Box geometry and tolerance-aware comparisons.
//!
//! Every stage of the pipeline compares pixel positions that came out of a
//! design tool, so exact float equality is never used. All comparisons route
//! through [`Tolerance`], and all box relations through the predicates below.
//!
//! Containment is one-directional: the inner box may poke up to `eps` outside
//! the outer box and still count as contained. Overlap is strict interval
//! intersection on both axes, with no slack.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_TOLERANCE_PX, SAME_PX};

/// A layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal.
    X,
    /// Vertical.
    Y,
}

impl Axis {
    /// The perpendicular axis.
    #[must_use]
    pub fn cross(self) -> Self {
        match self {
            Self::X => Self::Y,
            Self::Y => Self::X,
        }
    }
}

/// Absolute pixel box.
///
/// Only the four edges are stored; `width` and `height` are derived, so
/// `width == right - left` cannot drift no matter how a pass edits a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BoundsRepr", into = "BoundsRepr")]
pub struct Bounds {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
}

impl Bounds {
    /// Box at `(left, top)` with the given size. Negative sizes collapse to zero.
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self::from_edges(left, top, left + width, top + height)
    }

    /// Box from its four edges. A right edge left of `left` collapses to `left`
    /// (same for bottom/top).
    #[must_use]
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right: right.max(left),
            bottom: bottom.max(top),
        }
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.left
    }

    #[must_use]
    pub fn top(&self) -> f64 {
        self.top
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.right
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.bottom
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Leading edge on `axis` (left or top).
    #[must_use]
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }

    /// Trailing edge on `axis` (right or bottom).
    #[must_use]
    pub fn end(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.right,
            Axis::Y => self.bottom,
        }
    }

    /// Extent on `axis` (width or height).
    #[must_use]
    pub fn extent(&self, axis: Axis) -> f64 {
        self.end(axis) - self.start(axis)
    }

    /// Midpoint on `axis`.
    #[must_use]
    pub fn center(&self, axis: Axis) -> f64 {
        f64::midpoint(self.start(axis), self.end(axis))
    }

    /// Copy of this box with the `axis` span replaced.
    #[must_use]
    pub fn with_span(&self, axis: Axis, start: f64, end: f64) -> Self {
        match axis {
            Axis::X => Self::from_edges(start, self.top, end, self.bottom),
            Axis::Y => Self::from_edges(self.left, start, self.right, end),
        }
    }

    /// Smallest box covering both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Smallest box covering every box in `iter`, or `None` when empty.
    pub fn union_all<'a>(iter: impl IntoIterator<Item = &'a Self>) -> Option<Self> {
        iter.into_iter().fold(None, |acc: Option<Self>, b| match acc {
            Some(a) => Some(a.union(b)),
            None => Some(*b),
        })
    }

    /// True when the box has no area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }
}

/// Wire shape for [`Bounds`]. Accepts either `right`/`bottom` or
/// `width`/`height` on input and always writes all six fields.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct BoundsRepr {
    left: f64,
    top: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<f64>,
}

impl From<BoundsRepr> for Bounds {
    fn from(repr: BoundsRepr) -> Self {
        let right = repr.right.or(repr.width.map(|w| repr.left + w)).unwrap_or(repr.left);
        let bottom = repr.bottom.or(repr.height.map(|h| repr.top + h)).unwrap_or(repr.top);
        Self::from_edges(repr.left, repr.top, right, bottom)
    }
}

impl From<Bounds> for BoundsRepr {
    fn from(b: Bounds) -> Self {
        Self {
            left: b.left,
            top: b.top,
            right: Some(b.right),
            bottom: Some(b.bottom),
            width: Some(b.width()),
            height: Some(b.height()),
        }
    }
}

// =============================================================================
// TOLERANCE
// =============================================================================

/// Numeric slack used for every "equal enough" comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    eps: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self { eps: DEFAULT_TOLERANCE_PX }
    }
}

impl Tolerance {
    #[must_use]
    pub fn new(eps: f64) -> Self {
        Self { eps: eps.abs() }
    }

    #[must_use]
    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// Sub-pixel identity, independent of the configured slack.
    #[must_use]
    pub fn num_same(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < SAME_PX
    }

    /// Equal within `eps`.
    #[must_use]
    pub fn num_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    /// `a` is greater than `b` by more than `eps`.
    #[must_use]
    pub fn num_gt(&self, a: f64, b: f64) -> bool {
        a - b > self.eps
    }

    /// `a` is not meaningfully greater than `b`.
    #[must_use]
    pub fn num_lte(&self, a: f64, b: f64) -> bool {
        !self.num_gt(a, b)
    }

    /// Value is effectively zero (sub-pixel).
    #[must_use]
    pub fn is_zero(&self, v: f64) -> bool {
        self.num_same(v, 0.0)
    }
}

// =============================================================================
// PREDICATES
// =============================================================================

/// Strict interval intersection on the x axis.
#[must_use]
pub fn overlapping_x(a: &Bounds, b: &Bounds) -> bool {
    a.left < b.right && b.left < a.right
}

/// Strict interval intersection on the y axis.
#[must_use]
pub fn overlapping_y(a: &Bounds, b: &Bounds) -> bool {
    a.top < b.bottom && b.top < a.bottom
}

/// Strict intersection on both axes.
#[must_use]
pub fn overlapping(a: &Bounds, b: &Bounds) -> bool {
    overlapping_x(a, b) && overlapping_y(a, b)
}

/// Overlap test along a single axis.
#[must_use]
pub fn overlapping_on(axis: Axis, a: &Bounds, b: &Bounds) -> bool {
    match axis {
        Axis::X => overlapping_x(a, b),
        Axis::Y => overlapping_y(a, b),
    }
}

/// `inner` lies within `outer` on x, allowing `inner` to stick out by up to
/// `eps`. The two spans must also intersect, so a sliver sitting just past
/// the outer edge is never "contained".
#[must_use]
pub fn contained_x(inner: &Bounds, outer: &Bounds, tol: Tolerance) -> bool {
    inner.left >= outer.left - tol.eps && inner.right <= outer.right + tol.eps && overlapping_x(inner, outer)
}

/// Vertical counterpart of [`contained_x`].
#[must_use]
pub fn contained_y(inner: &Bounds, outer: &Bounds, tol: Tolerance) -> bool {
    inner.top >= outer.top - tol.eps && inner.bottom <= outer.bottom + tol.eps && overlapping_y(inner, outer)
}

/// Containment on both axes.
#[must_use]
pub fn contained(inner: &Bounds, outer: &Bounds, tol: Tolerance) -> bool {
    contained_x(inner, outer, tol) && contained_y(inner, outer, tol)
}

/// Both boxes match edge for edge within tolerance.
#[must_use]
pub fn same_bounds(a: &Bounds, b: &Bounds, tol: Tolerance) -> bool {
    tol.num_eq(a.left, b.left)
        && tol.num_eq(a.top, b.top)
        && tol.num_eq(a.right, b.right)
        && tol.num_eq(a.bottom, b.bottom)
}

/// Area of a box.
#[must_use]
pub fn area(b: &Bounds) -> f64 {
    b.area()
}
