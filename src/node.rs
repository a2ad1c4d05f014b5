//! Node model: the tree unit every stage reads and rewrites.
//!
//! This module defines the per-node data (`Node`), the closed enumerations the
//! pipeline assigns (`SizeSpec`, `Direction`, `Role`), the structured style
//! tokens handed to the renderer (`ClassToken`), and the per-run creation
//! counter (`IdGen`).
//!
//! Ownership is a strict tree: a node lives in exactly one `children` or
//! `attach_nodes` list. Overlay and list relations are ordinary tree edges.

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::consts::{PX_ROUNDING_STEPS, SAME_PX};
use crate::error::ConvertError;
use crate::geom::{Axis, Bounds};

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Per-axis sizing mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeSpec {
    /// Not yet resolved. Never present after size resolution.
    #[default]
    Unknown,
    /// Explicit pixel size.
    Fixed,
    /// Content-driven size.
    Auto,
    /// Stretched by the parent.
    Constrained,
}

impl SizeSpec {
    #[must_use]
    pub fn is_resolved(self) -> bool {
        self != Self::Unknown
    }
}

/// Flex direction of a container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Unset,
    Row,
    Column,
}

impl Direction {
    /// Main axis of the container, if it is one.
    #[must_use]
    pub fn main_axis(self) -> Option<Axis> {
        match self {
            Self::Row => Some(Axis::X),
            Self::Column => Some(Axis::Y),
            Self::Unset => None,
        }
    }
}

/// Structural or semantic tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Page,
    Border,
    Divider,
    ListX,
    ListY,
    ListWrap,
    ListItem,
    Scroller,
    Btn,
    Tab,
    Dialog,
}

/// Set of [`Role`] tags. Ordered so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, role: Role) -> bool {
        self.0.insert(role)
    }

    pub fn remove(&mut self, role: Role) -> bool {
        self.0.remove(&role)
    }

    #[must_use]
    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// Add every tag from `other`.
    pub fn extend(&mut self, other: &Self) {
        self.0.extend(other.0.iter().copied());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    /// True for any detected list container tag.
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.contains(Role::ListX) || self.contains(Role::ListY) || self.contains(Role::ListWrap)
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// TEXT
// =============================================================================

/// Text carried by a leaf node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub body: TextBody,
    /// Whether the text wraps onto more than one line.
    #[serde(default)]
    pub multiline: bool,
}

/// Literal text or pre-styled runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextBody {
    Literal(String),
    Runs(Vec<TextRun>),
}

/// A styled text run. Style is opaque to the layout pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub style: Map<String, Value>,
}

// =============================================================================
// CLASS TOKENS
// =============================================================================

/// Cross-axis alignment keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Start,
    Center,
    End,
    Stretch,
}

/// Main-axis distribution keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    Start,
    Center,
    End,
    Between,
    Around,
}

/// Property a length token sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    Margin,
    Padding,
    Gap,
    Width,
    Height,
    Inset,
}

/// Which side(s) a length token applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    All,
    X,
    Y,
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// Leading side on `axis`.
    #[must_use]
    pub fn start(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::Left,
            Axis::Y => Self::Top,
        }
    }

    /// Trailing side on `axis`.
    #[must_use]
    pub fn end(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::Right,
            Axis::Y => Self::Bottom,
        }
    }

    /// Both sides on `axis`.
    #[must_use]
    pub fn both(axis: Axis) -> Self {
        match axis {
            Axis::X => Self::X,
            Axis::Y => Self::Y,
        }
    }
}

/// A render-ready style token in structured form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum ClassToken {
    Flex,
    FlexCol,
    FlexWrap,
    /// Grow to absorb free main-axis space.
    #[serde(rename = "flex-1")]
    Flex1,
    Relative,
    Absolute,
    Items { align: Align },
    Justify { justify: Justify },
    SelfAlign { align: Align },
    Length { property: Property, side: Side, px: f64 },
}

impl ClassToken {
    /// Length token with `px` rounded to the token precision.
    #[must_use]
    pub fn length(property: Property, side: Side, px: f64) -> Self {
        Self::Length { property, side, px: round_px(px) }
    }
}

/// Round a pixel value to token precision, folding `-0.0` into `0.0`.
#[must_use]
pub fn round_px(px: f64) -> f64 {
    // Adding positive zero turns -0.0 into 0.0.
    (px * PX_ROUNDING_STEPS).round() / PX_ROUNDING_STEPS + 0.0
}

// =============================================================================
// NODE
// =============================================================================

/// One box in the design tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Creation-order stamp. Only used for tie-breaking.
    #[serde(default)]
    pub index: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub bounds: Bounds,
    #[serde(default)]
    pub width_spec: SizeSpec,
    #[serde(default)]
    pub height_spec: SizeSpec,
    #[serde(default)]
    pub direction: Direction,
    #[serde(rename = "role", default, skip_serializing_if = "RoleSet::is_empty")]
    pub roles: RoleSet,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attach_nodes: Vec<Node>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_list: Vec<ClassToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Text>,
    /// Synthesized invisible flex spacer.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub spacer: bool,
    /// Opaque attributes carried through for the renderer.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attrs: Map<String, Value>,
}

impl Node {
    #[must_use]
    pub fn new(index: u64, bounds: Bounds) -> Self {
        Self {
            index,
            name: None,
            bounds,
            width_spec: SizeSpec::Unknown,
            height_spec: SizeSpec::Unknown,
            direction: Direction::Unset,
            roles: RoleSet::new(),
            children: Vec::new(),
            attach_nodes: Vec::new(),
            class_list: Vec::new(),
            text: None,
            spacer: false,
            attrs: Map::new(),
        }
    }

    /// Leaf carrying literal text.
    #[must_use]
    pub fn text(index: u64, bounds: Bounds, content: impl Into<String>, multiline: bool) -> Self {
        let mut node = Self::new(index, bounds);
        node.text = Some(Text { body: TextBody::Literal(content.into()), multiline });
        node
    }

    /// Synthesized container with a direction already decided.
    #[must_use]
    pub fn container(index: u64, bounds: Bounds, direction: Direction, children: Vec<Node>) -> Self {
        let mut node = Self::new(index, bounds);
        node.direction = direction;
        node.children = children;
        node
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_specs(mut self, width: SizeSpec, height: SizeSpec) -> Self {
        self.width_spec = width;
        self.height_spec = height;
        self
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        self.text.is_some()
    }

    #[must_use]
    pub fn is_multiline_text(&self) -> bool {
        self.text.as_ref().is_some_and(|t| t.multiline)
    }

    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }

    /// Size spec on `axis`.
    #[must_use]
    pub fn spec(&self, axis: Axis) -> SizeSpec {
        match axis {
            Axis::X => self.width_spec,
            Axis::Y => self.height_spec,
        }
    }

    pub fn set_spec(&mut self, axis: Axis, spec: SizeSpec) {
        match axis {
            Axis::X => self.width_spec = spec,
            Axis::Y => self.height_spec = spec,
        }
    }

    /// Append a style token. Duplicates are kept; emission order matters.
    pub fn push_class(&mut self, token: ClassToken) {
        self.class_list.push(token);
    }

    /// Append a length token unless the value is sub-pixel.
    pub fn push_length(&mut self, property: Property, side: Side, px: f64) {
        if round_px(px).abs() < SAME_PX {
            return;
        }
        self.class_list.push(ClassToken::length(property, side, px));
    }

    #[must_use]
    pub fn has_class(&self, token: &ClassToken) -> bool {
        self.class_list.contains(token)
    }

    /// Append tokens from `other` that this list does not already hold.
    pub fn merge_classes(&mut self, other: Vec<ClassToken>) {
        for token in other {
            if !self.class_list.contains(&token) {
                self.class_list.push(token);
            }
        }
    }

    /// Visit this node and every descendant, children before overlays.
    pub fn visit(&self, f: &mut impl FnMut(&Node)) {
        f(self);
        for child in &self.children {
            child.visit(f);
        }
        for overlay in &self.attach_nodes {
            overlay.visit(f);
        }
    }

    /// Largest creation index anywhere in this subtree.
    #[must_use]
    pub fn max_index(&self) -> u64 {
        let mut max = self.index;
        self.visit(&mut |n| max = max.max(n.index));
        max
    }
}

// =============================================================================
// ID COUNTER
// =============================================================================

/// Per-run creation counter for synthesized nodes.
///
/// Owned by one conversion; two conversions never share a counter.
#[derive(Debug, Clone)]
pub struct IdGen {
    next: u64,
}

impl IdGen {
    #[must_use]
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }

    /// Counter that continues after every index already present in `root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::IndexOverflow`] if `root` already uses
    /// `u64::MAX`.
    pub fn after(root: &Node) -> Result<Self, ConvertError> {
        let max = root.max_index();
        let next = max.checked_add(1).ok_or(ConvertError::IndexOverflow { index: max })?;
        Ok(Self { next })
    }

    /// Take the next index. Saturates at `u64::MAX`.
    pub fn fresh(&mut self) -> u64 {
        let index = self.next;
        self.next = self.next.saturating_add(1);
        index
    }

    /// Index the next call to [`IdGen::fresh`] will return.
    #[must_use]
    pub fn peek(&self) -> u64 {
        self.next
    }
}
