//! Soft-failure diagnostics.
//!
//! A heuristic that cannot commit (a list candidate failing a spacing check,
//! an ambiguous alignment signal) falls back to a generic strategy and leaves
//! a [`Diagnostic`] behind. Diagnostics never abort a conversion.

use serde::{Deserialize, Serialize};

/// Pipeline stage that raised a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    TreeBuilder,
    PatternDetector,
    DirectionGrouper,
    BoxSimplifier,
    SizeResolver,
    Alignment,
    Justification,
    AttachPositioner,
}

/// A recorded fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Creation index of the node the fallback applied to.
    pub index: u64,
    pub stage: Stage,
    pub message: String,
}
