//! Fatal conversion errors.
//!
//! These signal malformed upstream data or a broken pipeline invariant. They
//! abort the conversion; heuristic misses are reported through
//! [`crate::diag`] instead.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::geom::Axis;

/// Stable machine-readable code for an error.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("root node {index} is not a container")]
    RootNotContainer { index: u64 },
    #[error("node {index} has degenerate bounds")]
    DegenerateBounds { index: u64 },
    #[error("node {index} has an unresolved {axis:?} size spec")]
    UnresolvedSpec { index: u64, axis: Axis },
    #[error("list detection needs at least 2 items, found {found}")]
    ListTooShort { found: usize },
    #[error("node index {index} leaves no room for synthesized nodes")]
    IndexOverflow { index: u64 },
}

impl ErrorCode for ConvertError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidOptions(_) => "E_INVALID_OPTIONS",
            Self::RootNotContainer { .. } => "E_ROOT_NOT_CONTAINER",
            Self::DegenerateBounds { .. } => "E_DEGENERATE_BOUNDS",
            Self::UnresolvedSpec { .. } => "E_UNRESOLVED_SPEC",
            Self::ListTooShort { .. } => "E_LIST_TOO_SHORT",
            Self::IndexOverflow { .. } => "E_INDEX_OVERFLOW",
        }
    }
}
