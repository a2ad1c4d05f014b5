//! Flex layout reconstruction for absolutely positioned design boxes.
//!
//! A design export describes every element by its pixel bounds and nothing
//! else. This crate rebuilds the structure a designer implied: which boxes
//! contain which, which ones float above the flow, which siblings repeat as a
//! list, and how each container arranges, aligns, and sizes its children. The
//! result is the same tree with directions, size specs, roles, and structured
//! style tokens filled in, ready for a renderer to serialize.
//!
//! Conversion runs in two phases over one owned tree:
//!
//! - **build** ([`build`]): containment, overlays, lists, row/column grouping,
//!   wrapper folding
//! - **measure** ([`measure`]): size specs, alignment, distribution, overlay
//!   offsets
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`geom`] | Bounds and tolerance-aware predicates |
//! | [`node`] | Node model, roles, size specs, class tokens, id counter |
//! | [`build`] | Tree builder, pattern detector, direction grouper, simplifier |
//! | [`measure`] | Size resolver, alignment, justification, overlay positioning |
//! | [`config`] | Conversion options |
//! | [`context`] | Per-run options, id counter, and diagnostic sink |
//! | [`diag`] | Soft-failure diagnostics |
//! | [`error`] | Fatal conversion errors |
//! | [`consts`] | Shared numeric constants |


pub mod build;
pub mod config;
pub mod consts;
pub mod context;
pub mod diag;
pub mod error;
pub mod geom;
pub mod measure;
pub mod node;

use serde::Serialize;

pub use config::ConvertOptions;
pub use diag::{Diagnostic, Stage};
pub use error::{ConvertError, ErrorCode};
pub use geom::{Axis, Bounds, Tolerance};
pub use node::{ClassToken, Direction, IdGen, Node, Role, SizeSpec};

use context::Context;

/// Output of a successful [`convert`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    /// The finished tree.
    pub root: Node,
    /// Every heuristic fallback taken during the run, in order.
    pub diagnostics: Vec<Diagnostic>,
    /// First creation index not used by any node in `root`.
    pub next_index: u64,
}

/// Convert a tree of absolutely positioned boxes into a flex layout tree.
///
/// Synthesized nodes are stamped with indices following the largest index in
/// the input.
///
/// # Errors
///
/// - [`ConvertError::InvalidOptions`] if `options` fail validation
/// - [`ConvertError::RootNotContainer`] / [`ConvertError::DegenerateBounds`]
///   if the root cannot be laid out
/// - [`ConvertError::IndexOverflow`] if the input already uses the largest
///   possible index
/// - [`ConvertError::UnresolvedSpec`] / [`ConvertError::ListTooShort`] if a
///   pipeline invariant breaks
pub fn convert(root: Node, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    options.validate()?;
    let mut ctx = Context::new(options.clone(), IdGen::after(&root)?);
    tracing::info!(index = root.index, tolerance = options.tolerance, "conversion started");

    let root = build::build(root, &mut ctx)?;
    let root = measure::measure(root, &mut ctx)?;

    let next_index = ctx.ids.peek();
    let diagnostics = ctx.into_diagnostics();
    tracing::info!(index = root.index, diagnostics = diagnostics.len(), next_index, "conversion finished");
    Ok(Conversion { root, diagnostics, next_index })
}
