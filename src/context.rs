//! Per-run conversion state threaded through every stage.

use crate::config::ConvertOptions;
use crate::diag::{Diagnostic, Stage};
use crate::geom::Tolerance;
use crate::node::IdGen;

/// Options, id counter, and diagnostic sink for one conversion.
///
/// Each call to [`crate::convert`] builds its own context, so concurrent
/// conversions never share counters or diagnostics.
#[derive(Debug)]
pub struct Context {
    pub options: ConvertOptions,
    pub tol: Tolerance,
    pub ids: IdGen,
    diagnostics: Vec<Diagnostic>,
}

impl Context {
    #[must_use]
    pub fn new(options: ConvertOptions, ids: IdGen) -> Self {
        let tol = Tolerance::new(options.tolerance);
        Self { options, tol, ids, diagnostics: Vec::new() }
    }

    /// Record a soft failure and log it.
    pub fn report(&mut self, stage: Stage, index: u64, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(?stage, index, %message, "heuristic fallback");
        self.diagnostics.push(Diagnostic { index, stage, message });
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
