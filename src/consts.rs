//! Shared numeric constants for the conversion pipeline.

// ── Tolerance ───────────────────────────────────────────────────

/// Default slack in pixels for "equal enough" geometric comparisons.
pub const DEFAULT_TOLERANCE_PX: f64 = 2.0;

/// Differences below this are treated as the same pixel position regardless
/// of the configured tolerance.
pub const SAME_PX: f64 = 0.5;

// ── Tree building ───────────────────────────────────────────────

/// Largest extent (in pixels) a box may have on one axis to count as a hairline.
pub const HAIRLINE_MAX_PX: f64 = 1.5;

// ── Tokens ──────────────────────────────────────────────────────

/// Pixel values in class tokens are rounded to this many steps per pixel.
pub const PX_ROUNDING_STEPS: f64 = 100.0;
