//! Conversion options, from code, JSON, or environment variables.

use serde::Deserialize;

use crate::consts::DEFAULT_TOLERANCE_PX;
use crate::error::ConvertError;

pub const ENV_TOLERANCE: &str = "BOXFLOW_TOLERANCE";
pub const ENV_MULTILINE_FIXED_WIDTH: &str = "BOXFLOW_MULTILINE_FIXED_WIDTH";
pub const ENV_PAGE_FILLS_VIEWPORT: &str = "BOXFLOW_PAGE_FILLS_VIEWPORT";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Slack in pixels for geometric equality.
    pub tolerance: f64,
    /// Multi-line text keeps its design width instead of sizing to content.
    pub multiline_text_fixed_width: bool,
    /// A `page` root with no width hint stretches to the viewport.
    pub page_fills_viewport: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE_PX,
            multiline_text_fixed_width: true,
            page_fills_viewport: true,
        }
    }
}

impl ConvertOptions {
    /// Build options from environment variables.
    ///
    /// Optional:
    /// - `BOXFLOW_TOLERANCE`: pixels, default 2
    /// - `BOXFLOW_MULTILINE_FIXED_WIDTH`: `true`/`false`, default true
    /// - `BOXFLOW_PAGE_FILLS_VIEWPORT`: `true`/`false`, default true
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidOptions`] when a variable is present but
    /// does not parse, or the resulting options fail [`ConvertOptions::validate`].
    pub fn from_env() -> Result<Self, ConvertError> {
        let defaults = Self::default();
        let options = Self {
            tolerance: env_parse(ENV_TOLERANCE, defaults.tolerance, |v| v.parse::<f64>().ok())?,
            multiline_text_fixed_width: env_parse(
                ENV_MULTILINE_FIXED_WIDTH,
                defaults.multiline_text_fixed_width,
                parse_bool,
            )?,
            page_fills_viewport: env_parse(ENV_PAGE_FILLS_VIEWPORT, defaults.page_fills_viewport, parse_bool)?,
        };
        options.validate()?;
        Ok(options)
    }

    /// Reject options no conversion can run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::InvalidOptions`] for a negative or non-finite tolerance.
    pub fn validate(&self) -> Result<(), ConvertError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ConvertError::InvalidOptions(format!(
                "tolerance must be a finite non-negative number, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

fn env_parse<T>(key: &str, default: T, parse: impl Fn(&str) -> Option<T>) -> Result<T, ConvertError> {
    match std::env::var(key) {
        Ok(raw) => parse(raw.trim()).ok_or_else(|| ConvertError::InvalidOptions(format!("{key}: cannot parse '{raw}'"))),
        Err(_) => Ok(default),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
