//! Demo configuration parsed from environment variables.
//!
//! Every knob has a default in [`crate::consts`]. Overrides are read through
//! a lookup function so tests can feed a map instead of touching the process
//! environment. A value that is present but unusable is an error; it is never
//! silently replaced by the default.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::env::VarError;
use std::path::PathBuf;

use crate::consts::{CURSOR_LERP, CURSOR_SIZE, LAYOUT_PADDING, SLOT_HEIGHT, SLOT_WIDTH};
use crate::geom::{Point, Size};
use crate::shapes::Color;

/// Errors from reading configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: '{value}' is not a number")]
    NotANumber { var: &'static str, value: String },

    #[error("{var}: {value} is out of range (expected {expected})")]
    OutOfRange { var: &'static str, value: f64, expected: &'static str },

    #[error("{var}: unknown palette color '{value}'")]
    UnknownColor { var: &'static str, value: String },
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Geometry of a container row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub slot_width: f64,
    pub slot_height: f64,
    pub padding: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { slot_width: SLOT_WIDTH, slot_height: SLOT_HEIGHT, padding: LAYOUT_PADDING }
    }
}

impl LayoutConfig {
    /// Container-local origin of member `i`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn slot_offset(&self, i: usize) -> Point {
        Point::new(self.padding + i as f64 * (self.slot_width + self.padding), self.padding)
    }

    /// Container size for `n` members. Zero members leaves only the padding.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn container_size(&self, n: usize) -> Size {
        let gaps = n.saturating_sub(1) as f64;
        Size::new(
            self.padding + n as f64 * self.slot_width + gaps * self.padding + self.padding,
            self.padding + self.slot_height + self.padding,
        )
    }

    /// Horizontal distance between consecutive member origins.
    #[must_use]
    pub fn stride(&self) -> f64 {
        self.slot_width + self.padding
    }
}

// =============================================================================
// CURSOR
// =============================================================================

/// Cursor demo tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorConfig {
    /// Fraction of the remaining distance covered per tick, in `(0, 1]`.
    pub lerp: f64,
    /// Side of the cursor square in page units.
    pub size: f64,
    /// Color a target takes while the cursor overlaps it.
    pub highlight: Color,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self { lerp: CURSOR_LERP, size: CURSOR_SIZE, highlight: Color::Red }
    }
}

// =============================================================================
// DEMO
// =============================================================================

/// Everything the demo runner needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DemoConfig {
    pub layout: LayoutConfig,
    pub cursor: CursorConfig,
    /// Pointer script to replay instead of the built-in one.
    pub script: Option<PathBuf>,
}

impl DemoConfig {
    /// Read configuration from the process environment.
    ///
    /// - `LAYOUT_SLOT_WIDTH`, `LAYOUT_SLOT_HEIGHT`, `LAYOUT_PADDING`
    /// - `CURSOR_LERP`, `CURSOR_SIZE`, `CURSOR_HIGHLIGHT`
    /// - `DEMO_SCRIPT`
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for the first unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| match std::env::var(key) {
            Ok(value) => Some(value),
            Err(VarError::NotPresent) => None,
            Err(VarError::NotUnicode(raw)) => Some(raw.to_string_lossy().into_owned()),
        })
    }

    /// Read configuration through `lookup`, which returns the raw value of a
    /// variable or `None` when it is unset.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for the first unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let layout = LayoutConfig {
            slot_width: parse_positive(&lookup, "LAYOUT_SLOT_WIDTH", SLOT_WIDTH)?,
            slot_height: parse_positive(&lookup, "LAYOUT_SLOT_HEIGHT", SLOT_HEIGHT)?,
            padding: parse_non_negative(&lookup, "LAYOUT_PADDING", LAYOUT_PADDING)?,
        };

        let lerp = parse_f64(&lookup, "CURSOR_LERP", CURSOR_LERP)?;
        if !(lerp > 0.0 && lerp <= 1.0) {
            return Err(ConfigError::OutOfRange { var: "CURSOR_LERP", value: lerp, expected: "(0, 1]" });
        }
        let cursor = CursorConfig {
            lerp,
            size: parse_positive(&lookup, "CURSOR_SIZE", CURSOR_SIZE)?,
            highlight: parse_color(&lookup, "CURSOR_HIGHLIGHT", Color::Red)?,
        };

        let script = lookup("DEMO_SCRIPT").filter(|s| !s.trim().is_empty()).map(PathBuf::from);

        Ok(Self { layout, cursor, script })
    }
}

fn parse_f64<F>(lookup: &F, var: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    let parsed = raw.trim().parse::<f64>();
    match parsed {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ConfigError::NotANumber { var, value: raw }),
    }
}

fn parse_positive<F>(lookup: &F, var: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_f64(lookup, var, default)?;
    if value > 0.0 { Ok(value) } else { Err(ConfigError::OutOfRange { var, value, expected: "> 0" }) }
}

fn parse_non_negative<F>(lookup: &F, var: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = parse_f64(lookup, var, default)?;
    if value >= 0.0 { Ok(value) } else { Err(ConfigError::OutOfRange { var, value, expected: ">= 0" }) }
}

fn parse_color<F>(lookup: &F, var: &'static str, default: Color) -> Result<Color, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.parse::<Color>().map_err(|_| ConfigError::UnknownColor { var, value: raw }),
    }
}
