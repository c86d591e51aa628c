//! Shape kinds, the color palette, and per-kind behavior.
//!
//! Every shape carries a [`ShapeProps`] value whose variant *is* its kind. The
//! behavior that differs per kind (default props, geometry, whether it can
//! bind to another shape) lives in one `match` per question on [`ShapeKind`],
//! so adding a kind means visiting each table below once.

#[cfg(test)]
#[path = "shapes_test.rs"]
mod shapes_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::binding::BindingKind;
use crate::consts::{DEFAULT_CONTAINER_SIZE, DEFAULT_TARGET_SIZE, ELEMENT_SIZE};
use crate::geom::Size;

/// The kind of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Row container sized by its layout bindings.
    Container,
    /// Fixed-size colored box that can join a container.
    Element,
    /// Hover target for the cursor demo.
    Target,
}

impl ShapeKind {
    /// Props a shape of this kind starts with.
    #[must_use]
    pub fn default_props(self) -> ShapeProps {
        match self {
            Self::Container => ShapeProps::Container {
                width: DEFAULT_CONTAINER_SIZE,
                height: DEFAULT_CONTAINER_SIZE,
            },
            Self::Element => ShapeProps::Element { color: Color::default() },
            Self::Target => ShapeProps::Target {
                width: DEFAULT_TARGET_SIZE,
                height: DEFAULT_TARGET_SIZE,
                color: Color::Grey,
                idle_color: Color::Grey,
            },
        }
    }

    /// Whether a shape of this kind can be the `from` side of a `kind` binding
    /// whose `to` side is a shape of kind `to`.
    #[must_use]
    pub fn can_bind(self, kind: BindingKind, to: ShapeKind) -> bool {
        match (self, kind) {
            (Self::Container, BindingKind::Layout) => to == Self::Element,
            (Self::Element | Self::Target, BindingKind::Layout) => false,
        }
    }

    /// Filled shapes accept hits anywhere inside their bounds. Containers are
    /// frames and only take hits on their rim.
    #[must_use]
    pub fn is_filled(self) -> bool {
        match self {
            Self::Container => false,
            Self::Element | Self::Target => true,
        }
    }

    /// Elements run the drag-resolution hooks while translated.
    #[must_use]
    pub fn joins_layout(self) -> bool {
        matches!(self, Self::Element)
    }
}

/// The fixed palette shapes draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Grey,
    Red,
    Orange,
    Yellow,
    Green,
    #[default]
    Blue,
    Violet,
}

impl Color {
    /// Every palette entry, in swatch order.
    pub const ALL: [Color; 8] = [
        Color::Black,
        Color::Grey,
        Color::Red,
        Color::Orange,
        Color::Yellow,
        Color::Green,
        Color::Blue,
        Color::Violet,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Grey => "grey",
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Violet => "violet",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for a color name outside the palette.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown color: {0}")]
pub struct UnknownColor(pub String);

impl FromStr for Color {
    type Err = UnknownColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownColor(s.to_owned()))
    }
}

/// Per-kind shape properties. The variant doubles as the shape's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeProps {
    Container { width: f64, height: f64 },
    Element { color: Color },
    Target { width: f64, height: f64, color: Color, idle_color: Color },
}

impl ShapeProps {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Container { .. } => ShapeKind::Container,
            Self::Element { .. } => ShapeKind::Element,
            Self::Target { .. } => ShapeKind::Target,
        }
    }

    /// Geometry size in the shape's local frame.
    #[must_use]
    pub fn size(&self) -> Size {
        match *self {
            Self::Container { width, height } | Self::Target { width, height, .. } => Size::new(width, height),
            Self::Element { .. } => Size::new(ELEMENT_SIZE, ELEMENT_SIZE),
        }
    }

    /// Fill color, for kinds that have one.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        match *self {
            Self::Container { .. } => None,
            Self::Element { color } | Self::Target { color, .. } => Some(color),
        }
    }
}
