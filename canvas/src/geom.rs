//! Geometry primitives shared by the editor, the engines and the host.
//!
//! Three coordinate spaces are in play. *Screen* space is CSS pixels as the
//! host reports them; the [`Camera`] maps it onto *page* space, the infinite
//! canvas. Every shape's `x`/`y` is stored in its *parent* space, which is page
//! space for top-level shapes and the parent's local frame otherwise.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point (or offset) in screen, page or parent space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Move `t` of the way from `self` toward `to`.
    #[must_use]
    pub fn lerp(self, to: Point, t: f64) -> Point {
        Point {
            x: self.x + (to.x - self.x) * t,
            y: self.y + (to.y - self.y) * t,
        }
    }

    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Width and height of a shape's geometry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle. Edges are inclusive for containment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle with its top-left corner at `origin`.
    #[must_use]
    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Square of side `side` centered on `center`.
    #[must_use]
    pub fn centered(center: Point, side: f64) -> Self {
        Self::new(center.x - side / 2.0, center.y - side / 2.0, side, side)
    }

    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.x && pt.x <= self.max_x() && pt.y >= self.y && pt.y <= self.max_y()
    }

    /// Whether the two rectangles share any area or edge.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.max_x() && other.x <= self.max_x() && self.y <= other.max_y() && other.y <= self.max_y()
    }

    /// Grow (or with a negative `by`, shrink) on every side.
    #[must_use]
    pub fn expand(&self, by: f64) -> Rect {
        Rect::new(self.x - by, self.y - by, self.width + by * 2.0, self.height + by * 2.0)
    }
}

/// Camera state for pan/zoom on the infinite canvas.
///
/// `pan_x` / `pan_y` are in CSS pixels.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    /// Convert a screen-space point (CSS pixels) to page coordinates.
    #[must_use]
    pub fn screen_to_page(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.zoom,
            y: (screen.y - self.pan_y) / self.zoom,
        }
    }

    /// Convert a page-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn page_to_screen(&self, page: Point) -> Point {
        Point {
            x: page.x * self.zoom + self.pan_x,
            y: page.y * self.zoom + self.pan_y,
        }
    }

    /// Shift the view by a screen-space delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }
}
