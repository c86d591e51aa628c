//! Hit-testing against shapes in page space.
//!
//! Shapes are tested top-most first, so the first hit wins. Bounds come from
//! the editor's page transforms, which makes nested shapes hit where they are
//! drawn rather than where their local coordinates say.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::doc::{Shape, ShapeId};
use crate::editor::Editor;
use crate::geom::{Point, Rect};

/// How generous a point hit is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOptions {
    /// Accept points inside the bounds even for unfilled shapes.
    pub hit_inside: bool,
    /// Page-space slop around each shape's bounds.
    pub margin: f64,
}

impl Default for HitOptions {
    fn default() -> Self {
        Self { hit_inside: false, margin: 0.0 }
    }
}

/// Top-most shape passing `filter` under `point`.
#[must_use]
pub fn shape_at_point<F>(editor: &Editor, point: Point, options: HitOptions, filter: F) -> Option<ShapeId>
where
    F: Fn(&Shape) -> bool,
{
    editor
        .shapes()
        .into_iter()
        .rev()
        .filter(|shape| filter(shape))
        .find(|shape| hits_point(editor, shape, point, options))
        .map(|shape| shape.id)
}

/// Shapes passing `filter` whose page bounds touch `rect`, top-most first.
#[must_use]
pub fn shapes_overlapping<F>(editor: &Editor, rect: &Rect, filter: F) -> Vec<ShapeId>
where
    F: Fn(&Shape) -> bool,
{
    editor
        .shapes()
        .into_iter()
        .rev()
        .filter(|shape| filter(shape))
        .filter(|shape| editor.page_bounds(&shape.id).is_some_and(|b| b.intersects(rect)))
        .map(|shape| shape.id)
        .collect()
}

fn hits_point(editor: &Editor, shape: &Shape, point: Point, options: HitOptions) -> bool {
    let Some(bounds) = editor.page_bounds(&shape.id) else {
        return false;
    };
    if !bounds.expand(options.margin).contains(point) {
        return false;
    }
    if options.hit_inside || shape.kind().is_filled() {
        return true;
    }

    // Outline only: reject the interior past the margin.
    let inner = bounds.expand(-options.margin);
    let strictly_inside =
        point.x > inner.x && point.x < inner.max_x() && point.y > inner.y && point.y < inner.max_y();
    !strictly_inside
}
