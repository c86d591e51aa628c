//! Document model: shapes and the in-memory shape store.
//!
//! A [`Shape`] is one record on the canvas: where it sits in its parent's
//! frame, where it stacks among its siblings, and its per-kind props. A
//! [`ShapePatch`] is a sparse edit. The [`ShapeStore`] owns every live shape
//! and knows nothing about bindings or hooks; the editor layers those on top.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::Size;
use crate::index::OrderKey;
use crate::shapes::{ShapeKind, ShapeProps};

/// Unique identifier for a shape.
pub type ShapeId = Uuid;

/// A shape as stored in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Unique identifier for this shape.
    pub id: ShapeId,
    /// Parent shape, or `None` for shapes placed directly on the page.
    pub parent_id: Option<ShapeId>,
    /// Left edge in the parent's coordinate space.
    pub x: f64,
    /// Top edge in the parent's coordinate space.
    pub y: f64,
    /// Stacking order among siblings; higher keys paint above lower ones.
    pub index: OrderKey,
    /// Per-kind properties.
    pub props: ShapeProps,
}

impl Shape {
    #[must_use]
    pub fn kind(&self) -> ShapeKind {
        self.props.kind()
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.props.size()
    }
}

/// Sparse update for a shape. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapePatch {
    /// New x position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// New y position, if being updated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Replacement props; must keep the shape's kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<ShapeProps>,
}

impl ShapePatch {
    /// Patch that only moves the shape.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), props: None }
    }

    /// Patch that only replaces props.
    #[must_use]
    pub fn props(props: ShapeProps) -> Self {
        Self { props: Some(props), ..Default::default() }
    }
}

/// Outcome of applying a patch to the store.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchResult {
    /// No shape with that id.
    Missing,
    /// The patch would change the shape's kind and was rejected.
    KindMismatch { expected: ShapeKind, found: ShapeKind },
    /// Every field already held the patched value.
    Unchanged,
    /// The shape changed; carries the record as it was before.
    Changed(Box<Shape>),
}

/// In-memory store of shapes.
pub struct ShapeStore {
    shapes: HashMap<ShapeId, Shape>,
}

impl ShapeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: HashMap::new() }
    }

    /// Insert or replace a shape. If a shape with the same `id` already
    /// exists it is overwritten.
    pub fn insert(&mut self, shape: Shape) {
        self.shapes.insert(shape.id, shape);
    }

    /// Remove a shape by id, returning it if it was present.
    pub fn remove(&mut self, id: &ShapeId) -> Option<Shape> {
        self.shapes.remove(id)
    }

    /// Return a reference to a shape by id.
    #[must_use]
    pub fn get(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Apply a partial update to an existing shape.
    pub fn apply_patch(&mut self, id: &ShapeId, patch: &ShapePatch) -> PatchResult {
        let Some(shape) = self.shapes.get_mut(id) else {
            return PatchResult::Missing;
        };
        if let Some(ref props) = patch.props {
            if props.kind() != shape.kind() {
                return PatchResult::KindMismatch { expected: shape.kind(), found: props.kind() };
            }
        }

        let before = shape.clone();
        if let Some(x) = patch.x {
            shape.x = x;
        }
        if let Some(y) = patch.y {
            shape.y = y;
        }
        if let Some(ref props) = patch.props {
            shape.props = props.clone();
        }

        if *shape == before {
            PatchResult::Unchanged
        } else {
            PatchResult::Changed(Box::new(before))
        }
    }

    /// Ids of the direct children of `parent` (`None` = page), sorted by
    /// `(index, id)`.
    #[must_use]
    pub fn children_of(&self, parent: Option<ShapeId>) -> Vec<ShapeId> {
        let mut children: Vec<&Shape> = self.shapes.values().filter(|s| s.parent_id == parent).collect();
        children.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.id.cmp(&b.id)));
        children.into_iter().map(|s| s.id).collect()
    }

    /// All shapes in paint order: page children by index, each followed by
    /// its own descendants. Shapes whose parent is missing are skipped.
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Shape> {
        let mut out = Vec::with_capacity(self.shapes.len());
        let mut stack: Vec<ShapeId> = self.children_of(None);
        stack.reverse();
        while let Some(id) = stack.pop() {
            let Some(shape) = self.shapes.get(&id) else {
                continue;
            };
            out.push(shape);
            let mut children = self.children_of(Some(id));
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// Highest stacking key among the children of `parent`.
    #[must_use]
    pub fn top_index(&self, parent: Option<ShapeId>) -> Option<&OrderKey> {
        self.shapes.values().filter(|s| s.parent_id == parent).map(|s| &s.index).max()
    }

    /// Number of shapes currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns `true` if the store contains no shapes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Default for ShapeStore {
    fn default() -> Self {
        Self::new()
    }
}
