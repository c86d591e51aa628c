//! The editor: the single handle every engine function receives.
//!
//! DESIGN
//! ======
//! `Editor` owns the shape store and the binding store and is the only place
//! either is mutated. Every effective write is recorded as a [`Change`] for the
//! host, and every binding-related write enqueues a hook event. Hook events
//! are delivered to the [`BindingUtil`] registered for the binding's kind.
//!
//! Delivery is synchronous and ordered. The mutating call drains the queue
//! before it returns; a handler that mutates the editor in turn only enqueues,
//! and the outer drain picks the new events up after the current handler has
//! run to completion. Shape and binding lookups that miss are plain `None`s
//! here; the engines decide whether a miss is an error.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use serde::Serialize;
use tracing::{trace, warn};
use uuid::Uuid;

use crate::binding::{Binding, BindingId, BindingKind, BindingStore};
use crate::consts::MAX_HOOK_CASCADE;
use crate::doc::{PatchResult, Shape, ShapeId, ShapePatch, ShapeStore};
use crate::geom::{Point, Rect};
use crate::index::{IndexError, OrderKey, key_between};
use crate::shapes::{ShapeKind, ShapeProps};

// =============================================================================
// ERRORS
// =============================================================================

/// Errors produced by editor mutations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error("shape not found: {0}")]
    ShapeNotFound(ShapeId),

    #[error("shape already exists: {0}")]
    DuplicateShape(ShapeId),

    #[error("binding not found: {0}")]
    BindingNotFound(BindingId),

    #[error("binding already exists from {from_id} to {to_id}")]
    DuplicateBinding { from_id: ShapeId, to_id: ShapeId },

    #[error("shape {to_id} already has a committed layout binding from {existing}")]
    AlreadyBound { to_id: ShapeId, existing: ShapeId },

    #[error("container {container_id} already uses order key {index}")]
    DuplicateIndex { container_id: ShapeId, index: OrderKey },

    #[error("{from:?} cannot bind to {to:?} with a {kind:?} binding")]
    CannotBind { from: ShapeKind, to: ShapeKind, kind: BindingKind },

    #[error("shape {id} is a {expected:?}, patch carries {found:?} props")]
    KindMismatch { id: ShapeId, expected: ShapeKind, found: ShapeKind },

    #[error("binding {0} cannot change its endpoints or kind")]
    InvalidUpdate(BindingId),

    #[error(transparent)]
    Index(#[from] IndexError),
}

// =============================================================================
// CHANGES AND HOOKS
// =============================================================================

/// One effective write, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    ShapeCreated(Shape),
    ShapeUpdated { before: Shape, after: Shape },
    ShapeDeleted(Shape),
    BindingCreated(Binding),
    BindingUpdated { before: Binding, after: Binding },
    BindingDeleted(Binding),
}

/// Reactions to binding lifecycle events, one implementation per binding kind.
///
/// Every method defaults to doing nothing.
pub trait BindingUtil {
    /// The binding kind this util handles.
    fn kind(&self) -> BindingKind;

    fn on_after_create(&self, _editor: &mut Editor, _binding: &Binding) {}

    fn on_after_change(&self, _editor: &mut Editor, _before: &Binding, _after: &Binding) {}

    fn on_after_delete(&self, _editor: &mut Editor, _binding: &Binding) {}

    /// The shape on the `to` side of `binding` changed.
    fn on_after_change_to_shape(&self, _editor: &mut Editor, _binding: &Binding) {}

    /// The shape on the `from` side of `binding` changed. Delivered once per
    /// binding kind, carrying one of the shape's bindings.
    fn on_after_change_from_shape(&self, _editor: &mut Editor, _binding: &Binding) {}
}

#[derive(Debug, Clone)]
enum HookEvent {
    Created(Binding),
    Changed { before: Binding, after: Binding },
    Deleted(Binding),
    ToShapeChanged(Binding),
    FromShapeChanged(Binding),
}

impl HookEvent {
    fn binding(&self) -> &Binding {
        match self {
            Self::Created(b) | Self::Deleted(b) | Self::ToShapeChanged(b) | Self::FromShapeChanged(b) => b,
            Self::Changed { after, .. } => after,
        }
    }
}

/// Every shape (paint order) and binding, for debug dumps.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub shapes: Vec<Shape>,
    pub bindings: Vec<Binding>,
}

impl Snapshot {
    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if a value cannot be represented.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

// =============================================================================
// EDITOR
// =============================================================================

/// Shape and binding state plus the hook registry.
pub struct Editor {
    shapes: ShapeStore,
    bindings: BindingStore,
    utils: HashMap<BindingKind, Rc<dyn BindingUtil>>,
    pending: VecDeque<HookEvent>,
    dispatching: bool,
    changes: Vec<Change>,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            shapes: ShapeStore::new(),
            bindings: BindingStore::new(),
            utils: HashMap::new(),
            pending: VecDeque::new(),
            dispatching: false,
            changes: Vec::new(),
        }
    }
}

impl Editor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the hook handler for a binding kind, replacing any previous one.
    pub fn register_binding_util(&mut self, util: Rc<dyn BindingUtil>) {
        self.utils.insert(util.kind(), util);
    }

    // --- Shape queries ---

    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// All shapes in paint order (bottom first).
    #[must_use]
    pub fn shapes(&self) -> Vec<&Shape> {
        self.shapes.paint_order()
    }

    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    // --- Shape mutations ---

    /// Create a shape on top of its siblings and return its id.
    ///
    /// # Errors
    ///
    /// Returns `ShapeNotFound` for an unknown parent.
    pub fn create_shape(&mut self, parent_id: Option<ShapeId>, x: f64, y: f64, props: ShapeProps) -> Result<ShapeId, EditorError> {
        let index = key_between(self.shapes.top_index(parent_id), None)?;
        let shape = Shape { id: Uuid::new_v4(), parent_id, x, y, index, props };
        let id = shape.id;
        self.insert_shape(shape)?;
        Ok(id)
    }

    /// Insert a fully formed shape.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateShape` if the id is taken and `ShapeNotFound` for an
    /// unknown parent.
    pub fn insert_shape(&mut self, shape: Shape) -> Result<(), EditorError> {
        if self.shapes.get(&shape.id).is_some() {
            return Err(EditorError::DuplicateShape(shape.id));
        }
        if let Some(parent) = shape.parent_id {
            if self.shapes.get(&parent).is_none() {
                return Err(EditorError::ShapeNotFound(parent));
            }
        }
        self.changes.push(Change::ShapeCreated(shape.clone()));
        self.shapes.insert(shape);
        Ok(())
    }

    /// Apply a patch. Returns whether anything changed.
    ///
    /// A change notifies every binding touching the shape: each binding that
    /// points at it, and one binding per kind that it owns.
    ///
    /// # Errors
    ///
    /// Returns `ShapeNotFound` or `KindMismatch`.
    pub fn update_shape(&mut self, id: &ShapeId, patch: &ShapePatch) -> Result<bool, EditorError> {
        let before = match self.shapes.apply_patch(id, patch) {
            PatchResult::Missing => return Err(EditorError::ShapeNotFound(*id)),
            PatchResult::KindMismatch { expected, found } => {
                return Err(EditorError::KindMismatch { id: *id, expected, found });
            }
            PatchResult::Unchanged => return Ok(false),
            PatchResult::Changed(before) => *before,
        };
        let Some(after) = self.shapes.get(id).cloned() else {
            return Err(EditorError::ShapeNotFound(*id));
        };
        self.changes.push(Change::ShapeUpdated { before, after });
        if self.bindings.is_empty() {
            return Ok(true);
        }

        let mut events = Vec::new();
        let mut owned_kinds = Vec::new();
        for binding in self.bindings.all() {
            if binding.to_id == *id {
                events.push(HookEvent::ToShapeChanged(binding.clone()));
            }
            if binding.from_id == *id && !owned_kinds.contains(&binding.kind()) {
                owned_kinds.push(binding.kind());
                events.push(HookEvent::FromShapeChanged(binding.clone()));
            }
        }
        self.pending.extend(events);
        self.flush();
        Ok(true)
    }

    /// Delete a shape, its descendants, and every binding touching any of them.
    ///
    /// # Errors
    ///
    /// Returns `ShapeNotFound` for an unknown id.
    pub fn delete_shape(&mut self, id: &ShapeId) -> Result<Shape, EditorError> {
        if self.shapes.get(id).is_none() {
            return Err(EditorError::ShapeNotFound(*id));
        }

        // Deepest descendants first so parents never dangle.
        let mut doomed = vec![*id];
        let mut cursor = 0;
        while cursor < doomed.len() {
            let children = self.shapes.children_of(Some(doomed[cursor]));
            doomed.extend(children);
            cursor += 1;
        }

        let mut root = None;
        for shape_id in doomed.into_iter().rev() {
            for binding_id in self.bindings.touching(&shape_id) {
                if let Some(binding) = self.bindings.remove(&binding_id) {
                    self.changes.push(Change::BindingDeleted(binding.clone()));
                    self.pending.push_back(HookEvent::Deleted(binding));
                }
            }
            if let Some(shape) = self.shapes.remove(&shape_id) {
                self.changes.push(Change::ShapeDeleted(shape.clone()));
                if shape_id == *id {
                    root = Some(shape);
                }
            }
        }
        self.flush();
        root.ok_or(EditorError::ShapeNotFound(*id))
    }

    // --- Binding queries ---

    #[must_use]
    pub fn binding(&self, id: &BindingId) -> Option<&Binding> {
        self.bindings.get(id)
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    /// Bindings of `kind` owned by `shape`.
    #[must_use]
    pub fn bindings_from(&self, shape: &ShapeId, kind: BindingKind) -> Vec<Binding> {
        self.bindings.from_shape(shape, kind).into_iter().cloned().collect()
    }

    /// Bindings of `kind` pointing at `shape`.
    #[must_use]
    pub fn bindings_to(&self, shape: &ShapeId, kind: BindingKind) -> Vec<Binding> {
        self.bindings.to_shape(shape, kind).into_iter().cloned().collect()
    }

    /// Layout bindings of `container` in member order.
    #[must_use]
    pub fn sorted_layout_bindings(&self, container: &ShapeId) -> Vec<Binding> {
        self.bindings.sorted_layout(container).into_iter().cloned().collect()
    }

    /// Whether `from` may own a `kind` binding to `to`.
    #[must_use]
    pub fn can_bind_shapes(&self, from: &ShapeId, to: &ShapeId, kind: BindingKind) -> bool {
        if from == to {
            return false;
        }
        match (self.shapes.get(from), self.shapes.get(to)) {
            (Some(f), Some(t)) => f.kind().can_bind(kind, t.kind()),
            _ => false,
        }
    }

    // --- Binding mutations ---

    /// Create a binding and run its `on_after_create` hook.
    ///
    /// # Errors
    ///
    /// Returns `ShapeNotFound` for a missing endpoint, `CannotBind` when the
    /// kinds do not allow the edge, and the binding store invariant errors.
    pub fn create_binding(&mut self, binding: Binding) -> Result<BindingId, EditorError> {
        let from = self.shapes.get(&binding.from_id).ok_or(EditorError::ShapeNotFound(binding.from_id))?;
        let to = self.shapes.get(&binding.to_id).ok_or(EditorError::ShapeNotFound(binding.to_id))?;
        if !self.can_bind_shapes(&binding.from_id, &binding.to_id, binding.kind()) {
            return Err(EditorError::CannotBind { from: from.kind(), to: to.kind(), kind: binding.kind() });
        }

        let id = binding.id;
        self.bindings.insert(binding.clone())?;
        self.changes.push(Change::BindingCreated(binding.clone()));
        self.pending.push_back(HookEvent::Created(binding));
        self.flush();
        Ok(id)
    }

    /// Replace a binding's props and run its `on_after_change` hook. Returns
    /// whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns `BindingNotFound`, `InvalidUpdate`, or a store invariant error.
    pub fn update_binding(&mut self, binding: Binding) -> Result<bool, EditorError> {
        if self.bindings.get(&binding.id) == Some(&binding) {
            return Ok(false);
        }
        let before = self.bindings.replace(binding.clone())?;
        self.changes.push(Change::BindingUpdated { before: before.clone(), after: binding.clone() });
        self.pending.push_back(HookEvent::Changed { before, after: binding });
        self.flush();
        Ok(true)
    }

    /// Delete a binding and run its `on_after_delete` hook.
    ///
    /// # Errors
    ///
    /// Returns `BindingNotFound` for an unknown id.
    pub fn delete_binding(&mut self, id: &BindingId) -> Result<Binding, EditorError> {
        let binding = self.bindings.remove(id).ok_or(EditorError::BindingNotFound(*id))?;
        self.changes.push(Change::BindingDeleted(binding.clone()));
        self.pending.push_back(HookEvent::Deleted(binding.clone()));
        self.flush();
        Ok(binding)
    }

    /// Delete several bindings, then run their hooks in order. Unknown ids are
    /// skipped. Returns how many were deleted.
    pub fn delete_bindings(&mut self, ids: &[BindingId]) -> usize {
        let mut deleted = 0;
        for id in ids {
            let Some(binding) = self.bindings.remove(id) else {
                trace!(%id, "binding already gone");
                continue;
            };
            deleted += 1;
            self.changes.push(Change::BindingDeleted(binding.clone()));
            self.pending.push_back(HookEvent::Deleted(binding));
        }
        self.flush();
        deleted
    }

    // --- Geometry ---

    /// Page-space position of a shape's origin.
    ///
    /// Returns `None` for a missing shape, a missing ancestor, or a parent
    /// cycle.
    #[must_use]
    pub fn page_point(&self, id: &ShapeId) -> Option<Point> {
        let mut shape = self.shapes.get(id)?;
        let mut point = Point::new(shape.x, shape.y);
        let mut depth = 0;
        while let Some(parent_id) = shape.parent_id {
            depth += 1;
            if depth > self.shapes.len() {
                return None;
            }
            shape = self.shapes.get(&parent_id)?;
            point = point + Point::new(shape.x, shape.y);
        }
        Some(point)
    }

    /// Page-space bounding box of a shape.
    #[must_use]
    pub fn page_bounds(&self, id: &ShapeId) -> Option<Rect> {
        let shape = self.shapes.get(id)?;
        Some(Rect::from_origin(self.page_point(id)?, shape.size()))
    }

    /// Convert a page-space point into the coordinate space of `id`'s parent.
    #[must_use]
    pub fn page_to_parent(&self, id: &ShapeId, page_pt: Point) -> Option<Point> {
        let shape = self.shapes.get(id)?;
        match shape.parent_id {
            None => Some(page_pt),
            Some(parent) => Some(page_pt - self.page_point(&parent)?),
        }
    }

    // --- Host interface ---

    /// Drain the changes recorded since the last call.
    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            shapes: self.shapes.paint_order().into_iter().cloned().collect(),
            bindings: self.bindings.all().into_iter().cloned().collect(),
        }
    }

    // --- Hook dispatch ---

    fn flush(&mut self) {
        if self.dispatching {
            return;
        }
        self.dispatching = true;

        let mut handled = 0;
        while let Some(event) = self.pending.pop_front() {
            if handled == MAX_HOOK_CASCADE {
                warn!(dropped = self.pending.len() + 1, "binding hooks did not settle; dropping queued events");
                self.pending.clear();
                break;
            }
            handled += 1;

            let Some(util) = self.utils.get(&event.binding().kind()).cloned() else {
                continue;
            };
            trace!(binding = %event.binding().id, ?event, "dispatching binding hook");

            match event {
                HookEvent::Created(binding) => {
                    if let Some(current) = self.bindings.get(&binding.id).cloned() {
                        util.on_after_create(self, &current);
                    }
                }
                HookEvent::Changed { before, after } => {
                    if let Some(current) = self.bindings.get(&after.id).cloned() {
                        util.on_after_change(self, &before, &current);
                    }
                }
                HookEvent::Deleted(binding) => util.on_after_delete(self, &binding),
                HookEvent::ToShapeChanged(binding) => {
                    if let Some(current) = self.bindings.get(&binding.id).cloned() {
                        util.on_after_change_to_shape(self, &current);
                    }
                }
                HookEvent::FromShapeChanged(binding) => {
                    if let Some(current) = self.bindings.get(&binding.id).cloned() {
                        util.on_after_change_from_shape(self, &current);
                    }
                }
            }
        }

        self.dispatching = false;
    }
}
