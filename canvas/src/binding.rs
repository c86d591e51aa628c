//! Bindings: typed edges between two shapes, and the store that owns them.
//!
//! The only kind today is [`BindingKind::Layout`], an edge from a container to
//! one of its member elements. Its [`LayoutBindingProps::index`] orders the
//! members left to right, and [`LayoutBindingProps::placeholder`] marks an edge
//! that is still being dragged around and has not been dropped yet.
//!
//! The store enforces the structural invariants on every write:
//! - at most one binding per `(from, to, kind)`;
//! - at most one committed (non-placeholder) layout binding into any shape;
//! - layout keys are unique among the bindings of one container.

#[cfg(test)]
#[path = "binding_test.rs"]
mod binding_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::doc::ShapeId;
use crate::editor::EditorError;
use crate::index::OrderKey;

/// Unique identifier for a binding.
pub type BindingId = Uuid;

/// The kind of a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindingKind {
    /// Container → element row membership.
    Layout,
}

/// Props of a layout binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutBindingProps {
    /// Position among the container's members.
    pub index: OrderKey,
    /// True while the member is being dragged.
    pub placeholder: bool,
}

/// Per-kind binding properties. The variant doubles as the binding's kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BindingProps {
    Layout(LayoutBindingProps),
}

impl BindingProps {
    #[must_use]
    pub fn kind(&self) -> BindingKind {
        match self {
            Self::Layout(_) => BindingKind::Layout,
        }
    }
}

/// A binding as stored in the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub id: BindingId,
    /// The owning side (the container, for layout bindings).
    pub from_id: ShapeId,
    /// The bound side (the element, for layout bindings).
    pub to_id: ShapeId,
    pub props: BindingProps,
}

impl Binding {
    /// New layout binding with a fresh id.
    #[must_use]
    pub fn layout(from_id: ShapeId, to_id: ShapeId, index: OrderKey, placeholder: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_id,
            to_id,
            props: BindingProps::Layout(LayoutBindingProps { index, placeholder }),
        }
    }

    #[must_use]
    pub fn kind(&self) -> BindingKind {
        self.props.kind()
    }

    /// Layout props, if this is a layout binding.
    #[must_use]
    pub fn layout_props(&self) -> Option<&LayoutBindingProps> {
        match &self.props {
            BindingProps::Layout(props) => Some(props),
        }
    }

    /// Mutable layout props, if this is a layout binding.
    pub fn layout_props_mut(&mut self) -> Option<&mut LayoutBindingProps> {
        match &mut self.props {
            BindingProps::Layout(props) => Some(props),
        }
    }

    fn is_committed_layout(&self) -> bool {
        self.layout_props().is_some_and(|p| !p.placeholder)
    }
}

/// In-memory store of bindings.
pub struct BindingStore {
    bindings: HashMap<BindingId, Binding>,
}

impl BindingStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    /// Insert a new binding after checking the store invariants.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateBinding` if the id or the `(from, to, kind)` triple
    /// is taken, `AlreadyBound` if a committed layout binding already points
    /// at `to_id`, and `DuplicateIndex` if the container already uses the key.
    pub fn insert(&mut self, binding: Binding) -> Result<(), EditorError> {
        if self.bindings.contains_key(&binding.id) {
            return Err(EditorError::DuplicateBinding { from_id: binding.from_id, to_id: binding.to_id });
        }
        self.check(&binding)?;
        self.bindings.insert(binding.id, binding);
        Ok(())
    }

    /// Replace an existing binding, returning the previous record.
    ///
    /// The endpoints and kind of a binding are fixed; only props may change.
    ///
    /// # Errors
    ///
    /// Returns `BindingNotFound` for an unknown id, `InvalidUpdate` if the
    /// endpoints or kind differ, and the `insert` invariant errors otherwise.
    pub fn replace(&mut self, binding: Binding) -> Result<Binding, EditorError> {
        let Some(current) = self.bindings.get(&binding.id) else {
            return Err(EditorError::BindingNotFound(binding.id));
        };
        if current.from_id != binding.from_id || current.to_id != binding.to_id || current.kind() != binding.kind() {
            return Err(EditorError::InvalidUpdate(binding.id));
        }
        self.check(&binding)?;
        let id = binding.id;
        self.bindings.insert(id, binding).ok_or(EditorError::BindingNotFound(id))
    }

    /// Remove a binding by id, returning it if it was present.
    pub fn remove(&mut self, id: &BindingId) -> Option<Binding> {
        self.bindings.remove(id)
    }

    /// Return a reference to a binding by id.
    #[must_use]
    pub fn get(&self, id: &BindingId) -> Option<&Binding> {
        self.bindings.get(id)
    }

    /// Bindings of `kind` whose `from` side is `shape`.
    #[must_use]
    pub fn from_shape(&self, shape: &ShapeId, kind: BindingKind) -> Vec<&Binding> {
        let mut out: Vec<&Binding> = self
            .bindings
            .values()
            .filter(|b| b.from_id == *shape && b.kind() == kind)
            .collect();
        out.sort_by_key(|b| b.id);
        out
    }

    /// Bindings of `kind` whose `to` side is `shape`.
    #[must_use]
    pub fn to_shape(&self, shape: &ShapeId, kind: BindingKind) -> Vec<&Binding> {
        let mut out: Vec<&Binding> = self
            .bindings
            .values()
            .filter(|b| b.to_id == *shape && b.kind() == kind)
            .collect();
        out.sort_by_key(|b| b.id);
        out
    }

    /// Ids of every binding with `shape` on either side.
    #[must_use]
    pub fn touching(&self, shape: &ShapeId) -> Vec<BindingId> {
        let mut ids: Vec<BindingId> = self
            .bindings
            .values()
            .filter(|b| b.from_id == *shape || b.to_id == *shape)
            .map(|b| b.id)
            .collect();
        ids.sort();
        ids
    }

    /// Layout bindings of `container`, ordered by `(index, id)`.
    #[must_use]
    pub fn sorted_layout(&self, container: &ShapeId) -> Vec<&Binding> {
        let mut out = self.from_shape(container, BindingKind::Layout);
        out.sort_by(|a, b| {
            let ka = a.layout_props().map(|p| &p.index);
            let kb = b.layout_props().map(|p| &p.index);
            ka.cmp(&kb).then_with(|| a.id.cmp(&b.id))
        });
        out
    }

    /// All bindings, ordered by id.
    #[must_use]
    pub fn all(&self) -> Vec<&Binding> {
        let mut out: Vec<&Binding> = self.bindings.values().collect();
        out.sort_by_key(|b| b.id);
        out
    }

    /// Number of bindings currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if the store contains no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Check `candidate` against every *other* binding in the store.
    fn check(&self, candidate: &Binding) -> Result<(), EditorError> {
        for other in self.bindings.values().filter(|b| b.id != candidate.id) {
            if other.kind() != candidate.kind() {
                continue;
            }
            if other.from_id == candidate.from_id && other.to_id == candidate.to_id {
                return Err(EditorError::DuplicateBinding { from_id: candidate.from_id, to_id: candidate.to_id });
            }
            if other.to_id == candidate.to_id && other.is_committed_layout() && candidate.is_committed_layout() {
                return Err(EditorError::AlreadyBound { to_id: candidate.to_id, existing: other.from_id });
            }
            if other.from_id == candidate.from_id {
                if let (Some(a), Some(b)) = (other.layout_props(), candidate.layout_props()) {
                    if a.index == b.index {
                        return Err(EditorError::DuplicateIndex {
                            container_id: candidate.from_id,
                            index: b.index.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for BindingStore {
    fn default() -> Self {
        Self::new()
    }
}
