//! Drag resolution: which container a dragged element would join, and where.
//!
//! The engine calls into [`DragResolver`] at three points of a translate
//! gesture on an element:
//!
//! - **start**: every layout binding into the element becomes a placeholder,
//!   so moving it does not pull it back into its slot;
//! - **move**: the element's center picks the top-most candidate container and
//!   an ordinal slot inside it; the binding is created, re-keyed, or dropped
//!   to match, and the element stays where the pointer put it;
//! - **end**: the same resolution runs once more, then every binding into the
//!   element is replaced by a single committed one (or none).
//!
//! Reflow is never called from here. It runs as a side effect of the binding
//! writes, through the hooks registered on the editor.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use tracing::debug;

use crate::binding::{Binding, BindingId, BindingKind};
use crate::config::LayoutConfig;
use crate::doc::{ShapeId, ShapePatch};
use crate::editor::{Editor, EditorError};
use crate::geom::Point;
use crate::hit::{HitOptions, shape_at_point};
use crate::index::{OrderKey, key_between};

/// What a drag step did to the element's bindings.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOutcome {
    /// The element is over no container; `removed` bindings were deleted.
    Detached { removed: usize },
    /// The element already holds the resolved slot.
    Unchanged { container_id: ShapeId },
    /// A placeholder binding was created or re-keyed.
    Slotted { container_id: ShapeId, binding_id: BindingId, index: OrderKey },
    /// Drop inside a container: one committed binding remains.
    Committed { container_id: ShapeId, binding_id: BindingId, index: OrderKey },
    /// Drop outside every container: the element is unmanaged.
    Removed,
    /// The element no longer exists.
    Missing,
}

/// Stateless drag-resolution engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragResolver {
    layout: LayoutConfig,
}

impl DragResolver {
    #[must_use]
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Mark every layout binding into `element_id` as a placeholder. Returns
    /// how many bindings changed.
    ///
    /// # Errors
    ///
    /// Propagates a rejected binding write.
    pub fn on_translate_start(&self, editor: &mut Editor, element_id: &ShapeId) -> Result<usize, EditorError> {
        let mut marked = 0;
        for mut binding in editor.bindings_to(element_id, BindingKind::Layout) {
            let Some(props) = binding.layout_props_mut() else {
                continue;
            };
            if props.placeholder {
                continue;
            }
            props.placeholder = true;
            if editor.update_binding(binding)? {
                marked += 1;
            }
        }
        debug!(%element_id, marked, "drag start");
        Ok(marked)
    }

    /// Resolve one drag step.
    ///
    /// # Errors
    ///
    /// Propagates a rejected binding write or key allocation.
    pub fn on_translate(&self, editor: &mut Editor, element_id: &ShapeId) -> Result<DragOutcome, EditorError> {
        let (Some(anchor), Some(held)) =
            (page_anchor(editor, element_id), editor.shape(element_id).map(|s| Point::new(s.x, s.y)))
        else {
            debug!(%element_id, "drag: element gone");
            return Ok(DragOutcome::Missing);
        };

        let Some(container_id) = self.target_container(editor, element_id) else {
            let ids: Vec<BindingId> = editor.bindings_to(element_id, BindingKind::Layout).iter().map(|b| b.id).collect();
            let removed = editor.delete_bindings(&ids);
            if removed > 0 {
                debug!(%element_id, removed, "drag: left every container");
            }
            return Ok(DragOutcome::Detached { removed });
        };

        let index = self.slot_index_for_position(editor, &container_id, element_id, anchor)?;
        let existing = editor
            .bindings_from(&container_id, BindingKind::Layout)
            .into_iter()
            .find(|b| b.to_id == *element_id);

        let binding_id = match existing {
            Some(binding) if binding.layout_props().is_some_and(|p| p.index == index) => {
                return Ok(DragOutcome::Unchanged { container_id });
            }
            Some(mut binding) => {
                if let Some(props) = binding.layout_props_mut() {
                    props.index = index.clone();
                    props.placeholder = true;
                }
                let binding_id = binding.id;
                editor.update_binding(binding)?;
                debug!(%element_id, %container_id, %index, "drag: re-slotted");
                binding_id
            }
            None => {
                let binding_id = editor.create_binding(Binding::layout(container_id, *element_id, index.clone(), true))?;
                debug!(%element_id, %container_id, %index, "drag: entered container");
                binding_id
            }
        };

        // Reflow cascades triggered by the other members may have pulled the
        // element into its slot; the pointer owns it until the drop.
        if editor.shape(element_id).is_some_and(|s| Point::new(s.x, s.y) != held) {
            editor.update_shape(element_id, &ShapePatch::position(held.x, held.y))?;
        }
        Ok(DragOutcome::Slotted { container_id, binding_id, index })
    }

    /// Finish the drag: drop every binding into the element and, if it was
    /// released over a container, create one committed binding.
    ///
    /// # Errors
    ///
    /// Propagates a rejected binding write or key allocation.
    pub fn on_translate_end(&self, editor: &mut Editor, element_id: &ShapeId) -> Result<DragOutcome, EditorError> {
        let Some(anchor) = page_anchor(editor, element_id) else {
            debug!(%element_id, "drag end: element gone");
            return Ok(DragOutcome::Missing);
        };

        let target = match self.target_container(editor, element_id) {
            Some(container_id) => {
                Some((container_id, self.slot_index_for_position(editor, &container_id, element_id, anchor)?))
            }
            None => None,
        };

        let ids: Vec<BindingId> = editor.bindings_to(element_id, BindingKind::Layout).iter().map(|b| b.id).collect();
        editor.delete_bindings(&ids);

        let Some((container_id, index)) = target else {
            debug!(%element_id, "drag end: dropped outside containers");
            return Ok(DragOutcome::Removed);
        };
        let binding_id = editor.create_binding(Binding::layout(container_id, *element_id, index.clone(), false))?;
        debug!(%element_id, %container_id, %index, "drag end: committed");
        Ok(DragOutcome::Committed { container_id, binding_id, index })
    }

    /// Top-most shape that can hold `element_id` in a layout and contains
    /// the element's center.
    #[must_use]
    pub fn target_container(&self, editor: &Editor, element_id: &ShapeId) -> Option<ShapeId> {
        let anchor = page_anchor(editor, element_id)?;
        let options = HitOptions { hit_inside: true, margin: 0.0 };
        shape_at_point(editor, anchor, options, |shape| {
            editor.can_bind_shapes(&shape.id, element_id, BindingKind::Layout)
        })
    }

    /// Order key for `element_id` dropped at page point `anchor` inside
    /// `container_id`.
    ///
    /// Reuses the element's own key when the computed slot is adjacent to
    /// its current position, so hovering in place never re-keys.
    ///
    /// # Errors
    ///
    /// Returns `ShapeNotFound` for a missing container and propagates key
    /// allocation failures.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn slot_index_for_position(
        &self,
        editor: &Editor,
        container_id: &ShapeId,
        element_id: &ShapeId,
        anchor: Point,
    ) -> Result<OrderKey, EditorError> {
        let origin = editor.page_point(container_id).ok_or(EditorError::ShapeNotFound(*container_id))?;
        let all = editor.sorted_layout_bindings(container_id);
        let siblings = all.iter().filter(|b| b.to_id != *element_id).count();

        let raw = ((anchor.x - origin.x - self.layout.padding) / self.layout.stride()).round();
        let slot = (raw.clamp(0.0, (siblings + 1) as f64) as usize).min(all.len());

        let below = slot.checked_sub(1).and_then(|i| all.get(i));
        let above = all.get(slot);

        if let Some(b) = below
            && b.to_id == *element_id
            && let Some(props) = b.layout_props()
        {
            return Ok(props.index.clone());
        }
        if let Some(a) = above
            && a.to_id == *element_id
            && let Some(props) = a.layout_props()
        {
            return Ok(props.index.clone());
        }

        let lower = below.and_then(|b| b.layout_props()).map(|p| &p.index);
        let upper = above.and_then(|a| a.layout_props()).map(|p| &p.index);
        Ok(key_between(lower, upper)?)
    }
}

/// Page-space center of a shape.
#[must_use]
pub fn page_anchor(editor: &Editor, shape_id: &ShapeId) -> Option<Point> {
    editor.page_bounds(shape_id).map(|b| b.center())
}
