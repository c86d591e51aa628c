//! Layout reflow: derive member positions and container size from bindings.
//!
//! [`LayoutBindingUtil`] is the hook handler for [`BindingKind::Layout`]. Any
//! binding event, and any change to either end of a layout binding, reflows
//! the container on the binding's `from` side. Reflow only writes values that
//! differ from the current ones, so a second pass over a settled container is
//! silent and hook cascades terminate.

#[cfg(test)]
#[path = "reflow_test.rs"]
mod reflow_test;

use tracing::{debug, warn};

use crate::binding::{Binding, BindingKind};
use crate::config::LayoutConfig;
use crate::doc::ShapePatch;
use crate::editor::{BindingUtil, Editor};
use crate::geom::{Point, Size};
use crate::shapes::ShapeProps;

/// Reflow engine registered for layout bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutBindingUtil {
    layout: LayoutConfig,
}

impl LayoutBindingUtil {
    #[must_use]
    pub fn new(layout: LayoutConfig) -> Self {
        Self { layout }
    }

    /// Place every member of `trigger`'s container in its slot and size the
    /// container to fit. Returns the number of shapes written.
    ///
    /// When `trigger` is a placeholder its element is left where it is. It
    /// still holds its slot, so the others arrange around it.
    pub fn update_elements_for_container(&self, editor: &mut Editor, trigger: &Binding) -> usize {
        let container_id = trigger.from_id;
        let Some(container) = editor.shape(&container_id) else {
            debug!(%container_id, "reflow: container gone");
            return 0;
        };
        let ShapeProps::Container { width, height } = container.props else {
            debug!(%container_id, kind = ?container.kind(), "reflow: binding source is not a container");
            return 0;
        };
        let Some(origin) = editor.page_point(&container_id) else {
            return 0;
        };

        let members = editor.sorted_layout_bindings(&container_id);
        if members.is_empty() {
            return 0;
        }

        let skip = trigger.layout_props().is_some_and(|p| p.placeholder).then_some(trigger.to_id);

        let mut writes = 0;
        for (i, member) in members.iter().enumerate() {
            if skip == Some(member.to_id) {
                continue;
            }
            let Some(element) = editor.shape(&member.to_id) else {
                debug!(element_id = %member.to_id, "reflow: member gone");
                continue;
            };
            let current = Point::new(element.x, element.y);
            let Some(target) = editor.page_to_parent(&member.to_id, origin + self.layout.slot_offset(i)) else {
                continue;
            };
            if current == target {
                continue;
            }
            match editor.update_shape(&member.to_id, &ShapePatch::position(target.x, target.y)) {
                Ok(true) => writes += 1,
                Ok(false) => {}
                Err(e) => warn!(element_id = %member.to_id, error = %e, "reflow: member write rejected"),
            }
        }

        let size = self.layout.container_size(members.len());
        if Size::new(width, height) != size {
            let props = ShapeProps::Container { width: size.width, height: size.height };
            match editor.update_shape(&container_id, &ShapePatch::props(props)) {
                Ok(true) => writes += 1,
                Ok(false) => {}
                Err(e) => warn!(%container_id, error = %e, "reflow: container resize rejected"),
            }
        }

        debug!(%container_id, members = members.len(), writes, "reflow");
        writes
    }
}

impl BindingUtil for LayoutBindingUtil {
    fn kind(&self) -> BindingKind {
        BindingKind::Layout
    }

    fn on_after_create(&self, editor: &mut Editor, binding: &Binding) {
        self.update_elements_for_container(editor, binding);
    }

    fn on_after_change(&self, editor: &mut Editor, _before: &Binding, after: &Binding) {
        self.update_elements_for_container(editor, after);
    }

    fn on_after_delete(&self, editor: &mut Editor, binding: &Binding) {
        self.update_elements_for_container(editor, binding);
    }

    fn on_after_change_to_shape(&self, editor: &mut Editor, binding: &Binding) {
        self.update_elements_for_container(editor, binding);
    }

    fn on_after_change_from_shape(&self, editor: &mut Editor, binding: &Binding) {
        self.update_elements_for_container(editor, binding);
    }
}
