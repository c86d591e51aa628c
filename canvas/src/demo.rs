//! Seed shapes and bindings for the two demos.
//!
//! Mounting only creates records. Member positions and container size come
//! from reflow, so the layout util must be registered on the editor first
//! (see [`crate::engine::EngineCore::new`]).

#[cfg(test)]
#[path = "demo_test.rs"]
mod demo_test;

use tracing::info;

use crate::binding::Binding;
use crate::config::LayoutConfig;
use crate::doc::ShapeId;
use crate::editor::{Editor, EditorError};
use crate::index::keys_between;
use crate::shapes::{Color, ShapeKind, ShapeProps};

/// Page position of the layout demo's container.
const CONTAINER_ORIGIN: (f64, f64) = (100.0, 100.0);

/// Top edge of the row of loose elements.
const LOOSE_ROW_Y: f64 = 400.0;

/// Horizontal spacing between loose elements.
const LOOSE_SPACING: f64 = 150.0;

/// Page position of the cursor demo's target.
const TARGET_ORIGIN: (f64, f64) = (900.0, 100.0);

const COMMITTED_MEMBERS: usize = 2;
const LOOSE_ELEMENTS: usize = 3;

/// Ids of the shapes the layout demo created.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDemo {
    pub container_id: ShapeId,
    /// Elements bound into the container, in member order.
    pub members: Vec<ShapeId>,
    /// Elements left on the page.
    pub loose: Vec<ShapeId>,
}

/// Create a container holding two committed elements, plus three loose
/// elements below it.
///
/// # Errors
///
/// Propagates any rejected shape or binding write.
#[allow(clippy::cast_precision_loss)]
pub fn mount_layout_demo(editor: &mut Editor, layout: &LayoutConfig) -> Result<LayoutDemo, EditorError> {
    let (cx, cy) = CONTAINER_ORIGIN;
    let empty = layout.container_size(0);
    let container_id = editor.create_shape(
        None,
        cx,
        cy,
        ShapeProps::Container { width: empty.width, height: empty.height },
    )?;

    let mut palette = Color::ALL.iter().copied().cycle();
    let mut next_color = move || palette.next().unwrap_or_default();

    let mut members = Vec::with_capacity(COMMITTED_MEMBERS);
    for index in keys_between(None, None, COMMITTED_MEMBERS)? {
        let id = editor.create_shape(None, cx, cy, ShapeProps::Element { color: next_color() })?;
        editor.create_binding(Binding::layout(container_id, id, index, false))?;
        members.push(id);
    }

    let mut loose = Vec::with_capacity(LOOSE_ELEMENTS);
    for i in 0..LOOSE_ELEMENTS {
        let x = cx + i as f64 * LOOSE_SPACING;
        loose.push(editor.create_shape(None, x, LOOSE_ROW_Y, ShapeProps::Element { color: next_color() })?);
    }

    info!(%container_id, members = members.len(), loose = loose.len(), "layout demo mounted");
    Ok(LayoutDemo { container_id, members, loose })
}

/// Create the cursor demo's hover target.
///
/// # Errors
///
/// Propagates a rejected shape write.
pub fn mount_cursor_demo(editor: &mut Editor) -> Result<ShapeId, EditorError> {
    let (x, y) = TARGET_ORIGIN;
    let id = editor.create_shape(None, x, y, ShapeKind::Target.default_props())?;
    info!(target_id = %id, "cursor demo mounted");
    Ok(id)
}
