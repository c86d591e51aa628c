//! Input model: mouse buttons, keys, and the gesture state machine.
//!
//! `InputState` is the active gesture being tracked between pointer-down and
//! pointer-up, carrying the context needed to compute incremental deltas and
//! to undo a drag that is aborted.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::doc::ShapeId;
use crate::geom::Point;

/// Pointer button. Primary drags shapes, middle pans; secondary is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Primary,
    Middle,
    Secondary,
}

/// A keyboard key.
///
/// The inner string holds the key name as reported by the host (e.g. `"Escape"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.0 == "Escape"
    }
}

/// Persistent UI state visible to the host.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// The id of the currently selected shape, if any.
    pub selected_id: Option<ShapeId>,
}

/// Gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    #[default]
    Idle,
    /// The user is panning the canvas with the middle button.
    Panning {
        /// Screen-space position of the previous pointer event.
        last_screen: Point,
    },
    /// The user is translating a shape across the canvas.
    DraggingShape {
        /// Id of the shape being dragged.
        id: ShapeId,
        /// Page-space position of the pointer at the previous event.
        last_page: Point,
        /// Shape x at the start of the drag, restored on abort.
        orig_x: f64,
        /// Shape y at the start of the drag, restored on abort.
        orig_y: f64,
    },
}
