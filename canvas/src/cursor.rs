//! Lerped cursor follower for the cursor demo.
//!
//! The drawn cursor trails the real pointer: each tick it covers a fixed
//! fraction of the remaining distance, then snaps once it is close enough.
//! Any `Target` shape the drawn cursor overlaps takes the highlight color;
//! every other target shows its idle color.

#[cfg(test)]
#[path = "cursor_test.rs"]
mod cursor_test;

use tracing::{debug, warn};

use crate::config::CursorConfig;
use crate::consts::CURSOR_SNAP_EPSILON;
use crate::doc::{Shape, ShapeId, ShapePatch};
use crate::editor::Editor;
use crate::geom::{Point, Rect};
use crate::hit::shapes_overlapping;
use crate::shapes::{ShapeKind, ShapeProps};

/// Result of one animation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CursorTick {
    /// The drawn cursor moved.
    pub moved: bool,
    /// Top-most target under the drawn cursor.
    pub hovered: Option<ShapeId>,
    /// Number of targets whose color changed.
    pub recolored: usize,
}

/// Drawn cursor state.
#[derive(Debug, Clone)]
pub struct CursorFollower {
    config: CursorConfig,
    target: Point,
    drawn: Point,
}

impl CursorFollower {
    #[must_use]
    pub fn new(config: CursorConfig) -> Self {
        Self { config, target: Point::default(), drawn: Point::default() }
    }

    /// Where the real pointer is, in page space.
    pub fn set_target(&mut self, page: Point) {
        self.target = page;
    }

    #[must_use]
    pub fn target(&self) -> Point {
        self.target
    }

    /// Where the cursor is drawn, in page space.
    #[must_use]
    pub fn position(&self) -> Point {
        self.drawn
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.drawn == self.target
    }

    /// Page-space square covered by the drawn cursor.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.drawn, self.config.size)
    }

    /// Advance the drawn cursor one frame. Returns whether it moved.
    pub fn step(&mut self) -> bool {
        if self.is_settled() {
            return false;
        }
        if self.drawn.distance(self.target) < CURSOR_SNAP_EPSILON {
            self.drawn = self.target;
        } else {
            self.drawn = self.drawn.lerp(self.target, self.config.lerp);
        }
        true
    }

    /// Step, then recolor targets by whether the drawn cursor overlaps them.
    pub fn tick(&mut self, editor: &mut Editor) -> CursorTick {
        let moved = self.step();
        let is_target = |s: &Shape| s.kind() == ShapeKind::Target;
        let hovered = shapes_overlapping(editor, &self.bounds(), is_target).first().copied();

        let targets: Vec<(ShapeId, ShapeProps)> = editor
            .shapes()
            .into_iter()
            .filter(|s| is_target(s))
            .map(|s| (s.id, s.props.clone()))
            .collect();

        let mut recolored = 0;
        for (id, props) in targets {
            let ShapeProps::Target { width, height, color, idle_color } = props else {
                continue;
            };
            let wanted = if hovered == Some(id) { self.config.highlight } else { idle_color };
            if wanted == color {
                continue;
            }
            let patch = ShapePatch::props(ShapeProps::Target { width, height, color: wanted, idle_color });
            match editor.update_shape(&id, &patch) {
                Ok(_) => {
                    recolored += 1;
                    debug!(target_id = %id, color = %wanted, "cursor: target recolored");
                }
                Err(e) => warn!(target_id = %id, error = %e, "cursor: recolor rejected"),
            }
        }

        CursorTick { moved, hovered, recolored }
    }
}
