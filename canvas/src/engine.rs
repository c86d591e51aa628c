//! Engine: routes raw pointer and key events to the editor and the engines.
//!
//! The host owns the event loop. It forwards pointer and key events plus a
//! per-frame [`EngineCore::tick`], and applies the returned [`Action`]s. Every
//! editor write made while handling an event comes back as an
//! [`Action::Changed`], in order.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::DemoConfig;
use crate::consts::HIT_MARGIN;
use crate::cursor::CursorFollower;
use crate::doc::{Shape, ShapeId, ShapePatch};
use crate::drag::DragResolver;
use crate::editor::{Change, Editor};
use crate::geom::{Camera, Point};
use crate::hit::{HitOptions, shape_at_point};
use crate::input::{Button, InputState, Key, UiState};
use crate::reflow::LayoutBindingUtil;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

const CURSOR_DEFAULT: &str = "default";
const CURSOR_GRABBING: &str = "grabbing";

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The editor changed a shape or binding.
    Changed(Change),
    /// Switch the host pointer cursor (CSS cursor name).
    SetCursor(String),
    RenderNeeded,
}

/// Engine state: the editor plus everything needed to interpret input.
pub struct EngineCore {
    pub editor: Editor,
    pub camera: Camera,
    pub ui: UiState,
    pub input: InputState,
    drag: DragResolver,
    cursor: CursorFollower,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::new(&DemoConfig::default())
    }
}

impl EngineCore {
    /// Build an engine with the layout util registered on a fresh editor.
    #[must_use]
    pub fn new(config: &DemoConfig) -> Self {
        let mut editor = Editor::new();
        editor.register_binding_util(Rc::new(LayoutBindingUtil::new(config.layout)));
        Self {
            editor,
            camera: Camera::default(),
            ui: UiState::default(),
            input: InputState::default(),
            drag: DragResolver::new(config.layout),
            cursor: CursorFollower::new(config.cursor),
        }
    }

    // --- Queries ---

    /// The currently selected shape, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ShapeId> {
        self.ui.selected_id
    }

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.editor.shape(id)
    }

    #[must_use]
    pub fn cursor(&self) -> &CursorFollower {
        &self.cursor
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        let page = self.camera.screen_to_page(screen_pt);
        self.cursor.set_target(page);

        if button != Button::Secondary {
            // A press without a release in between: the earlier drag is over.
            if let InputState::DraggingShape { id, .. } = std::mem::take(&mut self.input) {
                debug!(shape_id = %id, "drag superseded by new press");
                self.finish_drag(&id);
            }
        }

        match button {
            Button::Primary => {
                let options = HitOptions { hit_inside: false, margin: HIT_MARGIN };
                let hit = shape_at_point(&self.editor, page, options, |_| true);
                let Some((id, x, y, joins_layout)) =
                    hit.and_then(|id| self.editor.shape(&id)).map(|s| (s.id, s.x, s.y, s.kind().joins_layout()))
                else {
                    self.ui.selected_id = None;
                    self.input = InputState::Idle;
                    let mut actions = self.drain_changes();
                    actions.push(Action::RenderNeeded);
                    return actions;
                };

                self.ui.selected_id = Some(id);
                self.input = InputState::DraggingShape { id, last_page: page, orig_x: x, orig_y: y };
                if joins_layout {
                    if let Err(e) = self.drag.on_translate_start(&mut self.editor, &id) {
                        warn!(shape_id = %id, error = %e, "drag start failed");
                    }
                }
                debug!(shape_id = %id, "drag begin");

                let mut actions = self.drain_changes();
                actions.push(Action::SetCursor(CURSOR_GRABBING.into()));
                actions.push(Action::RenderNeeded);
                actions
            }
            Button::Middle => {
                self.input = InputState::Panning { last_screen: screen_pt };
                let mut actions = self.drain_changes();
                actions.push(Action::SetCursor(CURSOR_GRABBING.into()));
                actions
            }
            Button::Secondary => Vec::new(),
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let page = self.camera.screen_to_page(screen_pt);
        self.cursor.set_target(page);

        match self.input.clone() {
            InputState::Idle => Vec::new(),
            InputState::Panning { last_screen } => {
                self.camera.pan_by(screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                self.input = InputState::Panning { last_screen: screen_pt };
                vec![Action::RenderNeeded]
            }
            InputState::DraggingShape { id, last_page, orig_x, orig_y } => {
                let Some((x, y, joins_layout)) = self.editor.shape(&id).map(|s| (s.x, s.y, s.kind().joins_layout()))
                else {
                    debug!(shape_id = %id, "dragged shape gone");
                    self.input = InputState::Idle;
                    return vec![Action::SetCursor(CURSOR_DEFAULT.into())];
                };

                let delta = page - last_page;
                self.input = InputState::DraggingShape { id, last_page: page, orig_x, orig_y };
                if let Err(e) = self.editor.update_shape(&id, &ShapePatch::position(x + delta.x, y + delta.y)) {
                    warn!(shape_id = %id, error = %e, "translate rejected");
                }
                if joins_layout {
                    if let Err(e) = self.drag.on_translate(&mut self.editor, &id) {
                        warn!(shape_id = %id, error = %e, "drag step failed");
                    }
                }

                let mut actions = self.drain_changes();
                actions.push(Action::RenderNeeded);
                actions
            }
        }
    }

    pub fn on_pointer_up(&mut self, _screen_pt: Point, button: Button) -> Vec<Action> {
        match (std::mem::take(&mut self.input), button) {
            (InputState::DraggingShape { id, .. }, Button::Primary) => {
                self.finish_drag(&id);
                let mut actions = self.drain_changes();
                actions.push(Action::SetCursor(CURSOR_DEFAULT.into()));
                actions.push(Action::RenderNeeded);
                actions
            }
            (InputState::Panning { .. }, Button::Middle) => vec![Action::SetCursor(CURSOR_DEFAULT.into())],
            (state, _) => {
                self.input = state;
                Vec::new()
            }
        }
    }

    /// Escape aborts an active drag: the shape returns to where it started
    /// and the drop is resolved from there.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if !key.is_escape() {
            return Vec::new();
        }
        let InputState::DraggingShape { id, orig_x, orig_y, .. } = self.input else {
            return Vec::new();
        };
        self.input = InputState::Idle;

        if let Err(e) = self.editor.update_shape(&id, &ShapePatch::position(orig_x, orig_y)) {
            warn!(shape_id = %id, error = %e, "drag abort: restore rejected");
        }
        self.finish_drag(&id);
        debug!(shape_id = %id, "drag aborted");

        let mut actions = self.drain_changes();
        actions.push(Action::SetCursor(CURSOR_DEFAULT.into()));
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Advance one animation frame.
    pub fn tick(&mut self) -> Vec<Action> {
        let tick = self.cursor.tick(&mut self.editor);
        let mut actions = self.drain_changes();
        if tick.moved || !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    // --- Helpers ---

    fn finish_drag(&mut self, id: &ShapeId) {
        let joins_layout = self.editor.shape(id).is_some_and(|s| s.kind().joins_layout());
        if !joins_layout {
            return;
        }
        if let Err(e) = self.drag.on_translate_end(&mut self.editor, id) {
            warn!(shape_id = %id, error = %e, "drag end failed");
        }
    }

    fn drain_changes(&mut self) -> Vec<Action> {
        self.editor.take_changes().into_iter().map(Action::Changed).collect()
    }
}
