//! Pointer scripts: a JSON list of input steps replayed against the engine.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::path::Path;

use canvas::editor::Change;
use canvas::engine::{Action, EngineCore};
use canvas::geom::Point;
use canvas::input::{Button, Key};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("read script {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parse script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One input step. Coordinates are in screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Escape,
    Tick { frames: u32 },
}

/// Totals gathered while replaying a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Replay {
    pub steps: usize,
    pub shape_writes: usize,
    pub binding_writes: usize,
    pub renders: usize,
}

impl Replay {
    fn record(&mut self, actions: &[Action]) {
        for action in actions {
            match action {
                Action::Changed(
                    Change::ShapeCreated(_) | Change::ShapeUpdated { .. } | Change::ShapeDeleted(_),
                ) => self.shape_writes += 1,
                Action::Changed(_) => self.binding_writes += 1,
                Action::RenderNeeded => self.renders += 1,
                Action::SetCursor(_) => {}
            }
        }
    }
}

/// Read and parse a script file.
///
/// # Errors
///
/// Returns [`ScriptError::Io`] when the file cannot be read and
/// [`ScriptError::Parse`] when it is not a valid step list.
pub fn load(path: &Path) -> Result<Vec<Step>, ScriptError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|source| ScriptError::Io { path: path.display().to_string(), source })?;
    parse(&raw)
}

/// Parse a script from its JSON text.
///
/// # Errors
///
/// Returns [`ScriptError::Parse`] when `raw` is not a valid step list.
pub fn parse(raw: &str) -> Result<Vec<Step>, ScriptError> {
    Ok(serde_json::from_str(raw)?)
}

/// The script run when no file is configured. Coordinates assume the demos
/// are mounted at their default positions with the default layout.
#[must_use]
pub fn default_script() -> Vec<Step> {
    vec![
        // Drag the first loose element into the container's last slot.
        Step::Down { x: 150.0, y: 450.0 },
        Step::Move { x: 260.0, y: 300.0 },
        Step::Move { x: 360.0, y: 174.0 },
        Step::Up { x: 360.0, y: 174.0 },
        // Move it to the front.
        Step::Down { x: 422.0, y: 174.0 },
        Step::Move { x: 300.0, y: 174.0 },
        Step::Move { x: 150.0, y: 174.0 },
        Step::Up { x: 150.0, y: 174.0 },
        // Start dragging another loose element, then think better of it.
        Step::Down { x: 300.0, y: 450.0 },
        Step::Move { x: 600.0, y: 600.0 },
        Step::Escape,
        Step::Up { x: 600.0, y: 600.0 },
        // Run the cursor over the target and let it settle.
        Step::Move { x: 980.0, y: 180.0 },
        Step::Tick { frames: 60 },
    ]
}

/// Feed `steps` to the engine in order.
pub fn replay(core: &mut EngineCore, steps: &[Step]) -> Replay {
    let mut totals = Replay::default();
    for (i, step) in steps.iter().enumerate() {
        let actions = apply(core, step);
        info!(step = i, ?step, actions = actions.len(), "step");
        for action in &actions {
            debug!(step = i, ?action, "action");
        }
        totals.record(&actions);
        totals.steps += 1;
    }
    totals
}

fn apply(core: &mut EngineCore, step: &Step) -> Vec<Action> {
    match *step {
        Step::Down { x, y } => core.on_pointer_down(Point::new(x, y), Button::Primary),
        Step::Move { x, y } => core.on_pointer_move(Point::new(x, y)),
        Step::Up { x, y } => core.on_pointer_up(Point::new(x, y), Button::Primary),
        Step::Escape => core.on_key_down(&Key("Escape".into())),
        Step::Tick { frames } => (0..frames).flat_map(|_| core.tick()).collect(),
    }
}
