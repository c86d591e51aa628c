//! Shared numeric constants for the canvas crate.

// ── Layout ──────────────────────────────────────────────────────

/// Width of one member slot in a container row.
pub const SLOT_WIDTH: f64 = 100.0;

/// Height of one member slot in a container row.
pub const SLOT_HEIGHT: f64 = 100.0;

/// Gap around and between container members.
pub const LAYOUT_PADDING: f64 = 24.0;

// ── Shapes ──────────────────────────────────────────────────────

/// Elements are fixed-size squares.
pub const ELEMENT_SIZE: f64 = 100.0;

/// Side length of a freshly created container before any reflow.
pub const DEFAULT_CONTAINER_SIZE: f64 = 100.0;

/// Side length of the cursor demo's hover target.
pub const DEFAULT_TARGET_SIZE: f64 = 160.0;

// ── Hit-testing ─────────────────────────────────────────────────

/// Page-space slop for edge hits on unfilled shapes.
pub const HIT_MARGIN: f64 = 8.0;

// ── Cursor ──────────────────────────────────────────────────────

/// Fraction of the remaining distance the drawn cursor covers per tick.
pub const CURSOR_LERP: f64 = 0.2;

/// Side length of the cursor image in page units.
pub const CURSOR_SIZE: f64 = 32.0;

/// Below this distance the drawn cursor snaps onto the pointer.
pub const CURSOR_SNAP_EPSILON: f64 = 0.01;

// ── Hooks ───────────────────────────────────────────────────────

/// Upper bound on hook events drained by one top-level mutation.
pub const MAX_HOOK_CASCADE: usize = 4096;
