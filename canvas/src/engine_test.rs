#![allow(clippy::float_cmp)]

use super::*;
use crate::binding::BindingKind;
use crate::config::CursorConfig;
use crate::demo::{LayoutDemo, mount_cursor_demo, mount_layout_demo};
use crate::geom::Size;
use crate::shapes::Color;

// =============================================================
// Helpers
// =============================================================

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn has_render_needed(actions: &[Action]) -> bool {
    actions.iter().any(|a| matches!(a, Action::RenderNeeded))
}

fn has_cursor(actions: &[Action], name: &str) -> bool {
    actions.iter().any(|a| matches!(a, Action::SetCursor(c) if c == name))
}

fn has_change<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Change) -> bool,
{
    actions.iter().any(|a| matches!(a, Action::Changed(c) if pred(c)))
}

/// Engine with the layout demo mounted and its setup changes drained.
///
/// Container at (100, 100), members at (124, 124) and (248, 124), loose
/// elements at (100, 400), (250, 400) and (400, 400).
fn layout_engine() -> (EngineCore, LayoutDemo) {
    let mut core = EngineCore::default();
    let demo = mount_layout_demo(&mut core.editor, &crate::config::LayoutConfig::default()).unwrap();
    core.editor.take_changes();
    (core, demo)
}

fn position(core: &EngineCore, id: &ShapeId) -> Point {
    let s = core.shape(id).unwrap();
    Point::new(s.x, s.y)
}

fn member_order(core: &EngineCore, container: &ShapeId) -> Vec<ShapeId> {
    core.editor.sorted_layout_bindings(container).iter().map(|b| b.to_id).collect()
}

// =============================================================
// EngineCore basics
// =============================================================

#[test]
fn core_new_has_no_selection() {
    let core = EngineCore::default();
    assert!(core.selection().is_none());
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn core_default_camera_is_identity() {
    let cam = EngineCore::default().camera();
    assert_eq!((cam.pan_x, cam.pan_y, cam.zoom), (0.0, 0.0, 1.0));
}

#[test]
fn core_registers_layout_reflow() {
    let (core, demo) = layout_engine();
    assert_eq!(core.shape(&demo.container_id).unwrap().size(), Size::new(272.0, 148.0));
}

// =============================================================
// Pointer down
// =============================================================

#[test]
fn pointer_down_on_empty_canvas_clears_selection() {
    let (mut core, demo) = layout_engine();
    core.ui.selected_id = Some(demo.container_id);
    let actions = core.on_pointer_down(pt(-500.0, -500.0), Button::Primary);
    assert!(core.selection().is_none());
    assert!(has_render_needed(&actions));
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn pointer_down_on_shape_selects_and_starts_drag() {
    let (mut core, demo) = layout_engine();
    let actions = core.on_pointer_down(pt(150.0, 450.0), Button::Primary);
    assert_eq!(core.selection(), Some(demo.loose[0]));
    assert!(matches!(core.input, InputState::DraggingShape { id, .. } if id == demo.loose[0]));
    assert!(has_cursor(&actions, "grabbing"));
}

#[test]
fn pointer_down_on_member_marks_placeholder() {
    let (mut core, demo) = layout_engine();
    let actions = core.on_pointer_down(pt(174.0, 174.0), Button::Primary);
    assert_eq!(core.selection(), Some(demo.members[0]));
    let b = &core.editor.bindings_to(&demo.members[0], BindingKind::Layout)[0];
    assert!(b.layout_props().unwrap().placeholder);
    assert!(has_change(&actions, |c| matches!(c, Change::BindingUpdated { .. })));
}

#[test]
fn pointer_down_within_margin_hits() {
    let (mut core, demo) = layout_engine();
    core.on_pointer_down(pt(96.0, 450.0), Button::Primary);
    assert_eq!(core.selection(), Some(demo.loose[0]));
}

#[test]
fn secondary_button_is_ignored() {
    let (mut core, _demo) = layout_engine();
    assert!(core.on_pointer_down(pt(150.0, 450.0), Button::Secondary).is_empty());
    assert!(core.selection().is_none());
}

// =============================================================
// Panning
// =============================================================

#[test]
fn middle_drag_pans_camera() {
    let mut core = EngineCore::default();
    core.on_pointer_down(pt(10.0, 10.0), Button::Middle);
    let actions = core.on_pointer_move(pt(30.0, 50.0));
    assert!(has_render_needed(&actions));
    assert_eq!((core.camera().pan_x, core.camera().pan_y), (20.0, 40.0));

    let actions = core.on_pointer_up(pt(30.0, 50.0), Button::Middle);
    assert!(has_cursor(&actions, "default"));
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn panned_camera_maps_pointer_to_page() {
    let (mut core, demo) = layout_engine();
    core.camera.pan_by(100.0, 0.0);
    core.on_pointer_down(pt(250.0, 450.0), Button::Primary);
    assert_eq!(core.selection(), Some(demo.loose[0]));
}

// =============================================================
// Dragging elements
// =============================================================

#[test]
fn drag_loose_element_into_container_appends() {
    let (mut core, demo) = layout_engine();
    let el = demo.loose[0];

    core.on_pointer_down(pt(150.0, 450.0), Button::Primary);
    let actions = core.on_pointer_move(pt(360.0, 174.0));
    assert!(has_change(&actions, |c| matches!(c, Change::BindingCreated(_))));
    assert_eq!(position(&core, &el), pt(310.0, 124.0));
    assert_eq!(core.shape(&demo.container_id).unwrap().size(), Size::new(396.0, 148.0));

    let actions = core.on_pointer_up(pt(360.0, 174.0), Button::Primary);
    assert!(has_cursor(&actions, "default"));
    assert!(matches!(core.input, InputState::Idle));

    assert_eq!(member_order(&core, &demo.container_id), vec![demo.members[0], demo.members[1], el]);
    assert_eq!(position(&core, &el), pt(372.0, 124.0));
    let bindings = core.editor.bindings_to(&el, BindingKind::Layout);
    assert_eq!(bindings.len(), 1);
    assert!(!bindings[0].layout_props().unwrap().placeholder);
}

#[test]
fn drag_member_out_and_release_detaches() {
    let (mut core, demo) = layout_engine();

    core.on_pointer_down(pt(174.0, 174.0), Button::Primary);
    core.on_pointer_move(pt(800.0, 800.0));
    core.on_pointer_up(pt(800.0, 800.0), Button::Primary);

    assert!(core.editor.bindings_to(&demo.members[0], BindingKind::Layout).is_empty());
    assert_eq!(position(&core, &demo.members[0]), pt(750.0, 750.0));
    assert_eq!(position(&core, &demo.members[1]), pt(124.0, 124.0));
    assert_eq!(core.shape(&demo.container_id).unwrap().size(), Size::new(148.0, 148.0));
}

#[test]
fn escape_restores_dragged_member() {
    let (mut core, demo) = layout_engine();

    core.on_pointer_down(pt(174.0, 174.0), Button::Primary);
    core.on_pointer_move(pt(800.0, 800.0));
    assert_eq!(member_order(&core, &demo.container_id), vec![demo.members[1]]);

    let actions = core.on_key_down(&Key("Escape".into()));
    assert!(has_render_needed(&actions));
    assert!(matches!(core.input, InputState::Idle));
    assert_eq!(member_order(&core, &demo.container_id), demo.members);
    assert_eq!(position(&core, &demo.members[0]), pt(124.0, 124.0));
    assert_eq!(position(&core, &demo.members[1]), pt(248.0, 124.0));

    // The gesture is over; the release that follows is a no-op.
    assert!(core.on_pointer_up(pt(800.0, 800.0), Button::Primary).is_empty());
}

#[test]
fn escape_without_drag_does_nothing() {
    let (mut core, _demo) = layout_engine();
    assert!(core.on_key_down(&Key("Escape".into())).is_empty());
    core.on_pointer_down(pt(150.0, 450.0), Button::Primary);
    assert!(core.on_key_down(&Key("Delete".into())).is_empty());
    assert!(matches!(core.input, InputState::DraggingShape { .. }));
}

#[test]
fn dragging_container_carries_members() {
    let (mut core, demo) = layout_engine();

    // Containers are grabbed by their rim.
    core.on_pointer_down(pt(104.0, 104.0), Button::Primary);
    assert_eq!(core.selection(), Some(demo.container_id));
    core.on_pointer_move(pt(154.0, 104.0));
    core.on_pointer_up(pt(154.0, 104.0), Button::Primary);

    assert_eq!(position(&core, &demo.container_id), pt(150.0, 100.0));
    assert_eq!(position(&core, &demo.members[0]), pt(174.0, 124.0));
    assert_eq!(position(&core, &demo.members[1]), pt(298.0, 124.0));
}

#[test]
fn pressing_inside_container_between_members_selects_nothing() {
    let (mut core, _demo) = layout_engine();
    core.on_pointer_down(pt(236.0, 236.0), Button::Primary);
    assert!(core.selection().is_none());
    assert!(matches!(core.input, InputState::Idle));
}

#[test]
fn second_press_commits_the_unfinished_drag() {
    let (mut core, demo) = layout_engine();

    // Grab member 1, then press elsewhere without releasing first.
    core.on_pointer_down(pt(298.0, 174.0), Button::Primary);
    let actions = core.on_pointer_down(pt(150.0, 450.0), Button::Primary);
    assert!(has_change(&actions, |c| matches!(c, Change::BindingCreated(_))));
    core.on_pointer_up(pt(150.0, 450.0), Button::Primary);

    let b = &core.editor.bindings_to(&demo.members[1], BindingKind::Layout)[0];
    assert!(!b.layout_props().unwrap().placeholder);
    assert_eq!(member_order(&core, &demo.container_id), demo.members);
    assert_eq!(position(&core, &demo.members[1]), pt(248.0, 124.0));

    // Removing member 0 now closes the gap around member 1.
    core.on_pointer_down(pt(174.0, 174.0), Button::Primary);
    core.on_pointer_move(pt(174.0, 900.0));
    core.on_pointer_up(pt(174.0, 900.0), Button::Primary);

    assert_eq!(member_order(&core, &demo.container_id), vec![demo.members[1]]);
    assert_eq!(position(&core, &demo.members[1]), pt(124.0, 124.0));
    assert_eq!(core.shape(&demo.container_id).unwrap().size(), Size::new(148.0, 148.0));
}

#[test]
fn middle_press_during_drag_finishes_it() {
    let (mut core, demo) = layout_engine();
    core.on_pointer_down(pt(174.0, 174.0), Button::Primary);
    core.on_pointer_move(pt(800.0, 800.0));
    core.on_pointer_down(pt(800.0, 800.0), Button::Middle);

    assert!(matches!(core.input, InputState::Panning { .. }));
    assert!(core.editor.bindings_to(&demo.members[0], BindingKind::Layout).is_empty());
    assert_eq!(position(&core, &demo.members[1]), pt(124.0, 124.0));
}

#[test]
fn pointer_move_while_idle_emits_nothing() {
    let (mut core, _demo) = layout_engine();
    assert!(core.on_pointer_move(pt(10.0, 10.0)).is_empty());
    assert_eq!(core.cursor().target(), pt(10.0, 10.0));
}

// =============================================================
// Cursor demo
// =============================================================

#[test]
fn tick_highlights_target_under_cursor() {
    let config = DemoConfig { cursor: CursorConfig { lerp: 1.0, ..CursorConfig::default() }, ..DemoConfig::default() };
    let mut core = EngineCore::new(&config);
    let target = mount_cursor_demo(&mut core.editor).unwrap();
    core.editor.take_changes();

    core.on_pointer_move(pt(980.0, 180.0));
    let actions = core.tick();
    assert!(has_render_needed(&actions));
    assert!(has_change(&actions, |c| matches!(c, Change::ShapeUpdated { after, .. } if after.id == target)));
    assert_eq!(core.shape(&target).unwrap().props.color(), Some(Color::Red));

    // Settled and still hovering: nothing to do.
    assert!(core.tick().is_empty());
}

#[test]
fn tick_eases_toward_pointer() {
    let mut core = EngineCore::default();
    core.on_pointer_move(pt(100.0, 0.0));
    core.tick();
    assert_eq!(core.cursor().position(), pt(20.0, 0.0));
}
