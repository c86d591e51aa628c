#![allow(clippy::float_cmp)]

use std::rc::Rc;

use super::*;
use crate::binding::BindingKind;
use crate::geom::{Point, Size};
use crate::reflow::LayoutBindingUtil;

fn editor() -> Editor {
    let mut editor = Editor::new();
    editor.register_binding_util(Rc::new(LayoutBindingUtil::default()));
    editor
}

fn position(editor: &Editor, id: &ShapeId) -> Point {
    let s = editor.shape(id).unwrap();
    Point::new(s.x, s.y)
}

// =============================================================
// Layout demo
// =============================================================

#[test]
fn layout_demo_seeds_committed_members() {
    let mut editor = editor();
    let demo = mount_layout_demo(&mut editor, &LayoutConfig::default()).unwrap();

    assert_eq!(demo.members.len(), 2);
    assert_eq!(demo.loose.len(), 3);
    assert_eq!(editor.shape_count(), 6);

    let order: Vec<ShapeId> = editor.sorted_layout_bindings(&demo.container_id).iter().map(|b| b.to_id).collect();
    assert_eq!(order, demo.members);
    for b in editor.sorted_layout_bindings(&demo.container_id) {
        assert!(!b.layout_props().unwrap().placeholder);
    }
}

#[test]
fn layout_demo_is_reflowed() {
    let mut editor = editor();
    let demo = mount_layout_demo(&mut editor, &LayoutConfig::default()).unwrap();

    assert_eq!(editor.shape(&demo.container_id).unwrap().size(), Size::new(272.0, 148.0));
    assert_eq!(position(&editor, &demo.members[0]), Point::new(124.0, 124.0));
    assert_eq!(position(&editor, &demo.members[1]), Point::new(248.0, 124.0));
}

#[test]
fn loose_elements_stay_unbound() {
    let mut editor = editor();
    let demo = mount_layout_demo(&mut editor, &LayoutConfig::default()).unwrap();
    for (i, id) in demo.loose.iter().enumerate() {
        assert!(editor.bindings_to(id, BindingKind::Layout).is_empty());
        assert_eq!(position(&editor, id).y, 400.0, "loose {i}");
    }
}

#[test]
fn colors_cycle_through_palette() {
    let mut editor = editor();
    let demo = mount_layout_demo(&mut editor, &LayoutConfig::default()).unwrap();
    let colors: Vec<Color> = demo
        .members
        .iter()
        .chain(&demo.loose)
        .map(|id| editor.shape(id).unwrap().props.color().unwrap())
        .collect();
    assert_eq!(colors, Color::ALL[..5].to_vec());
}

#[test]
fn without_reflow_container_keeps_empty_size() {
    let mut editor = Editor::new();
    let demo = mount_layout_demo(&mut editor, &LayoutConfig::default()).unwrap();
    assert_eq!(editor.shape(&demo.container_id).unwrap().size(), Size::new(48.0, 148.0));
}

// =============================================================
// Cursor demo
// =============================================================

#[test]
fn cursor_demo_creates_idle_target() {
    let mut editor = editor();
    let id = mount_cursor_demo(&mut editor).unwrap();
    let shape = editor.shape(&id).unwrap();
    assert_eq!(shape.kind(), ShapeKind::Target);
    assert_eq!(shape.props.color(), Some(Color::Grey));
    assert_eq!(position(&editor, &id), Point::new(900.0, 100.0));
}
