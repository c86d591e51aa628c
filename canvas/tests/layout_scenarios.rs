//! End-to-end layout scenarios driven through the public API.
#![allow(clippy::float_cmp)]

use canvas::binding::{Binding, BindingKind};
use canvas::config::{DemoConfig, LayoutConfig};
use canvas::doc::ShapeId;
use canvas::engine::EngineCore;
use canvas::geom::{Point, Size};
use canvas::index::{OrderKey, key_between};
use canvas::input::{Button, Key};
use canvas::reflow::LayoutBindingUtil;
use canvas::shapes::{Color, ShapeProps};

// =============================================================
// Helpers
// =============================================================

fn engine() -> EngineCore {
    EngineCore::new(&DemoConfig::default())
}

fn add_container(core: &mut EngineCore, x: f64, y: f64) -> ShapeId {
    let size = LayoutConfig::default().container_size(0);
    core.editor
        .create_shape(None, x, y, ShapeProps::Container { width: size.width, height: size.height })
        .unwrap()
}

fn add_element(core: &mut EngineCore, x: f64, y: f64) -> ShapeId {
    core.editor.create_shape(None, x, y, ShapeProps::Element { color: Color::Yellow }).unwrap()
}

/// Press on the element's center, drag it so its center lands on `to`, release.
fn drag_center(core: &mut EngineCore, id: &ShapeId, to: Point) {
    let from = core.editor.page_bounds(id).unwrap().center();
    core.on_pointer_down(from, Button::Primary);
    core.on_pointer_move(Point::new((from.x + to.x) / 2.0, (from.y + to.y) / 2.0));
    core.on_pointer_move(to);
    core.on_pointer_up(to, Button::Primary);
}

fn local(core: &EngineCore, id: &ShapeId, container: &ShapeId) -> Point {
    core.editor.page_point(id).unwrap() - core.editor.page_point(container).unwrap()
}

fn members(core: &EngineCore, container: &ShapeId) -> Vec<ShapeId> {
    core.editor.sorted_layout_bindings(container).iter().map(|b| b.to_id).collect()
}

fn assert_settled_geometry(core: &EngineCore, container: &ShapeId) {
    let layout = LayoutConfig::default();
    let ids = members(core, container);
    let n = ids.len();
    let expected_width = 24.0 + n as f64 * 100.0 + n.saturating_sub(1) as f64 * 24.0 + 24.0;
    assert_eq!(core.shape(container).unwrap().size(), Size::new(expected_width, 148.0));
    for (i, id) in ids.iter().enumerate() {
        assert_eq!(local(core, id, container), layout.slot_offset(i), "member {i}");
        assert_eq!(local(core, id, container), Point::new(24.0 + i as f64 * 124.0, 24.0));
    }
}

// =============================================================
// Order keys
// =============================================================

#[test]
fn keys_form_a_strict_total_order() {
    let mut keys: Vec<OrderKey> = vec![key_between(None, None).unwrap()];
    // Insert at the front, back and a rotating interior position.
    for step in 0..200usize {
        let at = match step % 3 {
            0 => 0,
            1 => keys.len(),
            _ => (step * 7) % keys.len() + 1,
        }
        .min(keys.len());
        let lower = at.checked_sub(1).map(|i| &keys[i]);
        let upper = keys.get(at);
        let key = key_between(lower, upper).unwrap();
        if let Some(l) = lower {
            assert!(*l < key);
        }
        if let Some(u) = upper {
            assert!(key < *u);
        }
        keys.insert(at, key);
    }
    assert!(keys.windows(2).all(|w| w[0] < w[1]));
}

// =============================================================
// Drag scenarios
// =============================================================

#[test]
fn single_drop_into_empty_container() {
    let mut core = engine();
    let c = add_container(&mut core, 0.0, 0.0);
    let e = add_element(&mut core, 300.0, 300.0);
    assert_eq!(core.shape(&c).unwrap().size(), Size::new(48.0, 148.0));

    drag_center(&mut core, &e, Point::new(24.0, 74.0));

    let bindings = core.editor.bindings_to(&e, BindingKind::Layout);
    assert_eq!(bindings.len(), 1);
    assert!(!bindings[0].layout_props().unwrap().placeholder);
    assert_eq!(local(&core, &e, &c), Point::new(24.0, 24.0));
    assert_eq!(core.shape(&c).unwrap().size(), Size::new(148.0, 148.0));
}

#[test]
fn filling_a_container_keeps_geometry_invariant() {
    let mut core = engine();
    let c = add_container(&mut core, 50.0, 50.0);
    for i in 0..5 {
        let e = add_element(&mut core, 100.0 * i as f64, 600.0);
        // Drop just inside the container's right edge so each lands last.
        let right = core.editor.page_bounds(&c).unwrap().max_x() - 10.0;
        drag_center(&mut core, &e, Point::new(right, 124.0));
        assert_eq!(members(&core, &c).last(), Some(&e));
        assert_settled_geometry(&core, &c);
    }
}

#[test]
fn reorder_last_to_first() {
    let mut core = engine();
    let c = add_container(&mut core, 0.0, 0.0);
    let mut ids = Vec::new();
    for i in 0..3 {
        let e = add_element(&mut core, 500.0 + 150.0 * i as f64, 500.0);
        let right = core.editor.page_bounds(&c).unwrap().max_x() - 10.0;
        drag_center(&mut core, &e, Point::new(right, 74.0));
        ids.push(e);
    }
    assert_eq!(members(&core, &c), ids);
    let first_key = core.editor.bindings_to(&ids[0], BindingKind::Layout)[0].layout_props().unwrap().index.clone();

    drag_center(&mut core, &ids[2], Point::new(74.0, 74.0));

    let moved_key = core.editor.bindings_to(&ids[2], BindingKind::Layout)[0].layout_props().unwrap().index.clone();
    assert!(moved_key < first_key);
    assert_eq!(members(&core, &c), vec![ids[2], ids[0], ids[1]]);
    assert_settled_geometry(&core, &c);
}

#[test]
fn detach_closes_the_gap() {
    let mut core = engine();
    let c = add_container(&mut core, 0.0, 0.0);
    let mut ids = Vec::new();
    for i in 0..3 {
        let e = add_element(&mut core, 500.0 + 150.0 * i as f64, 500.0);
        let right = core.editor.page_bounds(&c).unwrap().max_x() - 10.0;
        drag_center(&mut core, &e, Point::new(right, 74.0));
        ids.push(e);
    }

    drag_center(&mut core, &ids[1], Point::new(1000.0, 1000.0));

    assert!(core.editor.bindings_to(&ids[1], BindingKind::Layout).is_empty());
    assert_eq!(members(&core, &c), vec![ids[0], ids[2]]);
    assert_eq!(core.editor.page_bounds(&ids[1]).unwrap().center(), Point::new(1000.0, 1000.0));
    assert_settled_geometry(&core, &c);
}

#[test]
fn aborted_drag_changes_nothing() {
    let mut core = engine();
    let c = add_container(&mut core, 0.0, 0.0);
    let e = add_element(&mut core, 400.0, 0.0);
    drag_center(&mut core, &e, Point::new(24.0, 74.0));
    let before = core.editor.snapshot().to_json().unwrap();

    let from = core.editor.page_bounds(&e).unwrap().center();
    core.on_pointer_down(from, Button::Primary);
    core.on_pointer_move(Point::new(900.0, 900.0));
    assert!(core.editor.bindings_to(&e, BindingKind::Layout).is_empty());
    core.on_key_down(&Key("Escape".into()));

    assert_eq!(members(&core, &c), vec![e]);
    assert_settled_geometry(&core, &c);
    let after: serde_json::Value = serde_json::from_str(&core.editor.snapshot().to_json().unwrap()).unwrap();
    let before: serde_json::Value = serde_json::from_str(&before).unwrap();
    assert_eq!(after["shapes"], before["shapes"]);
}

// =============================================================
// Reflow
// =============================================================

#[test]
fn reflow_is_idempotent() {
    let mut core = engine();
    let c = add_container(&mut core, 0.0, 0.0);
    let mut trigger = None;
    for k in ["a0", "a1", "a2"] {
        let e = add_element(&mut core, 0.0, 400.0);
        let b = Binding::layout(c, e, OrderKey::parse(k).unwrap(), false);
        trigger = Some(b.clone());
        core.editor.create_binding(b).unwrap();
    }
    core.editor.take_changes();

    let util = LayoutBindingUtil::default();
    assert_eq!(util.update_elements_for_container(&mut core.editor, &trigger.unwrap()), 0);
    assert!(core.editor.take_changes().is_empty());
}

#[test]
fn deleting_container_drops_its_bindings() {
    let mut core = engine();
    let c = add_container(&mut core, 0.0, 0.0);
    let e = add_element(&mut core, 400.0, 0.0);
    drag_center(&mut core, &e, Point::new(24.0, 74.0));

    core.editor.delete_shape(&c).unwrap();
    assert!(core.editor.bindings_to(&e, BindingKind::Layout).is_empty());
    assert_eq!(core.editor.page_point(&e), Some(Point::new(24.0, 24.0)));
}
