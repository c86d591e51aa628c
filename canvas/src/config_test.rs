#![allow(clippy::float_cmp)]

use std::collections::HashMap;

use super::*;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
    move |key| map.get(key).cloned()
}

// =============================================================
// LayoutConfig
// =============================================================

#[test]
fn slot_offsets_step_by_stride() {
    let layout = LayoutConfig::default();
    assert_eq!(layout.slot_offset(0), Point::new(24.0, 24.0));
    assert_eq!(layout.slot_offset(1), Point::new(148.0, 24.0));
    assert_eq!(layout.slot_offset(2), Point::new(272.0, 24.0));
    assert_eq!(layout.stride(), 124.0);
}

#[test]
fn container_size_by_member_count() {
    let layout = LayoutConfig::default();
    assert_eq!(layout.container_size(0), Size::new(48.0, 148.0));
    assert_eq!(layout.container_size(1), Size::new(148.0, 148.0));
    assert_eq!(layout.container_size(3), Size::new(396.0, 148.0));
}

#[test]
fn container_size_follows_custom_geometry() {
    let layout = LayoutConfig { slot_width: 50.0, slot_height: 40.0, padding: 10.0 };
    assert_eq!(layout.container_size(2), Size::new(130.0, 60.0));
    assert_eq!(layout.slot_offset(1), Point::new(70.0, 10.0));
}

// =============================================================
// DemoConfig::from_lookup
// =============================================================

#[test]
fn empty_lookup_gives_defaults() {
    let cfg = DemoConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(cfg, DemoConfig::default());
    assert_eq!(cfg.cursor.highlight, Color::Red);
    assert!(cfg.script.is_none());
}

#[test]
fn overrides_are_parsed() {
    let cfg = DemoConfig::from_lookup(lookup_from(&[
        ("LAYOUT_SLOT_WIDTH", "80"),
        ("LAYOUT_SLOT_HEIGHT", " 60 "),
        ("LAYOUT_PADDING", "0"),
        ("CURSOR_LERP", "1"),
        ("CURSOR_SIZE", "16.5"),
        ("CURSOR_HIGHLIGHT", "Green"),
        ("DEMO_SCRIPT", "/tmp/script.json"),
    ]))
    .unwrap();
    assert_eq!(cfg.layout, LayoutConfig { slot_width: 80.0, slot_height: 60.0, padding: 0.0 });
    assert_eq!(cfg.cursor, CursorConfig { lerp: 1.0, size: 16.5, highlight: Color::Green });
    assert_eq!(cfg.script, Some(PathBuf::from("/tmp/script.json")));
}

#[test]
fn blank_script_path_is_unset() {
    let cfg = DemoConfig::from_lookup(lookup_from(&[("DEMO_SCRIPT", "  ")])).unwrap();
    assert!(cfg.script.is_none());
}

#[test]
fn garbage_number_is_an_error() {
    let err = DemoConfig::from_lookup(lookup_from(&[("LAYOUT_PADDING", "wide")])).unwrap_err();
    assert_eq!(err, ConfigError::NotANumber { var: "LAYOUT_PADDING", value: "wide".into() });
}

#[test]
fn non_finite_number_is_an_error() {
    let err = DemoConfig::from_lookup(lookup_from(&[("CURSOR_SIZE", "inf")])).unwrap_err();
    assert!(matches!(err, ConfigError::NotANumber { var: "CURSOR_SIZE", .. }));
}

#[test]
fn lerp_must_be_in_unit_interval() {
    for bad in ["0", "-0.5", "1.5"] {
        let err = DemoConfig::from_lookup(lookup_from(&[("CURSOR_LERP", bad)])).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { var: "CURSOR_LERP", .. }), "{bad}: {err:?}");
    }
}

#[test]
fn slot_width_must_be_positive() {
    let err = DemoConfig::from_lookup(lookup_from(&[("LAYOUT_SLOT_WIDTH", "0")])).unwrap_err();
    assert_eq!(err, ConfigError::OutOfRange { var: "LAYOUT_SLOT_WIDTH", value: 0.0, expected: "> 0" });
}

#[test]
fn padding_may_not_be_negative() {
    let err = DemoConfig::from_lookup(lookup_from(&[("LAYOUT_PADDING", "-1")])).unwrap_err();
    assert_eq!(err, ConfigError::OutOfRange { var: "LAYOUT_PADDING", value: -1.0, expected: ">= 0" });
}

#[test]
fn unknown_highlight_color_is_an_error() {
    let err = DemoConfig::from_lookup(lookup_from(&[("CURSOR_HIGHLIGHT", "teal")])).unwrap_err();
    assert_eq!(err, ConfigError::UnknownColor { var: "CURSOR_HIGHLIGHT", value: "teal".into() });
    assert_eq!(err.to_string(), "CURSOR_HIGHLIGHT: unknown palette color 'teal'");
}
