use super::*;
use crate::draw::{BLACK, Color, Frame, GREEN, RED};
use crate::events::NotificationBus;
use std::rc::Rc;

fn history() -> History<Frame> {
    History::new(Frame::new(), Rc::new(NotificationBus::new()))
}

fn record(kind: &str, color: &str, order: u32) -> ShapeRecord {
    ShapeRecord {
        kind: kind.to_string(),
        x1: 1.0,
        y1: 2.0,
        x2: 3.0,
        y2: 4.0,
        color: color.to_string(),
        filled: false,
        order,
    }
}

#[test]
fn round_trip_preserves_shapes_and_order() {
    let line = Shape::line(0.0, 0.0, 10.0, 10.0, Color::new(0xFF, 0, 0));
    let rect = Shape::rectangle(5.0, 5.0, 20.0, 20.0, Color::new(0, 0xFF, 0), true);
    let mut source = history();
    source.add(line.into());
    source.add(rect.into());

    let snapshot = to_snapshot("A", 800, 600, &source);
    assert_eq!(snapshot.shapes[0].color, "#FF0000");
    assert_eq!(snapshot.shapes[1].color, "#00FF00");
    assert_eq!(snapshot.shapes[1].kind, "Rectangle");
    assert!(snapshot.shapes[1].filled);

    let mut restored = history();
    for op in from_snapshot(&snapshot) {
        restored.add(op);
    }

    assert_eq!(restored.snapshot_applied(), source.snapshot_applied());
    assert_eq!(restored.surface().shapes, vec![line, rect]);
}

#[test]
fn orders_are_dense_and_follow_apply_order() {
    let mut source = history();
    for i in 0..5 {
        source.add(Shape::line(i as f64, 0.0, 0.0, 0.0, RED).into());
    }

    let snapshot = to_snapshot("dense", 800, 600, &source);
    let orders: Vec<u32> = snapshot.shapes.iter().map(|r| r.order).collect();

    assert_eq!(orders, vec![0, 1, 2, 3, 4]);
    assert_eq!(snapshot.duplicate_order(), None);
}

#[test]
fn undone_operations_are_not_captured() {
    let mut source = history();
    source.add(Shape::line(0.0, 0.0, 1.0, 1.0, RED).into());
    source.add(Shape::line(2.0, 2.0, 3.0, 3.0, GREEN).into());
    source.undo();

    let snapshot = to_snapshot("partial", 800, 600, &source);

    assert_eq!(snapshot.shape_count(), 1);
    assert_eq!(snapshot.shapes[0].color, "#FF0000");
}

#[test]
fn records_are_restored_by_order_not_position() {
    let mut snapshot = Snapshot::new("shuffled", 800, 600);
    snapshot.shapes = vec![
        record("Ellipse", "#0000FF", 2),
        record("Line", "#FF0000", 0),
        record("Rectangle", "#00FF00", 1),
    ];

    let kinds: Vec<ShapeKind> = shapes_of(&snapshot).iter().map(|s| s.kind).collect();

    assert_eq!(
        kinds,
        vec![ShapeKind::Line, ShapeKind::Rectangle, ShapeKind::Ellipse]
    );
}

#[test]
fn equal_orders_keep_stored_position() {
    let mut snapshot = Snapshot::new("ties", 800, 600);
    snapshot.shapes = vec![record("Line", "#010101", 0), record("Line", "#020202", 0)];

    let shapes = shapes_of(&snapshot);

    assert_eq!(shapes[0].color, Color::new(1, 1, 1));
    assert_eq!(shapes[1].color, Color::new(2, 2, 2));
    assert_eq!(snapshot.duplicate_order(), Some(0));
}

#[test]
fn named_and_malformed_colors_decode_leniently() {
    let mut snapshot = Snapshot::new("colors", 800, 600);
    snapshot.shapes = vec![
        record("Line", "orange", 0),
        record("Line", "not-a-color", 1),
        record("Line", "#12", 2),
        record("Line", "00ff7f", 3),
    ];

    let colors: Vec<Color> = shapes_of(&snapshot).iter().map(|s| s.color).collect();

    assert_eq!(
        colors,
        vec![
            Color::new(255, 165, 0),
            BLACK,
            BLACK,
            Color::new(0, 255, 127)
        ]
    );
}

#[test]
fn unknown_kinds_are_skipped() {
    let mut snapshot = Snapshot::new("kinds", 800, 600);
    snapshot.shapes = vec![
        record("Line", "#000000", 0),
        record("Triangle", "#000000", 1),
        record("ellipse", "#000000", 2),
    ];

    let shapes = shapes_of(&snapshot);

    assert_eq!(shapes.len(), 2);
    assert_eq!(shapes[1].kind, ShapeKind::Ellipse);
}

#[test]
fn non_finite_coordinates_become_zero() {
    let mut bad = record("Rectangle", "#000000", 0);
    bad.x1 = f64::NAN;
    bad.y2 = f64::INFINITY;
    let mut snapshot = Snapshot::new("coords", 800, 600);
    snapshot.shapes = vec![bad];

    let shape = shapes_of(&snapshot)[0];

    assert_eq!(shape.x1, 0.0);
    assert_eq!(shape.y1, 2.0);
    assert_eq!(shape.y2, 0.0);
}

#[test]
fn line_fill_flag_survives_the_codec() {
    let mut source = history();
    source.add(Shape::new(ShapeKind::Line, (0.0, 0.0), (1.0, 1.0), RED, true).into());

    let snapshot = to_snapshot("line", 800, 600, &source);
    let shape = shapes_of(&snapshot)[0];

    assert!(snapshot.shapes[0].filled);
    assert!(shape.filled);
    assert!(!shape.renders_filled());
}

#[test]
fn snapshot_json_fills_missing_canvas_size() {
    let json = r#"{
        "name": "legacy",
        "created_at": "2024-01-01T00:00:00Z",
        "modified_at": "2024-01-02T00:00:00Z"
    }"#;

    let snapshot: Snapshot = serde_json::from_str(json).unwrap();

    assert_eq!(snapshot.canvas_width, DEFAULT_CANVAS_WIDTH);
    assert_eq!(snapshot.canvas_height, DEFAULT_CANVAS_HEIGHT);
    assert!(snapshot.shapes.is_empty());
}

#[test]
fn shape_record_json_tolerates_missing_and_null_fields() {
    let json = r##"[
        { "kind": "Rectangle", "x1": null, "y1": 4.0, "order": 1 },
        { "x1": 1.0, "y1": 1.0, "x2": 2.0, "y2": 2.0, "color": "#00FF00", "order": 0 }
    ]"##;

    let records: Vec<ShapeRecord> = serde_json::from_str(json).unwrap();
    assert_eq!(records[0].x1, 0.0);
    assert_eq!(records[0].x2, 0.0);
    assert_eq!(records[0].color, "");
    assert_eq!(records[1].kind, "");

    let mut snapshot = Snapshot::new("patched", 100, 100);
    snapshot.shapes = records;
    let shapes = shapes_of(&snapshot);
    assert_eq!(shapes.len(), 1);
    assert_eq!(shapes[0].kind, ShapeKind::Rectangle);
    assert_eq!(shapes[0].color, BLACK);
    assert_eq!((shapes[0].x1, shapes[0].y1), (0.0, 4.0));
}

#[test]
fn non_finite_order_finds_the_offending_record() {
    let mut snapshot = Snapshot::new("n", 10, 10);
    snapshot.shapes = vec![record("Line", "#FF0000", 0), record("Line", "#FF0000", 1)];
    assert_eq!(snapshot.non_finite_order(), None);

    snapshot.shapes[1].y2 = f64::NEG_INFINITY;
    assert_eq!(snapshot.non_finite_order(), Some(1));
}
