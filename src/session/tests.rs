use super::*;
use crate::config::ColorSpec;
use crate::draw::{Frame, RED};
use crate::events::{Statistics, StatusTracker};
use crate::snapshot::Snapshot;
use crate::store::{MemoryStore, StoreError};
use std::cell::RefCell;
use std::io;

/// Store whose every call fails.
struct BrokenStore;

fn broken() -> StoreError {
    StoreError::Io {
        context: "disk unplugged".to_string(),
        source: io::Error::other("gone"),
    }
}

impl SnapshotStore for BrokenStore {
    fn exists(&self, _name: &str) -> StoreResult<bool> {
        Err(broken())
    }

    fn save(&mut self, _snapshot: &Snapshot) -> StoreResult<()> {
        Err(broken())
    }

    fn load(&self, _name: &str) -> StoreResult<Option<Snapshot>> {
        Err(broken())
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        Err(broken())
    }

    fn delete(&mut self, _name: &str) -> StoreResult<bool> {
        Err(broken())
    }
}

fn session() -> (Session<Frame, MemoryStore>, Rc<RefCell<Statistics>>) {
    let bus = Rc::new(NotificationBus::new());
    let stats = Rc::new(RefCell::new(Statistics::new()));
    bus.subscribe(stats.clone());
    (Session::new(Frame::new(), MemoryStore::new(), bus), stats)
}

#[test]
fn draw_uses_the_current_tool_state() {
    let (mut session, _) = session();
    session.set_tool(ShapeKind::Rectangle);
    session.set_color(RED);
    session.set_fill_mode(true);

    let shape = session.draw(1.0, 2.0, 3.0, 4.0);

    assert_eq!(shape, Shape::rectangle(1.0, 2.0, 3.0, 4.0, RED, true));
    assert_eq!(session.history().surface().shapes, vec![shape]);
}

#[test]
fn tool_setters_only_publish_real_changes() {
    let (mut session, stats) = session();

    session.set_tool(ShapeKind::Line);
    session.set_color(BLACK);
    session.set_fill_mode(false);
    session.set_tool(ShapeKind::Ellipse);
    session.set_color(RED);
    session.set_fill_mode(true);

    let stats = stats.borrow();
    assert_eq!(stats.tool_changes, 1);
    assert_eq!(stats.color_changes, 1);
    assert_eq!(stats.fill_mode_changes, 1);
}

#[test]
fn from_config_applies_drawing_defaults() {
    let drawing = DrawingConfig {
        default_color: ColorSpec::Rgb([1, 2, 3]),
        default_shape: ShapeKind::Ellipse,
        fill_mode: true,
        canvas_width: 320,
        canvas_height: 200,
    };
    let session = Session::from_config(
        Frame::new(),
        MemoryStore::new(),
        Rc::new(NotificationBus::new()),
        &drawing,
    );

    assert_eq!(
        session.tool(),
        ToolState {
            kind: ShapeKind::Ellipse,
            color: Color::new(1, 2, 3),
            filled: true,
        }
    );
    assert_eq!(session.canvas_size(), (320, 200));
}

#[test]
fn save_then_load_restores_the_canvas() {
    let (mut session, stats) = session();
    session.draw(0.0, 0.0, 10.0, 10.0);
    session.set_tool(ShapeKind::Rectangle);
    session.draw(5.0, 5.0, 20.0, 20.0);
    let before = session.history().snapshot_applied();

    let saved = session.save("sketch");
    assert_eq!(saved.level, StatusLevel::Info);
    assert_eq!(session.current_name(), Some("sketch"));

    session.new_drawing();
    assert!(session.history().surface().is_empty());
    assert_eq!(session.current_name(), None);

    let loaded = session.load("sketch");
    assert_eq!(loaded.level, StatusLevel::Info);
    assert_eq!(session.history().snapshot_applied(), before);
    assert_eq!(session.history().undone_len(), 0);
    assert_eq!(session.current_name(), Some("sketch"));

    let stats = stats.borrow();
    assert_eq!(stats.drawings_saved, 1);
    assert_eq!(stats.drawings_loaded, 1);
}

#[test]
fn saving_twice_reports_an_update() {
    let (mut session, _) = session();
    session.draw(0.0, 0.0, 1.0, 1.0);

    assert!(session.save("again").text.contains("saved"));
    assert!(session.save("again").text.contains("updated"));
    assert_eq!(session.list().unwrap(), vec!["again".to_string()]);
}

#[test]
fn loading_a_missing_drawing_keeps_the_canvas() {
    let (mut session, _) = session();
    session.draw(0.0, 0.0, 1.0, 1.0);

    let status = session.load("nope");

    assert_eq!(status.level, StatusLevel::Warning);
    assert_eq!(session.history().applied_len(), 1);
}

#[test]
fn store_failures_become_error_status() {
    let bus = Rc::new(NotificationBus::new());
    let tracker = Rc::new(RefCell::new(StatusTracker::new()));
    bus.subscribe(tracker.clone());
    let mut session = Session::new(Frame::new(), BrokenStore, bus);
    session.draw(0.0, 0.0, 1.0, 1.0);
    session.draw(2.0, 2.0, 3.0, 3.0);

    let save = session.save("x");
    let load = session.load("x");
    let delete = session.delete("x");

    assert!(save.is_error());
    assert!(save.text.contains("disk unplugged"));
    assert!(load.is_error());
    assert!(delete.is_error());
    assert_eq!(session.history().applied_len(), 2);
    assert_eq!(session.history().surface().len(), 2);
    assert_eq!(session.current_name(), None);
    assert_eq!(tracker.borrow().shape_count(), 2);
    assert!(session.list().is_err());
}

#[test]
fn unsaveable_coordinates_leave_other_drawings_loadable() {
    let (mut session, _) = session();
    session.draw(0.0, 0.0, 5.0, 5.0);
    assert!(!session.save("keep").is_error());

    session.new_drawing();
    session.draw(f64::NAN, 0.0, 5.0, 5.0);
    let save = session.save("nan");

    assert!(save.is_error());
    assert!(save.text.contains("non-finite"));
    let load = session.load("keep");
    assert_eq!(load.text, "Drawing 'keep' loaded (1 shapes)");
    assert_eq!(session.list().unwrap(), vec!["keep".to_string()]);
}

#[test]
fn blank_names_are_refused() {
    let (mut session, stats) = session();
    session.draw(0.0, 0.0, 1.0, 1.0);

    let status = session.save("   ");

    assert!(status.is_error());
    assert_eq!(stats.borrow().drawings_saved, 0);
    assert!(session.list().unwrap().is_empty());
}

#[test]
fn delete_forgets_the_current_name() {
    let (mut session, _) = session();
    session.draw(0.0, 0.0, 1.0, 1.0);
    session.save("gone");

    let status = session.delete("gone");

    assert_eq!(status.level, StatusLevel::Info);
    assert_eq!(session.current_name(), None);
    assert!(!session.exists("gone").unwrap());
    assert_eq!(session.history().applied_len(), 1);
    assert_eq!(session.delete("gone").level, StatusLevel::Warning);
}

#[test]
fn load_replaces_redo_history() {
    let (mut session, _) = session();
    session.draw(0.0, 0.0, 1.0, 1.0);
    session.save("one");
    session.draw(2.0, 2.0, 3.0, 3.0);
    session.undo();
    assert!(session.history().can_redo());

    session.load("one");

    assert!(!session.history().can_redo());
    assert_eq!(session.redo(), None);
}

#[test]
fn status_tracker_counts_after_load() {
    let bus = Rc::new(NotificationBus::new());
    let tracker = Rc::new(RefCell::new(StatusTracker::new()));
    bus.subscribe(tracker.clone());
    let mut session = Session::new(Frame::new(), MemoryStore::new(), bus);
    for i in 0..3 {
        session.draw(i as f64, 0.0, 5.0, 5.0);
    }
    session.save("three");
    session.new_drawing();

    session.load("three");

    let tracker = tracker.borrow();
    assert_eq!(tracker.shape_count(), 3);
    assert_eq!(tracker.status(), "Loaded 'three' (3 shapes)");
}
