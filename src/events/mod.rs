//! Drawing events and the bus that fans them out to subscribers.
//!
//! Every history mutation and every session-level change (tool, color, fill
//! mode, save, load) is published as one [`Event`]. Subscribers see events in
//! publish order; one failing subscriber never keeps the others from being
//! notified.

mod subscribers;

pub use subscribers::{LoggingSubscriber, Statistics, StatusTracker};

use crate::draw::{Color, Shape, ShapeKind};
use log::{error, warn};
use std::cell::RefCell;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Non-fatal conditions reported by the history engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryWarning {
    NothingToUndo,
    NothingToRedo,
}

impl fmt::Display for HistoryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryWarning::NothingToUndo => f.write_str("nothing to undo"),
            HistoryWarning::NothingToRedo => f.write_str("nothing to redo"),
        }
    }
}

/// Something that happened to the drawing or the editing session.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ShapeAdded(Shape),
    ShapeRemoved(Shape),
    CanvasCleared,
    SnapshotLoaded { name: String, shape_count: usize },
    SnapshotSaved { name: String, shape_count: usize },
    ToolChanged { previous: ShapeKind, current: ShapeKind },
    ColorChanged { previous: Color, current: Color },
    FillModeChanged { previous: bool, current: bool },
    /// Stack sizes after the undo completed.
    UndoPerformed { applied: usize, undone: usize },
    /// Stack sizes after the redo completed.
    RedoPerformed { applied: usize, undone: usize },
    Warning(HistoryWarning),
}

impl Event {
    /// Short uppercase tag used in log lines.
    pub fn tag(&self) -> &'static str {
        match self {
            Event::ShapeAdded(_) => "SHAPE_ADDED",
            Event::ShapeRemoved(_) => "SHAPE_REMOVED",
            Event::CanvasCleared => "CANVAS_CLEARED",
            Event::SnapshotLoaded { .. } => "DRAWING_LOADED",
            Event::SnapshotSaved { .. } => "DRAWING_SAVED",
            Event::ToolChanged { .. } => "TOOL_CHANGED",
            Event::ColorChanged { .. } => "COLOR_CHANGED",
            Event::FillModeChanged { .. } => "FILL_MODE_CHANGED",
            Event::UndoPerformed { .. } => "UNDO_PERFORMED",
            Event::RedoPerformed { .. } => "REDO_PERFORMED",
            Event::Warning(_) => "WARNING",
        }
    }
}

/// Receiver of drawing events.
///
/// Returning an error (or panicking) only affects this subscriber's delivery;
/// the bus logs it and moves on.
pub trait Subscriber {
    fn handle(&mut self, event: &Event) -> anyhow::Result<()>;
}

/// Shared handle to a subscriber. Identity is the allocation, so the same
/// handle can be subscribed at most once.
pub type SubscriberRef = Rc<RefCell<dyn Subscriber>>;

fn same_subscriber(a: &SubscriberRef, b: &SubscriberRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Fan-out broadcaster for [`Event`]s.
///
/// All methods take `&self`, so a subscriber holding an `Rc` to the bus can
/// subscribe or unsubscribe from inside its own handler. The bus is
/// single-threaded (`!Sync`).
#[derive(Default)]
pub struct NotificationBus {
    subscribers: RefCell<Vec<SubscriberRef>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber. Returns `false` if it was already registered.
    pub fn subscribe(&self, subscriber: SubscriberRef) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        if subscribers.iter().any(|s| same_subscriber(s, &subscriber)) {
            return false;
        }
        subscribers.push(subscriber);
        true
    }

    /// Removes a subscriber. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, subscriber: &SubscriberRef) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| !same_subscriber(s, subscriber));
        subscribers.len() != before
    }

    pub fn is_subscribed(&self, subscriber: &SubscriberRef) -> bool {
        self.subscribers
            .borrow()
            .iter()
            .any(|s| same_subscriber(s, subscriber))
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    pub fn clear_subscribers(&self) {
        self.subscribers.borrow_mut().clear();
    }

    /// Delivers `event` to every subscriber registered when the call started.
    ///
    /// Returns the number of subscribers whose delivery failed.
    pub fn publish(&self, event: &Event) -> usize {
        // Snapshot first: handlers may (un)subscribe while we iterate.
        let targets: Vec<SubscriberRef> = self.subscribers.borrow().clone();
        let mut failures = 0;

        for subscriber in targets {
            let Ok(mut handler) = subscriber.try_borrow_mut() else {
                warn!(
                    "Skipping {} delivery: subscriber is already handling an event",
                    event.tag()
                );
                failures += 1;
                continue;
            };

            match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(event))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    warn!("Subscriber failed to handle {}: {:#}", event.tag(), err);
                    failures += 1;
                }
                Err(_) => {
                    error!("Subscriber panicked while handling {}", event.tag());
                    failures += 1;
                }
            }
        }

        failures
    }
}

impl fmt::Debug for NotificationBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
