//! Linear undo/redo history with replay-based undo.
//!
//! The engine keeps two stacks of [`DrawOperation`]s. Undo does not try to
//! erase the removed shape (shapes may overlap); it clears the surface and
//! replays every surviving operation bottom-to-top instead.

mod operation;

pub use operation::DrawOperation;

use crate::draw::{Shape, Surface};
use crate::events::{Event, HistoryWarning, NotificationBus};
use log::debug;
use std::rc::Rc;

/// Owner of the applied/undone stacks and of the surface they are drawn on.
pub struct History<S: Surface> {
    surface: S,
    /// Operations currently visible (first = oldest)
    applied: Vec<DrawOperation>,
    /// Operations removed by undo (last = most recently undone)
    undone: Vec<DrawOperation>,
    bus: Rc<NotificationBus>,
}

impl<S: Surface> History<S> {
    /// Creates an empty history drawing onto `surface` and publishing on `bus`.
    pub fn new(surface: S, bus: Rc<NotificationBus>) -> Self {
        Self {
            surface,
            applied: Vec::new(),
            undone: Vec::new(),
            bus,
        }
    }

    /// Applies `op`, pushes it onto the applied stack, and drops redo history.
    pub fn add(&mut self, op: DrawOperation) {
        op.apply(&mut self.surface);
        let shape = *op.shape();
        self.applied.push(op);
        self.undone.clear();
        self.bus.publish(&Event::ShapeAdded(shape));
    }

    /// Removes the most recent operation and redraws the rest.
    ///
    /// Returns the undone shape, or `None` (after publishing a warning) when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> Option<Shape> {
        let Some(op) = self.applied.pop() else {
            debug!("Undo requested with an empty history");
            self.bus.publish(&Event::Warning(HistoryWarning::NothingToUndo));
            return None;
        };

        self.replay();
        let shape = *op.shape();
        self.undone.push(op);

        self.bus.publish(&Event::ShapeRemoved(shape));
        self.bus.publish(&Event::UndoPerformed {
            applied: self.applied.len(),
            undone: self.undone.len(),
        });
        Some(shape)
    }

    /// Re-applies the most recently undone operation on top of the canvas.
    ///
    /// Returns the redone shape, or `None` (after publishing a warning) when
    /// there is nothing to redo.
    pub fn redo(&mut self) -> Option<Shape> {
        let Some(op) = self.undone.pop() else {
            debug!("Redo requested with nothing undone");
            self.bus.publish(&Event::Warning(HistoryWarning::NothingToRedo));
            return None;
        };

        op.apply(&mut self.surface);
        let shape = *op.shape();
        self.applied.push(op);

        self.bus.publish(&Event::ShapeAdded(shape));
        self.bus.publish(&Event::RedoPerformed {
            applied: self.applied.len(),
            undone: self.undone.len(),
        });
        Some(shape)
    }

    /// Empties both stacks and wipes the surface.
    pub fn clear(&mut self) {
        self.applied.clear();
        self.undone.clear();
        self.surface.clear();
        self.bus.publish(&Event::CanvasCleared);
    }

    /// Copy of the applied stack, oldest first.
    pub fn snapshot_applied(&self) -> Vec<DrawOperation> {
        self.applied.clone()
    }

    pub fn applied_len(&self) -> usize {
        self.applied.len()
    }

    pub fn undone_len(&self) -> usize {
        self.undone.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.applied.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn bus(&self) -> &Rc<NotificationBus> {
        &self.bus
    }

    /// Consumes the history and hands back its surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    fn replay(&mut self) {
        self.surface.clear();
        for op in &self.applied {
            op.apply(&mut self.surface);
        }
        debug!("Replayed {} operations after undo", self.applied.len());
    }
}
