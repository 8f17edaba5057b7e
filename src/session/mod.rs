//! Editing session: one history, one store, and the current tool state.
//!
//! A [`Session`] is built explicitly by its caller and owns everything an
//! editing front end needs. Drawing, undo and redo go straight to the
//! [`History`]; save, load and delete go through the store and come back as a
//! [`StatusMessage`] so a failed store call never escapes as a panic or leaves
//! the canvas half-replaced.

use crate::config::DrawingConfig;
use crate::draw::{BLACK, Color, Shape, ShapeKind, Surface};
use crate::events::{Event, NotificationBus};
use crate::history::{DrawOperation, History};
use crate::snapshot::{self, DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use crate::store::{SnapshotStore, StoreResult};
use log::{error, info, warn};
use std::fmt;
use std::rc::Rc;

/// Severity of a [`StatusMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// User-facing outcome of a store-backed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Shape kind, color and fill mode used for the next drawn shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolState {
    pub kind: ShapeKind,
    pub color: Color,
    pub filled: bool,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            kind: ShapeKind::Line,
            color: BLACK,
            filled: false,
        }
    }
}

impl ToolState {
    pub fn from_config(drawing: &DrawingConfig) -> Self {
        Self {
            kind: drawing.default_shape,
            color: drawing.default_color.to_color(),
            filled: drawing.fill_mode,
        }
    }
}

pub struct Session<S: Surface, T: SnapshotStore> {
    history: History<S>,
    store: T,
    tool: ToolState,
    canvas_width: u32,
    canvas_height: u32,
    current_name: Option<String>,
}

impl<S: Surface, T: SnapshotStore> Session<S, T> {
    pub fn new(surface: S, store: T, bus: Rc<NotificationBus>) -> Self {
        Self {
            history: History::new(surface, bus),
            store,
            tool: ToolState::default(),
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            current_name: None,
        }
    }

    /// Session whose tool state and canvas size come from `[drawing]`.
    pub fn from_config(
        surface: S,
        store: T,
        bus: Rc<NotificationBus>,
        drawing: &DrawingConfig,
    ) -> Self {
        let mut session = Self::new(surface, store, bus);
        session.tool = ToolState::from_config(drawing);
        session.canvas_width = drawing.canvas_width;
        session.canvas_height = drawing.canvas_height;
        session
    }

    pub fn history(&self) -> &History<S> {
        &self.history
    }

    pub fn bus(&self) -> &Rc<NotificationBus> {
        self.history.bus()
    }

    pub fn store(&self) -> &T {
        &self.store
    }

    pub fn tool(&self) -> ToolState {
        self.tool
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Name of the drawing last saved or loaded, if any.
    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    // ------------------------------------------------------------------------
    // Tool state
    // ------------------------------------------------------------------------

    pub fn set_tool(&mut self, kind: ShapeKind) {
        let previous = self.tool.kind;
        if previous == kind {
            return;
        }
        self.tool.kind = kind;
        self.publish(Event::ToolChanged {
            previous,
            current: kind,
        });
    }

    pub fn set_color(&mut self, color: Color) {
        let previous = self.tool.color;
        if previous == color {
            return;
        }
        self.tool.color = color;
        self.publish(Event::ColorChanged {
            previous,
            current: color,
        });
    }

    pub fn set_fill_mode(&mut self, filled: bool) {
        let previous = self.tool.filled;
        if previous == filled {
            return;
        }
        self.tool.filled = filled;
        self.publish(Event::FillModeChanged {
            previous,
            current: filled,
        });
    }

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    /// Draws a shape between two points with the current tool state.
    pub fn draw(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) -> Shape {
        let shape = Shape::new(
            self.tool.kind,
            (x1, y1),
            (x2, y2),
            self.tool.color,
            self.tool.filled,
        );
        self.add_shape(shape);
        shape
    }

    pub fn add_shape(&mut self, shape: Shape) {
        self.history.add(DrawOperation::new(shape));
    }

    pub fn undo(&mut self) -> Option<Shape> {
        self.history.undo()
    }

    pub fn redo(&mut self) -> Option<Shape> {
        self.history.redo()
    }

    /// Starts an unnamed, empty drawing.
    pub fn new_drawing(&mut self) {
        self.history.clear();
        self.current_name = None;
    }

    // ------------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------------

    /// Saves the visible shapes under `name`, replacing any drawing of that name.
    pub fn save(&mut self, name: &str) -> StatusMessage {
        let name = name.trim();
        let snapshot = snapshot::to_snapshot(
            name,
            self.canvas_width,
            self.canvas_height,
            &self.history,
        );
        let shape_count = snapshot.shape_count();

        let replaced = matches!(self.store.exists(name), Ok(true));
        if let Err(err) = self.store.save(&snapshot) {
            error!("Failed to save drawing '{}': {}", name, err);
            return StatusMessage::error(format!("Could not save '{name}': {err}"));
        }

        self.current_name = Some(name.to_string());
        self.publish(Event::SnapshotSaved {
            name: name.to_string(),
            shape_count,
        });
        info!("Saved drawing '{}' ({} shapes)", name, shape_count);

        let verb = if replaced { "updated" } else { "saved" };
        StatusMessage::info(format!("Drawing '{name}' {verb} ({shape_count} shapes)"))
    }

    /// Replaces the canvas with the drawing called `name`.
    ///
    /// The stored drawing is fully decoded before the history is touched, so a
    /// missing drawing or a store failure leaves the current canvas as it was.
    pub fn load(&mut self, name: &str) -> StatusMessage {
        let name = name.trim();
        let snapshot = match self.store.load(name) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                warn!("No drawing named '{}'", name);
                return StatusMessage::warning(format!("Drawing '{name}' not found"));
            }
            Err(err) => {
                error!("Failed to load drawing '{}': {}", name, err);
                return StatusMessage::error(format!("Could not load '{name}': {err}"));
            }
        };

        let operations = snapshot::from_snapshot(&snapshot);
        let shape_count = operations.len();

        self.history.clear();
        for op in operations {
            self.history.add(op);
        }
        self.canvas_width = snapshot.canvas_width;
        self.canvas_height = snapshot.canvas_height;
        self.current_name = Some(snapshot.name.clone());

        self.publish(Event::SnapshotLoaded {
            name: snapshot.name,
            shape_count,
        });
        info!("Loaded drawing '{}' ({} shapes)", name, shape_count);
        StatusMessage::info(format!("Drawing '{name}' loaded ({shape_count} shapes)"))
    }

    /// Removes the stored drawing called `name`. The canvas is left alone.
    pub fn delete(&mut self, name: &str) -> StatusMessage {
        let name = name.trim();
        match self.store.delete(name) {
            Ok(true) => {
                if self.current_name.as_deref() == Some(name) {
                    self.current_name = None;
                }
                info!("Deleted drawing '{}'", name);
                StatusMessage::info(format!("Drawing '{name}' deleted"))
            }
            Ok(false) => StatusMessage::warning(format!("Drawing '{name}' not found")),
            Err(err) => {
                error!("Failed to delete drawing '{}': {}", name, err);
                StatusMessage::error(format!("Could not delete '{name}': {err}"))
            }
        }
    }

    pub fn list(&self) -> StoreResult<Vec<String>> {
        self.store.list()
    }

    pub fn exists(&self, name: &str) -> StoreResult<bool> {
        self.store.exists(name.trim())
    }

    fn publish(&self, event: Event) {
        self.history.bus().publish(&event);
    }
}

#[cfg(test)]
mod tests;
