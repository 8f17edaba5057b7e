//! Stock subscribers: event logging, session statistics, and a status line.

use super::{Event, Subscriber};
use crate::draw::ShapeKind;
use crate::util;
use log::{info, warn};
use std::collections::BTreeMap;

/// Writes one log line per event through the `log` facade.
#[derive(Debug, Default)]
pub struct LoggingSubscriber;

impl LoggingSubscriber {
    pub fn new() -> Self {
        Self
    }
}

impl Subscriber for LoggingSubscriber {
    fn handle(&mut self, event: &Event) -> anyhow::Result<()> {
        let tag = event.tag();
        match event {
            Event::ShapeAdded(shape) | Event::ShapeRemoved(shape) => info!(
                "{tag}: {} at ({:.1},{:.1})-({:.1},{:.1}), color={}, filled={}",
                shape.kind,
                shape.x1,
                shape.y1,
                shape.x2,
                shape.y2,
                util::color_label(&shape.color),
                shape.filled
            ),
            Event::CanvasCleared => info!("{tag}: all shapes removed from canvas"),
            Event::SnapshotLoaded { name, shape_count }
            | Event::SnapshotSaved { name, shape_count } => {
                info!("{tag}: '{name}' with {shape_count} shapes")
            }
            Event::ToolChanged { previous, current } => info!("{tag}: {previous} -> {current}"),
            Event::ColorChanged { previous, current } => info!(
                "{tag}: {} -> {}",
                util::color_label(previous),
                util::color_label(current)
            ),
            Event::FillModeChanged { previous, current } => info!(
                "{tag}: {} -> {}",
                fill_mode_label(*previous),
                fill_mode_label(*current)
            ),
            Event::UndoPerformed { applied, undone } | Event::RedoPerformed { applied, undone } => {
                info!("{tag}: applied={applied}, undone={undone}")
            }
            Event::Warning(warning) => warn!("{tag}: {warning}"),
        }
        Ok(())
    }
}

fn fill_mode_label(filled: bool) -> &'static str {
    if filled { "Fill" } else { "Stroke" }
}

/// Running counters for one editing session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    pub shapes_drawn: usize,
    pub shapes_removed: usize,
    pub canvas_cleared: usize,
    pub drawings_saved: usize,
    pub drawings_loaded: usize,
    pub undo_operations: usize,
    pub redo_operations: usize,
    pub tool_changes: usize,
    pub color_changes: usize,
    pub fill_mode_changes: usize,
    pub warnings: usize,
    pub shapes_by_kind: BTreeMap<ShapeKind, usize>,
    pub shapes_by_color: BTreeMap<String, usize>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shapes added minus shapes removed, never negative.
    pub fn current_shape_count(&self) -> usize {
        self.shapes_drawn.saturating_sub(self.shapes_removed)
    }

    pub fn most_used_kind(&self) -> Option<ShapeKind> {
        most_used(&self.shapes_by_kind).copied()
    }

    pub fn most_used_color(&self) -> Option<&str> {
        most_used(&self.shapes_by_color).map(String::as_str)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Multi-line human-readable report.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "=== DRAWING SESSION STATISTICS ===\n\
             Total shapes drawn: {}\n\
             Total shapes removed: {}\n\
             Current shapes on canvas: {}\n\
             Canvas cleared count: {}\n\
             Drawings saved: {}\n\
             Drawings loaded: {}\n\
             Undo operations: {}\n\
             Redo operations: {}\n\
             Tool changes: {}\n\
             Color changes: {}\n\
             Fill mode changes: {}\n",
            self.shapes_drawn,
            self.shapes_removed,
            self.current_shape_count(),
            self.canvas_cleared,
            self.drawings_saved,
            self.drawings_loaded,
            self.undo_operations,
            self.redo_operations,
            self.tool_changes,
            self.color_changes,
            self.fill_mode_changes,
        );

        out.push_str("Shape type distribution:\n");
        for (kind, count) in &self.shapes_by_kind {
            out.push_str(&format!("  {kind}: {count}\n"));
        }
        out.push_str("Color usage distribution:\n");
        for (color, count) in &self.shapes_by_color {
            out.push_str(&format!("  {color}: {count}\n"));
        }
        out
    }
}

fn most_used<K>(counts: &BTreeMap<K, usize>) -> Option<&K> {
    // Ties resolve to the smallest key so the answer is deterministic.
    counts
        .iter()
        .fold(None, |best: Option<(&K, usize)>, (key, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((key, count)),
        })
        .map(|(key, _)| key)
}

impl Subscriber for Statistics {
    fn handle(&mut self, event: &Event) -> anyhow::Result<()> {
        match event {
            Event::ShapeAdded(shape) => {
                self.shapes_drawn += 1;
                *self.shapes_by_kind.entry(shape.kind).or_default() += 1;
                *self
                    .shapes_by_color
                    .entry(util::color_label(&shape.color))
                    .or_default() += 1;
            }
            Event::ShapeRemoved(_) => self.shapes_removed += 1,
            Event::CanvasCleared => self.canvas_cleared += 1,
            Event::SnapshotLoaded { .. } => self.drawings_loaded += 1,
            Event::SnapshotSaved { .. } => self.drawings_saved += 1,
            Event::ToolChanged { .. } => self.tool_changes += 1,
            Event::ColorChanged { .. } => self.color_changes += 1,
            Event::FillModeChanged { .. } => self.fill_mode_changes += 1,
            Event::UndoPerformed { .. } => self.undo_operations += 1,
            Event::RedoPerformed { .. } => self.redo_operations += 1,
            Event::Warning(_) => self.warnings += 1,
        }
        Ok(())
    }
}

/// Headless status bar: remembers the latest status line and the number of
/// shapes currently on the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusTracker {
    status: String,
    shape_count: usize,
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self {
            status: "Ready".to_string(),
            shape_count: 0,
        }
    }
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn shape_count(&self) -> usize {
        self.shape_count
    }
}

impl Subscriber for StatusTracker {
    fn handle(&mut self, event: &Event) -> anyhow::Result<()> {
        self.status = match event {
            Event::ShapeAdded(shape) => {
                self.shape_count += 1;
                format!("Shape added: {} (Total: {})", shape.kind, self.shape_count)
            }
            Event::ShapeRemoved(shape) => {
                self.shape_count = self.shape_count.saturating_sub(1);
                format!("Shape removed: {} (Total: {})", shape.kind, self.shape_count)
            }
            Event::CanvasCleared => {
                self.shape_count = 0;
                "Canvas cleared - ready for new drawing".to_string()
            }
            Event::SnapshotLoaded { name, shape_count } => {
                self.shape_count = *shape_count;
                format!("Loaded '{name}' ({shape_count} shapes)")
            }
            Event::SnapshotSaved { name, shape_count } => {
                format!("Saved '{name}' ({shape_count} shapes)")
            }
            Event::ToolChanged { current, .. } => format!("Ready - {current} tool selected"),
            Event::ColorChanged { current, .. } => {
                format!("Color changed to {}", util::color_label(current))
            }
            Event::FillModeChanged { current, .. } => {
                format!("Drawing mode: {}", fill_mode_label(*current).to_lowercase())
            }
            Event::UndoPerformed { applied, undone } => {
                format!("Undo completed ({applied} applied, {undone} undone)")
            }
            Event::RedoPerformed { applied, undone } => {
                format!("Redo completed ({applied} applied, {undone} undone)")
            }
            Event::Warning(warning) => {
                let mut text = warning.to_string();
                if let Some(first) = text.get_mut(0..1) {
                    first.make_ascii_uppercase();
                }
                text
            }
        };
        Ok(())
    }
}
