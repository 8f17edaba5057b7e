//! In-memory surface that records what is currently visible.

use super::shape::Shape;
use super::surface::Surface;
use serde::{Deserialize, Serialize};

/// Headless [`Surface`] holding the shapes currently painted, in draw order.
///
/// Besides the visible shapes it counts draw and clear calls, which makes the
/// cost of replay observable in tests and diagnostics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Visible shapes in draw order (first = bottom layer, last = top layer)
    pub shapes: Vec<Shape>,
    /// Number of draw calls received since creation
    #[serde(skip)]
    pub draw_calls: usize,
    /// Number of clear calls received since creation
    #[serde(skip)]
    pub clear_calls: usize,
}

impl Frame {
    /// Creates a new empty frame with no shapes.
    pub const fn new() -> Self {
        Self {
            shapes: Vec::new(),
            draw_calls: 0,
            clear_calls: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }
}

impl Surface for Frame {
    fn draw(&mut self, shape: &Shape) {
        self.draw_calls += 1;
        self.shapes.push(*shape);
    }

    fn clear(&mut self) {
        self.clear_calls += 1;
        self.shapes.clear();
    }
}
