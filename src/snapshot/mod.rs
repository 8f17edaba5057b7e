//! Conversion between the applied history and its persisted form.
//!
//! A [`Snapshot`] is a named drawing header plus a list of [`ShapeRecord`]s,
//! one per applied operation. Saving walks the applied stack oldest first and
//! numbers the records `0..N`. Loading sorts by that number and rebuilds the
//! operations, substituting defaults for anything malformed instead of
//! failing.

use crate::draw::{Shape, ShapeKind, Surface};
use crate::history::{DrawOperation, History};
use crate::util;
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 600;

/// Named, ordered set of shape records with canvas metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub name: String,
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub shapes: Vec<ShapeRecord>,
}

/// One persisted shape row.
///
/// `kind` and `color` stay textual so rows written by other tools (or by hand)
/// can still be read back; they are interpreted by [`from_snapshot`]. Missing
/// fields deserialize to empty or zero values and are reported there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    #[serde(default)]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub x1: f64,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub y1: f64,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub x2: f64,
    #[serde(default, deserialize_with = "lenient_coordinate")]
    pub y2: f64,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub filled: bool,
    #[serde(default)]
    pub order: u32,
}

/// Reads a coordinate, treating `null` (how JSON writes NaN) as 0.0.
pub(crate) fn lenient_coordinate<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    if value.is_none() {
        warn!("Shape coordinate is null; using 0.0");
    }
    Ok(value.unwrap_or(0.0))
}

fn default_canvas_width() -> u32 {
    DEFAULT_CANVAS_WIDTH
}

fn default_canvas_height() -> u32 {
    DEFAULT_CANVAS_HEIGHT
}

impl Snapshot {
    /// Empty snapshot stamped with the current time.
    pub fn new(name: impl Into<String>, canvas_width: u32, canvas_height: u32) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            canvas_width,
            canvas_height,
            created_at: now,
            modified_at: now,
            shapes: Vec::new(),
        }
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Returns the first order value that appears more than once, if any.
    pub fn duplicate_order(&self) -> Option<u32> {
        let mut orders: Vec<u32> = self.shapes.iter().map(|record| record.order).collect();
        orders.sort_unstable();
        orders
            .windows(2)
            .find(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
    }

    /// Returns the order of the first record with a NaN or infinite coordinate.
    pub fn non_finite_order(&self) -> Option<u32> {
        self.shapes
            .iter()
            .find(|record| {
                ![record.x1, record.y1, record.x2, record.y2]
                    .iter()
                    .all(|value| value.is_finite())
            })
            .map(|record| record.order)
    }
}

impl ShapeRecord {
    pub fn from_shape(shape: &Shape, order: u32) -> Self {
        Self {
            kind: shape.kind.as_str().to_string(),
            x1: shape.x1,
            y1: shape.y1,
            x2: shape.x2,
            y2: shape.y2,
            color: shape.color.to_hex(),
            filled: shape.filled,
            order,
        }
    }

    /// Interprets the row, or returns `None` when its kind is unknown.
    pub fn to_shape(&self) -> Option<Shape> {
        let kind = match ShapeKind::from_str(&self.kind) {
            Ok(kind) => kind,
            Err(err) => {
                warn!("Skipping shape record #{}: {}", self.order, err);
                return None;
            }
        };

        let (color, recognised) = util::parse_color_lossy(&self.color);
        if !recognised {
            warn!(
                "Shape record #{} has unrecognised color '{}'; using {}",
                self.order, self.color, color
            );
        }

        Some(Shape::new(
            kind,
            (
                finite_or_zero(self.x1, "x1", self.order),
                finite_or_zero(self.y1, "y1", self.order),
            ),
            (
                finite_or_zero(self.x2, "x2", self.order),
                finite_or_zero(self.y2, "y2", self.order),
            ),
            color,
            self.filled,
        ))
    }
}

fn finite_or_zero(value: f64, field: &str, order: u32) -> f64 {
    if value.is_finite() {
        value
    } else {
        warn!("Shape record #{order} has non-finite {field} ({value}); using 0.0");
        0.0
    }
}

/// Captures the applied stack of `history` as a snapshot named `name`.
pub fn to_snapshot<S: Surface>(
    name: &str,
    canvas_width: u32,
    canvas_height: u32,
    history: &History<S>,
) -> Snapshot {
    let mut snapshot = Snapshot::new(name, canvas_width, canvas_height);
    snapshot.shapes = history
        .snapshot_applied()
        .iter()
        .zip(0u32..)
        .map(|(op, order)| ShapeRecord::from_shape(op.shape(), order))
        .collect();
    snapshot
}

/// Rebuilds draw operations from a snapshot, in ascending record order.
///
/// Records with equal order keep their stored relative position. Unknown
/// kinds are dropped; bad colors and coordinates fall back to defaults.
pub fn from_snapshot(snapshot: &Snapshot) -> Vec<DrawOperation> {
    let mut records: Vec<&ShapeRecord> = snapshot.shapes.iter().collect();
    records.sort_by_key(|record| record.order);

    records
        .into_iter()
        .filter_map(ShapeRecord::to_shape)
        .map(DrawOperation::new)
        .collect()
}

/// Convenience for callers that only need the shapes.
pub fn shapes_of(snapshot: &Snapshot) -> Vec<Shape> {
    from_snapshot(snapshot)
        .into_iter()
        .map(DrawOperation::into_shape)
        .collect()
}

#[cfg(test)]
mod tests;
