use super::{StoreError, StoreResult};
use crate::snapshot::{ShapeRecord, Snapshot, lenient_coordinate};
use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const CURRENT_VERSION: u32 = 1;

/// Header row of one saved drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingRow {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    /// Store-wide modification counter; larger means more recent.
    #[serde(default)]
    pub revision: u64,
    pub canvas_width: u32,
    pub canvas_height: u32,
}

/// Shape row belonging to the drawing with id `drawing_id`.
///
/// Every field has a default so one damaged row cannot make the whole table
/// set unreadable. A row without a drawing id is pruned as an orphan; a
/// missing kind or color is handled when the row is decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRow {
    #[serde(default)]
    pub drawing_id: u64,
    #[serde(default)]
    pub shape_kind: String,
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
    pub shape_order: u32,
}

impl ShapeRow {
    fn from_record(drawing_id: u64, record: &ShapeRecord) -> Self {
        Self {
            drawing_id,
            shape_kind: record.kind.clone(),
            x1: record.x1,
            y1: record.y1,
            x2: record.x2,
            y2: record.y2,
            color: record.color.clone(),
            filled: record.filled,
            shape_order: record.order,
        }
    }

    fn to_record(&self) -> ShapeRecord {
        ShapeRecord {
            kind: self.shape_kind.clone(),
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
            color: self.color.clone(),
            filled: self.filled,
            order: self.shape_order,
        }
    }
}

/// Relational model shared by every backend: `drawings` plus `shapes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tables {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default = "first_id")]
    pub next_id: u64,
    #[serde(default)]
    pub next_revision: u64,
    #[serde(default)]
    pub drawings: Vec<DrawingRow>,
    #[serde(default)]
    pub shapes: Vec<ShapeRow>,
}

fn current_version() -> u32 {
    CURRENT_VERSION
}

fn first_id() -> u64 {
    1
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            next_id: first_id(),
            next_revision: 0,
            drawings: Vec::new(),
            shapes: Vec::new(),
        }
    }
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects snapshots that cannot be stored: blank names, repeated orders
    /// and coordinates JSON has no encoding for.
    pub fn validate(snapshot: &Snapshot) -> StoreResult<()> {
        if snapshot.name.trim().is_empty() {
            return Err(StoreError::InvalidName);
        }
        if let Some(order) = snapshot.duplicate_order() {
            return Err(StoreError::DuplicateOrder {
                name: snapshot.name.clone(),
                order,
            });
        }
        if let Some(order) = snapshot.non_finite_order() {
            return Err(StoreError::InvalidCoordinate {
                name: snapshot.name.clone(),
                order,
            });
        }
        Ok(())
    }

    fn header(&self, name: &str) -> Option<&DrawingRow> {
        self.drawings.iter().find(|row| row.name == name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.header(name).is_some()
    }

    /// Inserts or replaces the drawing called `snapshot.name`.
    ///
    /// An existing drawing keeps its id and `created_at`; its shape rows are
    /// removed and the new set inserted. Nothing changes if validation fails.
    pub fn upsert(&mut self, snapshot: &Snapshot) -> StoreResult<()> {
        Self::validate(snapshot)?;

        let revision = self.next_revision;
        self.next_revision += 1;
        let now = Utc::now();

        let drawing_id = match self.drawings.iter_mut().find(|row| row.name == snapshot.name) {
            Some(row) => {
                row.modified_at = now;
                row.revision = revision;
                row.canvas_width = snapshot.canvas_width;
                row.canvas_height = snapshot.canvas_height;
                row.id
            }
            None => {
                let id = self.next_id;
                self.next_id += 1;
                self.drawings.push(DrawingRow {
                    id,
                    name: snapshot.name.clone(),
                    created_at: snapshot.created_at,
                    modified_at: now,
                    revision,
                    canvas_width: snapshot.canvas_width,
                    canvas_height: snapshot.canvas_height,
                });
                id
            }
        };

        self.shapes.retain(|row| row.drawing_id != drawing_id);
        let mut rows: Vec<ShapeRow> = snapshot
            .shapes
            .iter()
            .map(|record| ShapeRow::from_record(drawing_id, record))
            .collect();
        rows.sort_by_key(|row| row.shape_order);
        self.shapes.extend(rows);
        Ok(())
    }

    /// Reads a drawing back with its shape rows ordered by `shape_order`.
    pub fn load(&self, name: &str) -> Option<Snapshot> {
        let header = self.header(name)?;
        let mut shapes: Vec<ShapeRecord> = self
            .shapes
            .iter()
            .filter(|row| row.drawing_id == header.id)
            .map(ShapeRow::to_record)
            .collect();
        shapes.sort_by_key(|record| record.order);

        Some(Snapshot {
            name: header.name.clone(),
            canvas_width: header.canvas_width,
            canvas_height: header.canvas_height,
            created_at: header.created_at,
            modified_at: header.modified_at,
            shapes,
        })
    }

    /// Drawing names, most recently modified first.
    pub fn list(&self) -> Vec<String> {
        let mut headers: Vec<&DrawingRow> = self.drawings.iter().collect();
        headers.sort_by(|a, b| {
            b.revision
                .cmp(&a.revision)
                .then_with(|| b.modified_at.cmp(&a.modified_at))
        });
        headers.into_iter().map(|row| row.name.clone()).collect()
    }

    /// Removes a drawing and all of its shape rows.
    pub fn delete(&mut self, name: &str) -> bool {
        let Some(index) = self.drawings.iter().position(|row| row.name == name) else {
            return false;
        };
        let header = self.drawings.remove(index);
        self.shapes.retain(|row| row.drawing_id != header.id);
        true
    }

    /// Drops shape rows whose drawing no longer exists. Returns how many went.
    pub fn prune_orphans(&mut self) -> usize {
        let ids: HashSet<u64> = self.drawings.iter().map(|row| row.id).collect();
        let before = self.shapes.len();
        self.shapes.retain(|row| ids.contains(&row.drawing_id));
        let removed = before - self.shapes.len();
        if removed > 0 {
            warn!("Dropped {removed} shape rows that referenced missing drawings");
        }
        removed
    }

    /// Keeps the id and revision counters ahead of every stored row.
    pub fn repair_counters(&mut self) {
        if let Some(max_id) = self.drawings.iter().map(|row| row.id).max() {
            self.next_id = self.next_id.max(max_id + 1);
        }
        if let Some(max_rev) = self.drawings.iter().map(|row| row.revision).max() {
            self.next_revision = self.next_revision.max(max_rev + 1);
        }
    }

    pub fn shape_rows_for(&self, name: &str) -> usize {
        self.header(name)
            .map(|header| {
                self.shapes
                    .iter()
                    .filter(|row| row.drawing_id == header.id)
                    .count()
            })
            .unwrap_or(0)
    }
}
