//! Uniform-grid spatial hash used for broad-phase queries.
//!
//! A body is registered in every cell its bounding box overlaps and only
//! re-bucketed when that cell range changes. Bodies covering more than
//! `MAX_BODY_CELLS` cells are kept in a separate oversized set and returned
//! by every query.

use std::collections::{BTreeSet, HashMap};

use glam::DVec2;

use starwake_core::ObjectId;

use super::CollisionBody;

/// Cell coordinates are clamped to `±MAX_CELL` so spans fit in `u64`.
const MAX_CELL: i64 = 1 << 24;

/// Bodies spanning more cells than this are not bucketed.
const MAX_BODY_CELLS: u64 = 1024;

/// Inclusive range of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub min: (i64, i64),
    pub max: (i64, i64),
}

impl CellRange {
    /// Number of cells in the range.
    pub fn cell_count(self) -> u64 {
        let width = self.max.0.saturating_sub(self.min.0).saturating_add(1).max(0) as u64;
        let height = self.max.1.saturating_sub(self.min.1).saturating_add(1).max(0) as u64;
        width.saturating_mul(height)
    }

    fn contains(self, cell: (i64, i64)) -> bool {
        (self.min.0..=self.max.0).contains(&cell.0) && (self.min.1..=self.max.1).contains(&cell.1)
    }

    fn cells(self) -> impl Iterator<Item = (i64, i64)> {
        (self.min.0..=self.max.0).flat_map(move |x| (self.min.1..=self.max.1).map(move |y| (x, y)))
    }
}

#[derive(Debug)]
pub struct SpatialHash {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<ObjectId>>,
    oversized: BTreeSet<ObjectId>,
}

impl SpatialHash {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            oversized: BTreeSet::new(),
        }
    }

    /// Cells overlapped by the square around `center`.
    pub fn cell_range(&self, center: DVec2, radius: f64) -> CellRange {
        let radius = radius.max(0.0);
        CellRange {
            min: (self.to_cell(center.x - radius), self.to_cell(center.y - radius)),
            max: (self.to_cell(center.x + radius), self.to_cell(center.y + radius)),
        }
    }

    fn to_cell(&self, v: f64) -> i64 {
        let cell = (v / self.cell_size).floor();
        if cell.is_nan() {
            return 0;
        }
        (cell.clamp(-(MAX_CELL as f64), MAX_CELL as f64)) as i64
    }

    pub fn insert(&mut self, id: &ObjectId, body: &mut CollisionBody) {
        let range = self.cell_range(body.position, body.radius);
        if range.cell_count() > MAX_BODY_CELLS {
            self.oversized.insert(id.clone());
        } else {
            for cell in range.cells() {
                self.cells.entry(cell).or_default().push(id.clone());
            }
        }
        body.cells = Some(range);
    }

    /// Re-bucket `body` if it left its cell range.
    pub fn update(&mut self, id: &ObjectId, body: &mut CollisionBody) {
        let range = self.cell_range(body.position, body.radius);
        if body.cells == Some(range) {
            return;
        }
        self.remove(id, body);
        self.insert(id, body);
    }

    pub fn remove(&mut self, id: &ObjectId, body: &mut CollisionBody) {
        let Some(range) = body.cells.take() else {
            return;
        };
        if range.cell_count() > MAX_BODY_CELLS {
            self.oversized.remove(id);
            return;
        }
        for cell in range.cells() {
            if let Some(ids) = self.cells.get_mut(&cell) {
                ids.retain(|other| other != id);
                if ids.is_empty() {
                    self.cells.remove(&cell);
                }
            }
        }
    }

    /// Ids registered in any cell overlapped by the circle's bounding box, in id order.
    pub fn potentials(&self, center: DVec2, radius: f64) -> BTreeSet<ObjectId> {
        self.potentials_in(self.cell_range(center, radius))
    }

    /// Ids registered along the bounding box of a segment, in id order.
    pub fn potentials_along(&self, from: DVec2, to: DVec2) -> BTreeSet<ObjectId> {
        let min = from.min(to);
        let max = from.max(to);
        self.potentials_in(CellRange {
            min: (self.to_cell(min.x), self.to_cell(min.y)),
            max: (self.to_cell(max.x), self.to_cell(max.y)),
        })
    }

    fn potentials_in(&self, range: CellRange) -> BTreeSet<ObjectId> {
        let mut found = self.oversized.clone();
        if range.cell_count() > self.cells.len() as u64 {
            for (cell, ids) in &self.cells {
                if range.contains(*cell) {
                    found.extend(ids.iter().cloned());
                }
            }
            return found;
        }
        for cell in range.cells() {
            if let Some(ids) = self.cells.get(&cell) {
                found.extend(ids.iter().cloned());
            }
        }
        found
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn oversized_len(&self) -> usize {
        self.oversized.len()
    }
}
