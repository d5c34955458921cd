//! Sparse pixel buffer - the growable collection of live cells

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::cell::{Cell, GRID_HEIGHT, GRID_WIDTH};

/// Sparse, growable collection of cells for one canvas frame.
///
/// Cells live in a `Vec` in insertion order (the serialization and
/// simulation-visit order); a coordinate index maps `(col, row)` to the Vec
/// slot for O(1) lookups. At most one cell occupies a coordinate - inserting
/// at an occupied coordinate replaces the existing cell (last write wins).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    #[serde(skip)]
    index: AHashMap<(u32, u32), usize>,
}

impl PixelBuffer {
    /// Create an empty buffer with the default grid dimensions
    pub fn new() -> Self {
        Self::with_size(GRID_WIDTH, GRID_HEIGHT)
    }

    /// Create an empty buffer with custom grid dimensions
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: Vec::new(),
            index: AHashMap::new(),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of live cells
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate live cells in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Live cells as a slice, in insertion order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    fn in_bounds(&self, col: u32, row: u32) -> bool {
        col < self.width && row < self.height
    }

    /// Insert a cell. Out-of-bounds coordinates are silently dropped; an
    /// occupied coordinate is replaced in place.
    pub fn add(&mut self, cell: Cell) {
        if !self.in_bounds(cell.col, cell.row) {
            return;
        }
        match self.index.get(&(cell.col, cell.row)) {
            Some(&slot) => self.cells[slot] = cell,
            None => {
                self.index.insert((cell.col, cell.row), self.cells.len());
                self.cells.push(cell);
            }
        }
    }

    /// Cell occupying `(col, row)`, if any
    pub fn get(&self, col: u32, row: u32) -> Option<&Cell> {
        self.index.get(&(col, row)).map(|&slot| &self.cells[slot])
    }

    /// Mutable access to the cell occupying `(col, row)`, if any
    pub fn get_mut(&mut self, col: u32, row: u32) -> Option<&mut Cell> {
        match self.index.get(&(col, row)) {
            Some(&slot) => Some(&mut self.cells[slot]),
            None => None,
        }
    }

    #[inline]
    pub fn is_occupied(&self, col: u32, row: u32) -> bool {
        self.index.contains_key(&(col, row))
    }

    /// Remove the occupant of `(col, row)`. No-op (and idempotent) when the
    /// coordinate is empty.
    pub fn remove_at(&mut self, col: u32, row: u32) {
        if let Some(slot) = self.index.remove(&(col, row)) {
            self.cells.swap_remove(slot);
            // Patch the index entry of whatever got swapped into the hole
            if slot < self.cells.len() {
                let moved = self.cells[slot];
                self.index.insert((moved.col, moved.row), slot);
            }
        }
    }

    /// Move the occupant of `(col, row)` to an empty in-bounds target.
    /// Returns false when there is no occupant, the target is out of bounds,
    /// or the target is occupied.
    pub fn move_cell(&mut self, col: u32, row: u32, new_col: u32, new_row: u32) -> bool {
        if !self.in_bounds(new_col, new_row) || self.index.contains_key(&(new_col, new_row)) {
            return false;
        }
        let Some(slot) = self.index.remove(&(col, row)) else {
            return false;
        };
        self.cells[slot].col = new_col;
        self.cells[slot].row = new_row;
        self.index.insert((new_col, new_row), slot);
        true
    }

    /// Drop every cell
    pub fn clear(&mut self) {
        self.cells.clear();
        self.index.clear();
    }

    /// Insert every cell of `other` in its insertion order, so `other`'s
    /// cells win coordinate collisions.
    pub fn merge(&mut self, other: &PixelBuffer) {
        for cell in other.iter() {
            self.add(*cell);
        }
    }

    /// Bulk display-size mutation, applied when the zoom level changes
    pub fn resize_all(&mut self, size: u8) {
        for cell in &mut self.cells {
            cell.size = size;
        }
    }

    /// Rebuild the coordinate index from the cell list. Needed after
    /// deserialization, which skips the index.
    pub(crate) fn rebuild_index(&mut self) {
        self.index.clear();
        self.index.reserve(self.cells.len());
        for (slot, cell) in self.cells.iter().enumerate() {
            self.index.insert((cell.col, cell.row), slot);
        }
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}
