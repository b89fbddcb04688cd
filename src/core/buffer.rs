//! Buffer module - manages the grid of locked-in blocks
//!
//! The buffer is a `width` x `height` grid stored as a list of rows,
//! top to bottom. Each row carries a `removed` flag marking it for
//! compaction: `tick_rows` deletes flagged rows and prepends fresh empty
//! rows at the top, which is the single mechanism by which cleared rows
//! disappear and the stack shifts down.
//! Coordinates: (x, y) where x ranges left to right, y top to bottom.

use serde::{Deserialize, Serialize};

use crate::types::{Cell, TetrominoKind};

/// One row of the playfield plus its pending-removal flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BufferRow {
    pub cells: Vec<Cell>,
    pub removed: bool,
}

impl BufferRow {
    /// Create an empty row of the given width
    pub fn empty(width: usize) -> Self {
        Self {
            cells: vec![None; width],
            removed: false,
        }
    }

    /// Count of non-empty cells in the row
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// True if any cell is non-empty
    pub fn some(&self) -> bool {
        self.cells.iter().any(|cell| cell.is_some())
    }

    /// True if every cell is non-empty
    pub fn full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// Empty every cell, leaving the `removed` flag untouched
    pub fn clear_cells(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }
}

/// A single cell write, used for partial re-renders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferPatch {
    pub x: usize,
    pub y: usize,
    pub cell: Cell,
}

/// The persistent grid of locked-in blocks, excluding the falling piece
///
/// Invariant: `rows.len() == height` and every row has exactly `width`
/// cells, before and after every operation including compaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buffer {
    width: usize,
    height: usize,
    rows: Vec<BufferRow>,
}

impl Buffer {
    /// Create a new empty buffer
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            rows: (0..height).map(|_| BufferRow::empty(width)).collect(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn rows(&self) -> &[BufferRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [BufferRow] {
        &mut self.rows
    }

    /// Get cell at (x, y); None when out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.rows[y].cells[x])
    }

    /// Set cell at (x, y); returns false when out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return false;
        }
        self.rows[y].cells[x] = cell;
        true
    }

    /// True when (x, y) is inside the grid and empty
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Apply a list of single-cell writes
    pub fn patch(&mut self, patches: &[BufferPatch]) {
        for patch in patches {
            if patch.y < self.height && patch.x < self.width {
                self.rows[patch.y].cells[patch.x] = patch.cell;
            }
        }
    }

    /// Mark a row as pending removal
    pub fn mark_removed(&mut self, y: usize) {
        if y < self.height {
            self.rows[y].removed = true;
        }
    }

    /// Compact rows flagged `removed`: delete them and prepend an equal
    /// number of fresh empty rows at the top. Returns whether any row was
    /// compacted; a buffer with no flagged rows is left untouched.
    pub fn tick_rows(&mut self) -> bool {
        let removed = self.rows.iter().filter(|row| row.removed).count();
        if removed == 0 {
            return false;
        }

        self.rows.retain(|row| !row.removed);
        for _ in 0..removed {
            self.rows.insert(0, BufferRow::empty(self.width));
        }
        true
    }

    /// Merge a piece's occupied cells into the buffer
    pub fn merge(&mut self, cells: &[(i32, i32)], kind: TetrominoKind) {
        for &(x, y) in cells {
            self.set(x, y, Some(kind));
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new(crate::types::BUFFER_WIDTH, crate::types::BUFFER_HEIGHT)
    }
}
