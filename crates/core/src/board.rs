//! Board module - manages the locked-cell grid
//!
//! The board is a `width x height` grid where each cell is empty or holds the
//! kind of the piece that was locked there (for coloring).
//! Uses a flat row-major vector; dimensions come from configuration.
//! Coordinates: (x, y) where x grows left to right and y grows top to bottom.
//! Rows above the board (y < 0) are never stored.

use arrayvec::ArrayVec;
use log::warn;

use crate::types::{Cell, PieceKind};

/// Rows one lock can complete: a piece spans at most four rows.
pub const MAX_CLEARED_ROWS: usize = 4;

/// The locked-cell grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u16, height: u16) -> Self {
        let width = i32::from(width);
        let height = i32::from(height);
        Self {
            width,
            height,
            cells: vec![None; (width * height) as usize],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some((y * self.width + x) as usize)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: i32) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Borrow one row.
    pub fn row(&self, y: i32) -> Option<&[Cell]> {
        if y < 0 || y >= self.height {
            return None;
        }
        let start = (y * self.width) as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Write blocks of a piece; cells above the board (y < 0) are dropped.
    pub fn lock_cells(&mut self, blocks: &[(i32, i32)], kind: PieceKind) {
        for &(x, y) in blocks {
            if y >= 0 {
                self.set(x, y, Some(kind));
            }
        }
    }

    /// Remove every full row, compact the rest downward and insert empty rows
    /// at the top. Returns the removed row indices, top to bottom, as they
    /// were before compaction.
    ///
    /// Allocation-free. Only a board edited by hand can hold more than
    /// [`MAX_CLEARED_ROWS`] full rows; those are still removed, but only the
    /// lowest four are reported.
    pub fn clear_full_rows(&mut self) -> ArrayVec<usize, MAX_CLEARED_ROWS> {
        let width = self.width as usize;
        let mut cleared = ArrayVec::new();
        let mut write_y = self.height as usize;

        // Two-pointer scan from the bottom; copy_within handles overlap.
        for read_y in (0..self.height as usize).rev() {
            if self.is_row_full(read_y as i32) {
                if cleared.try_push(read_y).is_err() {
                    warn!("row {read_y} cleared but not reported");
                }
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src = read_y * width;
                    self.cells.copy_within(src..src + width, write_y * width);
                }
            }
        }

        self.cells[..write_y * width].fill(None);

        cleared.reverse();
        cleared
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of locked cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}
