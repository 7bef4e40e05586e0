//! Grid module - the 4x4 tile matrix
//!
//! Uses a flat array for cache locality and zero allocation.
//! Coordinates: (x, y) where x is the column 0..=3 (left to right) and
//! y is the row 0..=3 (top to bottom).

use std::fmt;

use arrayvec::ArrayVec;

use crate::error::GridError;
use crate::types::{is_valid_tile, Tile, CELL_COUNT, EMPTY, GRID_SIZE, MAX_TILE};

/// A 4x4 snapshot, row 0 first
pub type Rows = [[Tile; GRID_SIZE]; GRID_SIZE];

/// The tile grid - 4 columns x 4 rows using flat array storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Grid {
    /// Flat array of cells, row-major order (y * GRID_SIZE + x)
    cells: [Tile; CELL_COUNT],
}

impl Grid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self {
            cells: [EMPTY; CELL_COUNT],
        }
    }

    /// Build a grid from rows, rejecting values that are not legal tiles
    pub fn from_rows(rows: Rows) -> Result<Self, GridError> {
        let mut grid = Self::new();
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(GridError::InvalidTile { x, y, value });
                }
                grid.cells[y * GRID_SIZE + x] = value;
            }
        }
        Ok(grid)
    }

    #[inline(always)]
    fn index(x: usize, y: usize) -> Option<usize> {
        if x >= GRID_SIZE || y >= GRID_SIZE {
            return None;
        }
        Some(y * GRID_SIZE + x)
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: usize, y: usize) -> Option<Tile> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds or the value is not a legal tile
    pub fn set(&mut self, x: usize, y: usize, value: Tile) -> bool {
        if !is_valid_tile(value) {
            return false;
        }
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = value;
                true
            }
            None => false,
        }
    }

    /// Empty cell coordinates in row-major order
    pub fn empty_cells(&self) -> ArrayVec<(usize, usize), CELL_COUNT> {
        let mut out = ArrayVec::new();
        for (idx, &value) in self.cells.iter().enumerate() {
            if value == EMPTY {
                out.push((idx % GRID_SIZE, idx / GRID_SIZE));
            }
        }
        out
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&v| v == EMPTY).count()
    }

    pub fn tile_count(&self) -> usize {
        CELL_COUNT - self.empty_count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&v| v != EMPTY)
    }

    /// Sum of all tile values
    pub fn sum(&self) -> u64 {
        self.cells.iter().map(|&v| v as u64).sum()
    }

    /// Largest tile on the grid (0 when empty)
    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(EMPTY)
    }

    /// True if any two horizontally or vertically adjacent tiles could merge
    pub fn has_adjacent_pair(&self) -> bool {
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let v = self.cells[y * GRID_SIZE + x];
                if v == EMPTY || v == MAX_TILE {
                    continue;
                }
                if x + 1 < GRID_SIZE && self.cells[y * GRID_SIZE + x + 1] == v {
                    return true;
                }
                if y + 1 < GRID_SIZE && self.cells[(y + 1) * GRID_SIZE + x] == v {
                    return true;
                }
            }
        }
        false
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Tile; CELL_COUNT] {
        &self.cells
    }

    /// Row-major snapshot, row 0 = top
    pub fn rows(&self) -> Rows {
        let mut rows = [[EMPTY; GRID_SIZE]; GRID_SIZE];
        for (y, row) in rows.iter_mut().enumerate() {
            row.copy_from_slice(&self.cells[y * GRID_SIZE..(y + 1) * GRID_SIZE]);
        }
        rows
    }

    /// Mirror left-to-right
    pub fn mirrored(&self) -> Self {
        let mut out = Self::new();
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                out.cells[y * GRID_SIZE + (GRID_SIZE - 1 - x)] = self.cells[y * GRID_SIZE + x];
            }
        }
        out
    }

    /// Swap rows and columns
    pub fn transposed(&self) -> Self {
        let mut out = Self::new();
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                out.cells[x * GRID_SIZE + y] = self.cells[y * GRID_SIZE + x];
            }
        }
        out
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }
}

impl TryFrom<Vec<Vec<Tile>>> for Grid {
    type Error = GridError;

    /// Checks dimensions before values, so a short row is reported as such.
    fn try_from(rows: Vec<Vec<Tile>>) -> Result<Self, Self::Error> {
        if rows.len() != GRID_SIZE {
            return Err(GridError::RowCount(rows.len()));
        }
        let mut fixed = [[EMPTY; GRID_SIZE]; GRID_SIZE];
        for (y, row) in rows.iter().enumerate() {
            if row.len() != GRID_SIZE {
                return Err(GridError::RowLength {
                    row: y,
                    len: row.len(),
                });
            }
            fixed[y].copy_from_slice(row);
        }
        Self::from_rows(fixed)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                if x > 0 {
                    f.write_str(" ")?;
                }
                match self.cells[y * GRID_SIZE + x] {
                    EMPTY => write!(f, "{:>5}", ".")?,
                    v => write!(f, "{:>5}", v)?,
                }
            }
            if y + 1 < GRID_SIZE {
                f.write_str("\n")?;
            }
        }
        Ok(())
    }
}
