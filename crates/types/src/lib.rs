//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, making them usable
//! in any context (core logic, CLI driver, network adapter).
//!
//! # Grid Dimensions
//!
//! The playfield is a fixed 4x4 grid:
//!
//! - **Columns**: `x` in 0..=3, left to right
//! - **Rows**: `y` in 0..=3, top to bottom (row 0 is the top)
//!
//! # Tile Values
//!
//! A cell holds `0` (empty) or a power of two `>= 2`.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `GRID_SIZE` | 4 | Cells per row and per column |
//! | `CELL_COUNT` | 16 | Total cells |
//! | `EMPTY` | 0 | Empty cell marker |
//! | `SPAWN_TWO_PROBABILITY` | 0.9 | Chance that a spawned tile is a 2 |
//!
//! # Examples
//!
//! ```
//! use grid2048_types::{Direction, GRID_SIZE};
//!
//! let dir = Direction::from_str("LEFT").unwrap();
//! assert_eq!(dir, Direction::Left);
//! assert_eq!(dir.as_str(), "left");
//! assert_eq!(GRID_SIZE, 4);
//! ```

/// Cells per row and per column
pub const GRID_SIZE: usize = 4;

/// Total number of cells on the grid
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Empty cell marker
pub const EMPTY: Tile = 0;

/// Largest representable tile; two of these never merge
pub const MAX_TILE: Tile = 1 << 31;

/// Probability that a spawned tile is a 2 (otherwise a 4)
pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Number of tiles placed before the first move
pub const INITIAL_TILES: usize = 2;

/// A tile value: `0` for empty, otherwise a power of two `>= 2`
pub type Tile = u32;

/// Returns true if `value` may legally sit in a cell.
///
/// ```
/// use grid2048_types::is_valid_tile;
///
/// assert!(is_valid_tile(0));
/// assert!(is_valid_tile(2048));
/// assert!(!is_valid_tile(1));
/// assert!(!is_valid_tile(6));
/// ```
#[inline]
pub fn is_valid_tile(value: Tile) -> bool {
    value == EMPTY || (value >= 2 && value.is_power_of_two())
}

/// The four compass directions tiles can be pushed in.
///
/// The direction picks the axis (columns for Up/Down, rows for Left/Right)
/// and the end of each line that tiles compact toward:
///
/// - **Up**: row 0
/// - **Down**: row 3
/// - **Left**: column 0
/// - **Right**: column 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in a fixed order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse a direction (case-insensitive)
    ///
    /// Accepts full names or single letters:
    /// "up" | "u", "down" | "d", "left" | "l", "right" | "r"
    ///
    /// # Examples
    ///
    /// ```
    /// use grid2048_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("up"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("R"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("north"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Map a line index and a position counted from the target end to `(x, y)`.
    ///
    /// `line` selects the row (Left/Right) or column (Up/Down); `pos == 0` is
    /// the cell tiles compact toward.
    ///
    /// ```
    /// use grid2048_types::Direction;
    ///
    /// assert_eq!(Direction::Left.cell(1, 0), (0, 1));
    /// assert_eq!(Direction::Right.cell(1, 0), (3, 1));
    /// assert_eq!(Direction::Up.cell(2, 0), (2, 0));
    /// assert_eq!(Direction::Down.cell(2, 0), (2, 3));
    /// ```
    #[inline]
    pub fn cell(&self, line: usize, pos: usize) -> (usize, usize) {
        let far = GRID_SIZE - 1;
        match self {
            Direction::Left => (pos, line),
            Direction::Right => (far - pos, line),
            Direction::Up => (line, pos),
            Direction::Down => (line, far - pos),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
