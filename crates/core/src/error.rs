//! Errors raised when building a grid or spawn policy from outside data.

use crate::types::Tile;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("expected 4 rows, got {0}")]
    RowCount(usize),
    #[error("row {row} has {len} cells, expected 4")]
    RowLength { row: usize, len: usize },
    #[error("cell ({x}, {y}) holds {value}, which is neither 0 nor a power of two >= 2")]
    InvalidTile { x: usize, y: usize, value: Tile },
    #[error("spawn probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
}
