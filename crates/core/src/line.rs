//! Line compaction - the merge rule applied to one row or column
//!
//! A line is four cells ordered from the target end (index 0) to the far end.
//! Tiles slide toward index 0; equal neighbors merge once per move.

use crate::types::{Tile, EMPTY, GRID_SIZE, MAX_TILE};

pub type Line = [Tile; GRID_SIZE];

/// Result of compacting one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOutcome {
    pub line: Line,
    pub moved: bool,
    pub merges: u32,
    /// Sum of the values produced by merges
    pub score: u64,
}

/// Slide and merge a line toward index 0.
///
/// A written tile absorbs at most one merge, and a tile only merges with the
/// nearest non-empty tile before it, so `[2, 2, 2, 0]` becomes `[4, 2, 0, 0]`.
/// Tiles at [`MAX_TILE`] never merge.
///
/// ```
/// use grid2048_core::line::compact_line;
///
/// let out = compact_line([2, 2, 4, 4]);
/// assert_eq!(out.line, [4, 8, 0, 0]);
/// assert_eq!(out.merges, 2);
/// assert_eq!(out.score, 12);
/// ```
pub fn compact_line(src: Line) -> LineOutcome {
    let mut out = [EMPTY; GRID_SIZE];
    let mut cursor = 0usize;
    let mut last_merged = false;
    let mut moved = false;
    let mut merges = 0u32;
    let mut score = 0u64;

    for (i, &value) in src.iter().enumerate() {
        if value == EMPTY {
            continue;
        }
        if cursor > 0 && out[cursor - 1] == value && !last_merged && value < MAX_TILE {
            out[cursor - 1] = value * 2;
            last_merged = true;
            moved = true;
            merges += 1;
            score += u64::from(value) * 2;
        } else {
            out[cursor] = value;
            if cursor != i {
                moved = true;
            }
            cursor += 1;
            last_merged = false;
        }
    }

    LineOutcome {
        line: out,
        moved,
        merges,
        score,
    }
}
